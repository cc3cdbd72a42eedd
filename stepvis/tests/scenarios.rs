//! End-to-end behavior of a page driven through its handle.

use stepvis::{
    ControllerState, Error, InputPrompt, Page, PageHandle, StepController,
    algorithms::{ArrayModel, BubbleSort, HashInsert, HashTable},
    testing::{Recording, RecordingSurface, Script},
};
use tokio::task::JoinHandle;

type Task<M> = JoinHandle<StepController<M, RecordingSurface>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn hash_page() -> (PageHandle<HashTable>, Task<HashTable>, Recording) {
    init_tracing();
    let surface = RecordingSurface::new();
    let recording = surface.recording();
    let (handle, task) = Page::new("hash-table", HashTable::new(10), surface)
        .action("Insert", |_| HashInsert::new())
        .spawn();
    (handle, task, recording)
}

fn script_page() -> (PageHandle<()>, Task<()>, Recording) {
    init_tracing();
    let surface = RecordingSurface::new();
    let recording = surface.recording();
    let (handle, task) = Page::new("script", (), surface).spawn();
    (handle, task, recording)
}

#[tokio::test]
async fn test_insert_through_dialog() -> stepvis::Result {
    let (handle, task, recording) = hash_page();

    assert_eq!(handle.action("Insert").await?, ControllerState::StepPending);
    assert_eq!(handle.next().await?, ControllerState::WaitingForInput);

    let dialog = recording.take_dialog().expect("dialog is open");
    assert_eq!(dialog.prompt().label(), "Key");
    assert!(dialog.confirm(5));
    handle
        .wait_for_state(|s| *s == ControllerState::StepPending)
        .await?;

    assert_eq!(handle.next().await?, ControllerState::Idle);
    assert_eq!(
        recording.messages(),
        [
            "Enter key",
            "Dialog opened",
            "Will insert item with key 5",
            "Insertion completed; total items 1",
        ]
    );

    handle.shutdown();
    let controller = task.await?;
    assert!(controller.model().contains(5));
    Ok(())
}

#[tokio::test]
async fn test_next_while_waiting_for_input_is_rejected() -> stepvis::Result {
    let (handle, _task, recording) = hash_page();
    handle.action("Insert").await?;
    handle.next().await?;

    let err = handle.next().await.unwrap_err();
    assert!(matches!(err, Error::WaitingForInput));
    assert_eq!(handle.state(), ControllerState::WaitingForInput);
    assert_eq!(recording.messages().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_cancelled_dialog_ends_run() -> stepvis::Result {
    let (handle, _task, recording) = hash_page();
    handle.action("Insert").await?;
    handle.next().await?;

    assert!(recording.take_dialog().expect("dialog is open").cancel());
    handle.wait_for_state(|s| *s == ControllerState::Idle).await?;
    assert_eq!(recording.messages(), ["Enter key", "Dialog opened"]);
    Ok(())
}

#[tokio::test]
async fn test_dropped_dialog_counts_as_cancel() -> stepvis::Result {
    let (handle, _task, recording) = hash_page();
    handle.action("Insert").await?;
    handle.next().await?;

    drop(recording.take_dialog());
    handle.wait_for_state(|s| *s == ControllerState::Idle).await?;
    assert_eq!(recording.last_message().as_deref(), Some("Dialog opened"));
    Ok(())
}

#[tokio::test]
async fn test_abort_while_idle_is_a_noop() -> stepvis::Result {
    let (handle, _task, recording) = script_page();
    assert_eq!(handle.abort().await?, ControllerState::Idle);
    assert!(recording.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_abort_while_waiting_discards_late_answer() -> stepvis::Result {
    let (handle, _task, recording) = script_page();
    let script = Script::shows(["Dialog opened", "never shown"])
        .with_prompt_at(0, InputPrompt::number("Key"));
    let calls = script.calls();

    assert_eq!(handle.start(script).await?, ControllerState::WaitingForInput);
    let dialog = recording.take_dialog().expect("dialog is open");

    assert_eq!(handle.abort().await?, ControllerState::Idle);
    assert!(!dialog.confirm(5));
    assert!(matches!(
        handle.next().await,
        Err(Error::NoStepPending(ControllerState::Idle))
    ));

    assert_eq!(recording.messages(), ["Dialog opened", "Aborted"]);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_invalid_key_never_opens_dialog() -> stepvis::Result {
    let (handle, _task, recording) = hash_page();

    assert_eq!(
        handle.start(HashInsert::with_key(1000)).await?,
        ControllerState::Idle
    );
    assert_eq!(recording.messages(), ["ERROR: use key between 0 and 999"]);
    assert_eq!(recording.dialogs_opened(), 0);
    assert!(recording.take_dialog().is_none());
    Ok(())
}

#[tokio::test]
async fn test_zero_channel_size_still_spawns() -> stepvis::Result {
    let config = stepvis::Config {
        command_channel_size: 0,
        ..stepvis::Config::default()
    };
    let surface = RecordingSurface::new();
    let recording = surface.recording();
    let (handle, _task) = Page::new("script", (), surface).with_config(config).spawn();

    assert_eq!(
        handle.start(Script::shows(["only"])).await?,
        ControllerState::StepPending
    );
    assert_eq!(recording.messages(), ["only"]);
    Ok(())
}

#[tokio::test]
async fn test_start_while_busy_is_rejected() -> stepvis::Result {
    let (handle, _task, recording) = script_page();
    handle.start(Script::shows(["one", "two"])).await?;

    let err = handle.start(Script::shows(["other"])).await.unwrap_err();
    assert!(matches!(err, Error::Busy(ControllerState::StepPending)));
    assert_eq!(recording.messages(), ["one"]);
    Ok(())
}

#[tokio::test]
async fn test_unknown_action() -> stepvis::Result {
    let (handle, _task, _) = hash_page();
    let err = handle.action("Delete").await.unwrap_err();
    assert!(matches!(err, Error::UnknownAction(name) if &*name == "Delete"));
    assert_eq!(handle.state(), ControllerState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_triggers_fail_after_shutdown() -> stepvis::Result {
    let (handle, task, _) = script_page();
    handle.shutdown();
    task.await?;

    assert!(handle.is_closed());
    assert!(matches!(handle.next().await, Err(Error::SessionClosed)));
    Ok(())
}

#[tokio::test]
async fn test_page_matches_direct_driving() -> stepvis::Result {
    let values = vec![8, 3, 5, 1, 9, 2];

    let direct_surface = RecordingSurface::new();
    let direct = direct_surface.recording();
    let mut controller = StepController::new(ArrayModel::from(values.clone()), direct_surface);
    controller.start(Box::new(BubbleSort::new()))?;
    while controller.state() == ControllerState::StepPending {
        controller.advance_once()?;
    }

    let surface = RecordingSurface::new();
    let paged = surface.recording();
    let (handle, task) = Page::new("bubble-sort", ArrayModel::from(values), surface)
        .action("Sort", |_| BubbleSort::new())
        .spawn();
    let mut state = handle.action("Sort").await?;
    while state == ControllerState::StepPending {
        state = handle.next().await?;
    }
    handle.shutdown();
    let paged_controller = task.await?;

    assert_eq!(paged_controller.model(), controller.model());
    assert_eq!(paged.messages(), direct.messages());
    assert_eq!(paged.transitions(), direct.transitions());
    Ok(())
}
