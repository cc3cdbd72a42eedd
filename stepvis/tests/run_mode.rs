//! Timer-driven behavior, on Tokio's paused clock.

use std::{sync::atomic::Ordering, time::Duration};

use stepvis::{
    Config, ControllerState, Error, InputOutcome, InputPrompt, Page, PageHandle,
    testing::{Recording, RecordingSurface, Script},
};
use tokio::time::{Instant, sleep};

fn page(config: Config) -> (PageHandle<()>, Recording) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let surface = RecordingSurface::new();
    let recording = surface.recording();
    let (handle, _task) = Page::new("run-mode", (), surface).with_config(config).spawn();
    (handle, recording)
}

#[tokio::test(start_paused = true)]
async fn test_run_advances_once_per_interval() -> stepvis::Result {
    let (handle, recording) = page(Config::default());
    let script = Script::shows(["first", "1", "2", "3", "4"]).then_done("5");
    let calls = script.calls();
    handle.start(script).await?;

    let started = Instant::now();
    assert_eq!(
        handle.run(Duration::from_millis(200)).await?,
        ControllerState::Running
    );
    handle.wait_for_state(|s| *s == ControllerState::Idle).await?;

    let timed = recording.timed_messages();
    let texts: Vec<_> = timed.iter().map(|(text, _)| text.as_str()).collect();
    assert_eq!(texts, ["first", "1", "2", "3", "4", "5"]);
    assert_eq!(calls.load(Ordering::SeqCst), 6);

    let mut previous = started;
    for (_, at) in &timed[1..] {
        assert!(*at - previous >= Duration::from_millis(200));
        previous = *at;
    }
    assert!(previous - started < Duration::from_millis(1100));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_next_rejected_during_run() -> stepvis::Result {
    let (handle, recording) = page(Config::default());
    handle.start(Script::shows(["first", "1", "2"])).await?;
    handle.run(Duration::from_millis(200)).await?;

    sleep(Duration::from_millis(190)).await;
    assert!(matches!(
        handle.next().await,
        Err(Error::NoStepPending(ControllerState::Running))
    ));
    assert_eq!(recording.messages(), ["first"]);
    assert_eq!(handle.state(), ControllerState::Running);

    sleep(Duration::from_millis(20)).await;
    assert_eq!(recording.messages(), ["first", "1"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticks() -> stepvis::Result {
    let (handle, recording) = page(Config::default());
    handle.start(Script::shows(["a", "b", "c", "d"])).await?;
    handle.run(Duration::from_millis(100)).await?;

    sleep(Duration::from_millis(150)).await;
    assert_eq!(handle.pause().await?, ControllerState::StepPending);
    let seen = recording.messages();
    assert_eq!(seen, ["a", "b"]);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(recording.messages(), seen);
    assert_eq!(handle.state(), ControllerState::StepPending);

    handle.next().await?;
    assert_eq!(recording.last_message().as_deref(), Some("c"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_toggle_run_uses_configured_interval() -> stepvis::Result {
    let config = Config::default().with_run_interval(Duration::from_millis(300));
    let (handle, recording) = page(config);
    handle.start(Script::shows(["a", "b", "c"])).await?;

    let started = Instant::now();
    assert_eq!(handle.toggle_run().await?, ControllerState::Running);
    sleep(Duration::from_millis(350)).await;
    assert_eq!(handle.toggle_run().await?, ControllerState::StepPending);

    let timed = recording.timed_messages();
    assert_eq!(timed.len(), 2);
    assert!(timed[1].1 - started >= Duration::from_millis(300));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_abort_while_running_stops_ticks() -> stepvis::Result {
    let (handle, recording) = page(Config::default().with_abort_message("Stopped"));
    handle.start(Script::shows(["a", "b", "c", "d", "e", "f"])).await?;
    handle.run(Duration::from_millis(100)).await?;

    sleep(Duration::from_millis(250)).await;
    assert_eq!(handle.abort().await?, ControllerState::Idle);
    let seen = recording.messages();
    assert_eq!(seen.last().map(String::as_str), Some("Stopped"));

    sleep(Duration::from_secs(1)).await;
    assert_eq!(recording.messages(), seen);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_run_waits_for_open_dialog() -> stepvis::Result {
    let (handle, recording) = page(Config::default());
    let script = Script::shows(["a", "Dialog opened", "c"])
        .with_prompt_at(1, InputPrompt::number("Value"));
    let inputs = script.inputs();
    handle.start(script).await?;
    handle.run(Duration::from_millis(100)).await?;

    handle
        .wait_for_state(|s| *s == ControllerState::WaitingForInput)
        .await?;
    sleep(Duration::from_millis(500)).await;
    assert_eq!(recording.messages(), ["a", "Dialog opened"]);

    assert!(recording.take_dialog().expect("dialog is open").confirm(3));
    handle.wait_for_state(|s| *s == ControllerState::Idle).await?;

    assert_eq!(recording.messages(), ["a", "Dialog opened", "c"]);
    assert_eq!(
        *inputs.lock().expect("inputs lock"),
        [InputOutcome::Confirmed(3)]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_run_rejections() -> stepvis::Result {
    let (handle, _) = page(Config::default());
    assert!(matches!(
        handle.run(Duration::from_millis(100)).await,
        Err(Error::NoStepPending(ControllerState::Idle))
    ));

    handle.start(Script::shows(["a", "b"])).await?;
    assert!(matches!(
        handle.run(Duration::ZERO).await,
        Err(Error::ZeroInterval)
    ));
    handle.run(Duration::from_millis(100)).await?;
    assert!(matches!(
        handle.run(Duration::from_millis(100)).await,
        Err(Error::AlreadyRunning)
    ));
    Ok(())
}
