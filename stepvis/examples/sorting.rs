//! Bubble Sort Example
//!
//! Fills an array through the "New" action, then sorts it in run mode.
//!
//! The console surface plays the user: it answers every dialog with the next
//! value from a queue and prints each published message followed by the
//! array as bars. Run-mode speed is chosen from the array size with an
//! [`IntervalPolicy`], the way a UI would slow down for small inputs.

use std::{collections::VecDeque, time::Duration};

use stepvis::{
    ControllerState, IntervalPolicy, InputRequest, Page, Surface,
    algorithms::{ArrayModel, BubbleSort, NewArray},
};

struct Console {
    answers: VecDeque<i64>,
}

impl Surface<ArrayModel> for Console {
    fn display_message(&mut self, text: &str) {
        println!("> {text}");
    }

    fn render_snapshot(&mut self, model: &ArrayModel) {
        for (i, value) in model.values.iter().enumerate() {
            let marker = match model.highlight {
                Some((a, b)) if i == a || i == b => '*',
                _ if i >= model.len() - model.sorted => '=',
                _ => ' ',
            };
            println!("  {marker} {value:>3} {}", "#".repeat(*value as usize / 4));
        }
    }

    fn open_dialog(&mut self, request: InputRequest) {
        match self.answers.pop_front() {
            Some(value) => {
                println!("  [{}: {value}]", request.prompt().label());
                request.confirm(value);
            }
            None => {
                request.cancel();
            }
        }
    }

    fn on_state_change(&mut self, from: ControllerState, to: ControllerState) {
        tracing::debug!(%from, %to, "state changed");
    }
}

const SIZE: i64 = 8;

#[tokio::main]
async fn main() -> stepvis::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let console = Console {
        answers: VecDeque::from([SIZE]),
    };
    let page = Page::new("bubble-sort", ArrayModel::default(), console)
        .action("New", |_| NewArray::new(rand::random()))
        .action("Sort", |_| BubbleSort::new());
    let (handle, task) = page.spawn();

    // The console answers the size dialog as soon as it opens.
    handle.action("New").await?;
    handle.wait_for_state(|s| *s == ControllerState::Idle).await?;

    let policy = IntervalPolicy::new(Duration::from_millis(50))
        .with_threshold(10, Duration::from_millis(300))
        .with_threshold(30, Duration::from_millis(120));

    handle.action("Sort").await?;
    handle.next().await?;
    handle.next().await?;

    handle.run(policy.interval_for(SIZE as usize)).await?;
    handle.wait_for_state(|s| *s == ControllerState::Idle).await?;

    handle.shutdown();
    let controller = task.await?;
    println!("sorted: {:?}", controller.model().values);
    Ok(())
}
