//! Hash Table Example
//!
//! Inserts a few keys through the "Insert" dialog, including one the table
//! rejects, then looks keys up with "Find". Everything is driven with the
//! "Next" trigger, one checkpoint at a time.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use stepvis::{
    ControllerState, InputRequest, Page, PageHandle, Surface,
    algorithms::{HashFind, HashInsert, HashTable},
};

/// Dialog answers shared between `main` and the surface.
type Answers = Arc<Mutex<VecDeque<i64>>>;

struct Console {
    answers: Answers,
}

impl Surface<HashTable> for Console {
    fn display_message(&mut self, text: &str) {
        println!("> {text}");
    }

    fn render_snapshot(&mut self, table: &HashTable) {
        for (i, bucket) in table.buckets().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let marked = table.highlight.filter(|(b, _)| *b == i).map(|(_, slot)| slot);
            let items: Vec<String> = bucket
                .iter()
                .enumerate()
                .map(|(slot, key)| match marked {
                    Some(m) if m == slot => format!("[{key}]"),
                    _ => key.to_string(),
                })
                .collect();
            println!("  {i:>2}: {}", items.join(" -> "));
        }
    }

    fn open_dialog(&mut self, request: InputRequest) {
        let answer = self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front());
        match answer {
            Some(key) => {
                println!("  [{}: {key}]", request.prompt().label());
                request.confirm(key);
            }
            None => {
                request.cancel();
            }
        }
    }
}

/// Presses "Next" until the run is over.
async fn step_through(handle: &PageHandle<HashTable>, action: &str) -> stepvis::Result {
    let mut state = handle.action(action).await?;
    while state != ControllerState::Idle {
        state = match state {
            ControllerState::WaitingForInput => {
                handle
                    .wait_for_state(|s| *s != ControllerState::WaitingForInput)
                    .await?
            }
            _ => handle.next().await?,
        };
    }
    Ok(())
}

#[tokio::main]
async fn main() -> stepvis::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let answers: Answers = Arc::new(Mutex::new(VecDeque::from([5, 15, 1234, 25, 15, 7])));
    let console = Console {
        answers: answers.clone(),
    };
    let page = Page::new("hash-table", HashTable::new(10), console)
        .action("Insert", |_| HashInsert::new())
        .action("Find", |_| HashFind::new());
    let (handle, task) = page.spawn();

    for _ in 0..4 {
        step_through(&handle, "Insert").await?;
    }
    for _ in 0..2 {
        step_through(&handle, "Find").await?;
    }

    handle.shutdown();
    let controller = task.await?;
    println!("{} items in table", controller.model().len());
    Ok(())
}
