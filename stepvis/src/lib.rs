//! stepvis - Step-execution engine for algorithm visualizations
//!
//! Each algorithm run is authored as a [`StepProducer`]: a resumable state
//! machine that suspends at every checkpoint the viewer should see. A
//! [`StepController`] owns the installed producer and advances it one
//! checkpoint at a time, on a timer in run mode, or after the user answers
//! an input dialog opened through the input gate.
//!
//! A [`Page`] wires one controller to a model, a [`Surface`] and a set of
//! named actions, and runs the whole thing as a single Tokio task driven
//! through a [`PageHandle`].
//!
//! See `examples/sorting.rs` and `examples/hash-table.rs`.

extern crate self as stepvis;

mod config;
mod controller;
mod error;
mod label;
mod message;
mod page;
mod producer;
mod run_id;
mod scheduler;
mod state;
mod surface;

pub mod algorithms;
pub mod gate;
pub mod testing;

mod internal;

pub use config::Config;
pub use controller::{Advance, StepController};
pub use error::Error;
pub use gate::{InputOutcome, InputPrompt, InputRequest, InputResponder, InputTicket, NumericField};
pub use label::Label;
pub use message::{ERROR_MARKER, Step, StepMessage};
pub use page::{Page, PageHandle};
pub use producer::{Aborted, BoxProducer, FnProducer, StepContext, StepProducer, from_fn};
pub use run_id::RunId;
pub use scheduler::{IntervalPolicy, RunSession};
pub use state::ControllerState;
pub use surface::Surface;

#[cfg(feature = "macros")]
pub use stepvis_macros::Label;

pub type Result<T = ()> = std::result::Result<T, Error>;
