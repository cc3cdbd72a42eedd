//! Test support: a surface that records everything pushed into it and a
//! producer that replays a fixed script.
//!
//! # Example
//!
//! ```rust
//! use stepvis::{Step, StepController, testing::{RecordingSurface, Script}};
//!
//! let surface = RecordingSurface::new();
//! let recording = surface.recording();
//! let mut ctl = StepController::new((), surface);
//!
//! ctl.start(Box::new(Script::shows(["Compare 0 and 1"]).then_done("Sorted"))).unwrap();
//! while ctl.advance_once().is_ok() {}
//!
//! assert_eq!(recording.messages(), ["Compare 0 and 1", "Sorted"]);
//! ```

mod recording;
mod script;

pub use recording::{Recording, RecordingSurface, SurfaceEvent};
pub use script::Script;
