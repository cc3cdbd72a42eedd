use std::fmt;

use stepvis_macros::Label;

use crate::Label as _;

/// Externally visible state of a [`StepController`](crate::StepController).
///
/// `Running` is reported while a run session is attached and a step is
/// pending. `Done` is transient: a finished run passes through it and
/// settles in `Idle` within the same operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Label)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControllerState {
    #[default]
    Idle,
    StepPending,
    WaitingForInput,
    Running,
    Aborting,
    Done,
}

impl ControllerState {
    /// A producer is installed in every active state.
    pub fn is_active(&self) -> bool {
        !matches!(self, ControllerState::Idle | ControllerState::Done)
    }

    /// Whether a new producer can be installed.
    pub fn accepts_start(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
