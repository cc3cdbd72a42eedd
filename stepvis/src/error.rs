use std::sync::Arc;

use tokio::sync::mpsc::error::SendError;

use crate::{ControllerState, InputTicket};

/// Rejected control requests and runtime failures.
///
/// Conditions an algorithm detects (bad input, nothing found, cancelled
/// dialog) are never reported through this type; producers turn them into
/// step messages instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("A run is already in progress (state: {0})")]
    Busy(ControllerState),

    #[error("No step is pending (state: {0})")]
    NoStepPending(ControllerState),

    #[error("The current step is waiting for input")]
    WaitingForInput,

    #[error("Input ticket {0} does not match an open request")]
    StaleTicket(InputTicket),

    #[error("Run mode is already active")]
    AlreadyRunning,

    #[error("Run interval must be greater than zero")]
    ZeroInterval,

    #[error("Unknown action '{0}'")]
    UnknownAction(Arc<str>),

    #[error("The page session has stopped")]
    SessionClosed,

    #[error("Page task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl<T> From<SendError<T>> for Error {
    fn from(_: SendError<T>) -> Self {
        Error::SessionClosed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for Error {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Error::SessionClosed
    }
}
