use std::{sync::Arc, time::Duration};

use stepvis_macros::Label;
use tokio::sync::oneshot;

use crate::{BoxProducer, ControllerState, Result};

/// UI trigger sent from a [`PageHandle`](crate::PageHandle) to the page session.
#[derive(Label)]
pub(crate) enum CommandKind<M> {
    Action(Arc<str>),
    Start(BoxProducer<M>),
    Next,
    Run(Option<Duration>),
    ToggleRun,
    Pause,
    Abort,
}

/// A trigger plus the channel the session answers on once the trigger has
/// been fully processed.
pub(crate) struct Command<M> {
    pub kind: CommandKind<M>,
    pub reply: oneshot::Sender<Result<ControllerState>>,
}

impl<M> Command<M> {
    pub fn new(kind: CommandKind<M>) -> (Self, oneshot::Receiver<Result<ControllerState>>) {
        let (reply, receiver) = oneshot::channel();
        (Self { kind, reply }, receiver)
    }
}
