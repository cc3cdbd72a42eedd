use crate::{ControllerState, InputRequest};

/// Presentation side of a page.
///
/// The controller pushes into a surface after every checkpoint and never
/// reads anything back. A surface talks to the engine only through UI
/// triggers on a [`PageHandle`](crate::PageHandle) and by answering input
/// requests.
///
/// Every method except [`display_message`](Surface::display_message) has a
/// no-op default.
pub trait Surface<M>: Send {
    /// Overwrites the status line. Never called with an empty message.
    fn display_message(&mut self, text: &str);

    /// Called after every checkpoint with the model as the producer left it.
    fn render_snapshot(&mut self, _model: &M) {}

    /// Shows a modal input dialog.
    ///
    /// Answer through [`InputRequest::confirm`] or [`InputRequest::cancel`],
    /// now or later. A request dropped unanswered counts as cancelled, which
    /// is what the default implementation does.
    fn open_dialog(&mut self, request: InputRequest) {
        drop(request);
    }

    /// Called on every visible state change.
    fn on_state_change(&mut self, _from: ControllerState, _to: ControllerState) {}
}

impl<M, S: Surface<M> + ?Sized> Surface<M> for Box<S> {
    fn display_message(&mut self, text: &str) {
        (**self).display_message(text)
    }

    fn render_snapshot(&mut self, model: &M) {
        (**self).render_snapshot(model)
    }

    fn open_dialog(&mut self, request: InputRequest) {
        (**self).open_dialog(request)
    }

    fn on_state_change(&mut self, from: ControllerState, to: ControllerState) {
        (**self).on_state_change(from, to)
    }
}
