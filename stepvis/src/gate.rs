//! Input gate: suspends a producer until the user answers a dialog.
//!
//! A producer opens a request through
//! [`StepContext::request_input`](crate::StepContext::request_input) and
//! yields. The controller then waits in `WaitingForInput` until the request
//! is resolved, stashes the outcome where the producer can
//! [`take`](crate::StepContext::take_input) it, and performs one silent
//! advance so the producer can consume it.
//!
//! Outside the synchronous controller, a request travels to the dialog as an
//! [`InputRequest`] carrying an [`InputResponder`]; the page session awaits
//! the matching [`InputFuture`]. Dropping the responder without answering
//! counts as a cancel.
//!
//! ```rust,ignore
//! fn open_dialog(&mut self, request: InputRequest) {
//!     let field = request.prompt().field();
//!     match ask_user(request.prompt().label(), field.min, field.max) {
//!         Some(value) => request.confirm(value),
//!         None => request.cancel(),
//!     };
//! }
//! ```

use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::oneshot;

use crate::{Error, Result, RunId};

/// Declared numeric field of a prompt.
///
/// The bounds are cosmetic hints for the dialog. Range validation is the
/// producer's job, so a confirmed value may lie outside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericField {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl Default for NumericField {
    fn default() -> Self {
        Self {
            min: 0,
            max: 999,
            step: 1,
        }
    }
}

/// What the dialog should ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputPrompt {
    label: String,
    field: NumericField,
}

impl InputPrompt {
    /// A prompt for a single number with the default field (0..=999, step 1).
    pub fn number(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field: NumericField::default(),
        }
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.field.min = min;
        self.field.max = max;
        self
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.field.step = step;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field(&self) -> NumericField {
        self.field
    }
}

/// How an input request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputOutcome {
    Confirmed(i64),
    Cancelled,
}

impl InputOutcome {
    pub fn value(&self) -> Option<i64> {
        match self {
            InputOutcome::Confirmed(value) => Some(*value),
            InputOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, InputOutcome::Cancelled)
    }
}

/// Identifies one input request of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputTicket {
    run: RunId,
    seq: u32,
}

impl InputTicket {
    pub fn run_id(&self) -> RunId {
        self.run
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }
}

impl fmt::Display for InputTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.run, self.seq)
    }
}

/// Bookkeeping for the single outstanding request of the installed producer.
#[derive(Debug)]
pub(crate) struct InputGate {
    run: RunId,
    seq: u32,
    outstanding: Option<(InputTicket, InputPrompt)>,
    resolved: Option<InputOutcome>,
}

impl InputGate {
    pub fn new(run: RunId) -> Self {
        Self {
            run,
            seq: 0,
            outstanding: None,
            resolved: None,
        }
    }

    /// Opens a request.
    ///
    /// # Panics
    ///
    /// Panics if a request is still outstanding. A producer must suspend and
    /// consume the first answer before asking again.
    pub fn open(&mut self, prompt: InputPrompt) -> InputTicket {
        if let Some((ticket, _)) = &self.outstanding {
            panic!("input request {ticket} is still outstanding; a producer may not open another");
        }
        self.seq += 1;
        let ticket = InputTicket {
            run: self.run,
            seq: self.seq,
        };
        self.resolved = None;
        self.outstanding = Some((ticket, prompt));
        ticket
    }

    pub fn is_open(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn outstanding(&self) -> Option<(InputTicket, &InputPrompt)> {
        self.outstanding.as_ref().map(|(t, p)| (*t, p))
    }

    /// Closes the outstanding request and stashes its outcome for the producer.
    pub fn resolve(&mut self, ticket: InputTicket, outcome: InputOutcome) -> Result<()> {
        match &self.outstanding {
            Some((open, _)) if *open == ticket => {
                self.outstanding = None;
                self.resolved = Some(outcome);
                Ok(())
            }
            _ => Err(Error::StaleTicket(ticket)),
        }
    }

    pub fn take_resolved(&mut self) -> Option<InputOutcome> {
        self.resolved.take()
    }

    /// Forgets the outstanding request and any unconsumed answer.
    pub fn discard(&mut self) {
        self.outstanding = None;
        self.resolved = None;
    }
}

/// An open dialog request, handed to the surface.
#[derive(Debug)]
pub struct InputRequest {
    prompt: InputPrompt,
    responder: InputResponder,
}

impl InputRequest {
    pub fn ticket(&self) -> InputTicket {
        self.responder.ticket
    }

    pub fn prompt(&self) -> &InputPrompt {
        &self.prompt
    }

    /// Answers with a value. Returns `false` if nobody waits for it anymore.
    pub fn confirm(self, value: i64) -> bool {
        self.responder.confirm(value)
    }

    /// Dismisses the dialog. Returns `false` if nobody waits for it anymore.
    pub fn cancel(self) -> bool {
        self.responder.cancel()
    }

    /// Splits off the responder, e.g. to answer from another task.
    pub fn into_parts(self) -> (InputPrompt, InputResponder) {
        (self.prompt, self.responder)
    }
}

/// Answering side of an input request.
#[derive(Debug)]
pub struct InputResponder {
    ticket: InputTicket,
    sender: oneshot::Sender<InputOutcome>,
}

impl InputResponder {
    pub fn ticket(&self) -> InputTicket {
        self.ticket
    }

    pub fn confirm(self, value: i64) -> bool {
        self.respond(InputOutcome::Confirmed(value))
    }

    pub fn cancel(self) -> bool {
        self.respond(InputOutcome::Cancelled)
    }

    pub fn respond(self, outcome: InputOutcome) -> bool {
        self.sender.send(outcome).is_ok()
    }

    /// Whether the request was abandoned (run aborted or page stopped).
    pub fn is_stale(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Waiting side of an input request. Resolves to `Cancelled` when the
/// responder is dropped unanswered.
#[derive(Debug)]
pub(crate) struct InputFuture {
    ticket: InputTicket,
    receiver: oneshot::Receiver<InputOutcome>,
}

impl InputFuture {
    pub fn ticket(&self) -> InputTicket {
        self.ticket
    }
}

impl Future for InputFuture {
    type Output = (InputTicket, InputOutcome);

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ticket = self.ticket;
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|res| (ticket, res.unwrap_or(InputOutcome::Cancelled)))
    }
}

/// Creates the dialog request and the future that observes its answer.
pub(crate) fn open(ticket: InputTicket, prompt: InputPrompt) -> (InputRequest, InputFuture) {
    let (sender, receiver) = oneshot::channel();
    let request = InputRequest {
        prompt,
        responder: InputResponder { ticket, sender },
    };
    (request, InputFuture { ticket, receiver })
}
