use std::{fmt, ops::Deref};

/// Prefix that marks a terminal message as a validation failure.
pub const ERROR_MARKER: &str = "ERROR:";

/// Text shown to the viewer after a checkpoint.
///
/// An empty message is legal: the surface keeps its current text and only
/// re-renders the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StepMessage(String);

impl StepMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// A message that changes nothing on screen but still triggers a re-render.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Builds a validation failure message: `ERROR: <detail>`.
    pub fn error(detail: impl fmt::Display) -> Self {
        Self(format!("{ERROR_MARKER} {detail}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.0.starts_with(ERROR_MARKER)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for StepMessage {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for StepMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepMessage {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for StepMessage {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for StepMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one [`produce_next`](crate::StepProducer::produce_next) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A visible checkpoint; more checkpoints follow.
    Show(StepMessage),
    /// An invisible checkpoint. The controller advances again right away
    /// without publishing anything, unless an input request was opened.
    Skip,
    /// The run is over. The optional message is the end-of-run summary.
    Done(Option<StepMessage>),
}

impl Step {
    pub fn show(message: impl Into<StepMessage>) -> Self {
        Step::Show(message.into())
    }

    pub fn done(message: impl Into<StepMessage>) -> Self {
        Step::Done(Some(message.into()))
    }

    /// Ends the run without a summary message.
    pub fn finish() -> Self {
        Step::Done(None)
    }

    /// Ends the run with an `ERROR:` message.
    pub fn fail(detail: impl fmt::Display) -> Self {
        Step::Done(Some(StepMessage::error(detail)))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }

    pub fn message(&self) -> Option<&StepMessage> {
        match self {
            Step::Show(message) | Step::Done(Some(message)) => Some(message),
            Step::Skip | Step::Done(None) => None,
        }
    }
}
