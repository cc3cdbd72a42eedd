use std::{borrow::Cow, fmt};

use crate::{
    InputOutcome, InputPrompt, InputTicket, Step, StepMessage,
    gate::InputGate,
};

/// One algorithm run, expressed as an ordered, one-shot sequence of checkpoints.
///
/// Rust has no stable generators, so a producer is an explicit state
/// machine: whatever a generator would keep in locals across a `yield`
/// lives in the producer's fields, and every call to
/// [`produce_next`](StepProducer::produce_next) runs exactly one checkpoint.
///
/// The model being visualized is not owned by the producer. It belongs to
/// the controller and is lent to each call through [`StepContext`], which
/// also gives access to the input gate.
///
/// # Contract
///
/// - One call, one checkpoint. Return [`Step::Show`] for a visible pause,
///   [`Step::Skip`] for an invisible one, [`Step::Done`] to end the run.
/// - A producer is never called again after it returned `Done`.
/// - To ask the user for a value, call
///   [`StepContext::request_input`] and return (typically a transitional
///   message such as "Dialog opened"). The next call happens only after the
///   request was resolved; read the answer with [`StepContext::take_input`].
///   A cancelled dialog still resumes the producer.
/// - Invalid preconditions end the run at once with [`Step::fail`].
///
/// # Example
///
/// ```rust
/// use stepvis::{Step, StepContext, StepProducer};
///
/// struct CountDown(u32);
///
/// impl StepProducer<Vec<u32>> for CountDown {
///     fn produce_next(&mut self, cx: &mut StepContext<'_, Vec<u32>>) -> Step {
///         if self.0 == 0 {
///             return Step::done("Liftoff");
///         }
///         cx.model_mut().push(self.0);
///         self.0 -= 1;
///         Step::show(format!("{} left", self.0 + 1))
///     }
/// }
/// ```
pub trait StepProducer<M>: Send {
    /// Runs the next checkpoint.
    fn produce_next(&mut self, cx: &mut StepContext<'_, M>) -> Step;

    /// Human-readable name used in logs.
    ///
    /// The default implementation returns the type name.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

pub type BoxProducer<M> = Box<dyn StepProducer<M>>;

impl<M> fmt::Debug for dyn StepProducer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StepProducer").field(&self.name()).finish()
    }
}

/// What a producer may touch while running a checkpoint.
pub struct StepContext<'a, M> {
    model: &'a mut M,
    gate: &'a mut InputGate,
}

impl<'a, M> StepContext<'a, M> {
    pub(crate) fn new(model: &'a mut M, gate: &'a mut InputGate) -> Self {
        Self { model, gate }
    }

    #[inline]
    pub fn model(&self) -> &M {
        self.model
    }

    #[inline]
    pub fn model_mut(&mut self) -> &mut M {
        self.model
    }

    /// Opens an input request. The controller waits for it to resolve
    /// before calling the producer again.
    ///
    /// # Panics
    ///
    /// Panics if a request opened earlier has not been resolved yet.
    pub fn request_input(&mut self, prompt: InputPrompt) -> InputTicket {
        self.gate.open(prompt)
    }

    /// Takes the answer to the last request, if it was resolved since.
    pub fn take_input(&mut self) -> Option<InputOutcome> {
        self.gate.take_resolved()
    }

    /// Whether a request opened by this producer is still unanswered.
    pub fn is_waiting_for_input(&self) -> bool {
        self.gate.is_open()
    }
}

/// Adapter turning a closure into a producer.
///
/// Handy for one-off runs and tests; anything with more than a couple of
/// checkpoints reads better as a struct.
pub struct FnProducer<F> {
    name: Cow<'static, str>,
    f: F,
}

/// Builds a producer from a closure called once per checkpoint.
pub fn from_fn<M, F>(name: impl Into<Cow<'static, str>>, f: F) -> FnProducer<F>
where
    F: FnMut(&mut StepContext<'_, M>) -> Step + Send,
{
    FnProducer {
        name: name.into(),
        f,
    }
}

impl<M, F> StepProducer<M> for FnProducer<F>
where
    F: FnMut(&mut StepContext<'_, M>) -> Step + Send,
{
    fn produce_next(&mut self, cx: &mut StepContext<'_, M>) -> Step {
        (self.f)(cx)
    }

    fn name(&self) -> Cow<'static, str> {
        self.name.clone()
    }
}

/// Synthetic producer installed by an abort. Ends the run with a single
/// terminal message.
#[derive(Debug)]
pub struct Aborted {
    message: Option<StepMessage>,
}

impl Aborted {
    pub fn new(message: impl Into<StepMessage>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl<M> StepProducer<M> for Aborted {
    fn produce_next(&mut self, _cx: &mut StepContext<'_, M>) -> Step {
        Step::Done(self.message.take())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("aborted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunId;

    #[test]
    fn test_fn_producer_sees_model() {
        let mut model = vec![3, 1, 2];
        let mut gate = InputGate::new(RunId::new());
        let mut producer = from_fn("sum", |cx: &mut StepContext<'_, Vec<i32>>| {
            let sum: i32 = cx.model().iter().sum();
            cx.model_mut().clear();
            Step::done(format!("Sum is {sum}"))
        });
        let step = producer.produce_next(&mut StepContext::new(&mut model, &mut gate));
        assert_eq!(step, Step::done("Sum is 6"));
        assert!(model.is_empty());
        assert_eq!(StepProducer::<Vec<i32>>::name(&producer), "sum");
    }

    #[test]
    fn test_aborted_yields_once() {
        let mut model = ();
        let mut gate = InputGate::new(RunId::new());
        let mut producer = Aborted::new("Aborted");
        let mut cx = StepContext::new(&mut model, &mut gate);
        assert_eq!(producer.produce_next(&mut cx), Step::done("Aborted"));
        assert_eq!(producer.produce_next(&mut cx), Step::finish());
    }

    #[test]
    fn test_context_reports_open_request() {
        let mut model = ();
        let mut gate = InputGate::new(RunId::new());
        let mut cx = StepContext::new(&mut model, &mut gate);
        assert!(!cx.is_waiting_for_input());
        cx.request_input(InputPrompt::number("Enter key"));
        assert!(cx.is_waiting_for_input());
        assert_eq!(cx.take_input(), None);
    }
}
