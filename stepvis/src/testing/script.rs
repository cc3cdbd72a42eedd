use std::{
    borrow::Cow,
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{InputOutcome, InputPrompt, Step, StepContext, StepMessage, StepProducer};

/// Producer replaying a fixed list of steps, for any model type.
///
/// Once the list is used up it keeps returning `Done(None)`. Call counts and
/// consumed inputs are shared through handles taken before the script is
/// boxed, so tests can check how often the engine really advanced it.
#[derive(Debug, Default)]
pub struct Script {
    steps: VecDeque<Step>,
    prompts: HashMap<usize, InputPrompt>,
    calls: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<InputOutcome>>>,
}

impl Script {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A script of visible checkpoints, one per message.
    pub fn shows<I, T>(messages: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StepMessage>,
    {
        Self::new(messages.into_iter().map(|m| Step::Show(m.into())))
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push_back(step);
        self
    }

    pub fn then_done(self, message: impl Into<StepMessage>) -> Self {
        self.then(Step::done(message))
    }

    /// Opens an input request during checkpoint `index` (zero-based), just
    /// before returning that checkpoint's step.
    pub fn with_prompt_at(mut self, index: usize, prompt: InputPrompt) -> Self {
        self.prompts.insert(index, prompt);
        self
    }

    /// Number of `produce_next` calls so far.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Input outcomes the script consumed, in order.
    pub fn inputs(&self) -> Arc<Mutex<Vec<InputOutcome>>> {
        self.inputs.clone()
    }

    /// Remaining steps, without running them.
    pub fn remaining(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}

impl<M> StepProducer<M> for Script {
    fn produce_next(&mut self, cx: &mut StepContext<'_, M>) -> Step {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(outcome) = cx.take_input() {
            self.inputs
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(outcome);
        }
        if let Some(prompt) = self.prompts.remove(&index) {
            cx.request_input(prompt);
        }
        self.steps.pop_front().unwrap_or(Step::Done(None))
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("script")
    }
}
