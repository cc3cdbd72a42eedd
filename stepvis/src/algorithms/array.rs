use std::borrow::Cow;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{InputOutcome, InputPrompt, Step, StepContext, StepProducer};

/// Largest array the "New" action accepts.
pub const MAX_ARRAY_SIZE: i64 = 60;

/// Array of bars, plus what the surface should highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayModel {
    pub values: Vec<i64>,
    /// Pair of indices under comparison.
    pub highlight: Option<(usize, usize)>,
    /// Number of trailing items known to be in their final position.
    pub sorted: usize,
}

impl ArrayModel {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<i64>> for ArrayModel {
    fn from(values: Vec<i64>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ask,
    Read,
    Fill(i64),
    Finished,
}

/// "New": asks for a size, then fills the array with random values.
#[derive(Debug)]
pub struct NewArray {
    rng: StdRng,
    phase: Phase,
}

impl NewArray {
    /// Asks the user for the size.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Ask,
        }
    }

    /// Skips the dialog and uses `size` as if the user had entered it.
    pub fn with_size(seed: u64, size: i64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Fill(size),
        }
    }
}

impl StepProducer<ArrayModel> for NewArray {
    fn produce_next(&mut self, cx: &mut StepContext<'_, ArrayModel>) -> Step {
        match self.phase {
            Phase::Ask => {
                cx.request_input(InputPrompt::number("Number of items").with_range(1, MAX_ARRAY_SIZE));
                self.phase = Phase::Read;
                Step::show("Enter number of items")
            }
            Phase::Read => match cx.take_input() {
                Some(InputOutcome::Confirmed(size)) => {
                    self.phase = Phase::Fill(size);
                    self.produce_next(cx)
                }
                Some(InputOutcome::Cancelled) | None => {
                    self.phase = Phase::Finished;
                    Step::finish()
                }
            },
            Phase::Fill(size) => {
                self.phase = Phase::Finished;
                if !(1..=MAX_ARRAY_SIZE).contains(&size) {
                    return Step::fail(format!("use size between 1 and {MAX_ARRAY_SIZE}"));
                }
                let model = cx.model_mut();
                model.values = (0..size).map(|_| self.rng.random_range(1..=99)).collect();
                model.highlight = None;
                model.sorted = 0;
                Step::done(format!("Created array with {size} items"))
            }
            Phase::Finished => Step::finish(),
        }
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("new-array")
    }
}
