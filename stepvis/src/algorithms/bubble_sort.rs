use std::borrow::Cow;

use crate::{Step, StepContext, StepProducer, algorithms::ArrayModel};

/// Bubble sort, one comparison or swap per checkpoint.
///
/// A comparison that finds a pair out of order shows the comparison first
/// and performs the swap on the following checkpoint, so the surface gets to
/// render both. The sort stops after the first pass without swaps.
#[derive(Debug, Default)]
pub struct BubbleSort {
    started: bool,
    pass: usize,
    index: usize,
    swapped: bool,
    pending_swap: bool,
}

impl BubbleSort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepProducer<ArrayModel> for BubbleSort {
    fn produce_next(&mut self, cx: &mut StepContext<'_, ArrayModel>) -> Step {
        let model = cx.model_mut();
        let len = model.len();

        if !self.started {
            self.started = true;
            model.sorted = 0;
            if len < 2 {
                model.highlight = None;
                model.sorted = len;
                return Step::done("Nothing to sort");
            }
            return Step::show(format!("Sorting {len} items"));
        }

        if self.pending_swap {
            let i = self.index;
            model.values.swap(i, i + 1);
            self.pending_swap = false;
            self.swapped = true;
            self.index += 1;
            return Step::show(format!(
                "Swapped {} and {}",
                model.values[i + 1],
                model.values[i]
            ));
        }

        if self.index + 1 >= len - self.pass {
            self.pass += 1;
            self.index = 0;
            model.sorted = self.pass;
            if !self.swapped || self.pass >= len - 1 {
                model.highlight = None;
                model.sorted = len;
                let passes = self.pass;
                return Step::done(format!("Sort completed in {passes} passes"));
            }
            self.swapped = false;
        }

        let i = self.index;
        let (a, b) = (model.values[i], model.values[i + 1]);
        model.highlight = Some((i, i + 1));
        if a > b {
            self.pending_swap = true;
            Step::show(format!("Comparing {a} and {b}: will swap"))
        } else {
            self.index += 1;
            Step::show(format!("Comparing {a} and {b}: in order"))
        }
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("bubble-sort")
    }
}
