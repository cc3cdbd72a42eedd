use std::borrow::Cow;

use crate::{InputOutcome, InputPrompt, Step, StepContext, StepProducer};

/// Largest key the table accepts. Keys start at 0.
pub const MAX_KEY: i64 = 999;

/// Hash table with separate chaining; `key % bucket_count` picks the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTable {
    buckets: Vec<Vec<i64>>,
    len: usize,
    /// Bucket and slot the last probe looked at.
    pub highlight: Option<(usize, usize)>,
}

impl HashTable {
    pub fn new(bucket_count: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); bucket_count.max(1)],
            len: 0,
            highlight: None,
        }
    }

    pub fn bucket_of(&self, key: i64) -> usize {
        key.rem_euclid(self.buckets.len() as i64) as usize
    }

    /// Items of bucket `index`, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below the bucket count.
    pub fn bucket(&self, index: usize) -> &[i64] {
        &self.buckets[index]
    }

    pub fn buckets(&self) -> impl Iterator<Item = &[i64]> {
        self.buckets.iter().map(Vec::as_slice)
    }

    pub fn contains(&self, key: i64) -> bool {
        self.buckets[self.bucket_of(key)].contains(&key)
    }

    /// Appends `key` to its bucket. Returns `false` if it was already there.
    pub fn insert(&mut self, key: i64) -> bool {
        if self.contains(key) {
            return false;
        }
        let bucket = self.bucket_of(key);
        self.buckets[bucket].push(key);
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new(10)
    }
}

fn key_prompt() -> InputPrompt {
    InputPrompt::number("Key").with_range(0, MAX_KEY)
}

fn check_key(key: i64) -> Result<i64, Step> {
    if (0..=MAX_KEY).contains(&key) {
        Ok(key)
    } else {
        Err(Step::fail(format!("use key between 0 and {MAX_KEY}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertPhase {
    Announce,
    Ask,
    Read,
    Validate(i64),
    Insert(i64),
    Finished,
}

/// "Insert": asks for a key and adds it to the table.
#[derive(Debug)]
pub struct HashInsert {
    phase: InsertPhase,
}

impl HashInsert {
    pub fn new() -> Self {
        Self {
            phase: InsertPhase::Announce,
        }
    }

    /// Inserts `key` without asking. The key is still validated on the
    /// first checkpoint.
    pub fn with_key(key: i64) -> Self {
        Self {
            phase: InsertPhase::Validate(key),
        }
    }
}

impl Default for HashInsert {
    fn default() -> Self {
        Self::new()
    }
}

impl StepProducer<HashTable> for HashInsert {
    fn produce_next(&mut self, cx: &mut StepContext<'_, HashTable>) -> Step {
        match self.phase {
            InsertPhase::Announce => {
                self.phase = InsertPhase::Ask;
                Step::show("Enter key")
            }
            InsertPhase::Ask => {
                cx.request_input(key_prompt());
                self.phase = InsertPhase::Read;
                Step::show("Dialog opened")
            }
            InsertPhase::Read => match cx.take_input() {
                Some(InputOutcome::Confirmed(key)) => {
                    self.phase = InsertPhase::Validate(key);
                    self.produce_next(cx)
                }
                Some(InputOutcome::Cancelled) | None => {
                    self.phase = InsertPhase::Finished;
                    Step::finish()
                }
            },
            InsertPhase::Validate(key) => match check_key(key) {
                Ok(key) => {
                    self.phase = InsertPhase::Insert(key);
                    cx.model_mut().highlight = None;
                    Step::show(format!("Will insert item with key {key}"))
                }
                Err(step) => {
                    self.phase = InsertPhase::Finished;
                    step
                }
            },
            InsertPhase::Insert(key) => {
                self.phase = InsertPhase::Finished;
                let table = cx.model_mut();
                if !table.insert(key) {
                    return Step::done(format!("Item with key {key} already in table"));
                }
                let bucket = table.bucket_of(key);
                table.highlight = Some((bucket, table.bucket(bucket).len() - 1));
                Step::done(format!("Insertion completed; total items {}", table.len()))
            }
            InsertPhase::Finished => Step::finish(),
        }
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("hash-insert")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FindPhase {
    Ask,
    Read,
    Probe { key: i64, bucket: usize, slot: usize },
    Finished,
}

/// "Find": asks for a key and walks its bucket chain one item per
/// checkpoint.
#[derive(Debug)]
pub struct HashFind {
    phase: FindPhase,
}

impl HashFind {
    pub fn new() -> Self {
        Self {
            phase: FindPhase::Ask,
        }
    }
}

impl Default for HashFind {
    fn default() -> Self {
        Self::new()
    }
}

impl StepProducer<HashTable> for HashFind {
    fn produce_next(&mut self, cx: &mut StepContext<'_, HashTable>) -> Step {
        match self.phase {
            FindPhase::Ask => {
                cx.request_input(key_prompt());
                self.phase = FindPhase::Read;
                Step::show("Enter key to find")
            }
            FindPhase::Read => {
                let key = match cx.take_input() {
                    Some(InputOutcome::Confirmed(key)) => key,
                    Some(InputOutcome::Cancelled) | None => {
                        self.phase = FindPhase::Finished;
                        return Step::finish();
                    }
                };
                let key = match check_key(key) {
                    Ok(key) => key,
                    Err(step) => {
                        self.phase = FindPhase::Finished;
                        return step;
                    }
                };
                let bucket = cx.model().bucket_of(key);
                self.phase = FindPhase::Probe {
                    key,
                    bucket,
                    slot: 0,
                };
                Step::show(format!("Searching bucket {bucket} for key {key}"))
            }
            FindPhase::Probe { key, bucket, slot } => {
                let table = cx.model_mut();
                let Some(&item) = table.bucket(bucket).get(slot) else {
                    table.highlight = None;
                    self.phase = FindPhase::Finished;
                    return Step::done(format!("No item with key {key}"));
                };
                table.highlight = Some((bucket, slot));
                if item == key {
                    self.phase = FindPhase::Finished;
                    return Step::done(format!("Found item with key {key}"));
                }
                self.phase = FindPhase::Probe {
                    key,
                    bucket,
                    slot: slot + 1,
                };
                Step::show(format!("Checked item {item}, not a match"))
            }
            FindPhase::Finished => Step::finish(),
        }
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("hash-find")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Advance, ControllerState, StepController,
        testing::{Recording, RecordingSurface},
    };

    fn controller(table: HashTable) -> (StepController<HashTable, RecordingSurface>, Recording) {
        let surface = RecordingSurface::new();
        let recording = surface.recording();
        (StepController::new(table, surface), recording)
    }

    fn answer(ctl: &mut StepController<HashTable, RecordingSurface>, outcome: InputOutcome) -> Advance {
        let (ticket, _) = ctl.pending_input().expect("input request is open");
        ctl.resolve_input(ticket, outcome).unwrap()
    }

    #[test]
    fn test_insert_with_dialog() {
        let (mut ctl, recording) = controller(HashTable::new(10));
        ctl.start(Box::new(HashInsert::new())).unwrap();
        assert_eq!(ctl.advance_once().unwrap(), Advance::Shown);
        assert!(matches!(ctl.advance_once().unwrap(), Advance::AwaitingInput(_)));
        assert_eq!(ctl.pending_input().map(|(_, p)| p.label().to_owned()).as_deref(), Some("Key"));
        assert_eq!(answer(&mut ctl, InputOutcome::Confirmed(5)), Advance::Shown);
        assert_eq!(ctl.advance_once().unwrap(), Advance::Finished);

        assert_eq!(
            recording.messages(),
            [
                "Enter key",
                "Dialog opened",
                "Will insert item with key 5",
                "Insertion completed; total items 1",
            ]
        );
        assert!(ctl.model().contains(5));
        assert_eq!(ctl.model().highlight, Some((5, 0)));
        assert_eq!(ctl.state(), ControllerState::Idle);
    }

    #[test]
    fn test_insert_chains_colliding_keys() {
        let (mut ctl, _) = controller(HashTable::new(10));
        for key in [3, 13, 23] {
            ctl.start(Box::new(HashInsert::with_key(key))).unwrap();
            while ctl.advance_once().unwrap() != Advance::Finished {}
        }
        assert_eq!(ctl.model().bucket(3), [3, 13, 23]);
        assert_eq!(ctl.model().len(), 3);
        assert_eq!(ctl.model().highlight, Some((3, 2)));
    }

    #[test]
    fn test_insert_duplicate_key() {
        let mut table = HashTable::new(10);
        table.insert(42);
        let (mut ctl, recording) = controller(table);
        ctl.start(Box::new(HashInsert::with_key(42))).unwrap();
        ctl.advance_once().unwrap();
        assert_eq!(ctl.advance_once().unwrap(), Advance::Finished);
        assert_eq!(ctl.model().len(), 1);
        assert_eq!(
            recording.last_message().as_deref(),
            Some("Item with key 42 already in table")
        );
    }

    #[test]
    fn test_insert_invalid_key_fails_without_dialog() {
        let (mut ctl, recording) = controller(HashTable::new(10));
        ctl.start(Box::new(HashInsert::with_key(1000))).unwrap();
        assert_eq!(ctl.advance_once().unwrap(), Advance::Finished);
        assert!(ctl.pending_input().is_none());
        assert_eq!(recording.messages(), ["ERROR: use key between 0 and 999"]);
        assert!(ctl.model().is_empty());
        assert_eq!(ctl.state(), ControllerState::Idle);
    }

    #[test]
    fn test_insert_invalid_key_from_dialog() {
        let (mut ctl, recording) = controller(HashTable::new(10));
        ctl.start(Box::new(HashInsert::new())).unwrap();
        ctl.advance_once().unwrap();
        ctl.advance_once().unwrap();
        assert_eq!(answer(&mut ctl, InputOutcome::Confirmed(-1)), Advance::Finished);
        assert_eq!(
            recording.last_message().as_deref(),
            Some("ERROR: use key between 0 and 999")
        );
        assert!(ctl.model().is_empty());
    }

    #[test]
    fn test_insert_cancelled_ends_silently() {
        let (mut ctl, recording) = controller(HashTable::new(10));
        ctl.start(Box::new(HashInsert::new())).unwrap();
        ctl.advance_once().unwrap();
        ctl.advance_once().unwrap();
        assert_eq!(answer(&mut ctl, InputOutcome::Cancelled), Advance::Finished);
        assert_eq!(recording.messages(), ["Enter key", "Dialog opened"]);
        assert!(ctl.model().is_empty());
    }

    #[test]
    fn test_find_walks_chain() {
        let mut table = HashTable::new(10);
        for key in [7, 17, 27] {
            table.insert(key);
        }
        let (mut ctl, recording) = controller(table);
        ctl.start(Box::new(HashFind::new())).unwrap();
        assert!(matches!(ctl.advance_once().unwrap(), Advance::AwaitingInput(_)));
        answer(&mut ctl, InputOutcome::Confirmed(27));
        while ctl.advance_once().unwrap() != Advance::Finished {}

        assert_eq!(
            recording.messages(),
            [
                "Enter key to find",
                "Searching bucket 7 for key 27",
                "Checked item 7, not a match",
                "Checked item 17, not a match",
                "Found item with key 27",
            ]
        );
        assert_eq!(ctl.model().highlight, Some((7, 2)));
    }

    #[test]
    fn test_find_missing_key() {
        let mut table = HashTable::new(10);
        table.insert(4);
        let (mut ctl, recording) = controller(table);
        ctl.start(Box::new(HashFind::new())).unwrap();
        ctl.advance_once().unwrap();
        answer(&mut ctl, InputOutcome::Confirmed(14));
        while ctl.advance_once().unwrap() != Advance::Finished {}

        assert_eq!(recording.last_message().as_deref(), Some("No item with key 14"));
        assert_eq!(ctl.model().highlight, None);
    }

    #[test]
    #[should_panic]
    fn test_bucket_out_of_range_panics() {
        let table = HashTable::new(3);
        let _ = table.bucket(3);
    }

    #[test]
    fn test_bucket_of_wraps() {
        let table = HashTable::new(7);
        assert_eq!(table.bucket_of(0), 0);
        assert_eq!(table.bucket_of(15), 1);
        assert_eq!(HashTable::new(0).bucket_of(5), 0);
    }
}
