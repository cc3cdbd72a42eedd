use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// An active run-mode binding: which session, how often, how far it got.
///
/// Exists only while the controller is running; pausing, finishing or
/// aborting the run drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSession {
    id: u32,
    interval: Duration,
    ticks: u64,
}

impl RunSession {
    pub(crate) fn new(id: u32, interval: Duration) -> Self {
        Self {
            id,
            interval,
            ticks: 0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks that advanced the producer so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }
}

/// Timer driving one run session inside the page session loop.
///
/// The first tick fires one full interval after creation. Late ticks are
/// delayed rather than bunched up, so two advances are never closer than
/// the interval.
#[derive(Debug)]
pub(crate) struct RunTimer {
    session: u32,
    interval: Interval,
}

impl RunTimer {
    pub fn new(session: &RunSession) -> Self {
        let period = session.interval();
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            session: session.id(),
            interval,
        }
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    /// Waits for the next tick and reports which session it belongs to.
    pub async fn tick(&mut self) -> u32 {
        self.interval.tick().await;
        self.session
    }
}

/// Caller-side policy mapping data size to a run interval.
///
/// The scheduler itself only ever sees a duration; pages use a policy to
/// slow down small inputs and speed up large ones.
///
/// ```rust
/// use std::time::Duration;
/// use stepvis::IntervalPolicy;
///
/// let policy = IntervalPolicy::new(Duration::from_millis(100))
///     .with_threshold(10, Duration::from_millis(400))
///     .with_threshold(50, Duration::from_millis(200));
///
/// assert_eq!(policy.interval_for(8), Duration::from_millis(400));
/// assert_eq!(policy.interval_for(30), Duration::from_millis(200));
/// assert_eq!(policy.interval_for(500), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalPolicy {
    thresholds: Vec<(usize, Duration)>,
    fallback: Duration,
}

impl IntervalPolicy {
    /// Policy returning `fallback` for sizes above every threshold.
    pub fn new(fallback: Duration) -> Self {
        Self {
            thresholds: Vec::new(),
            fallback,
        }
    }

    /// Use `interval` for sizes up to and including `max_len`.
    pub fn with_threshold(mut self, max_len: usize, interval: Duration) -> Self {
        let pos = self.thresholds.partition_point(|(len, _)| *len < max_len);
        match self.thresholds.get_mut(pos) {
            Some(entry) if entry.0 == max_len => entry.1 = interval,
            _ => self.thresholds.insert(pos, (max_len, interval)),
        }
        self
    }

    pub fn interval_for(&self, len: usize) -> Duration {
        self.thresholds
            .iter()
            .find(|(max_len, _)| len <= *max_len)
            .map(|(_, interval)| *interval)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_thresholds_are_sorted() {
        let policy = IntervalPolicy::new(Duration::from_millis(50))
            .with_threshold(100, Duration::from_millis(100))
            .with_threshold(10, Duration::from_millis(500))
            .with_threshold(10, Duration::from_millis(400));
        assert_eq!(policy.interval_for(0), Duration::from_millis(400));
        assert_eq!(policy.interval_for(10), Duration::from_millis(400));
        assert_eq!(policy.interval_for(11), Duration::from_millis(100));
        assert_eq!(policy.interval_for(101), Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_interval() {
        let session = RunSession::new(7, Duration::from_millis(200));
        let mut timer = RunTimer::new(&session);
        let start = Instant::now();
        assert_eq!(timer.tick().await, 7);
        assert!(start.elapsed() >= Duration::from_millis(200));
        timer.tick().await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }
}
