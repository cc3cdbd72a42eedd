use std::time::Duration;

/// Runtime configuration for a page and its step controller.
///
/// Use the builder methods to customize, or [`Default`] for sensible defaults.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use stepvis::Config;
///
/// let config = Config::default()
///     .with_run_interval(Duration::from_millis(200))  // Faster auto-run
///     .with_abort_message("Stopped by user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Period between two automatic advances in run mode, used when
    /// run mode is toggled on without an explicit interval.
    /// Default: 500 ms
    pub run_interval: Duration,

    /// Capacity of the command channel between page handles and the
    /// page session. Senders wait when it is full.
    /// Default: 32
    pub command_channel_size: usize,

    /// Terminal message published when a run is aborted.
    /// Default: "Aborted"
    pub abort_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            run_interval: Duration::from_millis(500),
            command_channel_size: 32,
            abort_message: "Aborted".to_string(),
        }
    }
}

impl Config {
    /// Set the default run-mode interval.
    ///
    /// Callers that pick an interval per data size should pass it to
    /// [`PageHandle::run`](crate::PageHandle::run) instead, see
    /// [`IntervalPolicy`](crate::IntervalPolicy).
    pub fn with_run_interval(mut self, interval: Duration) -> Self {
        self.run_interval = interval;
        self
    }

    /// Set the command channel capacity.
    pub fn with_command_channel_size(mut self, size: usize) -> Self {
        self.command_channel_size = size.max(1);
        self
    }

    /// Set the message shown when a run is aborted.
    pub fn with_abort_message(mut self, message: impl Into<String>) -> Self {
        self.abort_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.run_interval, Duration::from_millis(500));
        assert_eq!(config.command_channel_size, 32);
        assert_eq!(config.abort_message, "Aborted");
    }

    #[test]
    fn test_channel_size_never_zero() {
        let config = Config::default().with_command_channel_size(0);
        assert_eq!(config.command_channel_size, 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"abort_message":"Halted"}"#).unwrap();
        assert_eq!(config.abort_message, "Halted");
        assert_eq!(config.run_interval, Duration::from_millis(500));
    }
}
