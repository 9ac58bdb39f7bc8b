use std::time::Duration;

/// §4.4 trigger configuration, one instance shared by every
/// `(database, table)` buffer.
#[derive(Debug, Clone, Copy)]
pub struct BatcherConfig {
    /// A buffer with this many events seals immediately.
    pub max_batch_size: usize,
    /// A buffer below this size never seals by idle or hard-age alone;
    /// it still seals at max size, on force-seal-after, or at shutdown.
    pub min_batch_size: usize,
    /// The consumer's blocking-read timeout; also the idle-seal trigger.
    pub idle_timeout: Duration,
    /// A buffer whose first-event age exceeds this seals unconditionally
    /// at the next trigger check, regardless of idle state.
    pub force_seal_after: Duration,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 1000,
            min_batch_size: 1,
            idle_timeout: Duration::from_secs(60),
            force_seal_after: Duration::from_secs(300),
        }
    }
}
