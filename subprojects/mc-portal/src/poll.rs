//! Completion polling policy.

use core::time::Duration;

/// Default overall bound on waiting for a response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default wait between two header reads.
pub const DEFAULT_INTERVAL: Duration = Duration::from_micros(500);

/// Bound on the completion poll of one command.
///
/// After the doorbell the header is read once, then up to `max_polls` more
/// times with an `interval` wait before each extra read. A `max_polls` of zero
/// checks the header exactly once and never waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum number of waits before giving up.
    pub max_polls: u32,
    /// Wait between two header reads.
    pub interval: Duration,
}

impl PollConfig {
    /// Creates a poll bound from an explicit count and interval.
    pub const fn new(max_polls: u32, interval: Duration) -> Self {
        Self {
            max_polls,
            interval,
        }
    }

    /// Returns a builder starting from the default bound.
    pub fn builder() -> PollConfigBuilder {
        PollConfigBuilder::default()
    }

    /// Total time spent waiting before a timeout is reported.
    pub const fn timeout(&self) -> Duration {
        self.interval.saturating_mul(self.max_polls)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`PollConfig`].
///
/// The poll count is derived from the timeout and the interval unless it is
/// set explicitly.
#[derive(Debug, Clone, Copy)]
pub struct PollConfigBuilder {
    timeout: Duration,
    interval: Duration,
    max_polls: Option<u32>,
}

impl Default for PollConfigBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
            max_polls: None,
        }
    }
}

impl PollConfigBuilder {
    /// Sets the overall time bound.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the wait between two header reads.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the poll count, overriding the one derived from the timeout.
    pub fn max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    /// Builds the poll bound.
    pub fn build(self) -> PollConfig {
        let max_polls = match self.max_polls {
            Some(polls) => polls,
            None => polls_for(self.timeout, self.interval),
        };
        PollConfig::new(max_polls, self.interval)
    }
}

fn polls_for(timeout: Duration, interval: Duration) -> u32 {
    let interval = interval.as_nanos();
    if interval == 0 {
        // Busy polling: bound by the default count instead of by time.
        return polls_for(DEFAULT_TIMEOUT, DEFAULT_INTERVAL);
    }
    u32::try_from(timeout.as_nanos().div_ceil(interval)).unwrap_or(u32::MAX)
}

/// How the portal waits between two header reads.
pub trait Wait {
    /// Waits for roughly `interval`.
    fn wait(&mut self, interval: Duration);
}

/// Polls back to back, ignoring the interval.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWait;

impl Wait for NoWait {
    #[inline]
    fn wait(&mut self, _interval: Duration) {
        core::hint::spin_loop();
    }
}

/// Sleeps the calling thread between polls.
#[cfg(any(test, feature = "std"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

#[cfg(any(test, feature = "std"))]
impl Wait for ThreadSleep {
    fn wait(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Spins on the monotonic clock between polls.
///
/// For contexts that must not sleep.
#[cfg(any(test, feature = "std"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinWait;

#[cfg(any(test, feature = "std"))]
impl Wait for SpinWait {
    fn wait(&mut self, interval: Duration) {
        let start = std::time::Instant::now();
        while start.elapsed() < interval {
            core::hint::spin_loop();
        }
    }
}
