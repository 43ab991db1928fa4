//! Reconnect policy for the RPC session
//!
//! The shell retries a lost or failed login on a fixed interval for as long as
//! it runs.

use std::time::Duration;

/// Default delay between login attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// How long to wait before trying to log in again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before each attempt
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Unlimited attempts, `delay` apart
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }
}
