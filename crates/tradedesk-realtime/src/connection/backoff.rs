//! Reconnect delay policy.

use std::time::Duration;

use tradedesk_core::config::realtime::RealtimeConfig;

/// Linear backoff with a ceiling: `min(cap, step × attempt)`.
///
/// There is no attempt limit; once the cap is reached every further
/// attempt waits `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    step: Duration,
    cap: Duration,
}

impl Backoff {
    /// Create a policy from a step and a cap.
    pub fn new(step: Duration, cap: Duration) -> Self {
        Self { step, cap }
    }

    /// Build the policy from configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(
            Duration::from_millis(config.backoff_step_ms),
            Duration::from_millis(config.backoff_cap_ms),
        )
    }

    /// Delay before reconnect attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt).min(self.cap)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), Duration::from_millis(30_000))
    }
}
