//! Push channel and polling fallback configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Realtime notification client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Path of the notifications push endpoint on the API host.
    #[serde(default = "default_notifications_path")]
    pub notifications_path: String,
    /// Unread-count polling interval while the push channel is down.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Linear backoff step per reconnect attempt, in milliseconds.
    #[serde(default = "default_backoff_step")]
    pub backoff_step_ms: u64,
    /// Upper bound on the reconnect delay, in milliseconds.
    #[serde(default = "default_backoff_cap")]
    pub backoff_cap_ms: u64,
    /// Buffer size of the internal event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl RealtimeConfig {
    /// Polling interval as a [`Duration`], never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            notifications_path: default_notifications_path(),
            poll_interval_seconds: default_poll_interval(),
            backoff_step_ms: default_backoff_step(),
            backoff_cap_ms: default_backoff_cap(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_notifications_path() -> String {
    "/ws/notifications".to_string()
}

fn default_poll_interval() -> u64 {
    55
}

fn default_backoff_step() -> u64 {
    2000
}

fn default_backoff_cap() -> u64 {
    30_000
}

fn default_event_buffer() -> usize {
    64
}
