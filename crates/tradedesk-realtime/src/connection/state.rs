//! Connection state of the realtime client.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the push channel for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No session; nothing is running.
    #[default]
    Idle,
    /// A channel is being opened.
    Connecting,
    /// The channel is open and delivering pushes.
    Connected,
    /// The channel dropped; polling is active and a reconnect is scheduled.
    Disconnected,
}

impl ConnectionState {
    /// Return the state as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    /// Whether a session is active (anything but `Idle`).
    pub fn in_session(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
