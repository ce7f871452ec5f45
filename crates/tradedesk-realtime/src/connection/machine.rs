//! Connection state machine.
//!
//! [`ClientMachine`] owns every decision of the realtime client and performs
//! no I/O: the driver feeds it [`Event`]s and executes the [`Command`]s it
//! returns, in order. Each opened channel is tagged with a generation; events
//! from a superseded channel are dropped, which makes close idempotent and
//! keeps a stale socket from reviving a finished session.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use tradedesk_entity::notification::Notification;

use super::backoff::Backoff;
use super::endpoint::push_channel_url;
use super::state::ConnectionState;
use crate::message::parse_push;

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A user authenticated; `token` authorizes the push channel.
    SessionStarted {
        /// Bearer token of the session.
        token: String,
    },
    /// The channel of `generation` finished its handshake.
    ChannelOpened {
        /// Channel generation.
        generation: u64,
    },
    /// The channel of `generation` delivered a text frame.
    ChannelMessage {
        /// Channel generation.
        generation: u64,
        /// Raw frame text.
        text: String,
    },
    /// The channel of `generation` failed.
    ChannelError {
        /// Channel generation.
        generation: u64,
        /// Failure description, for logs.
        reason: String,
    },
    /// The channel of `generation` is closed.
    ChannelClosed {
        /// Channel generation.
        generation: u64,
    },
    /// The scheduled reconnect delay elapsed.
    ReconnectDue,
    /// The polling interval elapsed.
    PollDue,
    /// The session ended (logout or token cleared).
    SessionEnded,
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a channel to `url`, tagging its events with `generation`.
    OpenChannel {
        /// Push channel address, token included.
        url: Url,
        /// Generation of the new channel.
        generation: u64,
    },
    /// Close the current channel, if any.
    CloseChannel,
    /// Fetch the authoritative unread count.
    RefreshUnread,
    /// Merge a pushed notification into the store.
    MergePush(Notification),
    /// Mark the store connected.
    MarkConnected,
    /// Mark the store disconnected.
    MarkDisconnected,
    /// Start the unread-count polling timer.
    StartPolling,
    /// Cancel the polling timer.
    StopPolling,
    /// Arm the reconnect timer.
    ScheduleReconnect {
        /// Delay before the attempt.
        delay: Duration,
    },
    /// Disarm the reconnect timer.
    CancelReconnect,
    /// Clear all store state.
    ResetStore,
}

/// Realtime client state machine for one process.
#[derive(Debug, Clone)]
pub struct ClientMachine {
    api_base: Url,
    path: String,
    backoff: Backoff,
    state: ConnectionState,
    token: Option<String>,
    attempts: u32,
    generation: u64,
    polling: bool,
    reconnect_pending: bool,
}

impl ClientMachine {
    /// Create an idle machine for the given REST base and push path.
    pub fn new(api_base: Url, path: impl Into<String>, backoff: Backoff) -> Self {
        Self {
            api_base,
            path: path.into(),
            backoff,
            state: ConnectionState::Idle,
            token: None,
            attempts: 0,
            generation: 0,
            polling: false,
            reconnect_pending: false,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Reconnect attempts since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Generation of the current channel.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the polling timer should be running.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Apply one event and return the commands to execute.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::SessionStarted { token } => self.on_session_started(token),
            Event::ChannelOpened { generation } => self.on_opened(generation),
            Event::ChannelMessage { generation, text } => self.on_message(generation, &text),
            Event::ChannelError { generation, reason } => {
                if self.is_current(generation) {
                    warn!(generation, reason = %reason, "push channel error");
                }
                self.on_closed(generation)
            }
            Event::ChannelClosed { generation } => self.on_closed(generation),
            Event::ReconnectDue => self.on_reconnect_due(),
            Event::PollDue => {
                if self.polling {
                    vec![Command::RefreshUnread]
                } else {
                    Vec::new()
                }
            }
            Event::SessionEnded => self.on_session_ended(),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
            && matches!(
                self.state,
                ConnectionState::Connecting | ConnectionState::Connected
            )
    }

    fn on_session_started(&mut self, token: String) -> Vec<Command> {
        let mut commands = if self.state.in_session() {
            self.on_session_ended()
        } else {
            Vec::new()
        };

        let url = match push_channel_url(&self.api_base, &self.path, &token) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "cannot derive push channel address; staying idle");
                return commands;
            }
        };

        self.token = Some(token);
        self.attempts = 0;
        self.generation += 1;
        self.state = ConnectionState::Connecting;
        info!(generation = self.generation, "session started, connecting push channel");

        commands.push(Command::OpenChannel {
            url,
            generation: self.generation,
        });
        commands.push(Command::RefreshUnread);
        commands
    }

    fn on_opened(&mut self, generation: u64) -> Vec<Command> {
        if generation != self.generation || self.state != ConnectionState::Connecting {
            debug!(generation, "ignoring open from superseded channel");
            return Vec::new();
        }

        self.state = ConnectionState::Connected;
        self.attempts = 0;
        info!(generation, "push channel connected");

        let mut commands = Vec::with_capacity(3);
        if self.polling {
            self.polling = false;
            commands.push(Command::StopPolling);
        }
        commands.push(Command::MarkConnected);
        commands.push(Command::RefreshUnread);
        commands
    }

    fn on_message(&mut self, generation: u64, text: &str) -> Vec<Command> {
        if generation != self.generation || self.state != ConnectionState::Connected {
            return Vec::new();
        }
        match parse_push(text) {
            Some(notification) => vec![Command::MergePush(notification)],
            None => Vec::new(),
        }
    }

    fn on_closed(&mut self, generation: u64) -> Vec<Command> {
        if !self.is_current(generation) {
            return Vec::new();
        }

        self.state = ConnectionState::Disconnected;
        self.attempts = self.attempts.saturating_add(1);
        let delay = self.backoff.delay_for(self.attempts);
        self.reconnect_pending = true;
        info!(
            generation,
            attempt = self.attempts,
            delay_ms = delay.as_millis() as u64,
            "push channel closed, scheduling reconnect"
        );

        let mut commands = vec![Command::CloseChannel, Command::MarkDisconnected];
        if !self.polling {
            self.polling = true;
            commands.push(Command::StartPolling);
        }
        commands.push(Command::ScheduleReconnect { delay });
        commands
    }

    fn on_reconnect_due(&mut self) -> Vec<Command> {
        if self.state != ConnectionState::Disconnected || !self.reconnect_pending {
            return Vec::new();
        }
        self.reconnect_pending = false;

        let Some(token) = self.token.as_deref() else {
            return Vec::new();
        };
        let url = match push_channel_url(&self.api_base, &self.path, token) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "cannot derive push channel address");
                return Vec::new();
            }
        };

        self.generation += 1;
        self.state = ConnectionState::Connecting;
        debug!(generation = self.generation, attempt = self.attempts, "reconnecting");
        vec![Command::OpenChannel {
            url,
            generation: self.generation,
        }]
    }

    fn on_session_ended(&mut self) -> Vec<Command> {
        if !self.state.in_session() && self.token.is_none() {
            return Vec::new();
        }

        info!(generation = self.generation, "session ended");
        self.state = ConnectionState::Idle;
        self.token = None;
        self.attempts = 0;
        self.generation += 1;
        self.polling = false;
        self.reconnect_pending = false;

        vec![
            Command::CancelReconnect,
            Command::StopPolling,
            Command::CloseChannel,
            Command::ResetStore,
        ]
    }
}
