//! # tradedesk-realtime
//!
//! Realtime notification delivery for the TradeDesk client. Provides:
//!
//! - [`NotificationStore`]: notification list + unread counter, merged from
//!   list loads, push events and read acknowledgements
//! - [`ClientMachine`]: the connection state machine (pure, no I/O)
//! - [`RealtimeNotificationClient`]: the driver that runs the machine
//!   against a [`PushTransport`], with reconnect backoff and unread-count
//!   polling while the push channel is down

pub mod client;
pub mod connection;
pub mod message;
pub mod notification;
pub mod transport;

pub use client::RealtimeNotificationClient;
pub use connection::backoff::Backoff;
pub use connection::machine::{ClientMachine, Command, Event};
pub use connection::state::ConnectionState;
pub use notification::{NotificationSnapshot, NotificationStore, ReadAcknowledgement};
pub use transport::{ChannelEvent, ChannelHandle, PushConnection, PushTransport, WsTransport};

#[cfg(test)]
pub(crate) mod testing;
