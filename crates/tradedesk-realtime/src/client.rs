//! Realtime notification client: runs the [`ClientMachine`] against a push
//! transport, a reconnect timer and a polling timer.

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep, interval_at, sleep};
use tracing::{debug, info};
use url::Url;

use tradedesk_core::config::realtime::RealtimeConfig;
use tradedesk_core::error::AppError;
use tradedesk_core::result::AppResult;

use crate::connection::backoff::Backoff;
use crate::connection::machine::{ClientMachine, Command, Event};
use crate::connection::state::ConnectionState;
use crate::notification::store::NotificationStore;
use crate::transport::{ChannelEvent, ChannelHandle, PushTransport};

enum ClientCommand {
    Start {
        token: String,
        done: oneshot::Sender<()>,
    },
    Stop {
        done: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Keeps a session's [`NotificationStore`] current over a push channel,
/// falling back to unread-count polling while the channel is down.
///
/// The client runs as a background task. Dropping it aborts the task, which
/// closes any open channel; no timer fires afterwards.
#[derive(Debug)]
pub struct RealtimeNotificationClient {
    commands: mpsc::Sender<ClientCommand>,
    state: watch::Receiver<ConnectionState>,
    store: Arc<NotificationStore>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ClientCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start { .. } => write!(f, "Start"),
            Self::Stop { .. } => write!(f, "Stop"),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

impl RealtimeNotificationClient {
    /// Spawn the client task. It stays idle until
    /// [`start_session`](Self::start_session).
    pub fn spawn(
        config: &RealtimeConfig,
        api_base: Url,
        transport: Arc<dyn PushTransport>,
        store: Arc<NotificationStore>,
    ) -> Self {
        let buffer = config.event_buffer.max(1);
        let (commands_tx, commands_rx) = mpsc::channel(buffer);
        let (events_tx, events_rx) = mpsc::channel(buffer);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);

        let driver = Driver {
            machine: ClientMachine::new(
                api_base,
                config.notifications_path.clone(),
                Backoff::from_config(config),
            ),
            store: Arc::clone(&store),
            transport,
            commands: commands_rx,
            events_tx,
            events_rx,
            state: state_tx,
            channel: None,
            reconnect: None,
            poll: None,
            poll_period: config.poll_interval(),
        };

        Self {
            commands: commands_tx,
            state: state_rx,
            store,
            task: Some(tokio::spawn(driver.run())),
        }
    }

    /// Begin a session with `token`, replacing any active session.
    ///
    /// Returns once the connection attempt and the unread-count refresh
    /// have been issued.
    pub async fn start_session(&self, token: impl Into<String>) -> AppResult<()> {
        let (done, ack) = oneshot::channel();
        self.send(ClientCommand::Start {
            token: token.into(),
            done,
        })
        .await?;
        ack.await.map_err(|_| stopped())
    }

    /// End the session: cancel both timers, close the channel and reset
    /// the store. Returns once the teardown has been applied.
    pub async fn end_session(&self) -> AppResult<()> {
        let (done, ack) = oneshot::channel();
        self.send(ClientCommand::Stop { done }).await?;
        ack.await.map_err(|_| stopped())
    }

    /// Watch the connection state.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Current connection state.
    pub fn current_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// The store this client feeds.
    pub fn store(&self) -> &Arc<NotificationStore> {
        &self.store
    }

    /// End any session and wait for the client task to exit.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(ClientCommand::Shutdown).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    async fn send(&self, command: ClientCommand) -> AppResult<()> {
        self.commands.send(command).await.map_err(|_| stopped())
    }
}

impl Drop for RealtimeNotificationClient {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn stopped() -> AppError {
    AppError::internal("realtime notification client has stopped")
}

struct Driver {
    machine: ClientMachine,
    store: Arc<NotificationStore>,
    transport: Arc<dyn PushTransport>,
    commands: mpsc::Receiver<ClientCommand>,
    events_tx: mpsc::Sender<(u64, ChannelEvent)>,
    events_rx: mpsc::Receiver<(u64, ChannelEvent)>,
    state: watch::Sender<ConnectionState>,
    channel: Option<ChannelHandle>,
    reconnect: Option<Pin<Box<Sleep>>>,
    poll: Option<Interval>,
    poll_period: Duration,
}

impl Driver {
    async fn run(mut self) {
        debug!("realtime client task started");
        loop {
            let (event, done) = tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(ClientCommand::Start { token, done }) => {
                        (Event::SessionStarted { token }, Some(done))
                    }
                    Some(ClientCommand::Stop { done }) => (Event::SessionEnded, Some(done)),
                    Some(ClientCommand::Shutdown) | None => break,
                },
                Some((generation, event)) = self.events_rx.recv() => {
                    (channel_event(generation, event), None)
                }
                _ = sleep_or_pending(&mut self.reconnect) => {
                    self.reconnect = None;
                    (Event::ReconnectDue, None)
                }
                _ = tick_or_pending(&mut self.poll) => (Event::PollDue, None),
            };

            self.apply(event);
            if let Some(done) = done {
                let _ = done.send(());
            }
        }

        self.apply(Event::SessionEnded);
        debug!("realtime client task stopped");
    }

    fn apply(&mut self, event: Event) {
        for command in self.machine.handle(event) {
            self.execute(command);
        }
        let state = self.machine.state();
        self.state.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        });
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::OpenChannel { url, generation } => {
                self.close_channel();
                self.channel = Some(ChannelHandle::spawn(
                    Arc::clone(&self.transport),
                    url,
                    generation,
                    self.events_tx.clone(),
                ));
            }
            Command::CloseChannel => self.close_channel(),
            Command::RefreshUnread => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    store.refresh_unread_count().await;
                });
            }
            Command::MergePush(notification) => {
                debug!(id = %notification.id, "push notification received");
                self.store.push_realtime(notification);
            }
            Command::MarkConnected => self.store.set_connected(true),
            Command::MarkDisconnected => self.store.set_connected(false),
            Command::StartPolling => {
                info!(
                    interval_secs = self.poll_period.as_secs(),
                    "polling unread count while disconnected"
                );
                let mut interval =
                    interval_at(Instant::now() + self.poll_period, self.poll_period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.poll = Some(interval);
            }
            Command::StopPolling => self.poll = None,
            Command::ScheduleReconnect { delay } => {
                self.reconnect = Some(Box::pin(sleep(delay)));
            }
            Command::CancelReconnect => self.reconnect = None,
            Command::ResetStore => self.store.reset(),
        }
    }

    fn close_channel(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            debug!(generation = channel.generation(), "releasing push channel");
            channel.close();
        }
    }
}

fn channel_event(generation: u64, event: ChannelEvent) -> Event {
    match event {
        ChannelEvent::Opened => Event::ChannelOpened { generation },
        ChannelEvent::Message(text) => Event::ChannelMessage { generation, text },
        ChannelEvent::Error(reason) => Event::ChannelError { generation, reason },
        ChannelEvent::Closed => Event::ChannelClosed { generation },
    }
}

async fn sleep_or_pending(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => pending().await,
    }
}

async fn tick_or_pending(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}
