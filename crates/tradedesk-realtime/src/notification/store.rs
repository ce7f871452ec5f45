//! Notification store: list + unread counter fed by list loads, pushes and
//! read acknowledgements.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use tradedesk_client::NotificationApi;
use tradedesk_core::error::AppError;
use tradedesk_core::result::AppResult;
use tradedesk_core::types::PageRequest;
use tradedesk_entity::notification::Notification;

use super::snapshot::{NotificationSnapshot, ReadAcknowledgement};

/// Single source of truth for the session's notifications.
///
/// Every mutation is published on a watch channel; call
/// [`subscribe`](Self::subscribe) to observe it. [`reset`](Self::reset)
/// starts a new epoch, and results of requests issued before it are
/// discarded instead of leaking into the next session.
#[derive(Debug)]
pub struct NotificationStore {
    api: Arc<dyn NotificationApi>,
    state: watch::Sender<NotificationSnapshot>,
    epoch: AtomicU64,
}

impl NotificationStore {
    /// Create an empty store backed by `api`.
    pub fn new(api: Arc<dyn NotificationApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(NotificationSnapshot::default()),
            epoch: AtomicU64::new(0),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<NotificationSnapshot> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> NotificationSnapshot {
        self.state.borrow().clone()
    }

    /// Current notification list.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.borrow().notifications.clone()
    }

    /// Current unread counter.
    pub fn unread_count(&self) -> u64 {
        self.state.borrow().unread_count
    }

    /// Whether the push channel is open.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Identifiers of the unread notifications in the list.
    pub fn unread_ids(&self) -> Vec<String> {
        self.state.borrow().unread_ids()
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Fetch a page and replace the local list with it.
    ///
    /// The counter is raised to at least the number of unread items in the
    /// page; only [`refresh_unread_count`](Self::refresh_unread_count) lowers
    /// it. On failure nothing changes and the error is returned.
    pub async fn load_list(&self, page: PageRequest) -> AppResult<Vec<Notification>> {
        let epoch = self.current_epoch();
        let items = self.api.list_notifications(page).await?;

        if epoch != self.current_epoch() {
            debug!("discarding notification page from a previous session");
            return Ok(items);
        }

        let mut seen = HashSet::with_capacity(items.len());
        let list: Vec<Notification> = items
            .iter()
            .filter(|n| seen.insert(n.id.clone()))
            .cloned()
            .collect();
        let page_unread = list.iter().filter(|n| n.is_unread()).count() as u64;

        self.state.send_modify(|state| {
            state.notifications = list;
            state.unread_count = state.unread_count.max(page_unread);
        });
        debug!(count = items.len(), page_unread, "notification page loaded");
        Ok(items)
    }

    /// Overwrite the counter with the server's count.
    ///
    /// Never fails: on error the previous value is kept and returned.
    pub async fn refresh_unread_count(&self) -> u64 {
        let epoch = self.current_epoch();
        match self.api.unread_count().await {
            Ok(count) if epoch == self.current_epoch() => {
                self.state.send_if_modified(|state| {
                    let changed = state.unread_count != count;
                    state.unread_count = count;
                    changed
                });
                count
            }
            Ok(_) => {
                debug!("discarding unread count from a previous session");
                self.unread_count()
            }
            Err(e) => {
                debug!(error = %e, "unread count refresh failed, keeping previous value");
                self.unread_count()
            }
        }
    }

    /// Mark notifications as read.
    ///
    /// Unread entries among `ids` are flipped and the counter decremented
    /// before the server is told. If the server rejects the acknowledgement
    /// the list and counter are restored and a
    /// [`Rollback`](tradedesk_core::ErrorKind::Rollback) error is returned.
    /// If none of `ids` is unread locally the server is still notified, in
    /// the background, and failures are ignored.
    pub async fn mark_as_read(&self, ids: &[String]) -> AppResult<()> {
        let mut seen = HashSet::with_capacity(ids.len());
        let ids: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();
        if ids.is_empty() {
            return Ok(());
        }

        let Some(ack) = self.acknowledge_locally(&ids) else {
            let api = Arc::clone(&self.api);
            tokio::spawn(async move {
                if let Err(e) = api.mark_read(&ids).await {
                    debug!(error = %e, "best-effort read acknowledgement failed");
                }
            });
            return Ok(());
        };

        match self.api.mark_read(&ack.ids).await {
            Ok(()) => {
                debug!(count = ack.len(), "read acknowledgement confirmed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, count = ack.len(), "read acknowledgement rejected, rolling back");
                self.rollback(ack);
                Err(AppError::rolled_back(e))
            }
        }
    }

    /// Mark every unread notification in the list as read.
    pub async fn mark_all_as_read(&self) -> AppResult<()> {
        let ids = self.unread_ids();
        if ids.is_empty() {
            return Ok(());
        }
        self.mark_as_read(&ids).await
    }

    /// Flip the unread subset of `ids` and return the undo record.
    ///
    /// Returns `None` (and changes nothing) when none of `ids` is unread.
    pub fn acknowledge_locally(&self, ids: &[String]) -> Option<ReadAcknowledgement> {
        let epoch = self.current_epoch();
        let mut ack = None;

        self.state.send_if_modified(|state| {
            let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
            let unread: Vec<String> = state
                .notifications
                .iter()
                .filter(|n| n.is_unread() && wanted.contains(n.id.as_str()))
                .map(|n| n.id.clone())
                .collect();
            if unread.is_empty() {
                return false;
            }

            let previous = state.clone();
            for notification in &mut state.notifications {
                if unread.contains(&notification.id) {
                    notification.is_read = Some(true);
                }
            }
            state.unread_count = state.unread_count.saturating_sub(unread.len() as u64);

            ack = Some(ReadAcknowledgement {
                ids: unread,
                previous,
                epoch,
            });
            true
        });

        ack
    }

    /// Restore the list and counter captured by `ack`.
    ///
    /// The connected flag is left alone. Ignored if the store was reset
    /// since the acknowledgement was taken.
    pub fn rollback(&self, ack: ReadAcknowledgement) {
        if ack.epoch != self.current_epoch() {
            debug!("skipping rollback from a previous session");
            return;
        }
        self.state.send_modify(|state| {
            state.notifications = ack.previous.notifications;
            state.unread_count = ack.previous.unread_count;
        });
    }

    /// Merge one pushed notification.
    ///
    /// A known identifier is updated in place; a new one is prepended. The
    /// counter goes up only for an explicitly unread item that is new or was
    /// read before.
    pub fn push_realtime(&self, incoming: Notification) {
        self.state.send_modify(|state| {
            let counts = match state.position(&incoming.id) {
                Some(index) => {
                    let existing = &mut state.notifications[index];
                    let was_read = !existing.is_unread();
                    existing.merge_from(&incoming);
                    was_read
                }
                None => {
                    state.notifications.insert(0, incoming.clone());
                    true
                }
            };

            if counts && incoming.is_unread() {
                state.unread_count = state.unread_count.saturating_add(1);
            }
        });
    }

    /// Record whether the push channel is open.
    pub fn set_connected(&self, connected: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.connected != connected;
            state.connected = connected;
            changed
        });
    }

    /// Clear everything: empty list, zero counter, disconnected.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(NotificationSnapshot::default());
    }
}
