use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::domain::notification::Notification;
use crate::repository::errors::RepositoryError;
use crate::session::SessionStore;
use crate::usecase::contracts::NotificationRepository;

/// Point-in-time view of the cached notification state, published to
/// consumers through a watch channel.
#[derive(Debug, Clone, Default)]
pub struct NotificationSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub loading: bool,
    pub show_all: bool,
    pub(crate) seq: u64,
}

/// Client-side cache of the current user's notifications and unread badge
/// counter, kept fresh by explicit fetches plus the interval poll in
/// [`crate::usecase::poller`].
///
/// Every operation is best-effort: without an active session it returns
/// immediately, and transport failures are logged and swallowed so consumers
/// see stale data instead of errors. Local state follows a confirmed-write
/// policy throughout: the cache changes only after the server acknowledges a
/// write, so there is never a rollback path.
///
/// Each fetch takes a sequence number when it is issued; a response older
/// than the last applied one is discarded, so the freshest issued request
/// wins even when responses resolve out of order.
pub struct NotificationSync<R> {
    repository: R,
    session: SessionStore,
    snapshot: watch::Sender<NotificationSnapshot>,
    seq: AtomicU64,
    active_fetches: AtomicU64,
}

impl<R: NotificationRepository> NotificationSync<R> {
    pub fn new(repository: R, session: SessionStore) -> Self {
        let (snapshot, _) = watch::channel(NotificationSnapshot::default());
        Self {
            repository,
            session,
            snapshot,
            seq: AtomicU64::new(0),
            active_fetches: AtomicU64::new(0),
        }
    }

    /// Watch cache updates. Receivers observe every applied change.
    pub fn subscribe(&self) -> watch::Receiver<NotificationSnapshot> {
        self.snapshot.subscribe()
    }

    /// Current cached state.
    pub fn snapshot(&self) -> NotificationSnapshot {
        self.snapshot.borrow().clone()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn set_loading(&self, loading: bool) {
        self.snapshot.send_modify(|snap| snap.loading = loading);
    }

    /// Replace the cached list and unread count from the server. The list is
    /// filtered to unread records unless the show-all flag is set.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_notifications(&self) {
        let Some(token) = self.session.token() else {
            tracing::debug!("no active session, skipping notification fetch");
            return;
        };

        let unread_only = !self.snapshot.borrow().show_all;
        let seq = self.next_seq();
        self.active_fetches.fetch_add(1, Ordering::SeqCst);
        self.set_loading(true);

        let outcome = async {
            let notifications = self.repository.list(token.clone(), unread_only).await?;
            let unread_count = self.repository.unread_count(token).await?;
            Ok::<_, RepositoryError>((notifications, unread_count))
        }
        .await;

        // A fetch issued after this one keeps the loading flag up.
        let loading = self.active_fetches.fetch_sub(1, Ordering::SeqCst) > 1;

        match outcome {
            Ok((notifications, unread_count)) => {
                let mut stale = false;
                self.snapshot.send_modify(|snap| {
                    snap.loading = loading;
                    if seq < snap.seq {
                        stale = true;
                        return;
                    }
                    snap.seq = seq;
                    snap.notifications = notifications;
                    snap.unread_count = unread_count;
                });
                if stale {
                    tracing::debug!(seq, "discarded stale notification response");
                } else {
                    tracing::debug!(unread_count, "notification state refreshed");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch notifications");
                self.set_loading(loading);
            }
        }
    }

    /// Refresh only the unread counter. Called on every poll tick.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_unread_count(&self) {
        let Some(token) = self.session.token() else {
            tracing::debug!("no active session, skipping unread count fetch");
            return;
        };

        let seq = self.next_seq();
        match self.repository.unread_count(token).await {
            Ok(unread_count) => {
                let applied = self.snapshot.send_if_modified(|snap| {
                    if seq < snap.seq {
                        return false;
                    }
                    snap.seq = seq;
                    snap.unread_count = unread_count;
                    true
                });
                if !applied {
                    tracing::debug!(seq, "discarded stale unread count response");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to fetch unread count"),
        }
    }

    /// Mark one notification as read. The cached record and counter are
    /// updated only after the server confirms the write; the counter
    /// decrement is floored at zero.
    #[tracing::instrument(skip(self), fields(notification_id = %id))]
    pub async fn mark_as_read(&self, id: i64) {
        let Some(token) = self.session.token() else {
            tracing::debug!("no active session, skipping mark as read");
            return;
        };

        if let Err(e) = self.repository.mark_as_read(token, id).await {
            tracing::warn!(error = %e, "failed to mark notification as read");
            return;
        }

        self.snapshot.send_modify(|snap| {
            if let Some(notification) = snap.notifications.iter_mut().find(|n| n.id == id) {
                notification.read = true;
            }
            snap.unread_count = snap.unread_count.saturating_sub(1);
        });

        tracing::debug!("notification marked as read");
    }

    /// Mark every notification as read with a single bulk write.
    #[tracing::instrument(skip(self))]
    pub async fn mark_all_as_read(&self) {
        let Some(token) = self.session.token() else {
            tracing::debug!("no active session, skipping mark all as read");
            return;
        };

        match self.repository.mark_all_as_read(token).await {
            Ok(marked_count) => {
                self.snapshot.send_modify(|snap| {
                    for notification in &mut snap.notifications {
                        notification.read = true;
                    }
                    snap.unread_count = 0;
                });
                tracing::info!(marked_count, "all notifications marked as read");
            }
            Err(e) => tracing::warn!(error = %e, "failed to mark all notifications as read"),
        }
    }

    /// Delete one notification. If it was cached and unread, the counter is
    /// decremented, floored at zero.
    #[tracing::instrument(skip(self), fields(notification_id = %id))]
    pub async fn delete_notification(&self, id: i64) {
        let Some(token) = self.session.token() else {
            tracing::debug!("no active session, skipping delete");
            return;
        };

        if let Err(e) = self.repository.delete(token, id).await {
            tracing::warn!(error = %e, "failed to delete notification");
            return;
        }

        self.snapshot.send_modify(|snap| {
            if let Some(index) = snap.notifications.iter().position(|n| n.id == id) {
                let removed = snap.notifications.remove(index);
                if !removed.read {
                    snap.unread_count = snap.unread_count.saturating_sub(1);
                }
            }
        });

        tracing::debug!("notification deleted");
    }

    /// UI filter flag. Changing it re-fetches with the inverted
    /// `unread_only` filter.
    #[tracing::instrument(skip(self))]
    pub async fn set_show_all(&self, show_all: bool) {
        let changed = self.snapshot.send_if_modified(|snap| {
            if snap.show_all == show_all {
                false
            } else {
                snap.show_all = show_all;
                true
            }
        });

        if changed {
            self.fetch_notifications().await;
        }
    }

    /// Drop all cached state. Called on session end. Bumps the fetch
    /// sequence so responses still in flight from before the logout are
    /// discarded when they land.
    #[tracing::instrument(skip(self))]
    pub fn clear(&self) {
        let seq = self.next_seq();
        self.snapshot.send_modify(|snap| {
            snap.seq = seq;
            snap.notifications.clear();
            snap.unread_count = 0;
            snap.loading = false;
        });
        tracing::debug!("notification state cleared");
    }
}
