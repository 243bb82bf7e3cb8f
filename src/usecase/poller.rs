use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::session::AuthToken;
use crate::usecase::contracts::NotificationRepository;
use crate::usecase::sync::NotificationSync;

/// Background refresh loop, scoped to the owning task's lifetime.
///
/// Each interval tick refreshes the unread counter (the first tick fires
/// immediately). Session transitions are handled as they happen: a login
/// triggers a full fetch, a logout clears the cached state. Stop polling by
/// aborting the spawned task; the loop also exits on its own if the session
/// channel closes.
pub async fn run<R>(
    sync: Arc<NotificationSync<R>>,
    mut session: watch::Receiver<Option<AuthToken>>,
    poll_interval: Duration,
) where
    R: NotificationRepository,
{
    let mut ticker = tokio::time::interval(poll_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sync.fetch_unread_count().await;
            }
            changed = session.changed() => {
                if changed.is_err() {
                    tracing::debug!("session channel closed, stopping notification poll");
                    break;
                }
                if session.borrow_and_update().is_some() {
                    tracing::debug!("session started, fetching notifications");
                    sync.fetch_notifications().await;
                } else {
                    tracing::debug!("session ended, clearing notification state");
                    sync.clear();
                }
            }
        }
    }
}
