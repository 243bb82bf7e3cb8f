use crate::domain::notification::Notification;
use crate::repository::errors::RepositoryError;
use crate::session::AuthToken;

#[cfg_attr(test, mockall::automock)]
pub trait NotificationRepository: Send + Sync {
    async fn list(
        &self,
        token: AuthToken,
        unread_only: bool,
    ) -> Result<Vec<Notification>, RepositoryError>;
    async fn unread_count(&self, token: AuthToken) -> Result<u64, RepositoryError>;
    async fn mark_as_read(&self, token: AuthToken, id: i64) -> Result<(), RepositoryError>;
    async fn mark_all_as_read(&self, token: AuthToken) -> Result<u64, RepositoryError>;
    async fn delete(&self, token: AuthToken, id: i64) -> Result<(), RepositoryError>;
}
