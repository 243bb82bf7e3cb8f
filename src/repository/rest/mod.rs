use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::notification::Notification;
use crate::repository::errors::RepositoryError;
use crate::session::AuthToken;
use crate::usecase::contracts::NotificationRepository;

/// Client for the notification REST surface. Every request carries the
/// session token as a bearer credential.
pub struct RestNotificationRepository {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct UnreadCountBody {
    unread_count: i64,
}

#[derive(Deserialize)]
struct MarkAllReadBody {
    marked_count: i64,
}

impl RestNotificationRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RepositoryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RepositoryError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(RepositoryError::Unauthorized),
        StatusCode::NOT_FOUND => Err(RepositoryError::NotFound),
        status => Err(RepositoryError::UnexpectedStatus(status)),
    }
}

impl NotificationRepository for RestNotificationRepository {
    #[tracing::instrument(skip(self, token), fields(%unread_only))]
    async fn list(
        &self,
        token: AuthToken,
        unread_only: bool,
    ) -> Result<Vec<Notification>, RepositoryError> {
        tracing::debug!("listing notifications");

        let response = self
            .http
            .get(self.url("/api/notifications"))
            .query(&[("unread_only", unread_only)])
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let notifications: Vec<Notification> = check_status(response)?.json().await?;

        tracing::debug!(count = notifications.len(), "notifications listed");
        Ok(notifications)
    }

    #[tracing::instrument(skip(self, token))]
    async fn unread_count(&self, token: AuthToken) -> Result<u64, RepositoryError> {
        tracing::debug!("fetching unread count");

        let response = self
            .http
            .get(self.url("/api/notifications/unread-count"))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let body: UnreadCountBody = check_status(response)?.json().await?;

        Ok(body.unread_count.max(0) as u64)
    }

    #[tracing::instrument(skip(self, token), fields(notification_id = %id))]
    async fn mark_as_read(&self, token: AuthToken, id: i64) -> Result<(), RepositoryError> {
        tracing::debug!("marking notification as read");

        let response = self
            .http
            .put(self.url(&format!("/api/notifications/{id}/read")))
            .json(&serde_json::json!({}))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        // The updated record in the response body is not needed.
        check_status(response)?;

        tracing::debug!(notification_id = %id, "notification marked as read");
        Ok(())
    }

    #[tracing::instrument(skip(self, token))]
    async fn mark_all_as_read(&self, token: AuthToken) -> Result<u64, RepositoryError> {
        tracing::debug!("marking all notifications as read");

        let response = self
            .http
            .put(self.url("/api/notifications/mark-all-read"))
            .json(&serde_json::json!({}))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let body: MarkAllReadBody = check_status(response)?.json().await?;

        tracing::debug!(marked_count = body.marked_count, "all notifications marked as read");
        Ok(body.marked_count.max(0) as u64)
    }

    #[tracing::instrument(skip(self, token), fields(notification_id = %id))]
    async fn delete(&self, token: AuthToken, id: i64) -> Result<(), RepositoryError> {
        tracing::debug!("deleting notification");

        let response = self
            .http
            .delete(self.url(&format!("/api/notifications/{id}")))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        check_status(response)?;

        tracing::debug!(notification_id = %id, "notification deleted");
        Ok(())
    }
}
