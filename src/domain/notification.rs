use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification category as sent by the backend. Unknown values decode as
/// `Info` so new server-side types never break the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Welcome,
    BorrowAccepted,
    BorrowRejected,
    #[serde(other)]
    Info,
}

/// Server-owned notification record. The client keeps a cached copy and
/// flips `read` only after a confirmed server write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_record() {
        let json = r#"{
            "id": 42,
            "user_id": 7,
            "type": "borrow-accepted",
            "message": "Your rental request was accepted",
            "read": false,
            "created_at": "2024-03-01T12:00:00+00:00"
        }"#;

        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.id, 42);
        assert_eq!(notification.kind, NotificationKind::BorrowAccepted);
        assert!(!notification.read);
    }

    #[test]
    fn test_unknown_kind_decodes_as_info() {
        let json = r#"{
            "id": 1,
            "type": "fine-overdue",
            "message": "msg",
            "read": true,
            "created_at": "2024-03-01T12:00:00+00:00"
        }"#;

        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind, NotificationKind::Info);
    }
}
