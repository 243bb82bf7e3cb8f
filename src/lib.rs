//! Client-side notification synchronization for the library front end.
//!
//! Keeps a cached notification list and unread badge counter current against
//! the backend's notification REST API, via on-demand fetches plus a
//! session-scoped interval poll. Consumers inject a [`session::SessionStore`]
//! and observe state through a watch channel; no operation runs without an
//! active session, and transport failures surface as stale data, never as
//! errors.

pub mod config;
pub mod domain;
pub mod repository;
pub mod session;
pub mod telemetry;
pub mod usecase;

pub use domain::notification::{Notification, NotificationKind};
pub use repository::rest::RestNotificationRepository;
pub use session::{AuthToken, SessionStore};
pub use usecase::sync::{NotificationSnapshot, NotificationSync};
