use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use notifications::config::AppConfig;
use notifications::repository::rest::RestNotificationRepository;
use notifications::session::{AuthToken, SessionStore};
use notifications::telemetry;
use notifications::usecase::poller;
use notifications::usecase::sync::NotificationSync;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.telemetry_enabled {
        let telemetry_config = telemetry::TelemetryConfig {
            service_name: config.telemetry_service_name.clone(),
            service_version: config.telemetry_service_version.clone(),
            environment: config.telemetry_environment.clone(),
            otlp_endpoint: config.telemetry_otlp_endpoint.clone(),
        };

        telemetry::init_telemetry_with_subscriber(&telemetry_config, env_filter)
            .expect("failed to initialize telemetry");
    } else {
        telemetry::init_subscriber_without_telemetry(env_filter);
    }

    tracing::info!("starting the notification watcher");

    let repository = RestNotificationRepository::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    tracing::info!(api_base_url = %config.api_base_url, "notification api client created");

    let session = SessionStore::new(config.auth_token.clone().map(AuthToken::new));
    if !session.is_authenticated() {
        tracing::warn!("no auth token configured, waiting for a session");
    }

    let sync = Arc::new(NotificationSync::new(repository, session.clone()));
    let mut snapshots = sync.subscribe();
    sync.fetch_notifications().await;
    let poll = tokio::spawn(poller::run(
        Arc::clone(&sync),
        session.subscribe(),
        Duration::from_secs(config.poll_interval_secs),
    ));
    tracing::info!(
        poll_interval_secs = config.poll_interval_secs,
        "notification poll started"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let (unread, total, loading) = {
                    let snapshot = snapshots.borrow_and_update();
                    (snapshot.unread_count, snapshot.notifications.len(), snapshot.loading)
                };
                if !loading {
                    tracing::info!(unread, total, "notification state updated");
                }
            }
        }
    }

    poll.abort();
    tracing::info!("notification poll stopped");
    Ok(())
}
