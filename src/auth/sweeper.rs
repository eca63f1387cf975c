//! Background removal of expired sessions
//!
//! Validation never deletes anything; this task is the only thing that
//! reaps stale sessions, and it only runs when an interval is configured.

use std::sync::Arc;
use std::time::Duration;

use super::AuthService;

/// Periodically purge expired sessions until the process exits
pub async fn session_sweeper(auth_service: Arc<AuthService>, interval: Duration) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Starting expired session sweeper"
    );

    loop {
        tokio::time::sleep(interval).await;

        match auth_service.purge_expired_sessions().await {
            Ok(0) => {}
            Ok(removed) => {
                tracing::info!(removed, "Purged expired sessions");
            }
            Err(e) => {
                tracing::error!("Error purging expired sessions: {}", e);
            }
        }
    }
}
