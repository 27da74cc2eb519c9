//! # Health Command

use tracing::warn;

use crate::state::AppState;

/// Whether the store answers a trivial query.
pub async fn health(state: &AppState) -> bool {
    let healthy = state.db().health_check().await;
    if !healthy {
        warn!("Health check failed: store unreachable");
    }
    healthy
}
