//! # Back-Office Report
//!
//! Prints the sales summary and the revenue series of one period as JSON.
//!
//! ```text
//! backoffice-report [daily|weekly|monthly|yearly]     (default: monthly)
//! ```
//!
//! Configuration comes from `BACKOFFICE_*` environment variables; logs go
//! to stderr so stdout stays machine-readable.

use anyhow::Context;
use tracing::info;

use backoffice_api::commands::analytics::{revenue_by_period, sales_summary};
use backoffice_api::{init_tracing, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let period = std::env::args().nth(1).unwrap_or_else(|| "monthly".to_string());

    let config = ApiConfig::load().context("Failed to load configuration")?;
    info!(path = %config.database_path.display(), %period, "Generating report");

    let state = AppState::connect(config)
        .await
        .context("Failed to open the record store")?;

    let summary = sales_summary(&state).await?;
    let revenue = revenue_by_period(&state, &period).await?;

    let report = serde_json::json!({
        "period": period,
        "summary": summary,
        "revenue": revenue,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    state.db().close().await;
    info!(buckets = revenue.len(), "Report complete");
    Ok(())
}
