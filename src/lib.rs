pub mod cli;
pub mod core;
pub mod providers;

use crate::core::{TableStore, config::AppConfig};
use anyhow::Result;
use tracing::{debug, info};

pub use cli::DashboardOptions;

/// Fetches the configured indicators and replaces the stored table.
pub async fn run_refresh(config_path: Option<&str>) -> Result<()> {
    info!("Indicator refresh starting...");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    let store = TableStore::new(config.table_path()?);
    let provider = providers::WorldBankProvider::new(&config.provider);

    cli::refresh::run(&config, &provider, &store).await?;
    Ok(())
}

/// Renders the dashboard for one country from the stored table.
pub fn run_dashboard(config_path: Option<&str>, options: &DashboardOptions) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    let store = TableStore::new(config.table_path()?);
    cli::dashboard::run(
        &store,
        options,
        config.dashboard.growth_window,
        config.dashboard.gap_policy,
    )
}
