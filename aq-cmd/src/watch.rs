//! `watch`: follow the dashboard until interrupted.

use crate::report;
use aq_types::period::{ChartKind, Period};
use aq_types::station::StationId;
use log::info;

/// Initial selection for `watch`.
#[derive(Debug, Default)]
pub struct WatchOptions {
    pub station: Option<String>,
    pub box_plot_period: Option<Period>,
    pub historic_period: Option<Period>,
}

pub async fn run_watch(
    base_url: &str,
    config_path: Option<&str>,
    options: WatchOptions,
) -> anyhow::Result<()> {
    let config = crate::load_config(config_path)?;
    let dashboard = crate::open_dashboard(base_url, config.clone())?;

    dashboard.set_station(options.station.map(StationId::from));
    if let Some(period) = options.box_plot_period {
        dashboard.set_period(ChartKind::BoxPlot, period);
    }
    if let Some(period) = options.historic_period {
        dashboard.set_period(ChartKind::Historic, period);
    }

    info!("Watching dashboard at {}", base_url);
    let watches = report::follow_views(&dashboard, &config);
    dashboard.start();

    tokio::signal::ctrl_c().await?;
    drop(watches);
    info!("Interrupted, final state:");
    report::print_views(&dashboard, &config);
    Ok(())
}
