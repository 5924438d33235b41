//! Command implementations for the air-quality dashboard CLI.
//!
//! Every command drives an [`aq_store::Dashboard`] against a live backend
//! over HTTP, on a local task set.

use aq_store::http::HttpBackend;
use aq_store::{Dashboard, DashboardConfig};
use aq_types::period::Period;
use clap::Subcommand;

pub mod export;
pub mod probe;
pub mod report;
pub mod script;
pub mod watch;

#[derive(Subcommand)]
pub enum Command {
    /// Follow the dashboard and print every view change until Ctrl-C
    Watch {
        /// Backend base URL, e.g. http://localhost:8000/api
        #[arg(short = 'u', long)]
        base_url: String,

        /// Start in station mode for this station instead of region mode
        #[arg(short, long)]
        station: Option<String>,

        /// Initial box plot period (7d, 30d or 1y)
        #[arg(long)]
        box_plot_period: Option<Period>,

        /// Initial historic period (7d, 30d or 1y)
        #[arg(long)]
        historic_period: Option<Period>,

        /// JSON dashboard config
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Apply selection commands from a file (or stdin) and print view changes
    Script {
        #[arg(short = 'u', long)]
        base_url: String,

        #[arg(short, long)]
        config: Option<String>,

        /// Command file; stdin when omitted
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Check once whether the backend is reachable
    Probe {
        #[arg(short = 'u', long)]
        base_url: String,
    },

    /// Fetch one box plot series and write it as CSV
    Export {
        #[arg(short = 'u', long)]
        base_url: String,

        #[arg(short, long)]
        period: Period,

        /// Station id; the regional series when omitted
        #[arg(short, long)]
        station: Option<String>,

        /// Output CSV path
        #[arg(short, long)]
        output: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    let local = tokio::task::LocalSet::new();
    local.run_until(dispatch(command)).await
}

async fn dispatch(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Watch {
            base_url,
            station,
            box_plot_period,
            historic_period,
            config,
        } => {
            let options = watch::WatchOptions {
                station,
                box_plot_period,
                historic_period,
            };
            watch::run_watch(&base_url, config.as_deref(), options).await
        }
        Command::Script {
            base_url,
            config,
            file,
        } => script::run_script(&base_url, config.as_deref(), file.as_deref()).await,
        Command::Probe { base_url } => probe::run_probe(&base_url).await,
        Command::Export {
            base_url,
            period,
            station,
            output,
        } => export::run_export(&base_url, period, station.as_deref(), &output).await,
    }
}

/// Load the config at `path`, or the defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::load(path),
        None => Ok(DashboardConfig::default()),
    }
}

/// HTTP backend whose per-request timeout matches the dashboard's.
pub fn connect(base_url: &str, config: &DashboardConfig) -> anyhow::Result<HttpBackend> {
    HttpBackend::new(base_url, config.fetch_timeout())
}

pub fn open_dashboard(base_url: &str, config: DashboardConfig) -> anyhow::Result<Dashboard<HttpBackend>> {
    let backend = connect(base_url, &config)?;
    Ok(Dashboard::new(backend, config))
}
