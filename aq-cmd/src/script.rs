//! `script`: drive the dashboard from a list of commands.
//!
//! One command per line:
//!
//! ```text
//! # comment
//! station STA01
//! region
//! period boxplot 30d
//! wait 500
//! refresh
//! retry
//! show
//! ```

use crate::report;
use aq_store::http::HttpBackend;
use aq_store::{Dashboard, DashboardConfig};
use aq_types::period::{ChartKind, Period};
use aq_types::station::StationId;
use log::{debug, info};
use std::io::Read;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Station(StationId),
    Region,
    Period(ChartKind, Period),
    Refresh,
    Retry,
    Wait(Duration),
    Show,
}

/// Parse one line. Blank lines and `#` comments give `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ScriptCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["station", id] => ScriptCommand::Station(StationId::from(*id)),
        ["region"] => ScriptCommand::Region,
        ["period", kind, period] => ScriptCommand::Period(
            kind.parse().map_err(anyhow::Error::msg)?,
            period.parse().map_err(anyhow::Error::msg)?,
        ),
        ["refresh"] => ScriptCommand::Refresh,
        ["retry"] => ScriptCommand::Retry,
        ["wait", ms] => ScriptCommand::Wait(Duration::from_millis(
            ms.parse()
                .map_err(|e| anyhow::anyhow!("invalid wait '{}': {}", ms, e))?,
        )),
        ["show"] => ScriptCommand::Show,
        _ => anyhow::bail!("unrecognised command '{}'", line),
    };
    Ok(Some(command))
}

/// Parse a whole script, reporting the first bad line by number.
pub fn parse_script(text: &str) -> anyhow::Result<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let parsed = parse_line(line).map_err(|e| anyhow::anyhow!("line {}: {}", i + 1, e))?;
        commands.extend(parsed);
    }
    Ok(commands)
}

pub async fn run_script(
    base_url: &str,
    config_path: Option<&str>,
    file: Option<&str>,
) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read script {}: {}", path, e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let commands = parse_script(&text)?;
    info!("Running {} script commands against {}", commands.len(), base_url);

    let config = crate::load_config(config_path)?;
    let dashboard = crate::open_dashboard(base_url, config.clone())?;
    let _watches = report::follow_views(&dashboard, &config);
    dashboard.start();

    for command in commands {
        apply(&dashboard, &config, command).await;
    }
    Ok(())
}

async fn apply(dashboard: &Dashboard<HttpBackend>, config: &DashboardConfig, command: ScriptCommand) {
    debug!("script: {:?}", command);
    match command {
        ScriptCommand::Station(id) => {
            dashboard.set_station(Some(id));
        }
        ScriptCommand::Region => {
            dashboard.set_station(None);
        }
        ScriptCommand::Period(kind, period) => {
            dashboard.set_period(kind, period);
        }
        ScriptCommand::Refresh => dashboard.refresh(),
        ScriptCommand::Retry => dashboard.retry_failed(),
        ScriptCommand::Wait(duration) => tokio::time::sleep(duration).await,
        ScriptCommand::Show => report::print_views(dashboard, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("station STA01").unwrap(),
            Some(ScriptCommand::Station(StationId::from("STA01")))
        );
        assert_eq!(parse_line("  region ").unwrap(), Some(ScriptCommand::Region));
        assert_eq!(
            parse_line("period historic 1y").unwrap(),
            Some(ScriptCommand::Period(ChartKind::Historic, Period::Year))
        );
        assert_eq!(
            parse_line("wait 250").unwrap(),
            Some(ScriptCommand::Wait(Duration::from_millis(250)))
        );
        assert_eq!(parse_line("# select a station").unwrap(), None);
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("period boxplot 2w").is_err());
        assert!(parse_line("period chart 7d").is_err());
        assert!(parse_line("wait soon").is_err());
        assert!(parse_line("station").is_err());
        assert!(parse_line("jump").is_err());
    }

    #[test]
    fn test_parse_script_reports_line_number() {
        let script = "region\n# comment\nshow\nbogus\n";
        let err = parse_script(script).unwrap_err();
        assert!(err.to_string().starts_with("line 4:"));

        let commands = parse_script("station STA01\nwait 100\nshow\n").unwrap();
        assert_eq!(commands.len(), 3);
    }
}
