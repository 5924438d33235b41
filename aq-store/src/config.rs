//! Dashboard configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use aq_types::period::{ChartKind, Period};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Per-chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Period selected when the dashboard starts.
    pub default_period: Period,
    /// Periods kept fetched alongside the selected one, for charts that are
    /// displayed side by side.
    pub pinned_periods: Vec<Period>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_period: Period::Week,
            pinned_periods: Vec::new(),
        }
    }
}

/// Bounded exponential backoff for retryable fetch failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 1000,
            max_backoff_ms: 8000,
        }
    }
}

impl RetryPolicy {
    /// No automatic retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms.min(self.max_backoff_ms))
    }

    /// Double `current`, capped at `max_backoff_ms`.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        (current * 2).min(Duration::from_millis(self.max_backoff_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Period of the background reachability check. `None` checks only
    /// on startup and when a fetch hits a transport failure.
    pub interval_ms: Option<u64>,
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_ms: Some(30_000),
            timeout_ms: 5000,
        }
    }
}

impl ProbeConfig {
    pub fn interval(&self) -> Option<Duration> {
        self.interval_ms.map(Duration::from_millis)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub box_plot: ChartConfig,
    pub historic: ChartConfig,
    /// A fetch still unanswered after this long fails as a transport error.
    pub fetch_timeout_ms: u64,
    pub retry: RetryPolicy,
    pub probe: ProbeConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            // Weekly, monthly and yearly box plots are shown together.
            box_plot: ChartConfig {
                default_period: Period::Week,
                pinned_periods: Period::ALL.to_vec(),
            },
            historic: ChartConfig::default(),
            fetch_timeout_ms: 10_000,
            retry: RetryPolicy::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn chart(&self, kind: ChartKind) -> &ChartConfig {
        match kind {
            ChartKind::BoxPlot => &self.box_plot,
            ChartKind::Historic => &self.historic,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        Self::from_json(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.box_plot.pinned_periods.len(), 3);
        assert!(config.historic.pinned_periods.is_empty());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_override() {
        let config = DashboardConfig::from_json(
            r#"{"historic": {"default_period": "30d"}, "retry": {"max_retries": 0}, "probe": {"interval_ms": null}}"#,
        )
        .unwrap();
        assert_eq!(config.chart(ChartKind::Historic).default_period, Period::Month);
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.retry.initial_backoff_ms, 1000);
        assert_eq!(config.probe.interval(), None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = DashboardConfig::from_json(r#"{"fetch_timeout": 5}"#).unwrap_err();
        assert!(err.to_string().contains("fetch_timeout"));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff_ms: 1000,
            max_backoff_ms: 3000,
        };
        let first = policy.initial_backoff();
        assert_eq!(first, Duration::from_millis(1000));
        let second = policy.next_backoff(first);
        assert_eq!(second, Duration::from_millis(2000));
        assert_eq!(policy.next_backoff(second), Duration::from_millis(3000));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DashboardConfig::load("/nonexistent/dashboard.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
