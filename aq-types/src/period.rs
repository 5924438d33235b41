use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time window covered by a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "1y")]
    Year,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "7d",
            Period::Month => "30d",
            Period::Year => "1y",
        }
    }

    /// Position in [`Period::ALL`], used to index per-period storage.
    pub fn index(&self) -> usize {
        match self {
            Period::Week => 0,
            Period::Month => 1,
            Period::Year => 2,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(Period::Week),
            "30d" => Ok(Period::Month),
            "1y" => Ok(Period::Year),
            other => Err(format!("unknown period '{}' (expected 7d, 30d or 1y)", other)),
        }
    }
}

/// Charts whose time window the user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    BoxPlot,
    Historic,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::BoxPlot, ChartKind::Historic];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::BoxPlot => "boxplot",
            ChartKind::Historic => "historic",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boxplot" | "box-plot" | "box_plot" => Ok(ChartKind::BoxPlot),
            "historic" => Ok(ChartKind::Historic),
            other => Err(format!(
                "unknown chart kind '{}' (expected boxplot or historic)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse_and_display() {
        for period in Period::ALL {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), period);
        }
        assert_eq!(" 30D ".parse::<Period>().unwrap(), Period::Month);
        assert!("2w".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_serde_uses_window_literals() {
        assert_eq!(serde_json::to_string(&Period::Year).unwrap(), "\"1y\"");
        let p: Period = serde_json::from_str("\"7d\"").unwrap();
        assert_eq!(p, Period::Week);
    }

    #[test]
    fn test_period_index_matches_all() {
        for (i, period) in Period::ALL.iter().enumerate() {
            assert_eq!(period.index(), i);
        }
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!("boxplot".parse::<ChartKind>().unwrap(), ChartKind::BoxPlot);
        assert_eq!("Historic".parse::<ChartKind>().unwrap(), ChartKind::Historic);
        assert!("bar".parse::<ChartKind>().is_err());
    }
}
