use crate::series::TimedValue;
use serde::{Deserialize, Serialize};

/// Measured AQI history plus the 6h and 12h forecasts that continue it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricSeries {
    pub aqi_level: Vec<TimedValue>,
    #[serde(default)]
    pub forecast_6h: Vec<TimedValue>,
    #[serde(default)]
    pub forecast_12h: Vec<TimedValue>,
}

/// One line of the historic chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub name: &'static str,
    pub dashed: bool,
    pub points: Vec<TimedValue>,
}

impl HistoricSeries {
    pub fn is_empty(&self) -> bool {
        self.aqi_level.is_empty()
    }

    /// Chart lines: the measured series followed by the two forecasts.
    ///
    /// Each forecast starts at the last measured point so the lines join up.
    pub fn lines(&self) -> Vec<SeriesLine> {
        let mut lines = vec![SeriesLine {
            name: "Measured",
            dashed: false,
            points: self.aqi_level.clone(),
        }];
        let anchor = self.aqi_level.last();
        for (name, forecast) in [
            ("Forecast 6h", &self.forecast_6h),
            ("Forecast 12h", &self.forecast_12h),
        ] {
            let points = anchor.into_iter().chain(forecast.iter()).cloned().collect();
            lines.push(SeriesLine {
                name,
                dashed: true,
                points,
            });
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HistoricSeries {
        serde_json::from_str(
            r#"{
                "aqi_level": [
                    {"timestamp": "2024-05-01T10:00:00", "value": 40},
                    {"timestamp": "2024-05-01T11:00:00", "value": 44}
                ],
                "forecast_6h": [{"timestamp": "2024-05-01T17:00:00", "value": 50}],
                "forecast_12h": [{"timestamp": "2024-05-01T23:00:00", "value": 55}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_forecast_lines_start_at_last_measurement() {
        let lines = sample().lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].name, "Measured");
        assert!(!lines[0].dashed);
        assert_eq!(lines[0].points.len(), 2);
        for forecast in &lines[1..] {
            assert!(forecast.dashed);
            assert_eq!(forecast.points.len(), 2);
            assert_eq!(forecast.points[0].value, 44.0);
        }
        assert_eq!(lines[2].points[1].value, 55.0);
    }

    #[test]
    fn test_empty_history_has_unanchored_forecasts() {
        let series = HistoricSeries {
            forecast_6h: sample().forecast_6h,
            ..Default::default()
        };
        assert!(series.is_empty());
        let lines = series.lines();
        assert!(lines[0].points.is_empty());
        assert_eq!(lines[1].points.len(), 1);
    }
}
