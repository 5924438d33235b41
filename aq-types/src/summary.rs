use crate::aqi::AqiCategory;
use crate::series::TimedValue;
use serde::{Deserialize, Serialize};

/// Current air quality plus short-range forecasts, either for a single
/// station or aggregated over the whole region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AirQualitySummary {
    /// Station name. Absent for the regional aggregate.
    #[serde(default)]
    pub name: Option<String>,
    /// Latest AQI reading.
    #[serde(default)]
    pub aqi: Option<f64>,
    #[serde(default)]
    pub forecast_6h: Vec<TimedValue>,
    #[serde(default)]
    pub forecast_12h: Vec<TimedValue>,
}

impl AirQualitySummary {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Regional average")
    }

    pub fn category(&self) -> Option<AqiCategory> {
        self.aqi.map(AqiCategory::from_value)
    }

    /// A summary without a current reading has nothing to show.
    pub fn is_empty(&self) -> bool {
        self.aqi.is_none()
    }
}
