use serde::{Deserialize, Serialize};
use std::fmt;

/// US EPA air quality index band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Classify an AQI value. Negative values are clamped into `Good`.
    pub fn from_value(aqi: f64) -> Self {
        let aqi = aqi.round();
        if aqi <= 50.0 {
            AqiCategory::Good
        } else if aqi <= 100.0 {
            AqiCategory::Moderate
        } else if aqi <= 150.0 {
            AqiCategory::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            AqiCategory::Unhealthy
        } else if aqi <= 300.0 {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Standard EPA colour for the band, as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "#00E400",
            AqiCategory::Moderate => "#FFFF00",
            AqiCategory::UnhealthyForSensitiveGroups => "#FF7E00",
            AqiCategory::Unhealthy => "#FF0000",
            AqiCategory::VeryUnhealthy => "#8F3F97",
            AqiCategory::Hazardous => "#7E0023",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::AqiCategory;

    #[test]
    fn test_band_edges() {
        assert_eq!(AqiCategory::from_value(0.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_value(50.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_value(51.0), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_value(100.4), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_value(101.0), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(AqiCategory::from_value(200.0), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_value(300.0), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_value(450.0), AqiCategory::Hazardous);
    }

    #[test]
    fn test_negative_is_good() {
        assert_eq!(AqiCategory::from_value(-3.0), AqiCategory::Good);
    }
}
