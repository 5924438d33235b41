use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single (timestamp, value) point of an AQI time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedValue {
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    aq_utils::dates::parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::TimedValue;

    #[test]
    fn test_accepts_both_timestamp_separators() {
        let a: TimedValue =
            serde_json::from_str(r#"{"timestamp":"2024-01-02T03:00:00","value":41.5}"#).unwrap();
        let b: TimedValue =
            serde_json::from_str(r#"{"timestamp":"2024-01-02 03:00:00","value":41.5}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"timestamp":"2024-01-02T03:00:00","value":41.5}"#
        );
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let r: Result<TimedValue, _> =
            serde_json::from_str(r#"{"timestamp":"yesterday","value":1.0}"#);
        assert!(r.is_err());
    }
}
