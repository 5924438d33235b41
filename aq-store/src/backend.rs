//! The seam between the dashboard and whatever serves its data.

use crate::error::FetchError;
use crate::key::SlotKey;
use aq_types::box_plot::BoxPlotSeries;
use aq_types::historic::HistoricSeries;
use aq_types::summary::AirQualitySummary;
use std::future::Future;

/// A decoded backend response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Summary(AirQualitySummary),
    BoxPlot(BoxPlotSeries),
    Historic(HistoricSeries),
}

impl Payload {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::Summary(_) => "summary",
            Payload::BoxPlot(_) => "box plot",
            Payload::Historic(_) => "historic",
        }
    }
}

/// Source of dashboard data.
///
/// Futures are polled on the dashboard's local task set, so they need not
/// be `Send`. Dropping a future abandons the request.
pub trait Backend: 'static {
    /// Fetch the dataset identified by `key`.
    fn fetch(&self, key: &SlotKey) -> impl Future<Output = Result<Payload, FetchError>>;

    /// Cheap reachability check used by the availability probe.
    fn ping(&self) -> impl Future<Output = bool>;
}

/// A value a [`crate::slot::ResourceSlot`] can hold.
pub trait Dataset: Sized + 'static {
    fn from_payload(payload: Payload) -> Result<Self, FetchError>;

    /// `true` when the backend had no data for the request. An empty
    /// dataset is `Ready`, not an error.
    fn is_empty(&self) -> bool;
}

fn unexpected(expected: &str, got: &Payload) -> FetchError {
    FetchError::schema(format!(
        "expected {} payload, got {}",
        expected,
        got.kind_name()
    ))
}

impl Dataset for AirQualitySummary {
    fn from_payload(payload: Payload) -> Result<Self, FetchError> {
        match payload {
            Payload::Summary(s) => Ok(s),
            other => Err(unexpected("summary", &other)),
        }
    }

    fn is_empty(&self) -> bool {
        AirQualitySummary::is_empty(self)
    }
}

impl Dataset for BoxPlotSeries {
    fn from_payload(payload: Payload) -> Result<Self, FetchError> {
        match payload {
            Payload::BoxPlot(s) => Ok(s),
            other => Err(unexpected("box plot", &other)),
        }
    }

    fn is_empty(&self) -> bool {
        BoxPlotSeries::is_empty(self)
    }
}

impl Dataset for HistoricSeries {
    fn from_payload(payload: Payload) -> Result<Self, FetchError> {
        match payload {
            Payload::Historic(s) => Ok(s),
            other => Err(unexpected("historic", &other)),
        }
    }

    fn is_empty(&self) -> bool {
        HistoricSeries::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_matching_payload_converts() {
        let summary = AirQualitySummary {
            aqi: Some(12.0),
            ..Default::default()
        };
        let converted = AirQualitySummary::from_payload(Payload::Summary(summary.clone())).unwrap();
        assert_eq!(converted, summary);
        assert!(!Dataset::is_empty(&converted));
    }

    #[test]
    fn test_mismatched_payload_is_schema_error() {
        let err = BoxPlotSeries::from_payload(Payload::Historic(HistoricSeries::default()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("expected box plot payload, got historic"));
    }

    #[test]
    fn test_empty_datasets() {
        assert!(Dataset::is_empty(&BoxPlotSeries::default()));
        assert!(Dataset::is_empty(&HistoricSeries::default()));
        assert!(Dataset::is_empty(&AirQualitySummary::default()));
    }
}
