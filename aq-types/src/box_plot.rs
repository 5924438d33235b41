use crate::error::PayloadError;
use crate::period::Period;
use aq_utils::dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Box plot statistics as the backend sends them: one column per statistic,
/// one row per time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotPayload {
    pub x: Vec<String>,
    pub lowerfence: Vec<f64>,
    pub q1: Vec<f64>,
    pub median: Vec<f64>,
    pub q3: Vec<f64>,
    pub upperfence: Vec<f64>,
}

/// Five-number summary for one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotBucket {
    pub date: NaiveDate,
    /// `[lowerfence, q1, median, q3, upperfence]`
    pub quintiles: [f64; 5],
}

impl BoxPlotBucket {
    /// The chart reports the median as the bucket's mean.
    pub fn mean(&self) -> f64 {
        self.quintiles[2]
    }

    pub fn extrema(&self) -> (f64, f64) {
        (self.quintiles[0], self.quintiles[4])
    }

    /// Axis label for the bucket at `index` within a series of `period`.
    pub fn label(&self, period: Period, index: usize) -> String {
        match period {
            Period::Week => dates::weekday_label(&self.date),
            Period::Month => dates::week_ordinal_label(index),
            Period::Year => dates::month_label(&self.date),
        }
    }
}

/// Box plot series for one chart, buckets in ascending date order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoxPlotSeries {
    pub buckets: Vec<BoxPlotBucket>,
}

impl BoxPlotSeries {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// `(label, bucket)` pairs in display order.
    pub fn labelled(&self, period: Period) -> Vec<(String, &BoxPlotBucket)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.label(period, i), b))
            .collect()
    }
}

impl TryFrom<BoxPlotPayload> for BoxPlotSeries {
    type Error = PayloadError;

    fn try_from(payload: BoxPlotPayload) -> Result<Self, Self::Error> {
        let n = payload.x.len();
        let columns = [
            ("lowerfence", payload.lowerfence.len()),
            ("q1", payload.q1.len()),
            ("median", payload.median.len()),
            ("q3", payload.q3.len()),
            ("upperfence", payload.upperfence.len()),
        ];
        if let Some((name, len)) = columns.iter().find(|(_, len)| *len != n) {
            return Err(PayloadError(format!(
                "column '{}' has {} values but x has {}",
                name, len, n
            )));
        }

        let mut buckets = Vec::with_capacity(n);
        for (i, raw_date) in payload.x.iter().enumerate() {
            buckets.push(BoxPlotBucket {
                date: dates::parse_date(raw_date)?,
                quintiles: [
                    payload.lowerfence[i],
                    payload.q1[i],
                    payload.median[i],
                    payload.q3[i],
                    payload.upperfence[i],
                ],
            });
        }
        buckets.sort_by_key(|b| b.date);
        Ok(BoxPlotSeries { buckets })
    }
}
