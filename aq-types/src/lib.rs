//! Core types for air-quality stations and the datasets the dashboard charts.
//!
//! - `station`: station identifiers
//! - `period`: chart time windows and chart kinds
//! - `aqi`: AQI categories
//! - `summary`, `box_plot`, `historic`: per-chart datasets and their wire payloads

pub mod aqi;
pub mod box_plot;
pub mod error;
pub mod historic;
pub mod period;
pub mod series;
pub mod station;
pub mod summary;
