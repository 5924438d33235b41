//! reqwest-backed [`Backend`] for the dashboard's REST API.

use crate::backend::{Backend, Payload};
use crate::error::FetchError;
use crate::key::SlotKey;
use aq_types::box_plot::{BoxPlotPayload, BoxPlotSeries};
use aq_types::historic::HistoricSeries;
use aq_types::period::Period;
use aq_types::station::StationId;
use aq_types::summary::AirQualitySummary;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request URL for `key`.
    pub fn url(&self, key: &SlotKey) -> String {
        let chart = |name: &str, station: &Option<StationId>, period: &Period| match station {
            Some(id) => format!(
                "{}/statistics/{}?period={}&station={}",
                self.base_url, name, period, id
            ),
            None => format!("{}/statistics/{}?period={}", self.base_url, name, period),
        };
        match key {
            SlotKey::Region => format!("{}/region", self.base_url),
            SlotKey::Station(id) => format!("{}/stations/{}", self.base_url, id),
            SlotKey::BoxPlot { station, period } => chart("boxplot", station, period),
            SlotKey::Historic { station, period } => chart("historic", station, period),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(format!("{}: {}", url, e)))?;
        check_status(url, response.status())?;
        response
            .text()
            .await
            .map_err(|e| FetchError::transport(format!("{}: {}", url, e)))
    }
}

/// Server errors are worth retrying; any other failure status means we
/// asked for something the backend cannot serve.
fn check_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    if status.is_server_error() {
        return Err(FetchError::transport(format!("{} returned {}", url, status)));
    }
    if !status.is_success() {
        return Err(FetchError::schema(format!("{} returned {}", url, status)));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body)
        .map_err(|e| FetchError::schema(format!("{}: invalid response: {}", url, e)))
}

/// Decode the response body for `key` into the dataset it requested.
fn parse_payload(key: &SlotKey, url: &str, body: &str) -> Result<Payload, FetchError> {
    match key {
        SlotKey::Region | SlotKey::Station(_) => {
            let summary: AirQualitySummary = decode(url, body)?;
            Ok(Payload::Summary(summary))
        }
        SlotKey::BoxPlot { .. } => {
            let raw: BoxPlotPayload = decode(url, body)?;
            Ok(Payload::BoxPlot(BoxPlotSeries::try_from(raw)?))
        }
        SlotKey::Historic { .. } => {
            let historic: HistoricSeries = decode(url, body)?;
            Ok(Payload::Historic(historic))
        }
    }
}

impl Backend for HttpBackend {
    async fn fetch(&self, key: &SlotKey) -> Result<Payload, FetchError> {
        let url = self.url(key);
        let body = self.get_text(&url).await?;
        parse_payload(key, &url, &body)
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("health check failed: {}", e);
                false
            }
        }
    }
}
