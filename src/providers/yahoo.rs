//! Yahoo Finance chart client
//!
//! Reads the public v8 chart endpoint. Only the fields the assistant needs
//! are decoded: the quote meta price, timestamps, OHLCV columns and the
//! adjusted close column.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ChartInterval, ChartRange, MarketDataProvider};
use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::models::{ChartBar, ChartData};
use crate::Result;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; financial-query-assistant/0.1)";

pub struct YahooChartClient {
    client: Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(config.provider_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.yahoo_base_url.clone(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartClient {
    async fn fetch(&self, symbol: &str, interval: ChartInterval, range: ChartRange) -> Result<ChartData> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(symbol)
        );

        debug!(symbol, interval = interval.as_str(), range = range.as_str(), "Fetching Yahoo chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("interval", interval.as_str()),
                ("range", range.as_str()),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .map_err(|e| AssistantError::ProviderError(format!("Yahoo chart request failed for {}: {}", symbol, e)))?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(AssistantError::SymbolNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            warn!(symbol, %status, "Yahoo chart returned an error status");
            return Err(AssistantError::ProviderError(format!(
                "Yahoo chart returned {} for {}",
                status, symbol
            )));
        }

        parse_chart(symbol, &body)
    }
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Decode a chart response body into `ChartData`
fn parse_chart(symbol: &str, body: &str) -> Result<ChartData> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| AssistantError::ProviderError(format!("failed to parse Yahoo chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(AssistantError::SymbolNotFound(symbol.to_string()));
        }
        return Err(AssistantError::ProviderError(format!(
            "Yahoo chart API error: {} ({})",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(AssistantError::SymbolNotFound(symbol.to_string()));
    };

    let latest_price = result.meta.and_then(|m| m.regular_market_price);
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .as_ref()
        .and_then(|i| i.quote.first())
        .cloned()
        .unwrap_or_default();
    let adjclose = result
        .indicators
        .and_then(|i| i.adjclose.into_iter().next())
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let bars = timestamps
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| ChartBar {
            timestamp,
            open: column(&quote.open, i),
            high: column(&quote.high, i),
            low: column(&quote.low, i),
            close: column(&quote.close, i),
            adj_close: column(&adjclose, i),
            volume: quote.volume.get(i).copied().flatten().and_then(|v| u64::try_from(v).ok()),
        })
        .collect();

    Ok(ChartData { latest_price, bars })
}

// ============================================================================
// Yahoo Chart API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<YahooChartIndicators>,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
