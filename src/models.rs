//! Core data models for the query assistant

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Intent =================
//

/// The user's classified goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    GetPrice,
    GetAnnouncements,
    GetMovementReasons,
    Unknown,
}

impl Intent {
    /// Decode the oracle's intent vocabulary. Anything outside the known
    /// set is `Unknown`.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "get_stock_price" => Intent::GetPrice,
            "get_latest_announcements" => Intent::GetAnnouncements,
            "get_stock_movement_reasons" => Intent::GetMovementReasons,
            _ => Intent::Unknown,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Intent::GetPrice => "get_stock_price",
            Intent::GetAnnouncements => "get_latest_announcements",
            Intent::GetMovementReasons => "get_stock_movement_reasons",
            Intent::Unknown => "unknown",
        }
    }

    /// Intents that cannot run without a ticker symbol
    pub fn requires_symbol(&self) -> bool {
        matches!(
            self,
            Intent::GetPrice | Intent::GetAnnouncements | Intent::GetMovementReasons
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Classification produced from a raw query. Any field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedIntent {
    pub company_name: Option<String>,
    pub symbol: Option<String>,
    pub intent: Option<Intent>,
}

impl ParsedIntent {
    /// The full fallback used whenever classification fails
    pub fn unresolved() -> Self {
        Self::default()
    }
}

/// A classification that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedQuery {
    pub symbol: String,
    pub intent: Intent,
}

//
// ================= Market Data =================
//

/// One bar as reported by the market data provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub timestamp: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

/// Provider response for a chart request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub latest_price: Option<f64>,
    pub bars: Vec<ChartBar>,
}

impl ChartData {
    /// Resolve the most recent usable price.
    ///
    /// The quote field wins when present; otherwise the last non-null close,
    /// scanning backward from the most recent bar.
    pub fn resolve_latest_price(&self) -> Option<f64> {
        self.latest_price
            .filter(|p| p.is_finite())
            .or_else(|| {
                self.bars
                    .iter()
                    .rev()
                    .find_map(|bar| bar.close.filter(|c| c.is_finite()))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

/// Daily price history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries(pub Vec<PricePoint>);

impl PriceSeries {
    /// Keep the trailing `days` bars of a chart.
    ///
    /// A chart with no bars, or with no value at all for one of the
    /// OHLCV columns, yields an empty series.
    pub fn from_chart(chart: &ChartData, days: usize) -> Self {
        let bars = &chart.bars;
        let column_present = |f: fn(&ChartBar) -> bool| bars.iter().any(f);

        if bars.is_empty()
            || !column_present(|b| b.open.is_some())
            || !column_present(|b| b.high.is_some())
            || !column_present(|b| b.low.is_some())
            || !column_present(|b| b.close.is_some())
            || !column_present(|b| b.volume.is_some())
        {
            return Self::default();
        }

        let mut sorted: Vec<&ChartBar> = bars.iter().collect();
        sorted.sort_by_key(|b| b.timestamp);

        let start = sorted.len().saturating_sub(days);
        let points = sorted[start..]
            .iter()
            .map(|bar| PricePoint {
                date: format_date(bar.timestamp),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                adj_close: bar.adj_close.or(bar.close),
                volume: bar.volume,
            })
            .collect();

        Self(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn format_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

//
// ================= Announcements & News =================
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentItem {
    pub related_symbol: String,
    pub headline: String,
    pub date: NaiveDate,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingItem {
    #[serde(rename = "type")]
    pub filing_type: String,
    pub title: String,
    pub filing_date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub headline: String,
    pub date: NaiveDate,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementBundle {
    pub significant_developments: Vec<DevelopmentItem>,
    pub sec_filings: Vec<FilingItem>,
    pub financial_results: Vec<ResultItem>,
}

impl AnnouncementBundle {
    pub fn is_empty(&self) -> bool {
        self.significant_developments.is_empty()
            && self.sec_filings.is_empty()
            && self.financial_results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub snippet: String,
}

//
// ================= Responses =================
//

/// Wire codes for structured error responses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    OracleUnavailable,
    AmbiguousIntent,
    MissingSymbol,
    MissingQuery,
}

/// Status classification handed to the transport layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusClass {
    Ok,
    BadRequest,
    ServiceUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePayload {
    Answer(String),
    Error { code: ErrorCode, message: String },
}

/// Pipeline stages in order. Every request ends at `Responded`; a `Reply`
/// records the last stage reached before the response was produced, so
/// early exits stay visible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Received,
    Classified,
    Validated,
    DataGathered,
    Summarized,
    Responded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub status: StatusClass,
    pub payload: ResponsePayload,
    /// Last stage reached before responding; never `Responded`
    pub stage: PipelineStage,
}

impl Reply {
    pub fn answer(text: impl Into<String>, stage: PipelineStage) -> Self {
        Self {
            status: StatusClass::Ok,
            payload: ResponsePayload::Answer(text.into()),
            stage,
        }
    }

    pub fn error(
        status: StatusClass,
        code: ErrorCode,
        message: impl Into<String>,
        stage: PipelineStage,
    ) -> Self {
        Self {
            status,
            payload: ResponsePayload::Error {
                code,
                message: message.into(),
            },
            stage,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusClass::Ok
    }
}

/// Outcome of an intent handler: the text plus how far the pipeline got
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutput {
    pub text: String,
    pub stage: PipelineStage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(timestamp: i64, close: Option<f64>) -> ChartBar {
        ChartBar {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            adj_close: None,
            volume: Some(1_000),
        }
    }

    #[test]
    fn test_intent_wire_decoding() {
        assert_eq!(Intent::from_wire("get_stock_price"), Intent::GetPrice);
        assert_eq!(Intent::from_wire(" GET_LATEST_ANNOUNCEMENTS "), Intent::GetAnnouncements);
        assert_eq!(Intent::from_wire("get_stock_movement_reasons"), Intent::GetMovementReasons);
        assert_eq!(Intent::from_wire("get_weather"), Intent::Unknown);
        assert!(!Intent::Unknown.requires_symbol());
    }

    #[test]
    fn test_latest_price_skips_trailing_nulls() {
        let chart = ChartData {
            latest_price: None,
            bars: vec![bar(1, None), bar(2, None), bar(3, Some(101.5))],
        };
        assert_eq!(chart.resolve_latest_price(), Some(101.5));

        let chart = ChartData {
            latest_price: None,
            bars: vec![bar(1, Some(99.0)), bar(2, Some(100.25)), bar(3, None)],
        };
        assert_eq!(chart.resolve_latest_price(), Some(100.25));
    }

    #[test]
    fn test_latest_price_prefers_quote_field() {
        let chart = ChartData {
            latest_price: Some(210.3),
            bars: vec![bar(1, Some(150.0))],
        };
        assert_eq!(chart.resolve_latest_price(), Some(210.3));
    }

    #[test]
    fn test_latest_price_unresolvable() {
        let all_null = ChartData {
            latest_price: None,
            bars: vec![bar(1, None), bar(2, None)],
        };
        assert_eq!(all_null.resolve_latest_price(), None);
        assert_eq!(ChartData::default().resolve_latest_price(), None);

        let nan_quote = ChartData {
            latest_price: Some(f64::NAN),
            bars: vec![],
        };
        assert_eq!(nan_quote.resolve_latest_price(), None);
    }

    #[test]
    fn test_price_series_keeps_trailing_window() {
        let day = 86_400;
        let bars: Vec<ChartBar> = (0..20).map(|i| bar(1_700_000_000 + i * day, Some(i as f64))).collect();
        let chart = ChartData { latest_price: None, bars };

        let series = PriceSeries::from_chart(&chart, 14);
        assert_eq!(series.len(), 14);
        assert_eq!(series.points()[0].close, Some(6.0));
        assert_eq!(series.points()[13].close, Some(19.0));
        // adjusted close falls back to close
        assert_eq!(series.points()[13].adj_close, Some(19.0));
        assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_price_series_orders_ascending() {
        let chart = ChartData {
            latest_price: None,
            bars: vec![bar(1_700_172_800, Some(3.0)), bar(1_700_000_000, Some(1.0))],
        };
        let series = PriceSeries::from_chart(&chart, 14);
        assert_eq!(series.points()[0].date, "2023-11-14");
        assert_eq!(series.points()[1].close, Some(3.0));
    }

    #[test]
    fn test_price_series_incomplete_chart_is_empty() {
        let mut no_volume = bar(1_700_000_000, Some(10.0));
        no_volume.volume = None;
        let chart = ChartData { latest_price: None, bars: vec![no_volume] };
        assert!(PriceSeries::from_chart(&chart, 14).is_empty());
        assert!(PriceSeries::from_chart(&ChartData::default(), 14).is_empty());
    }

    #[test]
    fn test_reply_serialization() {
        let reply = Reply::error(
            StatusClass::BadRequest,
            ErrorCode::MissingSymbol,
            "no symbol",
            PipelineStage::Validated,
        );
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["status"], "BAD_REQUEST");
        assert_eq!(json["payload"]["error"]["code"], "MISSING_SYMBOL");
        assert_eq!(json["stage"], "validated");
    }
}
