//! Data provider traits and implementations
//!
//! Providers are black-box data sources. Market data can fail; the
//! announcement and news providers always answer (possibly empty).

use crate::models::{AnnouncementBundle, ChartData, NewsItem};
use crate::Result;
use async_trait::async_trait;

pub mod announcements;
pub mod news;
pub mod yahoo;

pub use announcements::PlaceholderAnnouncements;
pub use news::PlaceholderNewsSearch;
pub use yahoo::YahooChartClient;

/// Bar width for chart requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartInterval {
    OneMinute,
    OneDay,
}

impl ChartInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::OneMinute => "1m",
            ChartInterval::OneDay => "1d",
        }
    }
}

/// Lookback window for chart requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    OneDay,
    OneMonth,
}

impl ChartRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "1d",
            ChartRange::OneMonth => "1mo",
        }
    }
}

/// Time window for a news search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsWindow {
    Latest,
    LastTwoWeeks,
}

impl NewsWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsWindow::Latest => "latest",
            NewsWindow::LastTwoWeeks => "last 2 weeks",
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch a chart. `AssistantError::SymbolNotFound` when the symbol
    /// is unknown to the provider.
    async fn fetch(&self, symbol: &str, interval: ChartInterval, range: ChartRange) -> Result<ChartData>;
}

#[async_trait]
pub trait AnnouncementProvider: Send + Sync {
    async fn fetch(&self, symbol: &str) -> AnnouncementBundle;
}

#[async_trait]
pub trait NewsSearchProvider: Send + Sync {
    async fn search(&self, query: &str, window: NewsWindow) -> Vec<NewsItem>;
}
