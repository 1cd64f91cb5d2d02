//! Price movement analysis over the recent daily history

use std::sync::Arc;
use tracing::{info, warn};

use super::{bounded_or_default, bounded_provider, narrate, CallLimits};
use crate::models::{HandlerOutput, PipelineStage, PriceSeries};
use crate::oracle::LanguageOracle;
use crate::prompts;
use crate::providers::{
    AnnouncementProvider, ChartInterval, ChartRange, MarketDataProvider, NewsSearchProvider,
    NewsWindow,
};

pub const ANALYSIS_FALLBACK: &str =
    "Could not analyze stock movement reasons due to an error with the language model.";

pub struct MovementReasonsHandler {
    market: Arc<dyn MarketDataProvider>,
    announcements: Arc<dyn AnnouncementProvider>,
    news: Arc<dyn NewsSearchProvider>,
    limits: CallLimits,
    history_days: usize,
}

impl MovementReasonsHandler {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        announcements: Arc<dyn AnnouncementProvider>,
        news: Arc<dyn NewsSearchProvider>,
        limits: CallLimits,
        history_days: usize,
    ) -> Self {
        Self {
            market,
            announcements,
            news,
            limits,
            history_days,
        }
    }

    /// Daily history for the analysis window; empty on provider failure
    pub async fn price_history(&self, symbol: &str) -> PriceSeries {
        let chart = bounded_provider(
            "market_data",
            self.limits.provider,
            self.market.fetch(symbol, ChartInterval::OneDay, ChartRange::OneMonth),
        )
        .await;

        match chart {
            Ok(chart) => PriceSeries::from_chart(&chart, self.history_days),
            Err(e) => {
                warn!(symbol, "Error fetching stock price history: {}", e);
                PriceSeries::default()
            }
        }
    }

    pub async fn execute(&self, symbol: &str, oracle: &dyn LanguageOracle) -> HandlerOutput {
        let (history, bundle, news) = tokio::join!(
            self.price_history(symbol),
            bounded_or_default("announcements", self.limits.provider, self.announcements.fetch(symbol)),
            bounded_or_default(
                "news_search",
                self.limits.provider,
                self.news.search(symbol, NewsWindow::LastTwoWeeks)
            ),
        );

        info!(
            symbol,
            history_points = history.len(),
            news = news.len(),
            "Gathered movement data"
        );

        let prompt = prompts::movement_analysis(symbol, &history, &bundle, &news);

        match narrate(oracle, &prompt, self.limits.oracle).await {
            Some(analysis) => HandlerOutput {
                text: analysis,
                stage: PipelineStage::Summarized,
            },
            None => HandlerOutput {
                text: ANALYSIS_FALLBACK.to_string(),
                stage: PipelineStage::DataGathered,
            },
        }
    }
}
