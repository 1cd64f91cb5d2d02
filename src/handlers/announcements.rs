//! Announcement and news summary

use std::sync::Arc;
use tracing::info;

use super::{bounded_or_default, narrate, CallLimits};
use crate::models::{HandlerOutput, PipelineStage};
use crate::oracle::LanguageOracle;
use crate::prompts;
use crate::providers::{AnnouncementProvider, NewsSearchProvider, NewsWindow};

pub const SUMMARY_FALLBACK: &str =
    "Could not generate announcement summary due to an error with the language model.";

pub struct AnnouncementsHandler {
    announcements: Arc<dyn AnnouncementProvider>,
    news: Arc<dyn NewsSearchProvider>,
    limits: CallLimits,
}

impl AnnouncementsHandler {
    pub fn new(
        announcements: Arc<dyn AnnouncementProvider>,
        news: Arc<dyn NewsSearchProvider>,
        limits: CallLimits,
    ) -> Self {
        Self {
            announcements,
            news,
            limits,
        }
    }

    pub async fn execute(&self, symbol: &str, oracle: &dyn LanguageOracle) -> HandlerOutput {
        let (bundle, news) = tokio::join!(
            bounded_or_default("announcements", self.limits.provider, self.announcements.fetch(symbol)),
            bounded_or_default("news_search", self.limits.provider, self.news.search(symbol, NewsWindow::Latest)),
        );

        info!(
            symbol,
            developments = bundle.significant_developments.len(),
            filings = bundle.sec_filings.len(),
            news = news.len(),
            "Gathered announcement data"
        );

        let prompt = prompts::announcement_summary(symbol, &bundle, &news);

        match narrate(oracle, &prompt, self.limits.oracle).await {
            Some(summary) => HandlerOutput {
                text: summary,
                stage: PipelineStage::Summarized,
            },
            None => HandlerOutput {
                text: SUMMARY_FALLBACK.to_string(),
                stage: PipelineStage::DataGathered,
            },
        }
    }
}
