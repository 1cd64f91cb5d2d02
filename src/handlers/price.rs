//! Latest price lookup

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::bounded_provider;
use crate::models::{HandlerOutput, PipelineStage};
use crate::providers::{ChartInterval, ChartRange, MarketDataProvider};

pub struct PriceHandler {
    market: Arc<dyn MarketDataProvider>,
    provider_timeout: Duration,
}

impl PriceHandler {
    pub fn new(market: Arc<dyn MarketDataProvider>, provider_timeout: Duration) -> Self {
        Self {
            market,
            provider_timeout,
        }
    }

    /// Resolve the latest price, `None` when nothing usable came back
    pub async fn latest_price(&self, symbol: &str) -> Option<f64> {
        let chart = bounded_provider(
            "market_data",
            self.provider_timeout,
            self.market.fetch(symbol, ChartInterval::OneMinute, ChartRange::OneDay),
        )
        .await;

        match chart {
            Ok(chart) => chart.resolve_latest_price(),
            Err(e) => {
                warn!(symbol, "Error fetching stock price: {}", e);
                None
            }
        }
    }

    pub async fn execute(&self, symbol: &str) -> HandlerOutput {
        match self.latest_price(symbol).await {
            Some(price) => {
                info!(symbol, price, "Resolved latest price");
                HandlerOutput {
                    text: format!("The latest stock price for {} is ${:.2}.", symbol, price),
                    stage: PipelineStage::Summarized,
                }
            }
            None => HandlerOutput {
                text: format!("Could not retrieve the latest stock price for {}.", symbol),
                stage: PipelineStage::DataGathered,
            },
        }
    }
}
