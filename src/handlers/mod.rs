//! Intent handlers
//!
//! One handler per routable intent. Handlers never fail: provider and
//! oracle problems are logged and turned into explanatory text.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::AssistantError;
use crate::oracle::{LanguageOracle, ResponseFormat};
use crate::prompts::PromptPair;
use crate::Result;

pub mod announcements;
pub mod movement;
pub mod price;

pub use announcements::AnnouncementsHandler;
pub use movement::MovementReasonsHandler;
pub use price::PriceHandler;

/// Per-call time limits for external collaborators
#[derive(Debug, Clone, Copy)]
pub struct CallLimits {
    pub oracle: Duration,
    pub provider: Duration,
}

impl Default for CallLimits {
    fn default() -> Self {
        Self {
            oracle: Duration::from_secs(30),
            provider: Duration::from_secs(10),
        }
    }
}

/// Run a fallible provider call under a time limit
pub(crate) async fn bounded_provider<T, F>(provider: &'static str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AssistantError::ProviderTimeout {
            provider,
            elapsed_ms: limit.as_millis(),
        }),
    }
}

/// Run an infallible provider call under a time limit; a timeout yields
/// the empty value.
pub(crate) async fn bounded_or_default<T, F>(provider: &'static str, limit: Duration, call: F) -> T
where
    T: Default,
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(value) => value,
        Err(_) => {
            warn!(provider, limit_ms = limit.as_millis() as u64, "Provider timed out, continuing without its data");
            T::default()
        }
    }
}

/// Ask the oracle for narrative text under a time limit.
///
/// Returns `None` when the call fails, times out, or produces blank output.
pub(crate) async fn narrate(
    oracle: &dyn LanguageOracle,
    prompt: &PromptPair,
    limit: Duration,
) -> Option<String> {
    let call = oracle.complete(&prompt.system, &prompt.user, ResponseFormat::Text);

    match tokio::time::timeout(limit, call).await {
        Ok(Ok(completion)) => {
            let text = completion.into_text();
            if text.is_none() {
                warn!("Oracle returned empty narrative output");
            }
            text
        }
        Ok(Err(e)) => {
            warn!("Oracle narrative call failed: {}", e);
            None
        }
        Err(_) => {
            warn!("{}", AssistantError::OracleTimeout(limit.as_millis()));
            None
        }
    }
}
