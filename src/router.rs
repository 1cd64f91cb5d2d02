//! Query router
//!
//! Turns a free-text question into a reply:
//! RECEIVED → CLASSIFIED → VALIDATED → DATA_GATHERED → SUMMARIZED → RESPONDED
//!
//! Classification (oracle call) and validation (local rules) are separate
//! steps so an unavailable oracle and an insufficient answer stay
//! distinguishable.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AssistantConfig;
use crate::error::{AssistantError, ValidationError};
use crate::handlers::{AnnouncementsHandler, CallLimits, MovementReasonsHandler, PriceHandler};
use crate::models::{
    ErrorCode, HandlerOutput, Intent, ParsedIntent, PipelineStage, Reply, RoutedQuery, StatusClass,
};
use crate::oracle::{Completion, LanguageOracle, OpenAiClient, ResponseFormat};
use crate::prompts;
use crate::providers::{
    AnnouncementProvider, MarketDataProvider, NewsSearchProvider, PlaceholderAnnouncements,
    PlaceholderNewsSearch, YahooChartClient,
};
use crate::Result;

pub const CAPABILITIES_MESSAGE: &str = "I can help with finding the latest stock price, latest announcements, or reasons for stock price movements for US-listed companies.";

const CLASSIFICATION_KEYS: [&str; 3] = ["company_name", "symbol", "intent"];

/// Process-wide provider handles
#[derive(Clone)]
pub struct Providers {
    pub market: Arc<dyn MarketDataProvider>,
    pub announcements: Arc<dyn AnnouncementProvider>,
    pub news: Arc<dyn NewsSearchProvider>,
}

pub struct QueryRouter {
    oracle: Arc<dyn LanguageOracle>,
    oracle_error: Option<String>,
    oracle_timeout: Duration,
    price: PriceHandler,
    announcements: AnnouncementsHandler,
    movement: MovementReasonsHandler,
}

impl QueryRouter {
    /// Build the router. An oracle that failed to initialize is kept as an
    /// error and reported on every request.
    pub fn new(
        oracle: Result<Arc<dyn LanguageOracle>>,
        providers: Providers,
        limits: CallLimits,
        history_days: usize,
    ) -> Self {
        let (oracle, oracle_error) = match oracle {
            Ok(oracle) => (oracle, None),
            Err(e) => {
                let message = match e {
                    AssistantError::OracleUnavailable(message) => message,
                    other => other.to_string(),
                };
                warn!("Language oracle unavailable: {}", message);
                (
                    Arc::new(UnavailableOracle(message.clone())) as Arc<dyn LanguageOracle>,
                    Some(message),
                )
            }
        };

        Self {
            oracle,
            oracle_error,
            oracle_timeout: limits.oracle,
            price: PriceHandler::new(providers.market.clone(), limits.provider),
            announcements: AnnouncementsHandler::new(
                providers.announcements.clone(),
                providers.news.clone(),
                limits,
            ),
            movement: MovementReasonsHandler::new(
                providers.market,
                providers.announcements,
                providers.news,
                limits,
                history_days,
            ),
        }
    }

    /// Wire the production oracle and providers from configuration
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let oracle = OpenAiClient::new(config).map(|client| {
            info!(model = client.model(), "Language oracle initialized");
            Arc::new(client) as Arc<dyn LanguageOracle>
        });

        let providers = Providers {
            market: Arc::new(YahooChartClient::new(config)?),
            announcements: Arc::new(PlaceholderAnnouncements::new()),
            news: Arc::new(PlaceholderNewsSearch),
        };

        let limits = CallLimits {
            oracle: config.oracle_timeout,
            provider: config.provider_timeout,
        };

        Ok(Self::new(oracle, providers, limits, config.price_history_days))
    }

    /// Initialization error of the oracle, if any
    pub fn oracle_error(&self) -> Option<&str> {
        self.oracle_error.as_deref()
    }

    /// Full pipeline for one query
    pub async fn ask(&self, query: &str) -> Reply {
        if let Some(error) = &self.oracle_error {
            return Reply::error(
                StatusClass::ServiceUnavailable,
                ErrorCode::OracleUnavailable,
                format!("Language oracle is not available. {}", error),
                PipelineStage::Received,
            );
        }

        let query = query.trim();
        if query.is_empty() {
            return Reply::error(
                StatusClass::BadRequest,
                ErrorCode::MissingQuery,
                "No query provided",
                PipelineStage::Received,
            );
        }

        let parsed = self.classify(query).await;
        debug!(?parsed, stage = ?PipelineStage::Classified, "Query classified");

        let routed = match Self::validate(query, &parsed) {
            Ok(routed) => routed,
            Err(e) => {
                info!(code = ?e.code(), "Query rejected: {}", e);
                let stage = match e {
                    ValidationError::AmbiguousIntent => PipelineStage::Classified,
                    ValidationError::MissingSymbol { .. } => PipelineStage::Validated,
                };
                return Reply::error(StatusClass::BadRequest, e.code(), e.to_string(), stage);
            }
        };

        info!(symbol = %routed.symbol, intent = %routed.intent, "Dispatching query");
        let output = self.dispatch(&routed.symbol, routed.intent).await;
        debug!(stage = ?output.stage, next = ?PipelineStage::Responded, "Query answered");

        Reply::answer(output.text, output.stage)
    }

    /// Ask the oracle for {company_name, symbol, intent}.
    ///
    /// Any failure (call error, timeout, malformed object) yields the
    /// all-null classification.
    pub async fn classify(&self, query: &str) -> ParsedIntent {
        let user = prompts::classify_user_prompt(query);
        let call = self
            .oracle
            .complete(prompts::CLASSIFY_SYSTEM_PROMPT, &user, ResponseFormat::Json);

        let completion = match tokio::time::timeout(self.oracle_timeout, call).await {
            Ok(Ok(completion)) => completion,
            Ok(Err(e)) => {
                warn!("Classification call failed: {}", e);
                return ParsedIntent::unresolved();
            }
            Err(_) => {
                warn!("{}", AssistantError::OracleTimeout(self.oracle_timeout.as_millis()));
                return ParsedIntent::unresolved();
            }
        };

        let Some(parsed) = completion.into_object().and_then(decode_classification) else {
            warn!(query, "Failed to get a valid classification object");
            return ParsedIntent::unresolved();
        };

        if parsed.symbol.is_none() {
            if let Some(company) = &parsed.company_name {
                info!(company = %company, "Oracle identified a company but no symbol");
            }
        }

        parsed
    }

    /// Intent-specific checks on a classification
    pub fn validate(query: &str, parsed: &ParsedIntent) -> std::result::Result<RoutedQuery, ValidationError> {
        let intent = match parsed.intent {
            None | Some(Intent::Unknown) => return Err(ValidationError::AmbiguousIntent),
            Some(intent) => intent,
        };

        match (&parsed.symbol, intent.requires_symbol()) {
            (Some(symbol), _) => Ok(RoutedQuery {
                symbol: symbol.clone(),
                intent,
            }),
            (None, true) => Err(ValidationError::MissingSymbol {
                subject: parsed
                    .company_name
                    .clone()
                    .unwrap_or_else(|| query.to_string()),
            }),
            (None, false) => Ok(RoutedQuery {
                symbol: String::new(),
                intent,
            }),
        }
    }

    /// Run the handler for an intent
    pub async fn dispatch(&self, symbol: &str, intent: Intent) -> HandlerOutput {
        match intent {
            Intent::GetPrice => self.price.execute(symbol).await,
            Intent::GetAnnouncements => self.announcements.execute(symbol, self.oracle.as_ref()).await,
            Intent::GetMovementReasons => self.movement.execute(symbol, self.oracle.as_ref()).await,
            Intent::Unknown => HandlerOutput {
                text: CAPABILITIES_MESSAGE.to_string(),
                stage: PipelineStage::Validated,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClassification {
    company_name: Option<String>,
    symbol: Option<String>,
    intent: Option<String>,
}

/// Strict decode: exactly the three keys, each a string or null
fn decode_classification(object: Map<String, Value>) -> Option<ParsedIntent> {
    if object.len() != CLASSIFICATION_KEYS.len()
        || !CLASSIFICATION_KEYS.iter().all(|key| object.contains_key(*key))
    {
        return None;
    }

    let raw: RawClassification = serde_json::from_value(Value::Object(object)).ok()?;
    let present = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    Some(ParsedIntent {
        company_name: present(raw.company_name),
        symbol: present(raw.symbol),
        intent: present(raw.intent).map(|intent| Intent::from_wire(&intent)),
    })
}

/// Stand-in used when the real oracle could not be constructed
struct UnavailableOracle(String);

#[async_trait]
impl LanguageOracle for UnavailableOracle {
    async fn complete(&self, _system: &str, _user: &str, _format: ResponseFormat) -> Result<Completion> {
        Err(AssistantError::OracleUnavailable(self.0.clone()))
    }
}
