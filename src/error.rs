//! Error types for the financial query assistant

use thiserror::Error;

use crate::models::ErrorCode;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {

    // =============================
    // Language Oracle Errors
    // =============================

    #[error("Language oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Malformed oracle output: {0}")]
    OracleMalformedOutput(String),

    #[error("Language oracle timed out after {0} ms")]
    OracleTimeout(u128),

    #[error("LLM error: {0}")]
    LlmError(String),

    // =============================
    // Data Provider Errors
    // =============================

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider '{provider}' timed out after {elapsed_ms} ms")]
    ProviderTimeout { provider: &'static str, elapsed_ms: u128 },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    // =============================
    // Configuration
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Client-input failures raised by query validation.
///
/// These are the only errors that reach the caller as structured error
/// responses; everything downstream degrades to explanatory text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Could not understand the intent of your query. Please try rephrasing.")]
    AmbiguousIntent,

    #[error("Could not identify a stock symbol for \"{subject}\". Please specify a known symbol like AAPL, MSFT, etc.")]
    MissingSymbol { subject: String },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::AmbiguousIntent => ErrorCode::AmbiguousIntent,
            ValidationError::MissingSymbol { .. } => ErrorCode::MissingSymbol,
        }
    }
}
