//! Financial Query Assistant
//!
//! A conversational backend for stock questions that:
//! - Classifies a free-text query into a company, a ticker symbol and an intent
//! - Validates the classification before any provider is touched
//! - Dispatches to the price, announcement or movement handler
//! - Narrates gathered data through a language oracle with bounded waits
//!
//! PIPELINE:
//! RECEIVED → CLASSIFIED → VALIDATED → DATA GATHERED → SUMMARIZED → RESPONDED

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod oracle;
pub mod prompts;
pub mod providers;
pub mod router;

#[cfg(test)]
mod testing;

pub use error::Result;

// Re-export common types
pub use config::AssistantConfig;
pub use models::*;
pub use router::{Providers, QueryRouter};
