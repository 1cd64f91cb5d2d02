//! Language oracle trait and implementations
//!
//! The oracle is the only place a language model is involved: it classifies
//! queries and writes the narrative answers. Everything it returns is
//! treated as untrusted until decoded.

use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod openai;
pub use openai::OpenAiClient;

/// Output shape requested from the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// A successful oracle completion
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    Structured(Map<String, Value>),
}

impl Completion {
    /// Text content, or `None` for structured output or blank text
    pub fn into_text(self) -> Option<String> {
        match self {
            Completion::Text(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<Map<String, Value>> {
        match self {
            Completion::Structured(object) => Some(object),
            Completion::Text(_) => None,
        }
    }
}

/// Trait for text / structured completion (LLM controlled)
#[async_trait]
pub trait LanguageOracle: Send + Sync {
    /// Complete a system + user instruction pair.
    ///
    /// In `ResponseFormat::Json` mode implementations must return
    /// `Completion::Structured` or an error, never partial data.
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
        format: ResponseFormat,
    ) -> Result<Completion>;
}
