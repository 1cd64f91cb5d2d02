//! OpenAI-compatible chat completions client
//!
//! Uses a long-lived reqwest::Client for connection pooling.
//! Any server speaking the `/chat/completions` protocol works
//! (set `OPENAI_BASE_URL`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{Completion, LanguageOracle, ResponseFormat};
use crate::config::AssistantConfig;
use crate::error::AssistantError;

/// Reusable chat completions client (connection-pooled)
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build the client. Fails when no API key is configured; callers keep
    /// the error and report it on every request.
    pub fn new(config: &AssistantConfig) -> crate::Result<Self> {
        let api_key = config.openai_api_key.clone().ok_or_else(|| {
            AssistantError::OracleUnavailable(
                "OPENAI_API_KEY environment variable not set. Please set the key in .env".to_string(),
            )
        })?;

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| {
                AssistantError::OracleUnavailable(format!("Error initializing HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageOracle for OpenAiClient {
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
        format: ResponseFormat,
    ) -> crate::Result<Completion> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = build_request(&self.model, system_instruction, user_instruction, format);

        info!(model = %self.model, ?format, "Calling chat completions API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Chat completions request failed: {}", e);
                AssistantError::LlmError(format!("Chat completions request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Chat completions error response: {}", error_text);
            return Err(AssistantError::LlmError(format!(
                "Chat completions API returned {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse chat completions response: {}", e);
            AssistantError::LlmError(format!("Chat completions parse error: {}", e))
        })?;

        let content = extract_content(body)?;
        debug!(chars = content.len(), "Chat completion received");

        match format {
            ResponseFormat::Text => Ok(Completion::Text(content)),
            ResponseFormat::Json => parse_structured(&content).map(Completion::Structured),
        }
    }
}

fn build_request<'a>(
    model: &'a str,
    system_instruction: &'a str,
    user_instruction: &'a str,
    format: ResponseFormat,
) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_instruction,
            },
            ChatMessage {
                role: "user",
                content: user_instruction,
            },
        ],
        response_format: match format {
            ResponseFormat::Json => Some(ResponseFormatSpec { kind: "json_object" }),
            ResponseFormat::Text => None,
        },
    }
}

fn extract_content(body: ChatResponse) -> crate::Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AssistantError::LlmError("Empty response from chat completions API".to_string()))
}

/// Strict JSON-object decode of a structured completion
fn parse_structured(content: &str) -> crate::Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(serde_json::Value::Object(object)) => Ok(object),
        Ok(other) => Err(AssistantError::OracleMalformedOutput(format!(
            "expected a JSON object, got: {}",
            other
        ))),
        Err(e) => {
            error!("Error decoding JSON from oracle response: {}. Content: {}", e, content);
            Err(AssistantError::OracleMalformedOutput(e.to_string()))
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = build_request("gpt-4.1-nano", "You parse queries", "User Query: \"AAPL?\"", ResponseFormat::Json);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4.1-nano");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "User Query: \"AAPL?\"");
        assert_eq!(json["response_format"]["type"], "json_object");

        let text = build_request("m", "s", "u", ResponseFormat::Text);
        let json = serde_json::to_value(&text).unwrap();
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_parse_structured() {
        let object = parse_structured(r#"{"company_name": null, "symbol": "MSFT", "intent": "get_stock_price"}"#).unwrap();
        assert_eq!(object["symbol"], "MSFT");

        assert!(matches!(
            parse_structured("[1, 2]"),
            Err(AssistantError::OracleMalformedOutput(_))
        ));
        assert!(matches!(
            parse_structured("Sure! Here is the JSON"),
            Err(AssistantError::OracleMalformedOutput(_))
        ));
    }

    #[test]
    fn test_extract_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), "hello");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_content(empty).is_err());
    }

    #[test]
    fn test_missing_api_key() {
        let config = AssistantConfig::default();
        let err = OpenAiClient::new(&config).err().unwrap();
        assert!(matches!(err, AssistantError::OracleUnavailable(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_client_uses_configured_model() {
        let config = AssistantConfig {
            openai_api_key: Some("sk-test".to_string()),
            openai_model: "local-model".to_string(),
            ..AssistantConfig::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.model(), "local-model");
    }
}
