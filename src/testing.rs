//! Deterministic test doubles for the oracle and the providers.
//!
//! Each double records the calls it receives so tests can assert which
//! collaborators a request touched.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::AssistantError;
use crate::models::{AnnouncementBundle, ChartData, NewsItem};
use crate::oracle::{Completion, LanguageOracle, ResponseFormat};
use crate::providers::{
    AnnouncementProvider, ChartInterval, ChartRange, MarketDataProvider, NewsSearchProvider,
    NewsWindow,
};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    pub system: String,
    pub user: String,
    pub format: ResponseFormat,
}

enum Script {
    Text(String),
    Structured(Value),
    Echo,
    Fail,
}

/// Oracle that answers from a fixed script
pub struct ScriptedOracle {
    script: Script,
    delay: Option<Duration>,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with this text
    pub fn text(text: &str) -> Self {
        Self::with_script(Script::Text(text.to_string()))
    }

    /// Always answer with this JSON value (structured mode only accepts objects)
    pub fn json(value: Value) -> Self {
        Self::with_script(Script::Structured(value))
    }

    /// Answer with the user instruction it was given
    pub fn echo() -> Self {
        Self::with_script(Script::Echo)
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageOracle for ScriptedOracle {
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
        format: ResponseFormat,
    ) -> Result<Completion> {
        self.calls.lock().unwrap().push(OracleCall {
            system: system_instruction.to_string(),
            user: user_instruction.to_string(),
            format,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match (&self.script, format) {
            (Script::Fail, _) => Err(AssistantError::LlmError("scripted failure".to_string())),
            (Script::Echo, _) => Ok(Completion::Text(user_instruction.to_string())),
            (Script::Text(text), ResponseFormat::Text) => Ok(Completion::Text(text.clone())),
            (Script::Structured(Value::Object(object)), ResponseFormat::Json) => {
                Ok(Completion::Structured(object.clone()))
            }
            (Script::Structured(value), ResponseFormat::Text) => Ok(Completion::Text(value.to_string())),
            (_, ResponseFormat::Json) => Err(AssistantError::OracleMalformedOutput(
                "scripted output is not a JSON object".to_string(),
            )),
        }
    }
}

/// Build a classification object the way the oracle would return it
pub fn classification(company_name: Option<&str>, symbol: Option<&str>, intent: Option<&str>) -> Value {
    let mut object = Map::new();
    object.insert("company_name".into(), company_name.map_or(Value::Null, |v| Value::String(v.into())));
    object.insert("symbol".into(), symbol.map_or(Value::Null, |v| Value::String(v.into())));
    object.insert("intent".into(), intent.map_or(Value::Null, |v| Value::String(v.into())));
    Value::Object(object)
}

/// Market data double serving one chart (or one failure)
pub struct StaticMarketData {
    chart: Option<ChartData>,
    failure: Option<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<(String, ChartInterval, ChartRange)>>,
}

impl StaticMarketData {
    pub fn chart(chart: ChartData) -> Self {
        Self {
            chart: Some(chart),
            failure: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: AssistantError) -> Self {
        Self {
            chart: None,
            failure: Some(error.to_string()),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<(String, ChartInterval, ChartRange)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketData {
    async fn fetch(&self, symbol: &str, interval: ChartInterval, range: ChartRange) -> Result<ChartData> {
        self.requests
            .lock()
            .unwrap()
            .push((symbol.to_string(), interval, range));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match (&self.chart, &self.failure) {
            (Some(chart), _) => Ok(chart.clone()),
            (None, Some(message)) => Err(AssistantError::ProviderError(message.clone())),
            (None, None) => Err(AssistantError::SymbolNotFound(symbol.to_string())),
        }
    }
}

/// Announcement double serving a fixed bundle
#[derive(Default)]
pub struct StaticAnnouncements {
    bundle: AnnouncementBundle,
    requests: Mutex<Vec<String>>,
}

impl StaticAnnouncements {
    pub fn new(bundle: AnnouncementBundle) -> Self {
        Self {
            bundle,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnnouncementProvider for StaticAnnouncements {
    async fn fetch(&self, symbol: &str) -> AnnouncementBundle {
        self.requests.lock().unwrap().push(symbol.to_string());
        self.bundle.clone()
    }
}

/// News double serving fixed headlines
#[derive(Default)]
pub struct StaticNews {
    items: Vec<NewsItem>,
    delay: Option<Duration>,
    requests: Mutex<Vec<(String, NewsWindow)>>,
}

impl StaticNews {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self {
            items,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<(String, NewsWindow)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSearchProvider for StaticNews {
    async fn search(&self, query: &str, window: NewsWindow) -> Vec<NewsItem> {
        self.requests.lock().unwrap().push((query.to_string(), window));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.items.clone()
    }
}
