//! Oracle instructions
//!
//! Data blocks are embedded as pretty-printed JSON so the model sees the
//! same field names the providers use.

use serde::Serialize;

use crate::models::{AnnouncementBundle, NewsItem, PriceSeries};

pub const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are an assistant that parses user queries for a financial research tool.
Identify the company name (or ticker symbol if one is given) and the user's intent.
The intent must be one of: 'get_stock_price', 'get_latest_announcements', 'get_stock_movement_reasons'.
If you identify a company name, also give its common stock ticker symbol when known (e.g. Apple Inc. -> AAPL, Microsoft -> MSFT, Tesla -> TSLA, Meta -> META, Google -> GOOGL or GOOG).
If the user gives a ticker symbol directly, use it as the symbol.
Return strictly a JSON object with exactly the keys 'company_name', 'symbol' and 'intent'.
If the company cannot be reliably identified, use null for company_name and symbol.
If the intent cannot be reliably identified, use null for intent.
Your output MUST be a valid JSON object."#;

pub fn classify_user_prompt(query: &str) -> String {
    format!("User Query: \"{}\"", query)
}

/// A system + user instruction pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

pub fn announcement_summary(
    symbol: &str,
    announcements: &AnnouncementBundle,
    news: &[NewsItem],
) -> PromptPair {
    let system = format!(
        "You are an Investment Research Assistant. Your task is to summarize the latest announcements and relevant news for {}.",
        symbol
    );

    let user = format!(
        r#"Summarize the latest announcements and relevant news for {symbol}.

Announcements Data:
Significant Developments: {developments}
SEC Filings: {filings}
Financial Results: {results}

Recent News Articles (Headlines and Snippets):
{news}

Provide a concise summary of the most important and recent items. Focus on information relevant to an investment professional.
Present the summary in a clear, narrative format."#,
        symbol = symbol,
        developments = pretty(&announcements.significant_developments),
        filings = pretty(&announcements.sec_filings),
        results = pretty(&announcements.financial_results),
        news = pretty(news),
    );

    PromptPair { system, user }
}

pub fn movement_analysis(
    symbol: &str,
    history: &PriceSeries,
    announcements: &AnnouncementBundle,
    news: &[NewsItem],
) -> PromptPair {
    let system = format!(
        "You are an Investment Research Assistant. Your task is to analyze the provided data for {} and explain its stock price movements over the period covered by the price history (typically the last 2 weeks).",
        symbol
    );

    let user = format!(
        r#"Analyze the following data for {symbol}:
Price History (Date, Open, High, Low, Close, Adjusted Close, Volume):
{history}

Recent Announcements (Significant Developments, SEC Filings & Financial Results):
Significant Developments: {developments}
SEC Filings: {filings}
Financial Results: {results}

Recent News Articles (Headlines and Snippets):
{news}

Based on this information, provide a concise analysis of the key reasons for {symbol}'s stock price movements.
Identify any significant price changes and correlate them with specific announcements, news, or market events where possible.
Focus on the last 2 weeks as reflected in the price history.
Present the analysis in a clear, narrative format."#,
        symbol = symbol,
        history = pretty(history),
        developments = pretty(&announcements.significant_developments),
        filings = pretty(&announcements.sec_filings),
        results = pretty(&announcements.financial_results),
        news = pretty(news),
    );

    PromptPair { system, user }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}
