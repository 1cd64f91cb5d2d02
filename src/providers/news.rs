//! Placeholder news search
//!
//! Stands in for a web-search integration and returns two canned
//! headlines about the query subject.

use async_trait::async_trait;
use tracing::info;

use super::{NewsSearchProvider, NewsWindow};
use crate::models::NewsItem;

#[derive(Debug, Default)]
pub struct PlaceholderNewsSearch;

#[async_trait]
impl NewsSearchProvider for PlaceholderNewsSearch {
    async fn search(&self, query: &str, window: NewsWindow) -> Vec<NewsItem> {
        info!(query, window = window.as_str(), "Placeholder news search");

        if query.trim().is_empty() {
            return Vec::new();
        }

        vec![
            NewsItem {
                title: format!("News about {} 1", query),
                snippet: format!("Details about {} event A...", query),
            },
            NewsItem {
                title: format!("Market reacts to {} update", query),
                snippet: format!("Analysts discuss {}", query),
            },
        ]
    }
}
