//! Placeholder announcement provider
//!
//! Serves fixture developments, filings and results until a real
//! announcements feed is wired in. Dates are relative to a reference day
//! so the data always looks recent.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use tracing::debug;

use super::AnnouncementProvider;
use crate::models::{AnnouncementBundle, DevelopmentItem, FilingItem, ResultItem};

/// (symbol, headline, days ago, summary)
const DEVELOPMENTS: &[(&str, &str, u64, &str)] = &[
    (
        "META",
        "Placeholder: Meta Expands AI Infrastructure Spending and Ships a New Language Model",
        12,
        "Placeholder: Meta raised capital expenditure guidance to fund AI data centres and released a multimodal large language model aimed at assistants and developer tooling.",
    ),
    (
        "TSLA",
        "Placeholder: Tesla Shares Climb 5% on Expanded Market Access",
        5,
        "Placeholder: Sentiment improved after an announcement broadening Tesla's international market exposure, offsetting a weak quarterly earnings report earlier in the year.",
    ),
    (
        "AAPL",
        "Placeholder: Apple Shares Slip as Management Flags Uncertain Tariff Costs",
        3,
        "Placeholder: Apple expects tariffs to add material costs this quarter and says it is shifting US-bound production to lower-tariff regions.",
    ),
    (
        "GOOGL",
        "Placeholder: Alphabet Falls After Testimony on Declining Safari Search Volume",
        12,
        "Placeholder: An Apple executive testified that Google search traffic from Safari had declined and that AI search alternatives were under evaluation, raising questions about Alphabet's search position.",
    ),
];

/// Fixture-backed `AnnouncementProvider`
pub struct PlaceholderAnnouncements {
    reference_date: Option<NaiveDate>,
}

impl PlaceholderAnnouncements {
    /// Dates relative to the current day
    pub fn new() -> Self {
        Self { reference_date: None }
    }

    /// Dates relative to a fixed day
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self {
            reference_date: Some(reference_date),
        }
    }

    fn bundle_for(&self, symbol: &str) -> AnnouncementBundle {
        let today = self.reference_date.unwrap_or_else(|| Utc::now().date_naive());
        let days_ago = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);

        let significant_developments = DEVELOPMENTS
            .iter()
            .filter(|(related, ..)| related.eq_ignore_ascii_case(symbol))
            .map(|(related, headline, age, summary)| DevelopmentItem {
                related_symbol: related.to_string(),
                headline: headline.to_string(),
                date: days_ago(*age),
                summary: summary.to_string(),
            })
            .collect();

        let quarter_end = today.checked_add_days(Days::new(15)).unwrap_or(today);
        let financial_results = vec![
            ResultItem {
                headline: format!("Placeholder: {} Reports Quarterly Financial Results", symbol),
                date: days_ago(3),
                summary: format!(
                    "{} reported results for the quarter ending {}, with strong revenue growth and solid earnings per share.",
                    symbol, quarter_end
                ),
            },
            ResultItem {
                headline: format!("Placeholder: {} Raises Full-Year Guidance", symbol),
                date: days_ago(2),
                summary: format!(
                    "After better-than-expected performance, {} raised its guidance for the full fiscal year.",
                    symbol
                ),
            },
        ];

        let filing = |filing_type: &str, title: &str, age: u64, description: String| FilingItem {
            filing_type: filing_type.to_string(),
            title: format!("Placeholder: {} for {}", title, symbol),
            filing_date: days_ago(age),
            description,
        };

        let sec_filings = vec![
            filing("8-K", "Current report", 2, format!(
                "Placeholder 8-K for {} covering a recent material event such as an agreement or management change.",
                symbol
            )),
            filing("10-Q", "Quarterly report", 4, format!(
                "Placeholder 10-Q for {} with unaudited quarterly financial statements and disclosures.",
                symbol
            )),
            filing("10-K", "Annual report", 30, format!(
                "Placeholder 10-K for {} with audited annual financial statements and a business overview.",
                symbol
            )),
            filing("S-1", "Registration statement", 60, format!(
                "Placeholder S-1 for {} registering securities for a public offering.",
                symbol
            )),
            filing("4", "Insider trading report", 1, format!(
                "Placeholder Form 4 for {} reporting insider transactions.",
                symbol
            )),
        ];

        AnnouncementBundle {
            significant_developments,
            sec_filings,
            financial_results,
        }
    }
}

impl Default for PlaceholderAnnouncements {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnnouncementProvider for PlaceholderAnnouncements {
    async fn fetch(&self, symbol: &str) -> AnnouncementBundle {
        debug!(symbol, "Serving placeholder announcements");
        self.bundle_for(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 20).unwrap()
    }

    #[tokio::test]
    async fn test_developments_filtered_by_symbol() {
        let provider = PlaceholderAnnouncements::with_reference_date(reference());

        let bundle = provider.fetch("tsla").await;
        assert_eq!(bundle.significant_developments.len(), 1);
        assert_eq!(bundle.significant_developments[0].related_symbol, "TSLA");
        assert_eq!(
            bundle.significant_developments[0].date,
            NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
        );

        let unknown = provider.fetch("ZZZZ").await;
        assert!(unknown.significant_developments.is_empty());
        assert!(!unknown.is_empty());
    }

    #[tokio::test]
    async fn test_filings_and_results_name_symbol() {
        let provider = PlaceholderAnnouncements::with_reference_date(reference());
        let bundle = provider.fetch("MSFT").await;

        assert_eq!(bundle.sec_filings.len(), 5);
        assert_eq!(bundle.financial_results.len(), 2);
        assert!(bundle.sec_filings.iter().all(|f| f.title.ends_with("for MSFT")));
        assert_eq!(bundle.sec_filings[0].filing_type, "8-K");
        assert!(bundle.financial_results[0].summary.contains("2025-08-04"));
    }

    #[tokio::test]
    async fn test_fixture_is_stable() {
        let provider = PlaceholderAnnouncements::with_reference_date(reference());
        assert_eq!(provider.fetch("AAPL").await, provider.fetch("AAPL").await);
    }
}
