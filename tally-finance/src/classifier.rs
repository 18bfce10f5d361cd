//! Category classification capability.
//!
//! Two interchangeable implementations sit behind [`CategoryClassifier`]:
//! the network-free [`KeywordClassifier`] and the optional
//! [`RemoteClassifier`](crate::remote::RemoteClassifier). [`Classifier`]
//! picks one at runtime from configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tally_core::{Category, CategoryMatch, Direction, ParsedTransaction, categorize};

use crate::error::ClassifyError;
use crate::remote::RemoteClassifier;

/// What the classifier sees of one transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRequest {
    pub description: String,
    pub amount: Decimal,
    pub direction: Direction,
}

impl From<&ParsedTransaction> for ClassificationRequest {
    fn from(t: &ParsedTransaction) -> Self {
        Self {
            description: t.description.clone(),
            amount: t.amount,
            direction: t.direction,
        }
    }
}

/// A validated classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    /// 0.0 - 1.0
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Classification {
    /// Result recorded when a call fails
    pub fn uncategorized() -> Self {
        Self {
            category: Category::Uncategorized,
            confidence: 0.0,
            reasoning: None,
        }
    }
}

/// Assigns a category to one transaction
pub trait CategoryClassifier: Send + Sync {
    fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> impl Future<Output = Result<Classification, ClassifyError>> + Send;
}

/// Deterministic keyword-table classifier; never fails, never does I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn classify_now(&self, request: &ClassificationRequest) -> Classification {
        let result = categorize(&request.description);
        match result.matched {
            CategoryMatch::Keyword(k) => Classification {
                category: result.category,
                confidence: 1.0,
                reasoning: Some(format!("matched keyword \"{k}\"")),
            },
            CategoryMatch::CheckFallback => Classification {
                category: result.category,
                confidence: 0.5,
                reasoning: Some("description mentions a check".to_string()),
            },
            CategoryMatch::Unmatched => Classification {
                category: result.category,
                confidence: 0.5,
                reasoning: None,
            },
        }
    }
}

impl CategoryClassifier for KeywordClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Classification, ClassifyError> {
        Ok(self.classify_now(request))
    }
}

/// Classifier selected by configuration
#[derive(Debug, Clone)]
pub enum Classifier {
    Keyword(KeywordClassifier),
    Remote(RemoteClassifier),
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::Keyword(KeywordClassifier)
    }
}

impl Classifier {
    pub fn name(&self) -> &'static str {
        match self {
            Classifier::Keyword(_) => "keyword",
            Classifier::Remote(_) => "remote",
        }
    }
}

impl CategoryClassifier for Classifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Classification, ClassifyError> {
        match self {
            Classifier::Keyword(k) => k.classify(request).await,
            Classifier::Remote(r) => r.classify(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(description: &str) -> ClassificationRequest {
        ClassificationRequest {
            description: description.to_string(),
            amount: dec!(42.00),
            direction: Direction::Withdrawal,
        }
    }

    #[tokio::test]
    async fn test_keyword_classifier_shell() {
        let c = KeywordClassifier.classify(&request("SHELL OIL 123")).await.unwrap();
        assert_eq!(c.category, Category::AutoGas);
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.reasoning.as_deref(), Some("matched keyword \"shell\""));
    }

    #[tokio::test]
    async fn test_keyword_classifier_fallbacks() {
        let check = KeywordClassifier.classify(&request("CHECK 1043")).await.unwrap();
        assert_eq!(check.category, Category::Checks);

        let none = KeywordClassifier.classify(&request("ZZZ QQQ")).await.unwrap();
        assert_eq!(none.category, Category::Uncategorized);
        assert!(none.reasoning.is_none());
    }

    #[tokio::test]
    async fn test_default_classifier_is_keyword() {
        let c = Classifier::default();
        assert_eq!(c.name(), "keyword");
        let out = c.classify(&request("STARBUCKS 22")).await.unwrap();
        assert_eq!(out.category, Category::MealsEntertainment);
    }

    #[test]
    fn test_request_from_transaction() {
        let t = ParsedTransaction {
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            description: "DEPOSIT MADE IN A BRANCH/STORE 149.00".to_string(),
            amount: dec!(149.00),
            direction: Direction::Deposit,
            balance: None,
            check_number: None,
            category: Category::Income,
            needs_review: false,
        };
        let r = ClassificationRequest::from(&t);
        assert_eq!(r.amount, dec!(149.00));
        assert_eq!(r.direction, Direction::Deposit);
    }
}
