//! Bounded concurrent classification of a transaction batch.
//!
//! Calls run independently with their own timeout. Results are slotted back
//! by the request's index, so output order equals input order whatever the
//! completion order. A failed call never cancels its siblings.

use futures_util::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::classifier::{CategoryClassifier, Classification, ClassificationRequest, KeywordClassifier};
use crate::error::ClassifyError;

/// What a failed call is recorded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Uncategorized with confidence 0
    #[default]
    Uncategorized,
    /// The keyword table's answer
    KeywordFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Maximum calls in flight
    pub concurrency: usize,
    /// Per-call timeout
    pub timeout: Duration,
    pub on_failure: FailurePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(20),
            on_failure: FailurePolicy::Uncategorized,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// One per request, in request order
    pub classifications: Vec<Classification>,
    /// Indices of calls that failed or timed out
    pub failed: Vec<usize>,
}

fn on_failure(policy: FailurePolicy, request: &ClassificationRequest) -> Classification {
    match policy {
        FailurePolicy::Uncategorized => Classification::uncategorized(),
        FailurePolicy::KeywordFallback => KeywordClassifier.classify_now(request),
    }
}

/// Classify every request, returning results in request order
pub async fn classify_batch<C: CategoryClassifier>(
    classifier: &C,
    requests: &[ClassificationRequest],
    options: &BatchOptions,
) -> BatchOutcome {
    let mut slots: Vec<Option<Classification>> = vec![None; requests.len()];
    let mut failed = Vec::new();

    let mut calls = stream::iter(requests.iter().enumerate())
        .map(|(index, request)| async move {
            let result = match tokio::time::timeout(options.timeout, classifier.classify(request)).await {
                Ok(r) => r,
                Err(_) => Err(ClassifyError::Timeout(options.timeout)),
            };
            (index, result)
        })
        .buffer_unordered(options.concurrency.max(1));

    while let Some((index, result)) = calls.next().await {
        let classification = match result {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(index, error = %e, "classification failed; downgraded");
                failed.push(index);
                on_failure(options.on_failure, &requests[index])
            }
        };
        slots[index] = Some(classification);
    }
    drop(calls);

    failed.sort_unstable();
    BatchOutcome {
        classifications: slots
            .into_iter()
            .map(|s| s.unwrap_or_else(Classification::uncategorized))
            .collect(),
        failed,
    }
}
