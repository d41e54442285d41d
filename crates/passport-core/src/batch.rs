//! Per-record batch processing with failure isolation.
//!
//! Each item runs its own pipeline; a failing item is recorded and the rest
//! of the batch continues. Outcomes are reported in input order regardless
//! of completion order.

use std::fmt;
use std::future::Future;

use futures::stream::{self, StreamExt};
use serde::Serialize;

/// Outcome of one batch item.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    /// Position of the item in the input.
    pub index: usize,
    /// The item's output, or its rendered error.
    pub result: Result<T, String>,
}

/// Aggregate counts for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed ({} total)",
            self.succeeded, self.failed, self.total
        )
    }
}

/// All outcomes of a batch run, in input order.
#[derive(Debug)]
pub struct BatchReport<T> {
    outcomes: Vec<BatchOutcome<T>>,
}

impl<T> BatchReport<T> {
    pub fn outcomes(&self) -> &[BatchOutcome<T>] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<BatchOutcome<T>> {
        self.outcomes
    }

    /// Number of items that completed successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.outcomes.len(),
            succeeded: self.succeeded(),
            failed: self.failed(),
        }
    }

    /// Successful outputs, in input order.
    pub fn successes(self) -> impl Iterator<Item = T> {
        self.outcomes.into_iter().filter_map(|o| o.result.ok())
    }
}

/// Run `pipeline` over every item with at most `concurrency` in flight.
pub async fn run_batch<I, T, E, F, Fut>(items: I, concurrency: usize, pipeline: F) -> BatchReport<T>
where
    I: IntoIterator,
    F: Fn(usize, I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let outcomes = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| {
            let work = pipeline(index, item);
            async move {
                let result = work.await.map_err(|e| format!("{e:#}"));
                if let Err(ref error) = result {
                    tracing::warn!(index, error = %error, "batch item failed");
                }
                BatchOutcome { index, result }
            }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let report = BatchReport { outcomes };
    tracing::info!(summary = %report.summary(), "batch complete");
    report
}
