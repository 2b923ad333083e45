//! Bounded-concurrency batch dispatch (C9).
//!
//! Every item is isolated: a panic or error in one item's work never
//! takes down the batch, and a missed deadline only ever marks that one
//! item, not the whole run. Results preserve the caller's input order
//! regardless of completion order.

use selscore_core::config::{defaults, env};
use selscore_core::error::SelError;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// What happened to one batch item.
#[derive(Debug)]
pub enum BatchOutcome<T> {
    Completed(T),
    Failed(SelError),
    DeadlineExceeded,
}

/// One item's outcome, tagged with its original position and id so the
/// caller can render results without re-deriving order.
#[derive(Debug)]
pub struct BatchItemResult<T> {
    pub index: usize,
    pub student_id: String,
    pub outcome: BatchOutcome<T>,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    pub max_concurrency: usize,
    pub deadline: Duration,
    pub max_ids: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: defaults::BATCH_MAX_CONCURRENCY,
            deadline: Duration::from_secs(defaults::BATCH_DEADLINE_SECS),
            max_ids: defaults::BATCH_MAX_IDS,
        }
    }
}

impl BatchConfig {
    /// Same as [`Self::default`] but reading the `SELSCORE_BATCH_*` env var
    /// overrides.
    pub fn from_env() -> Self {
        Self {
            max_concurrency: env::batch_max_concurrency(),
            deadline: Duration::from_secs(env::batch_deadline_secs()),
            max_ids: env::batch_max_ids(),
        }
    }
}

/// Error returned when the caller's request itself is malformed (too many
/// ids), distinct from a per-item outcome.
#[derive(Debug)]
pub struct BatchTooLarge {
    pub requested: usize,
    pub max_allowed: usize,
}

/// Run `work` for every id in `student_ids`, bounded to `config.max_concurrency`
/// concurrent items, with `config.deadline` applied to the whole batch.
/// `work` must be `Clone` (typically a small struct of `Arc`s) since each
/// item gets its own spawned task.
pub async fn dispatch<F, Fut, T>(
    student_ids: Vec<String>,
    config: BatchConfig,
    work: F,
) -> Result<Vec<BatchItemResult<T>>, BatchTooLarge>
where
    F: Fn(String) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<T, SelError>> + Send + 'static,
    T: Send + 'static,
{
    if student_ids.len() > config.max_ids {
        return Err(BatchTooLarge {
            requested: student_ids.len(),
            max_allowed: config.max_ids,
        });
    }

    let semaphore = Arc::new(Semaphore::new(config.max_concurrency));
    let deadline_instant = Instant::now() + config.deadline;

    let handles: Vec<_> = student_ids
        .into_iter()
        .enumerate()
        .map(|(index, student_id)| {
            let semaphore = Arc::clone(&semaphore);
            let work = work.clone();
            let id_for_task = student_id.clone();

            let task = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore never closed");
                work(id_for_task).await
            });

            (index, student_id, task)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (index, student_id, task) in handles {
        let abort_handle = task.abort_handle();
        let outcome = match tokio::time::timeout_at(deadline_instant.into(), task).await {
            Ok(Ok(Ok(value))) => BatchOutcome::Completed(value),
            Ok(Ok(Err(err))) => BatchOutcome::Failed(err),
            Ok(Err(join_err)) => BatchOutcome::Failed(SelError::Internal(format!(
                "batch item task panicked: {join_err}"
            ))),
            Err(_elapsed) => {
                // The item is still running past its deadline; stop it
                // rather than leaving it to burn the semaphore permit and
                // CPU time for a result nobody will read.
                abort_handle.abort();
                BatchOutcome::DeadlineExceeded
            }
        };
        results.push(BatchItemResult {
            index,
            student_id,
            outcome,
        });
    }

    Ok(results)
}
