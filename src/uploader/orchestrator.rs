use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::assets::FileEntry;
use crate::config::{validate_config, UploaderConfig};
use crate::errors::AppResult;

use super::client::UploadTransport;
use super::payload::UploadPayload;
use super::progress::{LogReporter, ProgressReporter};

/// Failure counts per filename, in first-failure order.
///
/// A filename is present only once it has failed at least once.
#[derive(Debug, Default, Clone)]
pub struct RetryLedger {
    counts: HashMap<String, u32>,
    order: Vec<String>,
}

impl RetryLedger {
    /// Count one more failure for `filename` and return the new count
    pub fn record_failure(&mut self, filename: &str) -> u32 {
        match self.counts.get_mut(filename) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.counts.insert(filename.to_string(), 1);
                self.order.push(filename.to_string());
                1
            }
        }
    }

    pub fn failures(&self, filename: &str) -> u32 {
        self.counts.get(filename).copied().unwrap_or(0)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.counts.contains_key(filename)
    }

    /// Filenames whose failure count went past `retry`
    pub fn exhausted(&self, retry: u32) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| self.failures(name) > retry)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.failures(name)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Pending,
    Succeeded,
    FailedPermanently,
}

#[derive(Debug, Clone)]
pub struct UploadTask {
    pub entry: FileEntry,
    pub attempts: u32,
    pub outcome: TaskOutcome,
}

impl UploadTask {
    fn new(entry: FileEntry) -> Self {
        Self {
            entry,
            attempts: 0,
            outcome: TaskOutcome::Pending,
        }
    }
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Files that passed the filter
    pub total: usize,
    pub succeeded: usize,
    /// Upload attempts made, retries included
    pub attempts: usize,
    /// Files that ran out of retries, in first-failure order
    pub failed: Vec<String>,
    pub elapsed: Duration,
}

impl RunResult {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Uploads a build's files in batches of `parallel`, retrying failures.
pub struct UploadOrchestrator {
    config: UploaderConfig,
    transport: Arc<dyn UploadTransport>,
    reporter: Arc<dyn ProgressReporter>,
}

impl UploadOrchestrator {
    pub fn new(config: UploaderConfig, transport: Arc<dyn UploadTransport>) -> AppResult<Self> {
        validate_config(&config)?;

        Ok(Self {
            config,
            transport,
            reporter: Arc::new(LogReporter),
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    pub async fn run(&self, entries: Vec<FileEntry>) -> RunResult {
        self.run_with_ledger(entries).await.0
    }

    /// Like [`run`](Self::run), also handing back the failure ledger.
    pub async fn run_with_ledger(&self, entries: Vec<FileEntry>) -> (RunResult, RetryLedger) {
        let start_time = Instant::now();
        let parallel = self.config.parallel;
        let retry = self.config.retry;

        let mut tasks: Vec<UploadTask> = entries
            .into_iter()
            .filter(|entry| self.config.test.should_process(&entry.filename))
            .map(UploadTask::new)
            .collect();
        let total = tasks.len();

        // Indices into `tasks`; grows at the back as failures are re-enqueued.
        let mut queue: Vec<usize> = (0..total).collect();
        let mut ledger = RetryLedger::default();
        let mut attempts = 0;
        let mut cursor = 0;
        let mut batch_number = 0;

        self.reporter.on_start(total);

        while cursor < queue.len() {
            let end = (cursor + parallel).min(queue.len());
            let batch: Vec<usize> = queue[cursor..end].to_vec();
            cursor = end;
            batch_number += 1;

            let filenames: Vec<String> = batch
                .iter()
                .map(|&index| tasks[index].entry.filename.clone())
                .collect();
            self.reporter.on_batch(batch_number, &filenames);

            // Join barrier: every attempt of this batch settles before the next starts.
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|&index| self.attempt(&tasks[index].entry)),
            )
            .await;

            for (&index, outcome) in batch.iter().zip(outcomes) {
                let task = &mut tasks[index];
                task.attempts += 1;
                attempts += 1;

                match outcome {
                    Ok(()) => task.outcome = TaskOutcome::Succeeded,
                    Err(e) => {
                        let failures = ledger.record_failure(&task.entry.filename);
                        if failures <= retry {
                            log::debug!(
                                "Attempt {} of {} failed: {}",
                                task.attempts,
                                task.entry.filename,
                                e
                            );
                            self.reporter.on_retry(&task.entry.filename, failures);
                            queue.push(index);
                        } else {
                            log::error!(
                                "Giving up on {} after {} attempts: {}",
                                task.entry.filename,
                                task.attempts,
                                e
                            );
                            task.outcome = TaskOutcome::FailedPermanently;
                        }
                    }
                }
            }
        }

        let failed = ledger.exhausted(retry);
        let succeeded = tasks
            .iter()
            .filter(|task| task.outcome == TaskOutcome::Succeeded)
            .count();

        let result = RunResult {
            total,
            succeeded,
            attempts,
            failed,
            elapsed: start_time.elapsed(),
        };

        self.reporter.on_finished(&result);
        (result, ledger)
    }

    async fn attempt(&self, entry: &FileEntry) -> AppResult<()> {
        let payload = UploadPayload::new(entry, &self.config.to).with_fields(&self.config.data);

        self.transport.post(&self.config.receiver, &payload).await?;
        self.reporter.on_uploaded(entry, &payload.destination);

        Ok(())
    }
}
