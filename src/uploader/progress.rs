use crate::assets::FileEntry;
use crate::text::{current_time, strip_query, truncate_middle, DEFAULT_CUT_LIMIT};

use super::orchestrator::RunResult;

/// Write-only sink for run progress. Implementations must not panic; nothing
/// they do can change the outcome of a run.
pub trait ProgressReporter: Send + Sync {
    fn on_start(&self, _total: usize) {}

    fn on_batch(&self, _batch: usize, _filenames: &[String]) {}

    fn on_uploaded(&self, _entry: &FileEntry, _destination: &str) {}

    fn on_retry(&self, _filename: &str, _attempt: u32) {}

    fn on_finished(&self, _result: &RunResult) {}
}

/// Reports through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_start(&self, total: usize) {
        log::info!("-------- Uploading {} files --------", total);
    }

    fn on_batch(&self, batch: usize, filenames: &[String]) {
        log::debug!("Batch {}: {}", batch, filenames.join(", "));
    }

    fn on_uploaded(&self, entry: &FileEntry, destination: &str) {
        log::info!("{}", uploaded_line(entry, destination));
    }

    fn on_retry(&self, filename: &str, attempt: u32) {
        log::warn!("Upload error, will retry({}) file: {}", attempt, filename);
    }

    fn on_finished(&self, result: &RunResult) {
        if !result.failed.is_empty() {
            log::error!("Failed list:");
            for line in failed_lines(&result.failed) {
                log::error!("\t{}", line);
            }
        }

        log::info!("{}", summary_line(result));
    }
}

/// ` - HH:MM:SS <source> >> <destination>`
pub fn uploaded_line(entry: &FileEntry, destination: &str) -> String {
    let source = entry.display_source();

    format!(
        " - {} {} >> {}",
        current_time(),
        truncate_middle(strip_query(&source), DEFAULT_CUT_LIMIT),
        truncate_middle(strip_query(destination), DEFAULT_CUT_LIMIT)
    )
}

pub fn summary_line(result: &RunResult) -> String {
    format!(
        "Time: {}ms\tFiles: {}",
        result.elapsed.as_millis(),
        result.total
    )
}

/// Failed file names right-aligned to the longest one
pub fn failed_lines(failed: &[String]) -> Vec<String> {
    let width = failed
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);

    failed
        .iter()
        .map(|name| format!("{:>width$}", name, width = width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_failed_lines_are_right_aligned() {
        let failed = vec!["a.js".to_string(), "vendor/long.js".to_string()];
        let lines = failed_lines(&failed);
        assert_eq!(lines, vec!["          a.js", "vendor/long.js"]);
    }

    #[test]
    fn test_failed_lines_empty() {
        assert!(failed_lines(&[]).is_empty());
    }

    #[test]
    fn test_uploaded_line_strips_query_and_truncates() {
        let entry = FileEntry::new("app.js?v=1", Vec::new())
            .with_source_path(format!("/build/{}/app.js?v=1", "deep/".repeat(20)));
        let line = uploaded_line(&entry, "/srv/www/app.js?v=1");

        assert!(line.starts_with(" - "));
        assert!(line.ends_with(" >> /srv/www/app.js"));
        assert!(line.contains("..."));
        assert!(!line.contains("?v=1"));
    }

    #[test]
    fn test_summary_line() {
        let result = RunResult {
            total: 7,
            succeeded: 5,
            attempts: 9,
            failed: vec!["x.js".to_string()],
            elapsed: Duration::from_millis(1234),
        };
        assert_eq!(summary_line(&result), "Time: 1234ms\tFiles: 7");
    }
}
