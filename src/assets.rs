use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

/// One emitted build artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub filename: String,
    pub content: Vec<u8>,
    /// Where the artifact was read from, if it came from disk. Display only.
    pub source_path: Option<PathBuf>,
}

impl FileEntry {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            source_path: None,
        }
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Remote path the receiver should write this file to
    pub fn destination(&self, base: &str) -> String {
        join_destination(base, &self.filename)
    }

    pub fn display_source(&self) -> String {
        match &self.source_path {
            Some(path) => path.to_string_lossy().to_string(),
            None => self.filename.clone(),
        }
    }
}

/// Join the remote base path and an asset name with `/`, collapsing duplicate
/// separators at the seam.
pub fn join_destination(base: &str, filename: &str) -> String {
    let trimmed = base.trim_end_matches(['/', '\\']);
    let filename = filename.trim_start_matches(['/', '\\']);

    if base.is_empty() {
        return filename.to_string();
    }

    // A base made only of separators is the root.
    if trimmed.is_empty() {
        return format!("/{}", filename);
    }

    format!("{}/{}", trimmed, filename)
}

/// Read every regular file below `root` into a [`FileEntry`], named by its
/// `/`-separated path relative to `root`, sorted by name.
pub async fn collect_directory_assets(root: &Path) -> AppResult<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(AppError::validation(
            "output_dir",
            &format!("Not a directory: {}", root.display()),
        ));
    }

    let mut entries = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut read_dir = tokio::fs::read_dir(&dir).await?;

        while let Some(item) = read_dir.next_entry().await? {
            let path = item.path();
            let file_type = item.file_type().await?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let filename = relative_name(root, &path);
                let content = tokio::fs::read(&path).await?;
                entries.push(FileEntry::new(filename, content).with_source_path(path));
            } else {
                log::debug!("Skipping non-regular file {}", path.display());
            }
        }
    }

    entries.sort_by(|a, b| a.filename.cmp(&b.filename));
    log::debug!("Collected {} assets from {}", entries.len(), root.display());

    Ok(entries)
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
