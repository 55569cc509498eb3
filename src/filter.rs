use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::errors::AppResult;

/// Predicate signature accepted by [`FileFilter::Predicate`].
pub type FilenamePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Decides which emitted files get uploaded.
#[derive(Clone)]
pub enum FileFilter {
    Predicate(FilenamePredicate),
    Pattern(Regex),
    /// Neither a predicate nor a pattern was configured; nothing is uploaded.
    RejectAll,
}

impl FileFilter {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn pattern(pattern: &str) -> AppResult<Self> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Return true if the file should be uploaded
    pub fn should_process(&self, filename: &str) -> bool {
        match self {
            FileFilter::Predicate(predicate) => predicate(filename),
            FileFilter::Pattern(regex) => regex.is_match(filename),
            FileFilter::RejectAll => false,
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::RejectAll
    }
}

impl fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFilter::Predicate(_) => f.write_str("Predicate(<fn>)"),
            FileFilter::Pattern(regex) => write!(f, "Pattern({})", regex.as_str()),
            FileFilter::RejectAll => f.write_str("RejectAll"),
        }
    }
}
