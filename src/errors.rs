use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid receiver URL: {url}")]
    InvalidReceiver { url: String },

    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_receiver(url: &str) -> Self {
        Self::InvalidReceiver {
            url: url.to_string(),
        }
    }

    pub fn upload_failed(reason: impl Into<String>) -> Self {
        Self::UploadFailed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AppError::upload_failed("Receiver responded 502").to_string(),
            "Upload failed: Receiver responded 502"
        );
        assert_eq!(
            AppError::validation("parallel", "Must be at least 1").to_string(),
            "Validation error: parallel - Must be at least 1"
        );
        assert_eq!(
            AppError::invalid_receiver("ftp://host").to_string(),
            "Invalid receiver URL: ftp://host"
        );
    }
}
