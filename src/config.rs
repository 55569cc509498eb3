use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::filter::FileFilter;

pub const DEFAULT_PARALLEL: usize = 3;
pub const DEFAULT_RETRY: u32 = 3;

/// Scalar value sent as an extra multipart text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Settings for one upload run
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub test: FileFilter,
    pub receiver: String,
    pub to: String,
    pub data: BTreeMap<String, FieldValue>,
    pub parallel: usize,
    pub retry: u32,
    pub timeout_secs: Option<u64>,
}

impl UploaderConfig {
    pub fn new(test: FileFilter, receiver: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            test,
            receiver: receiver.into(),
            to: to.into(),
            data: BTreeMap::new(),
            parallel: DEFAULT_PARALLEL,
            retry: DEFAULT_RETRY,
            timeout_secs: None,
        }
    }

    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// On-disk shape of the configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub test: serde_json::Value,
    pub receiver: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub data: BTreeMap<String, FieldValue>,
    #[serde(default = "default_parallel")]
    pub parallel: usize,
    #[serde(default = "default_retry")]
    pub retry: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_parallel() -> usize {
    DEFAULT_PARALLEL
}

fn default_retry() -> u32 {
    DEFAULT_RETRY
}

impl TryFrom<ConfigFile> for UploaderConfig {
    type Error = AppError;

    fn try_from(file: ConfigFile) -> AppResult<Self> {
        let test = match &file.test {
            serde_json::Value::String(pattern) => FileFilter::pattern(pattern)?,
            other => {
                log::warn!(
                    "Filter `test` is not a pattern string ({}), no files will be uploaded",
                    other
                );
                FileFilter::RejectAll
            }
        };

        Ok(UploaderConfig {
            test,
            receiver: file.receiver,
            to: file.to,
            data: file.data,
            parallel: file.parallel,
            retry: file.retry,
            timeout_secs: file.timeout_secs,
        })
    }
}

pub fn get_default_config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("Could not find config directory".to_string()))?
        .join("artifact-uploader");

    Ok(config_dir.join("config.json"))
}

pub fn parse_config(config_str: &str) -> AppResult<UploaderConfig> {
    let file: ConfigFile = serde_json::from_str(config_str)?;
    let config = UploaderConfig::try_from(file)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_config(path: &Path) -> AppResult<UploaderConfig> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let config_str = fs::read_to_string(path)?;
    let config = parse_config(&config_str)?;

    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

pub fn validate_config(config: &UploaderConfig) -> AppResult<()> {
    if config.parallel == 0 {
        return Err(AppError::validation("parallel", "Must be at least 1"));
    }

    let receiver = config.receiver.trim();
    if receiver.is_empty() {
        return Err(AppError::validation("receiver", "Receiver URL cannot be empty"));
    }

    match Url::parse(receiver) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => return Err(AppError::invalid_receiver(receiver)),
    }

    if config.timeout_secs == Some(0) {
        return Err(AppError::validation("timeout_secs", "Must be greater than 0"));
    }

    if config.data.contains_key("file") || config.data.contains_key("to") {
        return Err(AppError::validation(
            "data",
            "Fields `file` and `to` are reserved",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> UploaderConfig {
        UploaderConfig::new(
            FileFilter::pattern(r"\.js$").unwrap(),
            "http://127.0.0.1:8210/receiver",
            "/var/www/static",
        )
    }

    #[test]
    fn test_defaults() {
        let config = base_config();
        assert_eq!(config.parallel, 3);
        assert_eq!(config.retry, 3);
        assert!(config.data.is_empty());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_parallel_rejected() {
        let config = base_config().with_parallel(0);
        assert!(matches!(
            validate_config(&config),
            Err(AppError::Validation { ref field, .. }) if field == "parallel"
        ));
    }

    #[test]
    fn test_zero_retry_allowed() {
        assert!(validate_config(&base_config().with_retry(0)).is_ok());
    }

    #[test]
    fn test_receiver_must_be_http() {
        let mut config = base_config();
        config.receiver = "ftp://example.com/upload".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(AppError::InvalidReceiver { .. })
        ));

        config.receiver = "   ".to_string();
        assert!(validate_config(&config).is_err());

        config.receiver = "not a url".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_reserved_data_fields_rejected() {
        let config = base_config().with_data("to", "/elsewhere");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_config_with_defaults() {
        let config = parse_config(
            r#"{
                "test": "\\.(js|css)$",
                "receiver": "https://deploy.example.com/receiver",
                "to": "/home/work/static",
                "data": { "token": "abc", "build": 42, "dry": false }
            }"#,
        )
        .unwrap();

        assert_eq!(config.parallel, 3);
        assert_eq!(config.retry, 3);
        assert!(config.test.should_process("app.css"));
        assert!(!config.test.should_process("app.html"));
        assert_eq!(config.data.get("build"), Some(&FieldValue::Integer(42)));
        assert_eq!(config.data.get("token").unwrap().to_string(), "abc");
        assert_eq!(config.data.get("dry").unwrap().to_string(), "false");
    }

    #[test]
    fn test_parse_config_non_pattern_test_rejects_all() {
        let config = parse_config(
            r#"{ "test": 17, "receiver": "http://localhost/r", "parallel": 5, "retry": 0 }"#,
        )
        .unwrap();

        assert!(matches!(config.test, FileFilter::RejectAll));
        assert!(!config.test.should_process("main.js"));
        assert_eq!(config.parallel, 5);
        assert_eq!(config.retry, 0);
    }

    #[test]
    fn test_parse_config_negative_values_rejected() {
        let result = parse_config(
            r#"{ "test": ".*", "receiver": "http://localhost/r", "parallel": -1 }"#,
        );
        assert!(matches!(result, Err(AppError::Json(_))));

        let result = parse_config(
            r#"{ "test": ".*", "receiver": "http://localhost/r", "retry": 1.5 }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_invalid_pattern() {
        let result = parse_config(r#"{ "test": "[a-", "receiver": "http://localhost/r" }"#);
        assert!(matches!(result, Err(AppError::Pattern(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let path = std::env::temp_dir().join("artifact_uploader_missing_config.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join("artifact_uploader_test_config.json");
        std::fs::write(
            &path,
            r#"{ "test": "\\.js$", "receiver": "http://localhost:8080/receiver", "to": "/srv" }"#,
        )
        .unwrap();

        let result = load_config(&path);
        let _ = std::fs::remove_file(&path);

        let config = result.unwrap();
        assert_eq!(config.to, "/srv");
        assert_eq!(config.receiver, "http://localhost:8080/receiver");
    }
}
