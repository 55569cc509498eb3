use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::UploaderConfig;
use crate::errors::{AppError, AppResult};

use super::payload::UploadPayload;

/// Sends one upload attempt to the receiver.
///
/// Any `Err` is treated by the orchestrator as a failed attempt that consumes
/// one retry, whatever its cause.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn post(&self, receiver: &str, payload: &UploadPayload) -> AppResult<()>;
}

/// reqwest-backed receiver client
pub struct ReceiverClient {
    client: Client,
}

impl ReceiverClient {
    pub fn new(timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_config(config: &UploaderConfig) -> AppResult<Self> {
        Self::new(config.timeout_secs.map(Duration::from_secs))
    }
}

#[async_trait]
impl UploadTransport for ReceiverClient {
    async fn post(&self, receiver: &str, payload: &UploadPayload) -> AppResult<()> {
        let form = payload.build_form()?;

        log::debug!(
            "POST {} ({} bytes) -> {}",
            payload.filename,
            payload.data().len(),
            receiver
        );

        let response = self.client.post(receiver).multipart(form).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(AppError::upload_failed(format!(
            "Receiver responded {} for {}: {}",
            status,
            payload.filename,
            error_text.chars().take(200).collect::<String>()
        )))
    }
}
