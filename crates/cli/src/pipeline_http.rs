//! HTTP client for the external pipeline engine.
//!
//! The engine is an external collaborator; this adapter POSTs each decoded
//! event to its endpoint and maps the response status onto the pipeline
//! completion contract. No retries — a failed run nacks the message and the
//! transport redelivers.

use async_trait::async_trait;
use relay::{Pipeline, PipelineError};
use reqwest::Url;
use serde_json::Value;

/// [`Pipeline`] implementation over HTTP.
pub struct HttpPipeline {
    client: reqwest::Client,
    url: Url,
}

impl HttpPipeline {
    /// Creates a pipeline client targeting `url`.
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Pipeline for HttpPipeline {
    async fn run(&self, event: Value) -> Result<(), PipelineError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&event)
            .send()
            .await
            .map_err(|e| PipelineError::with_source("pipeline request failed", e))?;
        response
            .error_for_status()
            .map_err(|e| PipelineError::with_source("pipeline returned an error status", e))?;
        Ok(())
    }
}
