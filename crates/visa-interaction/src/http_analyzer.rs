//! HttpAnalyzer - REST client for the visa analyzer service.
//!
//! Sends one POST per user turn to the `analyze-message` route and folds
//! every failure into an [`AnalyzeResult::Error`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use visa_core::analysis::{AnalyzeResult, Analyzer};
use visa_core::config::ClientConfig;
use visa_core::conversation::Attachment;
use visa_core::error::{Result, VisaError};

use crate::wire::{self, AnalyzeRequest};

/// Analyzer implementation that talks to the analyzer over HTTP.
///
/// The underlying client keeps a cookie store, so the analyzer's session
/// cookie is sent back on every turn and the analyzer can accumulate the
/// passport and destination across messages.
#[derive(Clone)]
pub struct HttpAnalyzer {
    client: Client,
    endpoint: String,
}

impl HttpAnalyzer {
    /// Creates an analyzer from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = {
            let builder = builder.cookie_store(true);
            match &config.user_agent {
                Some(agent) => builder.user_agent(agent.clone()),
                None => builder.user_agent(concat!("visa-assistant/", env!("CARGO_PKG_VERSION"))),
            }
        };

        let client = builder
            .build()
            .map_err(|err| VisaError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self::with_client(client, config.endpoint.clone()))
    }

    /// Creates an analyzer around an existing client.
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one turn to the analyzer.
    ///
    /// Never fails: transport and decoding problems come back as
    /// [`AnalyzeResult::Error`] carrying a description of what went wrong.
    pub async fn analyze_message(&self, content: &str, file: Option<&Attachment>) -> AnalyzeResult {
        match self.exchange(content, file).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!("analyze_message error: {}", err);
                AnalyzeResult::error(describe(&err))
            }
        }
    }

    async fn exchange(&self, content: &str, file: Option<&Attachment>) -> Result<AnalyzeResult> {
        let request = self.client.post(&self.endpoint);
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        let request = match file {
            Some(file) => {
                tracing::debug!(
                    file_name = file.file_name(),
                    content_type = file.content_type(),
                    len = file.len(),
                    "Sending multipart turn"
                );
                request.multipart(wire::multipart_form(content, file)?)
            }
            None => {
                tracing::debug!("Sending JSON turn");
                request.json(&AnalyzeRequest { message: content })
            }
        };

        let response = request
            .send()
            .await
            .map_err(|err| VisaError::transport(format!("Analyzer request failed: {err}")))?;

        decode_response(response).await
    }
}

async fn decode_response(response: Response) -> Result<AnalyzeResult> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let body = response
        .text()
        .await
        .map_err(|err| VisaError::transport(format!("Failed to read analyzer response: {err}")))?;

    if !wire::is_json_content_type(&content_type) {
        tracing::warn!(
            %status,
            content_type = %content_type,
            "Analyzer answered without a JSON body"
        );
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or(status.as_str()).to_string()
        } else {
            body
        };
        return Ok(AnalyzeResult::error(message));
    }

    if !status.is_success() {
        tracing::warn!(%status, "Analyzer answered with a non-success status");
    }

    // The body's own status wins over the HTTP status code.
    wire::decode_json_body(&body)
}

fn describe(err: &VisaError) -> String {
    match err {
        VisaError::Transport(message) | VisaError::Decode(message) => message.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, content: &str, file: Option<Arc<Attachment>>) -> Result<AnalyzeResult> {
        Ok(self.analyze_message(content, file.as_deref()).await)
    }
}
