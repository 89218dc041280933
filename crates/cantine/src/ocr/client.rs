//! HTTP client for the Docupipe OCR / table-extraction service.

use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use reqwest::blocking::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::response::{PollResponse, SubmitRequest, SubmitResponse};
use super::OcrService;
use crate::config::OcrConfig;
use crate::error::{OcrError, Result as CantineResult};
use crate::secrets;

pub const DEFAULT_BASE_URL: &str = "https://app.docupipe.ai";

/// Maximum length for error bodies kept in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 200;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "X-API-Key";

fn truncate_error_body(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY_LENGTH {
        let truncated: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
        format!("{}... (truncated)", truncated)
    } else {
        body.to_string()
    }
}

pub struct DocupipeClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl DocupipeClient {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        request_timeout: Duration,
    ) -> Result<Self, OcrError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| OcrError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Builds a client from the `ocr` config block, resolving the API key.
    pub fn from_config(config: &OcrConfig) -> CantineResult<Self> {
        let api_key = secrets::resolve_api_key(config)?;
        let client = Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn documents_endpoint(&self) -> String {
        format!("{}/documents", self.base_url)
    }

    fn document_endpoint(&self, document_id: &str) -> String {
        format!("{}/documents/{}", self.base_url, document_id)
    }

    fn check_status(endpoint: &str, response: Response) -> Result<Response, OcrError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(OcrError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: truncate_error_body(&body),
        })
    }
}

impl OcrService for DocupipeClient {
    fn submit(&self, filename: &str, data: &[u8]) -> Result<String, OcrError> {
        let endpoint = self.documents_endpoint();
        let request = SubmitRequest {
            filename,
            data: general_purpose::STANDARD.encode(data),
        };

        debug!(filename, bytes = data.len(), "Submitting image for extraction");

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&request)
            .send()
            .map_err(|e| OcrError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let submitted: SubmitResponse = Self::check_status(&endpoint, response)?
            .json()
            .map_err(|e| OcrError::Decode {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Ok(submitted.id)
    }

    fn poll(&self, document_id: &str) -> Result<PollResponse, OcrError> {
        let endpoint = self.document_endpoint(document_id);

        let response = self
            .client
            .get(&endpoint)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .map_err(|e| OcrError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Self::check_status(&endpoint, response)?
            .json()
            .map_err(|e| OcrError::Decode {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })
    }
}
