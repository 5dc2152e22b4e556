//! Google Gemini REST client.
//!
//! Talks to `POST {base_url}/models/{model}:generateContent` directly so that
//! inline media, JSON mode, image output and per-request safety thresholds are
//! all available from one request type.
//!
//! # Example
//!
//! ```no_run
//! use estudio_core::{GenerateRequest, Input, Message};
//! use estudio_interface::EstudioDriver;
//! use estudio_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user(vec![Input::Text("Olá".to_string())])])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! # Ok(())
//! # }
//! ```

use super::conversion::{from_gemini_response, to_gemini_request};
use super::dto::GeminiResponse;
use async_trait::async_trait;
use estudio_core::{GenerateRequest, GenerateResponse};
use estudio_error::{EstudioResult, GeminiError, GeminiErrorKind};
use estudio_interface::{EstudioDriver, Metadata, ModelMetadata};
use reqwest::Client;
use std::env;
use tracing::{debug, instrument};

/// Default REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default text model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model_name: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from `GEMINI_API_KEY` with the default endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set or the HTTP client cannot
    /// be initialized.
    #[instrument(skip_all)]
    pub fn new() -> EstudioResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Self::with_settings(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL)
    }

    /// Create a client with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be
    /// initialized.
    #[instrument(skip(api_key))]
    pub fn with_settings(
        api_key: impl Into<String>,
        base_url: &str,
        model_name: &str,
    ) -> EstudioResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into());
        }
        let client = Client::builder()
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_name: model_name.to_string(),
        })
    }

    /// Endpoint for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl EstudioDriver for GeminiClient {
    #[instrument(skip(self, req), fields(model = tracing::field::Empty))]
    async fn generate(&self, req: &GenerateRequest) -> EstudioResult<GenerateResponse> {
        let model = req.model.as_deref().unwrap_or(&self.model_name);
        tracing::Span::current().record("model", model);

        let body = to_gemini_request(req)?;
        let url = self.endpoint(model);
        debug!(url = %url, format = ?req.response_format, "Sending Gemini API request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Ok(from_gemini_response(&parsed)?)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Metadata for GeminiClient {
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "gemini",
            model: self.model_name.clone(),
            max_input_tokens: 1_048_576,
            max_output_tokens: 65_536,
            supports_vision: true,
            supports_audio: true,
            supports_video: true,
            supports_image_output: self.model_name.contains("image"),
            supports_json_mode: true,
        }
    }
}

