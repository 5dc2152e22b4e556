//! Scripted model driver.

use async_trait::async_trait;
use estudio_core::{GenerateRequest, GenerateResponse, Output};
use estudio_error::{EstudioError, EstudioResult, GeminiError, GeminiErrorKind};
use estudio_interface::{EstudioDriver, Metadata, ModelMetadata};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A single scripted response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// One text part
    Text(String),
    /// One image part
    Image {
        /// MIME type
        mime: String,
        /// Image bytes
        data: Vec<u8>,
    },
    /// Arbitrary parts
    Outputs(Vec<Output>),
    /// A remote failure
    Error(GeminiErrorKind),
}

impl MockResponse {
    /// Text response holding a JSON document.
    pub fn json(value: serde_json::Value) -> Self {
        MockResponse::Text(value.to_string())
    }

    /// A small PNG-typed image.
    pub fn png(data: &[u8]) -> Self {
        MockResponse::Image {
            mime: "image/png".to_string(),
            data: data.to_vec(),
        }
    }

    fn into_result(self) -> EstudioResult<GenerateResponse> {
        match self {
            MockResponse::Text(text) => Ok(GenerateResponse {
                outputs: vec![Output::Text(text)],
            }),
            MockResponse::Image { mime, data } => Ok(GenerateResponse {
                outputs: vec![Output::Image {
                    mime: Some(mime),
                    data,
                }],
            }),
            MockResponse::Outputs(outputs) => Ok(GenerateResponse { outputs }),
            MockResponse::Error(kind) => Err(EstudioError::from(GeminiError::new(kind))),
        }
    }
}

type Responder = Arc<dyn Fn(&GenerateRequest) -> MockResponse + Send + Sync>;

/// How the mock answers.
#[derive(Clone)]
pub enum MockBehavior {
    /// Same response for every call
    Always(MockResponse),
    /// Responses in call order; calls past the end fail
    Sequence(Vec<MockResponse>),
    /// Response computed from the request
    Respond(Responder),
}

impl std::fmt::Debug for MockBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MockBehavior::Always(response) => f.debug_tuple("Always").field(response).finish(),
            MockBehavior::Sequence(responses) => {
                f.debug_tuple("Sequence").field(responses).finish()
            }
            MockBehavior::Respond(_) => f.write_str("Respond(..)"),
        }
    }
}

/// Model driver that replays scripted responses and records every request.
///
/// # Examples
///
/// ```
/// use estudio_core::GenerateRequest;
/// use estudio_interface::EstudioDriver;
/// use estudio_testing::MockDriver;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mock = MockDriver::text("olá");
/// let response = mock.generate(&GenerateRequest::default()).await.unwrap();
/// assert_eq!(response.text().as_deref(), Some("olá"));
/// assert_eq!(mock.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockDriver {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
    delay: Option<Duration>,
    model_name: String,
}

impl MockDriver {
    /// Create a mock with custom behavior.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            model_name: "mock-gemini".to_string(),
        }
    }

    /// Always answer with the given text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Always(MockResponse::Text(text.into())))
    }

    /// Always answer with the given JSON document.
    pub fn json(value: serde_json::Value) -> Self {
        Self::new(MockBehavior::Always(MockResponse::json(value)))
    }

    /// Always fail with the given error.
    pub fn error(kind: GeminiErrorKind) -> Self {
        Self::new(MockBehavior::Always(MockResponse::Error(kind)))
    }

    /// Answer with a sequence of responses.
    pub fn sequence(responses: Vec<MockResponse>) -> Self {
        Self::new(MockBehavior::Sequence(responses))
    }

    /// Compute each response from its request.
    pub fn respond<F>(responder: F) -> Self
    where
        F: Fn(&GenerateRequest) -> MockResponse + Send + Sync + 'static,
    {
        Self::new(MockBehavior::Respond(Arc::new(responder)))
    }

    /// Wait before answering, to exercise cancellation and timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Copies of every request received, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Text of every part of the last request, joined.
    pub fn last_prompt(&self) -> Option<String> {
        self.requests().last().map(prompt_text)
    }

    fn next_response(&self, req: &GenerateRequest) -> EstudioResult<GenerateResponse> {
        let current = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req.clone());

        let response = match &self.behavior {
            MockBehavior::Always(response) => response.clone(),
            MockBehavior::Sequence(responses) => match responses.get(current) {
                Some(response) => response.clone(),
                None => MockResponse::Error(GeminiErrorKind::ApiRequest(format!(
                    "Mock sequence exhausted (call {} beyond {} responses)",
                    current + 1,
                    responses.len()
                ))),
            },
            MockBehavior::Respond(responder) => responder(req),
        };
        response.into_result()
    }
}

/// All text parts of a request, system instruction included, joined by newlines.
pub fn prompt_text(req: &GenerateRequest) -> String {
    req.messages
        .iter()
        .flat_map(|message| message.content.iter())
        .filter_map(|input| input.as_text())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl EstudioDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> EstudioResult<GenerateResponse> {
        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        tracing::debug!(call = self.call_count() + 1, "Mock driver answering");
        self.next_response(req)
    }

    fn provider_name(&self) -> &'static str {
        "mock-gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Metadata for MockDriver {
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "mock-gemini",
            model: self.model_name.clone(),
            max_input_tokens: 1_048_576,
            max_output_tokens: 8192,
            supports_vision: true,
            supports_audio: true,
            supports_video: true,
            supports_image_output: true,
            supports_json_mode: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sequence() {
        let mock = MockDriver::sequence(vec![
            MockResponse::Text("first".to_string()),
            MockResponse::Error(GeminiErrorKind::HttpError {
                status_code: 429,
                message: "Rate limit".to_string(),
            }),
        ]);
        let request = GenerateRequest::default();

        let response = mock.generate(&request).await.unwrap();
        assert_eq!(response.text().as_deref(), Some("first"));
        assert!(mock.generate(&request).await.is_err());
        assert!(mock.generate(&request).await.is_err());
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_image() {
        let mock = MockDriver::new(MockBehavior::Always(MockResponse::png(&[1, 2, 3])));
        let response = mock.generate(&GenerateRequest::default()).await.unwrap();
        assert!(response.first_image().is_some());
        assert_eq!(mock.metadata().provider, "mock-gemini");
    }
}
