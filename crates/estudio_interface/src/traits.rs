//! Trait definitions for remote model drivers and their capabilities.

use crate::ModelMetadata;
use async_trait::async_trait;
use estudio_core::GenerateRequest;
use estudio_core::GenerateResponse;
use estudio_error::EstudioResult;

/// Core trait that every remote model backend implements.
///
/// Flows never talk to a provider directly; the executor receives a driver
/// and makes exactly one `generate` call per invocation.
#[async_trait]
pub trait EstudioDriver: Send + Sync {
    /// Generate model output given a multimodal request.
    async fn generate(&self, req: &GenerateRequest) -> EstudioResult<GenerateResponse>;

    /// Provider name (e.g., "gemini", "mock").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier.
    fn model_name(&self) -> &str;
}

/// Drivers that describe their capabilities.
pub trait Metadata: EstudioDriver {
    /// Get model metadata.
    fn metadata(&self) -> ModelMetadata;

    /// Maximum input context tokens.
    fn max_input_tokens(&self) -> usize {
        self.metadata().max_input_tokens
    }

    /// Maximum output tokens per request.
    fn max_output_tokens(&self) -> usize {
        self.metadata().max_output_tokens
    }
}
