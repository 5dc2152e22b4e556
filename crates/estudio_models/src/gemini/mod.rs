//! Google Gemini integration.

mod client;
mod conversion;
mod dto;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
pub use conversion::{from_gemini_response, to_gemini_request};
pub use dto::{
    Candidate, Content, FileData, GeminiRequest, GeminiResponse, GenerationConfig, InlineData,
    Part, PromptFeedback, SafetySetting,
};
