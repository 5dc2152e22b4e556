//! Conversion between Estúdio request/response types and Gemini REST DTOs.

use super::dto::{
    Content, FileData, GeminiRequest, GeminiResponse, GenerationConfigBuilder, InlineData, Part,
    SafetySetting,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use estudio_core::{
    GenerateRequest, GenerateResponse, Input, MediaSource, Output, ResponseFormat, Role,
    SafetyPolicy,
};
use estudio_error::{BuilderError, BuilderErrorKind, GeminiError, GeminiErrorKind};
use estudio_interface::FinishReason;
use tracing::{debug, warn};

const HARM_CATEGORIES: [&str; 5] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_CIVIC_INTEGRITY",
];

fn media_part(mime: &Option<String>, source: &MediaSource, fallback_mime: &str) -> Part {
    let mime_type = mime.clone().unwrap_or_else(|| fallback_mime.to_string());
    match source {
        MediaSource::Base64(data) => Part::from_inline(InlineData::new(mime_type, data.clone())),
        MediaSource::Binary(bytes) => Part::from_inline(InlineData::new(mime_type, STANDARD.encode(bytes))),
        MediaSource::Url(url) => Part::from_file(FileData::new(Some(mime_type), url.clone())),
    }
}

fn to_part(input: &Input) -> Part {
    match input {
        Input::Text(text) => Part::from_text(text.clone()),
        Input::Image { mime, source } => media_part(mime, source, "image/png"),
        Input::Audio { mime, source } => media_part(mime, source, "audio/mpeg"),
        Input::Video { mime, source } => media_part(mime, source, "video/mp4"),
        Input::Document { mime, source, .. } => media_part(mime, source, "application/pdf"),
    }
}

/// Build the REST body for a request.
///
/// System messages are merged into `systemInstruction`; the rest become
/// `contents` in order.
pub fn to_gemini_request(req: &GenerateRequest) -> Result<GeminiRequest, BuilderError> {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in &req.messages {
        let parts: Vec<Part> = message.content.iter().map(to_part).collect();
        match message.role {
            Role::System => system_parts.extend(parts),
            Role::User => contents.push(Content::new(Some("user".to_string()), parts)),
            Role::Model => contents.push(Content::new(Some("model".to_string()), parts)),
        }
    }

    let mut config = GenerationConfigBuilder::default();
    if let Some(temperature) = req.temperature {
        config.temperature(temperature);
    }
    if let Some(max_tokens) = req.max_tokens {
        config.max_output_tokens(max_tokens);
    }
    match req.response_format {
        ResponseFormat::Text => {}
        ResponseFormat::Json => {
            config.response_mime_type("application/json");
        }
        ResponseFormat::Image => {
            config.response_modalities(vec!["TEXT".to_string(), "IMAGE".to_string()]);
        }
    }
    let config = config
        .build()
        .map_err(|e| BuilderError::new(BuilderErrorKind::ValidationFailed(e.to_string())))?;

    let safety_settings = match req.safety {
        SafetyPolicy::Standard => Vec::new(),
        SafetyPolicy::Relaxed => HARM_CATEGORIES
            .iter()
            .map(|category| SafetySetting::new(*category, "BLOCK_NONE"))
            .collect(),
    };

    let system_instruction = if system_parts.is_empty() {
        None
    } else {
        Some(Content::new(None, system_parts))
    };

    GeminiRequest::builder()
        .contents(contents)
        .system_instruction(system_instruction)
        .generation_config(Some(config))
        .safety_settings(safety_settings)
        .build()
        .map_err(|e| BuilderError::new(BuilderErrorKind::ValidationFailed(e.to_string())))
}

/// Map a REST response onto Estúdio outputs.
///
/// Blocked prompts and safety-filtered candidates become
/// [`GeminiErrorKind::Blocked`]; a response without any usable part becomes
/// [`GeminiErrorKind::EmptyResponse`].
pub fn from_gemini_response(response: &GeminiResponse) -> Result<GenerateResponse, GeminiError> {
    if let Some(reason) = response
        .prompt_feedback()
        .as_ref()
        .and_then(|feedback| feedback.block_reason().clone())
    {
        warn!(reason = %reason, "Prompt blocked by safety filters");
        return Err(GeminiError::new(GeminiErrorKind::Blocked(reason)));
    }

    let candidate = response
        .candidates()
        .first()
        .ok_or_else(|| GeminiError::new(GeminiErrorKind::EmptyResponse))?;

    let finish = candidate
        .finish_reason()
        .as_deref()
        .map(FinishReason::from_provider);

    let mut outputs = Vec::new();
    if let Some(content) = candidate.content() {
        for part in content.parts().iter().filter(|part| !part.is_thought()) {
            if let Some(text) = part.text() {
                outputs.push(Output::Text(text.clone()));
            } else if let Some(inline) = part.inline_data() {
                let data = STANDARD
                    .decode(inline.data())
                    .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;
                let mime = Some(inline.mime_type().clone());
                if inline.mime_type().starts_with("audio/") {
                    outputs.push(Output::Audio { mime, data });
                } else {
                    outputs.push(Output::Image { mime, data });
                }
            }
        }
    }

    debug!(parts = outputs.len(), finish = ?finish, "Parsed Gemini candidate");

    if outputs.is_empty() {
        if finish == Some(FinishReason::ContentFilter) {
            let reason = candidate.finish_reason().clone().unwrap_or_default();
            warn!(reason = %reason, "Candidate blocked by safety filters");
            return Err(GeminiError::new(GeminiErrorKind::Blocked(reason)));
        }
        return Err(GeminiError::new(GeminiErrorKind::EmptyResponse));
    }

    Ok(GenerateResponse { outputs })
}
