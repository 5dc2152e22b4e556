use estudio_core::{
    GenerateRequest, Input, MediaSource, Message, Output, ResponseFormat, SafetyPolicy,
};
use estudio_error::GeminiErrorKind;
use estudio_models::gemini::{GeminiResponse, from_gemini_response, to_gemini_request};
use serde_json::json;

fn photo_request(format: ResponseFormat, safety: SafetyPolicy) -> anyhow::Result<GenerateRequest> {
    Ok(GenerateRequest::builder()
        .messages(vec![
            Message::system("Você é um assistente."),
            Message::user(vec![
                Input::Text("Descreva:".to_string()),
                Input::Image {
                    mime: Some("image/jpeg".to_string()),
                    source: MediaSource::Base64("/9j/4AAQ".to_string()),
                },
            ]),
        ])
        .temperature(0.4f32)
        .max_tokens(512u32)
        .response_format(format)
        .safety(safety)
        .build()?)
}

#[test]
fn test_json_request_body_shape() -> anyhow::Result<()> {
    let body = to_gemini_request(&photo_request(ResponseFormat::Json, SafetyPolicy::Standard)?)?;
    let value = serde_json::to_value(&body)?;

    assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Você é um assistente.");
    assert_eq!(value["contents"][0]["role"], "user");
    assert_eq!(value["contents"][0]["parts"][0]["text"], "Descreva:");
    assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["data"], "/9j/4AAQ");
    assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(value["generationConfig"]["maxOutputTokens"], 512);
    assert!(value.get("safetySettings").is_none());
    Ok(())
}

#[test]
fn test_image_request_relaxes_safety() -> anyhow::Result<()> {
    let body = to_gemini_request(&photo_request(ResponseFormat::Image, SafetyPolicy::Relaxed)?)?;
    let value = serde_json::to_value(&body)?;

    assert_eq!(value["generationConfig"]["responseModalities"], json!(["TEXT", "IMAGE"]));
    let settings = value["safetySettings"].as_array().cloned().unwrap_or_default();
    assert_eq!(settings.len(), 5);
    assert!(settings.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
    Ok(())
}

#[test]
fn test_text_and_image_parts_are_mapped() -> anyhow::Result<()> {
    let response: GeminiResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [
                {"text": "pensando", "thought": true},
                {"text": "Aqui está"},
                {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
            ]},
            "finishReason": "STOP"
        }]
    }))?;

    let mapped = from_gemini_response(&response)?;
    assert_eq!(mapped.outputs.len(), 2);
    assert_eq!(mapped.outputs[0], Output::Text("Aqui está".to_string()));
    assert_eq!(
        mapped.outputs[1],
        Output::Image {
            mime: Some("image/png".to_string()),
            data: vec![1, 2, 3]
        }
    );
    Ok(())
}

#[test]
fn test_blocked_prompt_is_reported() -> anyhow::Result<()> {
    let response: GeminiResponse =
        serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}}))?;
    let err = from_gemini_response(&response).unwrap_err();
    assert_eq!(err.kind, GeminiErrorKind::Blocked("SAFETY".to_string()));
    Ok(())
}

#[test]
fn test_safety_finish_without_parts_is_blocked() -> anyhow::Result<()> {
    let response: GeminiResponse = serde_json::from_value(json!({
        "candidates": [{"finishReason": "IMAGE_SAFETY"}]
    }))?;
    let err = from_gemini_response(&response).unwrap_err();
    assert!(matches!(err.kind, GeminiErrorKind::Blocked(_)));
    Ok(())
}

#[test]
fn test_no_candidates_is_empty_response() -> anyhow::Result<()> {
    let response: GeminiResponse = serde_json::from_value(json!({}))?;
    let err = from_gemini_response(&response).unwrap_err();
    assert_eq!(err.kind, GeminiErrorKind::EmptyResponse);
    Ok(())
}
