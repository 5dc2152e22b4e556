//! Tests for the flow executor: validation gating, output checks, request
//! shape and phase reporting.

use estudio_core::{
    CommercialDuration, Input, ResponseFormat, Role, SafetyPolicy, ToneOfVoice,
};
use estudio_error::{ErrorCategory, EstudioErrorKind, FlowErrorKind, GeminiErrorKind, SchemaErrorKind};
use estudio_flows::{
    CharacterFromImageFlow, CharacterFromImageInput, CharacterPortraitFlow, CharacterPortraitInput,
    CommercialNarrationFlow, CommercialNarrationInput, FlowExecutor, FlowOverride, FlowPhase,
    FlowSchema, Narration, RefineCharacterFieldFlow, output_schema,
};
use estudio_testing::fixtures::{PHOTO_DATA_URI, character_profile_json};
use estudio_testing::{MockDriver, MockResponse, prompt_text};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

fn narration_input() -> CommercialNarrationInput {
    CommercialNarrationInput {
        product_name: "Café Serra Azul".to_string(),
        main_message: "O sabor da manhã mineira".to_string(),
        target_audience: "Adultos que amam café especial".to_string(),
        tone: ToneOfVoice::Inspiring,
        duration: CommercialDuration::Medium,
    }
}

#[tokio::test]
async fn test_blank_required_field_makes_no_remote_call() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(json!({"narration": "Olá"})));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let mut input = narration_input();
    input.main_message = String::new();

    let err = executor
        .run(&CommercialNarrationFlow, input)
        .await
        .expect_err("blank mainMessage must be rejected");

    assert_eq!(err.category(), ErrorCategory::Validation);
    let schema = err.as_schema().expect("schema error");
    assert_eq!(schema.field, "mainMessage");
    assert_eq!(schema.kind, SchemaErrorKind::Empty);
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_untyped_input_missing_field_makes_no_remote_call() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(json!({"narration": "Olá"})));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let err = executor
        .run_value(
            &CommercialNarrationFlow,
            json!({
                "productName": "Café Serra Azul",
                "targetAudience": "Adultos",
                "tone": "Inspirador",
                "duration": "30s"
            }),
        )
        .await
        .expect_err("missing mainMessage must be rejected");

    let schema = err.as_schema().expect("schema error");
    assert_eq!(schema.field, "mainMessage");
    assert_eq!(schema.kind, SchemaErrorKind::MissingField);
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_untyped_input_with_unknown_tone_is_rejected() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(json!({"narration": "Olá"})));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let err = executor
        .run_value(
            &CommercialNarrationFlow,
            json!({
                "productName": "Café Serra Azul",
                "mainMessage": "O sabor da manhã",
                "targetAudience": "Adultos",
                "tone": "Sarcástico",
                "duration": "30s"
            }),
        )
        .await
        .expect_err("unknown tone must be rejected");

    let schema = err.as_schema().expect("schema error");
    assert_eq!(schema.field, "tone");
    assert!(matches!(schema.kind, SchemaErrorKind::UnknownVariant { .. }));
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_valid_input_makes_exactly_one_call() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(json!({"narration": "Comece o dia com Serra Azul."})));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let output = executor.run(&CommercialNarrationFlow, narration_input()).await?;

    assert_eq!(output.narration, "Comece o dia com Serra Azul.");
    assert_eq!(driver.call_count(), 1);

    let prompt = driver.last_prompt().expect("request recorded");
    assert!(prompt.contains("30 segundos"));
    assert!(prompt.contains("Café Serra Azul"));
    assert!(prompt.contains("Inspirador"));
    assert!(!prompt.contains("{{"));
    Ok(())
}

#[tokio::test]
async fn test_same_input_and_response_give_identical_output() -> anyhow::Result<()> {
    let response = "```json\n{\"narration\": \"Comece o dia com Serra Azul.\"}\n```";
    let executor = FlowExecutor::new(Arc::new(MockDriver::text(response)));

    let first = executor.run(&CommercialNarrationFlow, narration_input()).await?;
    let second = executor.run(&CommercialNarrationFlow, narration_input()).await?;

    assert_eq!(serde_json::to_string(&first)?, serde_json::to_string(&second)?);
    Ok(())
}

#[tokio::test]
async fn test_invalid_output_is_a_remote_error() -> anyhow::Result<()> {
    let executor = FlowExecutor::new(Arc::new(MockDriver::json(json!({"narration": "  "}))));

    let err = executor
        .run(&CommercialNarrationFlow, narration_input())
        .await
        .expect_err("blank narration must be rejected");

    assert_eq!(err.category(), ErrorCategory::Remote);
    match err.kind() {
        EstudioErrorKind::Flow(flow) => {
            assert!(matches!(flow.kind, FlowErrorKind::InvalidOutput { .. }));
        }
        other => panic!("Expected InvalidOutput, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_response_without_json_is_a_remote_error() -> anyhow::Result<()> {
    let executor = FlowExecutor::new(Arc::new(MockDriver::text("Desculpe, não consigo ajudar.")));

    let err = executor
        .run(&CommercialNarrationFlow, narration_input())
        .await
        .expect_err("plain text must be rejected");

    assert_eq!(err.category(), ErrorCategory::Remote);
    Ok(())
}

#[tokio::test]
async fn test_empty_response_is_a_remote_error() -> anyhow::Result<()> {
    let driver = MockDriver::sequence(vec![MockResponse::Outputs(vec![])]);
    let executor = FlowExecutor::new(Arc::new(driver));

    let err = executor
        .run(&CommercialNarrationFlow, narration_input())
        .await
        .expect_err("empty response must fail");

    match err.kind() {
        EstudioErrorKind::Gemini(gemini) => assert_eq!(gemini.kind, GeminiErrorKind::EmptyResponse),
        other => panic!("Expected EmptyResponse, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_json_request_carries_field_guide_and_json_mode() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(json!({"narration": "Olá"})));
    let executor = FlowExecutor::new(Arc::clone(&driver)).with_models("texto-1", "imagem-1");

    executor.run(&CommercialNarrationFlow, narration_input()).await?;

    let request = driver.requests().pop().expect("request recorded");
    assert_eq!(request.response_format, ResponseFormat::Json);
    assert_eq!(request.model.as_deref(), Some("texto-1"));
    assert_eq!(request.safety, SafetyPolicy::Standard);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[1].role, Role::User);

    let system = request.messages[0].content[0].as_text().unwrap_or_default();
    assert!(system.contains("JSON"));
    assert!(system.contains("- narration (obrigatório)"));
    Ok(())
}

#[tokio::test]
async fn test_photo_flow_relaxes_safety_and_sends_media() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(character_profile_json()));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let profile = executor
        .run(
            &CharacterFromImageFlow,
            CharacterFromImageInput {
                photo_data_uri: PHOTO_DATA_URI.to_string(),
                niche: Some("Moda".to_string()),
                name_hint: None,
            },
        )
        .await?;

    assert_eq!(profile.name, "Luna");
    let request = driver.requests().pop().expect("request recorded");
    assert_eq!(request.safety, SafetyPolicy::Relaxed);
    assert!(
        request.messages[1]
            .content
            .iter()
            .any(|part| matches!(part, Input::Image { .. }))
    );
    Ok(())
}

#[tokio::test]
async fn test_overrides_apply_by_flow_name() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(character_profile_json()));
    let overrides = HashMap::from([(
        "character_from_image".to_string(),
        FlowOverride {
            temperature: Some(0.2),
            max_tokens: Some(512),
            relaxed_safety: Some(false),
        },
    )]);
    let executor = FlowExecutor::new(Arc::clone(&driver)).with_overrides(overrides);

    executor
        .run(
            &CharacterFromImageFlow,
            CharacterFromImageInput {
                photo_data_uri: PHOTO_DATA_URI.to_string(),
                niche: None,
                name_hint: None,
            },
        )
        .await?;

    let request = driver.requests().pop().expect("request recorded");
    assert_eq!(request.temperature, Some(0.2));
    assert_eq!(request.max_tokens, Some(512));
    assert_eq!(request.safety, SafetyPolicy::Standard);
    Ok(())
}

#[tokio::test]
async fn test_image_flow_returns_data_uri() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::sequence(vec![MockResponse::png(&[1, 2, 3])]));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let image = executor
        .run(
            &CharacterPortraitFlow,
            CharacterPortraitInput {
                character: serde_json::from_value(character_profile_json())?,
                style: None,
            },
        )
        .await?;

    assert_eq!(image.image_data_uri, "data:image/png;base64,AQID");
    let request = driver.requests().pop().expect("request recorded");
    assert_eq!(request.response_format, ResponseFormat::Image);
    Ok(())
}

#[tokio::test]
async fn test_image_flow_without_image_is_missing_media() -> anyhow::Result<()> {
    let executor = FlowExecutor::new(Arc::new(MockDriver::text("Não posso gerar essa imagem.")));

    let err = executor
        .run(
            &CharacterPortraitFlow,
            CharacterPortraitInput {
                character: serde_json::from_value(character_profile_json())?,
                style: None,
            },
        )
        .await
        .expect_err("text-only response must fail");

    match err.kind() {
        EstudioErrorKind::Gemini(gemini) => {
            assert!(matches!(gemini.kind, GeminiErrorKind::MissingMedia(_)))
        }
        other => panic!("Expected MissingMedia, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_refine_field_prompt_names_the_field() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::json(json!({"value": "Divertida e curiosa"})));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let refined = executor
        .run_value(
            &RefineCharacterFieldFlow,
            json!({
                "character": character_profile_json(),
                "field": "personality",
                "instruction": "mais bem-humorada"
            }),
        )
        .await?;

    assert_eq!(refined.value, "Divertida e curiosa");
    let prompt = prompt_text(&driver.requests()[0]);
    assert!(prompt.contains("\"personalidade\""));
    assert!(prompt.contains("Extrovertida e acolhedora"));
    assert!(prompt.contains("mais bem-humorada"));
    Ok(())
}

#[tokio::test]
async fn test_phases_end_in_terminal_state() -> anyhow::Result<()> {
    let (tx, rx) = watch::channel(FlowPhase::Idle);

    let executor = FlowExecutor::new(Arc::new(MockDriver::json(json!({"narration": "Olá"}))));
    executor
        .run_observed(&CommercialNarrationFlow, narration_input(), Some(&tx))
        .await?;
    assert_eq!(*rx.borrow(), FlowPhase::Succeeded);

    let failing = FlowExecutor::new(Arc::new(MockDriver::error(GeminiErrorKind::ApiRequest(
        "connection reset".to_string(),
    ))));
    let result = failing
        .run_observed(&CommercialNarrationFlow, narration_input(), Some(&tx))
        .await;
    assert!(result.is_err());
    assert_eq!(*rx.borrow(), FlowPhase::Failed(ErrorCategory::Remote));
    assert!(rx.borrow().is_terminal());
    Ok(())
}

#[test]
fn test_output_schema_lists_required_fields() {
    let schema = output_schema(&CommercialNarrationFlow);
    let required = schema["input"]["required"]
        .as_array()
        .expect("input schema has required fields");
    assert!(required.contains(&json!("mainMessage")));
    assert!(schema["output"]["properties"].get("narration").is_some());
    assert_eq!(schema["output"], Narration::schema_value());
    assert!(CommercialNarrationInput::field_guide().contains("mainMessage (obrigatório)"));
}
