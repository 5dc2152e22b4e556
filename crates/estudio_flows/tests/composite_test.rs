//! Tests for composite flows: step ordering, fan-out and failure propagation.

use estudio_core::{Platform, ThumbnailStyle};
use estudio_error::{ErrorCategory, GeminiErrorKind};
use estudio_flows::{
    CompositeFlow, FlowExecutor, FlowPhase, SeoFromMediaFlow, SeoFromMediaInput, ThumbnailPackFlow,
    ThumbnailPackInput,
};
use estudio_testing::fixtures::{AUDIO_DATA_URI, PHOTO_DATA_URI};
use estudio_testing::{MockDriver, MockResponse, prompt_text};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

fn pack_input() -> ThumbnailPackInput {
    ThumbnailPackInput {
        video_title: "Testei o café mais caro do Brasil".to_string(),
        description: None,
        style: ThumbnailStyle::Bold,
        character_photo_data_uri: Some(PHOTO_DATA_URI.to_string()),
        overlay_text: Some("VALE A PENA?".to_string()),
    }
}

fn seo_input() -> SeoFromMediaInput {
    SeoFromMediaInput {
        media_data_uri: AUDIO_DATA_URI.to_string(),
        language: Some("pt-BR".to_string()),
        video_topic: "Café especial".to_string(),
        platform: Platform::YouTube,
        niche: None,
    }
}

#[tokio::test]
async fn test_thumbnail_pack_builds_reference_then_both_variants() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::respond(|req| {
        let prompt = prompt_text(req);
        if prompt.contains("variante A") {
            MockResponse::png(&[0xA])
        } else if prompt.contains("variante B") {
            MockResponse::png(&[0xB])
        } else {
            MockResponse::png(&[0])
        }
    }));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let pack = ThumbnailPackFlow.run(&executor, pack_input(), None).await?;

    assert_eq!(driver.call_count(), 3);
    assert_eq!(pack.reference.image_data_uri, "data:image/png;base64,AA==");
    assert_eq!(pack.variant_a.image_data_uri, "data:image/png;base64,Cg==");
    assert_eq!(pack.variant_b.image_data_uri, "data:image/png;base64,Cw==");

    let requests = driver.requests();
    assert!(!prompt_text(&requests[0]).contains("variante"));
    Ok(())
}

#[tokio::test]
async fn test_thumbnail_pack_fails_when_one_variant_fails() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::respond(|req| {
        if prompt_text(req).contains("variante B") {
            MockResponse::Error(GeminiErrorKind::Blocked("IMAGE_SAFETY".to_string()))
        } else {
            MockResponse::png(&[1, 2, 3])
        }
    }));
    let executor = FlowExecutor::new(Arc::clone(&driver));
    let (tx, rx) = watch::channel(FlowPhase::Idle);

    let result = ThumbnailPackFlow.run(&executor, pack_input(), Some(&tx)).await;

    let err = result.expect_err("a failed variant must fail the pack");
    assert_eq!(err.category(), ErrorCategory::Remote);
    assert_eq!(*rx.borrow(), FlowPhase::Failed(ErrorCategory::Remote));
    Ok(())
}

#[tokio::test]
async fn test_thumbnail_pack_rejects_blank_title_without_calls() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::sequence(vec![]));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let mut input = pack_input();
    input.video_title = " ".to_string();
    let err = ThumbnailPackFlow
        .run(&executor, input, None)
        .await
        .expect_err("blank title must be rejected");

    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_seo_from_media_feeds_transcript_into_metadata() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::sequence(vec![
        MockResponse::json(json!({
            "transcript": "Hoje vou provar três cafés especiais.",
            "language": "pt-BR"
        })),
        MockResponse::json(json!({
            "title": "Provei 3 cafés especiais",
            "description": "Qual é o melhor? Conta nos comentários!",
            "tags": ["café", "café especial"],
            "hashtags": ["#café"]
        })),
    ]));
    let executor = FlowExecutor::new(Arc::clone(&driver));
    let (tx, rx) = watch::channel(FlowPhase::Idle);

    let pack = SeoFromMediaFlow.run(&executor, seo_input(), Some(&tx)).await?;

    assert_eq!(driver.call_count(), 2);
    assert_eq!(pack.transcript.language, "pt-BR");
    assert_eq!(pack.seo.title, "Provei 3 cafés especiais");
    assert!(prompt_text(&driver.requests()[1]).contains("Hoje vou provar três cafés especiais."));
    assert_eq!(*rx.borrow(), FlowPhase::Succeeded);
    Ok(())
}

#[tokio::test]
async fn test_failing_first_step_skips_later_steps() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::error(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "unavailable".to_string(),
    }));
    let executor = FlowExecutor::new(Arc::clone(&driver));

    let result = SeoFromMediaFlow.run(&executor, seo_input(), None).await;

    assert!(result.is_err());
    assert_eq!(driver.call_count(), 1);
    Ok(())
}
