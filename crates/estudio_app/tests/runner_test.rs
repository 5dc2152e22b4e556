//! Feature status and cancellation across concurrent actions.

use estudio_app::{CharacterBuilder, FeatureContext, FeatureStatus};
use estudio_error::ErrorCategory;
use estudio_flows::{CharacterFromIdeaInput, FlowExecutor};
use estudio_gallery::Gallery;
use estudio_testing::MockDriver;
use estudio_testing::fixtures::character_profile_json;
use std::sync::Arc;
use std::time::Duration;

fn builder(delay: Duration, timeout: Option<Duration>) -> (Arc<MockDriver>, CharacterBuilder<MockDriver>) {
    let driver = Arc::new(MockDriver::json(character_profile_json()).with_delay(delay));
    let context = FeatureContext::new(FlowExecutor::new(Arc::clone(&driver)), Gallery::in_memory())
        .with_timeout(timeout);
    (driver, CharacterBuilder::new(context))
}

fn input() -> CharacterFromIdeaInput {
    CharacterFromIdeaInput {
        niche: "Culinária".to_string(),
        idea: None,
        gender: None,
        age_range: None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_actions_are_not_coalesced() -> anyhow::Result<()> {
    let (driver, builder) = builder(Duration::from_secs(5), None);
    let mut status = builder.runner().subscribe();

    let first = tokio::spawn({
        let builder = builder.clone();
        async move { builder.from_idea(input()).await }
    });
    let second = tokio::spawn({
        let builder = builder.clone();
        async move { builder.from_idea(input()).await }
    });

    status
        .wait_for(|s| *s == FeatureStatus::Loading { in_flight: 2 })
        .await?;

    let a = first.await??;
    let b = second.await??;
    assert_ne!(a.id, b.id);
    assert_eq!(driver.call_count(), 2);
    assert_eq!(builder.status(), FeatureStatus::Ready);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_cancels_in_flight() -> anyhow::Result<()> {
    let (_driver, builder) = builder(Duration::from_secs(60), None);
    let mut status = builder.runner().subscribe();

    let running = tokio::spawn({
        let builder = builder.clone();
        async move { builder.from_idea(input()).await }
    });
    status.wait_for(|s| s.is_loading()).await?;

    builder.cancel_all();
    let err = running.await?.expect_err("cancelled");

    assert_eq!(err.category(), ErrorCategory::Cancelled);
    assert_eq!(builder.form().character, None);
    assert_eq!(builder.runner().in_flight(), 0);
    assert!(matches!(builder.status(), FeatureStatus::Failed { .. }));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_configured_timeout_fails_action() -> anyhow::Result<()> {
    let (_driver, builder) = builder(Duration::from_secs(120), Some(Duration::from_secs(30)));

    let err = builder.from_idea(input()).await.expect_err("timed out");

    assert_eq!(err.category(), ErrorCategory::Cancelled);
    assert_eq!(builder.form().character, None);
    Ok(())
}
