//! Tests for spawned flow tasks: completion, cancellation and timeouts.

use estudio_core::{CommercialDuration, ToneOfVoice};
use estudio_error::{ErrorCategory, EstudioErrorKind, FlowErrorKind};
use estudio_flows::{
    CommercialNarrationFlow, CommercialNarrationInput, FlowExecutor, FlowPhase, FlowTask,
};
use estudio_testing::MockDriver;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn narration_input() -> CommercialNarrationInput {
    CommercialNarrationInput {
        product_name: "Café Serra Azul".to_string(),
        main_message: "O sabor da manhã mineira".to_string(),
        target_audience: "Adultos que amam café especial".to_string(),
        tone: ToneOfVoice::Friendly,
        duration: CommercialDuration::Short,
    }
}

fn spawn_narration(
    driver: MockDriver,
    timeout: Option<Duration>,
) -> FlowTask<estudio_flows::Narration> {
    let executor = FlowExecutor::new(Arc::new(driver));
    FlowTask::spawn("commercial_narration", timeout, move |phase| async move {
        executor
            .run_observed(&CommercialNarrationFlow, narration_input(), Some(phase.as_ref()))
            .await
    })
}

#[tokio::test]
async fn test_task_completes_and_reports_success() -> anyhow::Result<()> {
    let task = spawn_narration(MockDriver::json(json!({"narration": "Olá"})), None);
    let phases = task.subscribe();

    let narration = task.join().await?;

    assert_eq!(narration.narration, "Olá");
    assert_eq!(*phases.borrow(), FlowPhase::Succeeded);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_task_resolves_to_cancelled() -> anyhow::Result<()> {
    let driver = MockDriver::json(json!({"narration": "Olá"})).with_delay(Duration::from_secs(60));
    let task = spawn_narration(driver, None);
    let phases = task.subscribe();

    task.cancel();
    let err = task.join().await.expect_err("cancelled task must fail");

    assert_eq!(err.category(), ErrorCategory::Cancelled);
    match err.kind() {
        EstudioErrorKind::Flow(flow) => assert_eq!(flow.kind, FlowErrorKind::Cancelled),
        other => panic!("Expected Cancelled, got {other:?}"),
    }
    assert_eq!(*phases.borrow(), FlowPhase::Failed(ErrorCategory::Cancelled));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_hung_call_times_out_when_a_limit_is_set() -> anyhow::Result<()> {
    let driver = MockDriver::json(json!({"narration": "Olá"})).with_delay(Duration::from_secs(600));
    let task = spawn_narration(driver, Some(Duration::from_secs(30)));

    let err = task.join().await.expect_err("hung call must time out");

    match err.kind() {
        EstudioErrorKind::Flow(flow) => {
            assert_eq!(flow.kind, FlowErrorKind::TimedOut { secs: 30 })
        }
        other => panic!("Expected TimedOut, got {other:?}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_task_waits_on_model_without_timeout() -> anyhow::Result<()> {
    let driver = MockDriver::json(json!({"narration": "Olá"})).with_delay(Duration::from_secs(3600));
    let task = spawn_narration(driver, None);
    let mut phases = task.subscribe();

    phases
        .wait_for(|phase| *phase == FlowPhase::AwaitingModel)
        .await?;
    assert!(!task.is_finished());
    assert!(task.phase().is_in_flight());

    task.cancel();
    assert!(task.join().await.is_err());
    Ok(())
}
