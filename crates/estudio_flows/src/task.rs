//! Observable, cancellable flow invocations.
//!
//! A [`FlowTask`] runs one flow (or composite) on the tokio runtime. Its
//! phase can be watched while it runs, it can be cancelled, and an optional
//! timeout bounds how long it may take. Without a timeout a hung remote call
//! keeps the task in [`FlowPhase::AwaitingModel`] until it is cancelled.

use crate::executor::FlowPhase;
use estudio_error::{EstudioError, EstudioResult, FlowError, FlowErrorKind};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle to a spawned flow invocation.
#[derive(Debug)]
pub struct FlowTask<T> {
    flow: &'static str,
    phase: watch::Receiver<FlowPhase>,
    cancel: CancellationToken,
    handle: JoinHandle<EstudioResult<T>>,
}

impl<T: Send + 'static> FlowTask<T> {
    /// Spawn an invocation.
    ///
    /// `make` receives the phase sender to pass to the executor and returns
    /// the future to run.
    pub fn spawn<F, Fut>(flow: &'static str, timeout: Option<Duration>, make: F) -> Self
    where
        F: FnOnce(Arc<watch::Sender<FlowPhase>>) -> Fut,
        Fut: Future<Output = EstudioResult<T>> + Send + 'static,
    {
        let (sender, phase) = watch::channel(FlowPhase::Idle);
        let sender = Arc::new(sender);
        let cancel = CancellationToken::new();
        let work = make(Arc::clone(&sender));
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(flow, "Flow task cancelled");
                    Err(FlowError::new(FlowErrorKind::Cancelled).into())
                }
                result = run_with_timeout(work, timeout) => result,
            };
            if let Err(e) = &result {
                let category = e.category();
                sender.send_if_modified(|phase| {
                    if phase.is_terminal() {
                        false
                    } else {
                        *phase = FlowPhase::Failed(category);
                        true
                    }
                });
            }
            result
        });

        Self {
            flow,
            phase,
            cancel,
            handle,
        }
    }

    /// Name of the flow this task runs.
    pub fn flow(&self) -> &'static str {
        self.flow
    }

    /// Current phase.
    pub fn phase(&self) -> FlowPhase {
        *self.phase.borrow()
    }

    /// A receiver for phase changes.
    pub fn subscribe(&self) -> watch::Receiver<FlowPhase> {
        self.phase.clone()
    }

    /// Request cancellation. The task resolves to [`FlowErrorKind::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the task has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result.
    pub async fn join(self) -> EstudioResult<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(flow = self.flow, error = %e, "Flow task did not complete");
                Err(EstudioError::from(FlowError::new(FlowErrorKind::TaskPanicked(
                    e.to_string(),
                ))))
            }
        }
    }
}

async fn run_with_timeout<T, Fut>(work: Fut, timeout: Option<Duration>) -> EstudioResult<T>
where
    Fut: Future<Output = EstudioResult<T>>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(result) => result,
            Err(_) => Err(FlowError::new(FlowErrorKind::TimedOut {
                secs: limit.as_secs(),
            })
            .into()),
        },
        None => work.await,
    }
}
