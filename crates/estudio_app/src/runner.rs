//! Per-feature task bookkeeping.
//!
//! Every user action becomes one [`FlowTask`]. A [`FeatureRunner`] tracks the
//! tasks a controller has in flight, mirrors their progress into a
//! [`FeatureStatus`] and turns failures into notifications.

use crate::notifications::{Notification, NotificationCenter};
use estudio_error::EstudioResult;
use estudio_flows::{CompositeFlow, Flow, FlowExecutor, FlowPhase, FlowTask};
use estudio_interface::EstudioDriver;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// What a feature is doing, as shown next to its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeatureStatus {
    /// Nothing has run yet
    #[default]
    Idle,
    /// Requests are running
    Loading {
        /// How many
        in_flight: usize,
    },
    /// The last request succeeded
    Ready,
    /// The last request failed
    Failed {
        /// Notification text shown for the failure
        message: String,
    },
}

impl FeatureStatus {
    /// Whether any request is running.
    pub fn is_loading(&self) -> bool {
        matches!(self, FeatureStatus::Loading { .. })
    }
}

/// Tracks the in-flight tasks of one feature.
///
/// Concurrent actions are independent: starting a second one neither waits
/// for nor cancels the first.
#[derive(Debug, Clone)]
pub struct FeatureRunner {
    feature: &'static str,
    status: Arc<watch::Sender<FeatureStatus>>,
    tasks: Arc<Mutex<HashMap<u64, CancellationToken>>>,
    next_id: Arc<AtomicU64>,
    notifications: NotificationCenter,
    timeout: Option<Duration>,
}

impl FeatureRunner {
    /// Create a runner reporting to `notifications`.
    pub fn new(
        feature: &'static str,
        notifications: NotificationCenter,
        timeout: Option<Duration>,
    ) -> Self {
        let (status, _) = watch::channel(FeatureStatus::Idle);
        Self {
            feature,
            status: Arc::new(status),
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            notifications,
            timeout,
        }
    }

    /// Feature name.
    pub fn feature(&self) -> &'static str {
        self.feature
    }

    /// Current status.
    pub fn status(&self) -> FeatureStatus {
        self.status.borrow().clone()
    }

    /// Receiver for status changes.
    pub fn subscribe(&self) -> watch::Receiver<FeatureStatus> {
        self.status.subscribe()
    }

    /// Notification hub this runner reports to.
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Number of tasks currently running.
    pub fn in_flight(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Cancel every running task of this feature.
    #[instrument(skip(self), fields(feature = self.feature))]
    pub fn cancel_all(&self) {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(count = tasks.len(), "Cancelling feature tasks");
        for token in tasks.values() {
            token.cancel();
        }
    }

    /// Run one task to completion.
    ///
    /// On failure an error notification is published and the error is
    /// returned to the caller.
    pub async fn run<T, F, Fut>(&self, flow: &'static str, make: F) -> EstudioResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<watch::Sender<FlowPhase>>) -> Fut,
        Fut: Future<Output = EstudioResult<T>> + Send + 'static,
    {
        let task = FlowTask::spawn(flow, self.timeout, make);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let in_flight = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.insert(id, task.cancellation_token());
            tasks.len()
        };
        debug!(feature = self.feature, flow, in_flight, "Task started");
        self.status.send_replace(FeatureStatus::Loading { in_flight });

        let result = task.join().await;

        let remaining = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.remove(&id);
            tasks.len()
        };
        let next = match &result {
            _ if remaining > 0 => FeatureStatus::Loading {
                in_flight: remaining,
            },
            Ok(_) => FeatureStatus::Ready,
            Err(e) => FeatureStatus::Failed {
                message: Notification::from_error(e).message().clone(),
            },
        };
        self.status.send_replace(next);
        self.report(result)
    }

    /// Run a single flow as a task.
    pub async fn run_flow<D, F>(
        &self,
        executor: &FlowExecutor<D>,
        flow: F,
        input: F::Input,
    ) -> EstudioResult<F::Output>
    where
        D: EstudioDriver + 'static,
        F: Flow + 'static,
        F::Output: Send,
    {
        let executor = executor.clone();
        self.run(flow.name(), move |phase| async move {
            executor
                .run_observed(&flow, input, Some(phase.as_ref()))
                .await
        })
        .await
    }

    /// Run a composite flow as a task.
    pub async fn run_composite<D, C>(
        &self,
        executor: &FlowExecutor<D>,
        composite: C,
        input: C::Input,
    ) -> EstudioResult<C::Output>
    where
        D: EstudioDriver + 'static,
        C: CompositeFlow + 'static,
        C::Output: 'static,
    {
        let executor = executor.clone();
        self.run(composite.name(), move |phase| async move {
            composite
                .run(&executor, input, Some(phase.as_ref()))
                .await
        })
        .await
    }

    /// Publish an error notification for a failed result and pass it on.
    pub fn report<T>(&self, result: EstudioResult<T>) -> EstudioResult<T> {
        if let Err(e) = &result {
            debug!(feature = self.feature, category = %e.category(), error = %e, "Action failed");
            self.notifications.publish(Notification::from_error(e));
        }
        result
    }

    /// Publish a success notification.
    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notifications.publish(Notification::success(title, message));
    }
}
