//! Shared services handed to every controller.

use crate::editor::EditorChannel;
use crate::notifications::NotificationCenter;
use crate::runner::FeatureRunner;
use estudio_flows::FlowExecutor;
use estudio_gallery::Gallery;
use estudio_interface::EstudioDriver;
use std::time::Duration;

/// Executor, gallery and broadcast hubs shared by the controllers.
#[derive(Debug, derive_getters::Getters)]
pub struct FeatureContext<D: EstudioDriver> {
    executor: FlowExecutor<D>,
    gallery: Gallery,
    notifications: NotificationCenter,
    editor: EditorChannel,
    #[getter(skip)]
    timeout: Option<Duration>,
}

impl<D: EstudioDriver> Clone for FeatureContext<D> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            gallery: self.gallery.clone(),
            notifications: self.notifications.clone(),
            editor: self.editor.clone(),
            timeout: self.timeout,
        }
    }
}

impl<D: EstudioDriver> FeatureContext<D> {
    /// Bundle an executor and a gallery with fresh hubs and no timeout.
    pub fn new(executor: FlowExecutor<D>, gallery: Gallery) -> Self {
        Self {
            executor,
            gallery,
            notifications: NotificationCenter::default(),
            editor: EditorChannel::default(),
            timeout: None,
        }
    }

    /// Abandon generations after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-task timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// A runner for one feature.
    pub fn runner(&self, feature: &'static str) -> FeatureRunner {
        FeatureRunner::new(feature, self.notifications.clone(), self.timeout)
    }
}
