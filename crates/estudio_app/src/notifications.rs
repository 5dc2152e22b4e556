//! User-facing notifications.
//!
//! Controllers publish a [`Notification`] for every finished action. The CLI
//! prints them; other front ends subscribe to the [`NotificationCenter`].

use estudio_error::{ErrorCategory, EstudioError};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Message shown when input validation fails.
pub const VALIDATION_MESSAGE: &str = "Preencha os campos obrigatórios.";

/// Message shown when the remote model fails.
pub const REMOTE_MESSAGE: &str = "Ocorreu um erro ao gerar o conteúdo. Tente novamente.";

/// Severity of a notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    /// The action completed
    Success,
    /// The action failed; nothing was lost
    Error,
    /// The action failed and local data may be affected
    Destructive,
}

/// A short titled message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Notification {
    level: NotificationLevel,
    title: String,
    message: String,
}

impl Notification {
    /// Success notification.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Error notification.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Destructive notification.
    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Destructive,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Notification for a failed action, worded by error category.
    pub fn from_error(error: &EstudioError) -> Self {
        match error.category() {
            ErrorCategory::Validation => {
                let message = match error.as_schema() {
                    Some(schema) => format!("{} (campo: {})", VALIDATION_MESSAGE, schema.field),
                    None => VALIDATION_MESSAGE.to_string(),
                };
                Self::error("Dados incompletos", message)
            }
            ErrorCategory::Remote => Self::error("Erro na geração", REMOTE_MESSAGE),
            ErrorCategory::Storage => Self::destructive(
                "Erro ao salvar",
                "Não foi possível acessar a galeria local.",
            ),
            ErrorCategory::Cancelled => Self::error("Operação cancelada", error.to_string()),
            ErrorCategory::Config => Self::error("Erro de configuração", error.to_string()),
            ErrorCategory::Internal => Self::error("Erro inesperado", REMOTE_MESSAGE),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.title, self.message)
    }
}

/// Broadcast hub for notifications.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    sender: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    /// Default channel capacity.
    pub const DEFAULT_CAPACITY: usize = 128;

    /// Create a hub buffering up to `capacity` notifications per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to current subscribers. Without subscribers the notification
    /// is dropped.
    pub fn publish(&self, notification: Notification) {
        debug!(level = %notification.level, title = %notification.title, "Notification");
        let _ = self.sender.send(notification);
    }

    /// Receive notifications published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estudio_error::{
        GeminiError, GeminiErrorKind, SchemaErrorKind, SchemaValidationError, StorageError,
        StorageErrorKind,
    };

    #[test]
    fn test_validation_wording_names_field() {
        let error = EstudioError::from(SchemaValidationError::new(
            "mainMessage",
            SchemaErrorKind::Empty,
        ));
        let notification = Notification::from_error(&error);
        assert_eq!(*notification.level(), NotificationLevel::Error);
        assert!(notification.message().starts_with(VALIDATION_MESSAGE));
        assert!(notification.message().contains("mainMessage"));
    }

    #[test]
    fn test_remote_and_storage_levels() {
        let remote = EstudioError::from(GeminiError::new(GeminiErrorKind::EmptyResponse));
        assert_eq!(Notification::from_error(&remote).message(), REMOTE_MESSAGE);

        let storage = EstudioError::from(StorageError::new(StorageErrorKind::FileWrite(
            "x".to_string(),
        )));
        assert_eq!(
            *Notification::from_error(&storage).level(),
            NotificationLevel::Destructive
        );
    }
}
