//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! 1. Bundled defaults (`estudio.toml` compiled into the binary)
//! 2. `~/.config/estudio/estudio.toml`
//! 3. `./estudio.toml`

use config::{Config, File, FileFormat};
use estudio_error::{ConfigError, EstudioError, EstudioResult};
use estudio_flows::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, FlowExecutor, FlowOverride};
use estudio_interface::EstudioDriver;
use estudio_models::GeminiClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../estudio.toml");

/// `[model]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ModelConfig {
    /// Gemini REST base URL
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Model for text and JSON flows
    #[serde(default = "default_text_model")]
    text_model: String,
    /// Model for image flows
    #[serde(default = "default_image_model")]
    image_model: String,
    /// Output token cap for flows that do not set one
    #[serde(default)]
    max_output_tokens: Option<u32>,
}

fn default_base_url() -> String {
    estudio_models::gemini::DEFAULT_BASE_URL.to_string()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            max_output_tokens: None,
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StorageConfig {
    /// Gallery directory; `~` is expanded
    #[serde(default)]
    data_dir: Option<String>,
}

/// `[tasks]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TaskConfig {
    /// Seconds before a generation is abandoned
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EstudioConfig {
    /// Remote model settings
    #[serde(default)]
    model: ModelConfig,
    /// Gallery settings
    #[serde(default)]
    storage: StorageConfig,
    /// Task settings
    #[serde(default)]
    tasks: TaskConfig,
    /// Per-flow overrides keyed by flow name
    #[serde(default)]
    flows: HashMap<String, FlowOverride>,
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> EstudioResult<EstudioConfig> {
    builder
        .build()
        .map_err(|e| {
            EstudioError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            EstudioError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}

impl EstudioConfig {
    /// Load bundled defaults merged with user overrides.
    #[instrument]
    pub fn load() -> EstudioResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/estudio/estudio.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("estudio").required(false));
        build(builder)
    }

    /// Load bundled defaults merged with one specific file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> EstudioResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        build(builder)
    }

    /// Parse TOML text on top of the bundled defaults.
    pub fn from_toml(text: &str) -> EstudioResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(text, FileFormat::Toml));
        build(builder)
    }

    /// Gallery directory: the configured one with `~` expanded, otherwise
    /// the platform data directory.
    pub fn data_dir(&self) -> PathBuf {
        match &self.storage.data_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("estudio"),
        }
    }

    /// Per-task timeout. `None` waits indefinitely.
    pub fn task_timeout(&self) -> Option<Duration> {
        self.tasks.timeout_secs.map(Duration::from_secs)
    }

    /// Executor configured with these models and overrides.
    pub fn executor<D: EstudioDriver>(&self, driver: Arc<D>) -> FlowExecutor<D> {
        FlowExecutor::new(driver)
            .with_models(self.model.text_model.clone(), self.model.image_model.clone())
            .with_overrides(self.flows.clone())
            .with_max_output_tokens(self.model.max_output_tokens)
    }

    /// Gemini client using `GEMINI_API_KEY` and these settings.
    ///
    /// A missing key is reported by the client as `MissingApiKey`.
    pub fn gemini_client(&self) -> EstudioResult<GeminiClient> {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        GeminiClient::with_settings(api_key, &self.model.base_url, &self.model.text_model)
    }

    /// Override the gallery directory.
    pub fn with_data_dir(mut self, dir: impl Into<String>) -> Self {
        self.storage.data_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_parse() {
        let config = EstudioConfig::from_toml("").unwrap();
        assert_eq!(config.model().text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(config.task_timeout(), None);
        assert_eq!(
            config.flows().get("transcribe_media").and_then(|o| o.temperature),
            Some(0.0)
        );
    }

    #[test]
    fn test_user_values_take_precedence() {
        let config = EstudioConfig::from_toml(
            r#"
[model]
text_model = "gemini-2.5-pro"
max_output_tokens = 2048

[storage]
data_dir = "~/estudio-dados"

[tasks]
timeout_secs = 90

[flows.commercial_script]
relaxed_safety = true
"#,
        )
        .unwrap();

        assert_eq!(config.model().text_model(), "gemini-2.5-pro");
        assert_eq!(config.model().image_model(), DEFAULT_IMAGE_MODEL);
        assert_eq!(*config.model().max_output_tokens(), Some(2048));
        assert_eq!(config.task_timeout(), Some(Duration::from_secs(90)));
        assert!(!config.data_dir().to_string_lossy().starts_with('~'));
        assert!(config.data_dir().ends_with("estudio-dados"));
        assert_eq!(
            config.flows().get("commercial_script").and_then(|o| o.relaxed_safety),
            Some(true)
        );
        assert!(config.flows().contains_key("character_from_idea"));
    }
}
