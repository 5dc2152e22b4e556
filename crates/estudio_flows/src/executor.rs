//! Flow executor.
//!
//! A [`Flow`] pairs an input schema, a prompt template, model settings and an
//! output schema. [`FlowExecutor`] runs one invocation:
//!
//! ```text
//! Idle -> Validating -> Rendering -> AwaitingModel -> ValidatingOutput -> Succeeded
//!                \___________\______________\_______________\__________-> Failed(category)
//! ```
//!
//! Exactly one remote call is made per invocation, and none when the input
//! is invalid. Nothing is retried and no local state is touched.

use crate::extraction::{extract_json, parse_json};
use crate::flows::GeneratedImage;
use crate::schema::FlowSchema;
use crate::template::PromptTemplate;
use estudio_core::{
    GenerateRequest, GenerateResponse, Message, ResponseFormat, SafetyPolicy,
};
use estudio_error::{
    BuilderError, BuilderErrorKind, ErrorCategory, EstudioResult, FlowError, FlowErrorKind,
    GeminiError, GeminiErrorKind, JsonError,
};
use estudio_interface::EstudioDriver;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Default model for text and JSON flows.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
/// Default model for image flows.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Instructions sent with every flow.
pub const DEFAULT_PREAMBLE: &str = "Você é o assistente criativo do Estúdio, uma ferramenta para criadores \
de conteúdo brasileiros. Escreva sempre em português do Brasil, com linguagem natural, \
criativa e adequada para redes sociais.";

/// Lifecycle of one flow invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum FlowPhase {
    /// Not started
    #[default]
    Idle,
    /// Checking the input against its schema
    Validating,
    /// Building the prompt
    Rendering,
    /// Waiting for the remote model
    AwaitingModel,
    /// Checking the response against the output schema
    ValidatingOutput,
    /// Finished with a valid output
    Succeeded,
    /// Finished with an error of the given category
    #[display("Failed({})", _0)]
    Failed(ErrorCategory),
}

impl FlowPhase {
    /// Whether no further transitions can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowPhase::Succeeded | FlowPhase::Failed(_))
    }

    /// Whether the invocation is still running.
    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal() && *self != FlowPhase::Idle
    }
}

/// Which configured model a flow runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    /// Text and JSON generation
    #[default]
    Text,
    /// Image generation
    Image,
}

/// Model settings for a flow.
#[derive(
    Debug, Clone, PartialEq, derive_getters::Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct FlowConfig {
    /// Model to use
    model_role: ModelRole,
    /// Sampling temperature
    #[setters(strip_option)]
    temperature: Option<f32>,
    /// Output token cap
    #[setters(strip_option)]
    max_tokens: Option<u32>,
    /// Expected response shape
    response_format: ResponseFormat,
    /// Safety filter policy
    safety: SafetyPolicy,
}

impl FlowConfig {
    /// JSON output on the text model.
    pub fn json() -> Self {
        Self {
            model_role: ModelRole::Text,
            temperature: Some(0.8),
            max_tokens: None,
            response_format: ResponseFormat::Json,
            safety: SafetyPolicy::Standard,
        }
    }

    /// Image output on the image model.
    pub fn image() -> Self {
        Self {
            model_role: ModelRole::Image,
            temperature: None,
            max_tokens: None,
            response_format: ResponseFormat::Image,
            safety: SafetyPolicy::Standard,
        }
    }

    /// Lower safety filters so photos of people are accepted.
    pub fn relaxed(self) -> Self {
        self.with_safety(SafetyPolicy::Relaxed)
    }

    /// Apply user overrides from configuration.
    pub fn apply(mut self, overrides: &FlowOverride) -> Self {
        if let Some(temperature) = overrides.temperature {
            self.temperature = Some(temperature);
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = Some(max_tokens);
        }
        if let Some(relaxed) = overrides.relaxed_safety {
            self.safety = if relaxed {
                SafetyPolicy::Relaxed
            } else {
                SafetyPolicy::Standard
            };
        }
        self
    }
}

/// Per-flow settings from `[flows.<name>]` configuration tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowOverride {
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Output token cap
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Force safety relaxation on or off
    #[serde(default)]
    pub relaxed_safety: Option<bool>,
}

/// A typed model-backed operation.
pub trait Flow: Send + Sync {
    /// Validated input
    type Input: FlowSchema;
    /// Validated output
    type Output: FlowSchema;

    /// Stable flow name, used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Prompt template.
    fn template(&self) -> &'static str;

    /// Model settings.
    fn config(&self) -> FlowConfig {
        FlowConfig::json()
    }

    /// Values the template is rendered against. Defaults to the serialized
    /// input; flows add derived values here.
    fn prompt_context(&self, input: &Self::Input) -> EstudioResult<Value> {
        Ok(serde_json::to_value(input).map_err(|e| JsonError::new(e.to_string()))?)
    }

    /// Turn the raw response into a candidate output value.
    fn decode(&self, response: &GenerateResponse) -> EstudioResult<Value> {
        match self.config().response_format {
            ResponseFormat::Image => decode_image(response),
            ResponseFormat::Json | ResponseFormat::Text => decode_json(self.name(), response),
        }
    }

    /// Post-validation fix-up. Identity unless a flow enforces a policy.
    fn repair(&self, output: Self::Output) -> Self::Output {
        output
    }
}

/// Candidate value from a JSON text response.
pub fn decode_json(flow: &str, response: &GenerateResponse) -> EstudioResult<Value> {
    let text = response
        .text()
        .ok_or_else(|| GeminiError::new(GeminiErrorKind::EmptyResponse))?;
    let json = extract_json(flow, &text)?;
    Ok(parse_json(flow, &json)?)
}

/// Candidate [`GeneratedImage`] value from an image response.
pub fn decode_image(response: &GenerateResponse) -> EstudioResult<Value> {
    let uri = response
        .first_image()
        .and_then(|image| image.to_data_uri())
        .ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::MissingMedia(
                "no image part in the response".to_string(),
            ))
        })?;
    let image = GeneratedImage {
        image_data_uri: uri.to_string(),
        caption: response.text().map(|text| text.trim().to_string()),
    };
    Ok(serde_json::to_value(image).map_err(|e| JsonError::new(e.to_string()))?)
}

struct Phases<'a> {
    flow: &'static str,
    observer: Option<&'a watch::Sender<FlowPhase>>,
}

impl Phases<'_> {
    fn set(&self, phase: FlowPhase) {
        debug!(flow = self.flow, %phase, "Flow phase");
        if let Some(observer) = self.observer {
            observer.send_replace(phase);
        }
    }
}

/// Runs flows against a driver.
#[derive(Debug)]
pub struct FlowExecutor<D: EstudioDriver> {
    driver: Arc<D>,
    text_model: String,
    image_model: String,
    overrides: HashMap<String, FlowOverride>,
    max_output_tokens: Option<u32>,
    preamble: String,
}

impl<D: EstudioDriver> Clone for FlowExecutor<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
            overrides: self.overrides.clone(),
            max_output_tokens: self.max_output_tokens,
            preamble: self.preamble.clone(),
        }
    }
}

impl<D: EstudioDriver> FlowExecutor<D> {
    /// Create an executor with default models and no overrides.
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            overrides: HashMap::new(),
            max_output_tokens: None,
            preamble: DEFAULT_PREAMBLE.to_string(),
        }
    }

    /// Use specific text and image models.
    pub fn with_models(mut self, text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    /// Per-flow overrides keyed by flow name.
    pub fn with_overrides(mut self, overrides: HashMap<String, FlowOverride>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Output token cap for flows that do not set their own.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Replace the system preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// The underlying driver.
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Effective settings for a flow after configuration overrides.
    pub fn effective_config<F: Flow>(&self, flow: &F) -> FlowConfig {
        let config = match self.overrides.get(flow.name()) {
            Some(overrides) => flow.config().apply(overrides),
            None => flow.config(),
        };
        match (config.max_tokens, self.max_output_tokens) {
            (None, Some(cap)) => config.with_max_tokens(cap),
            _ => config,
        }
    }

    /// Run a flow on a typed input.
    pub async fn run<F: Flow>(&self, flow: &F, input: F::Input) -> EstudioResult<F::Output> {
        self.run_observed(flow, input, None).await
    }

    /// Run a flow on an untyped candidate input.
    ///
    /// The candidate is validated against the input schema first; an invalid
    /// candidate never reaches the model.
    pub async fn run_value<F: Flow>(&self, flow: &F, input: Value) -> EstudioResult<F::Output> {
        let phases = Phases {
            flow: flow.name(),
            observer: None,
        };
        phases.set(FlowPhase::Validating);
        let typed = F::Input::from_value(input)?;
        self.run(flow, typed).await
    }

    /// Run a flow, publishing each phase to `observer`.
    #[instrument(skip_all, fields(flow = flow.name()))]
    pub async fn run_observed<F: Flow>(
        &self,
        flow: &F,
        input: F::Input,
        observer: Option<&watch::Sender<FlowPhase>>,
    ) -> EstudioResult<F::Output> {
        let phases = Phases {
            flow: flow.name(),
            observer,
        };
        let result = self.execute(flow, input, &phases).await;
        match &result {
            Ok(_) => {
                info!(flow = flow.name(), "Flow succeeded");
                phases.set(FlowPhase::Succeeded);
            }
            Err(e) => {
                info!(flow = flow.name(), category = %e.category(), error = %e, "Flow failed");
                phases.set(FlowPhase::Failed(e.category()));
            }
        }
        result
    }

    async fn execute<F: Flow>(
        &self,
        flow: &F,
        input: F::Input,
        phases: &Phases<'_>,
    ) -> EstudioResult<F::Output> {
        phases.set(FlowPhase::Validating);
        input.check()?;

        phases.set(FlowPhase::Rendering);
        let request = self.build_request(flow, &input)?;

        phases.set(FlowPhase::AwaitingModel);
        let response = self.driver.generate(&request).await?;

        phases.set(FlowPhase::ValidatingOutput);
        let candidate = flow.decode(&response)?;
        let output = F::Output::from_value(candidate).map_err(|e| {
            FlowError::new(FlowErrorKind::InvalidOutput {
                flow: flow.name().to_string(),
                message: e.to_string(),
            })
        })?;

        Ok(flow.repair(output))
    }

    /// Build the single request a flow invocation sends.
    pub fn build_request<F: Flow>(&self, flow: &F, input: &F::Input) -> EstudioResult<GenerateRequest> {
        let config = self.effective_config(flow);
        let context = flow.prompt_context(input)?;
        let template = PromptTemplate::parse(flow.template())?;
        let parts = template.render(&context)?;

        let mut system = self.preamble.clone();
        if config.response_format == ResponseFormat::Json {
            system.push_str(&format!(
                "\n\nResponda SOMENTE com um objeto JSON válido, sem texto fora do JSON, \
                 com os seguintes campos:\n{}",
                F::Output::field_guide()
            ));
        }

        let model = match config.model_role {
            ModelRole::Text => self.text_model.clone(),
            ModelRole::Image => self.image_model.clone(),
        };

        let mut builder = GenerateRequest::builder();
        builder
            .messages(vec![Message::system(system), Message::user(parts)])
            .model(model)
            .response_format(config.response_format)
            .safety(config.safety);
        if let Some(temperature) = config.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = config.max_tokens {
            builder.max_tokens(max_tokens);
        }
        Ok(builder
            .build()
            .map_err(|e| BuilderError::new(BuilderErrorKind::ValidationFailed(e.to_string())))?)
    }
}

/// Schema of a flow's output, for documentation and debugging.
pub fn output_schema<F: Flow>(_flow: &F) -> Value {
    json!({
        "input": F::Input::schema_value(),
        "output": F::Output::schema_value(),
    })
}
