//! Generation orchestrator.
//!
//! [`MythGenerator`] turns a validated [`ScenarioRequest`] into a
//! [`GenerationOutcome`]:
//!
//! ```text
//! Moderating ──flagged──► Failed(ContentRejected)
//!     │
//!     ▼
//! Prompting ─► Generating ──transport error──► Failed(GenerationFailed)
//!                  │
//!                  ▼
//!               Parsing ──ok──► Success
//!                  │ parse error
//!                  ▼
//!           RetryGenerating ─► RetryParsing ──ok──► Success
//!                  │                 │
//!                  └──── error ──────┴──► Degraded(fallback)
//! ```
//!
//! Moderation transport errors fail open. Only the first generation call
//! can fail the request; everything after it degrades to the fallback myth.
//! The generator holds no state between calls.

mod fallback;
mod parse;

pub use fallback::{FALLBACK_MODEL_IDENTIFIER, FALLBACK_SOURCE_MOTIF, FALLBACK_TITLE, fallback_myth};
pub use parse::{ParsedMyth, parse_myth};

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::MythError;
use crate::prompt::{BuiltPrompt, PromptBuilder, RETRY_SYSTEM_INSTRUCTION, SYSTEM_INSTRUCTION};
use crate::providers::{CompletionProvider, CompletionRequest, ModerationProvider};
use crate::telemetry;
use crate::types::{GenerationOutcome, ScenarioRequest};

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Generation parameters.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Sampling temperature for the strict retry.
    pub retry_temperature: f32,
    /// When false the moderation provider is never consulted.
    pub moderation: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1200,
            temperature: 0.7,
            retry_temperature: 0.5,
            moderation: true,
        }
    }
}

/// Moderation, generation, retry and fallback for one request.
pub struct MythGenerator {
    completion: Arc<dyn CompletionProvider>,
    moderation: Option<Arc<dyn ModerationProvider>>,
    prompts: PromptBuilder,
    config: GeneratorConfig,
}

impl MythGenerator {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        prompts: PromptBuilder,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            completion,
            moderation: None,
            prompts,
            config,
        }
    }

    /// Attach a moderation provider.
    pub fn with_moderation(mut self, provider: Arc<dyn ModerationProvider>) -> Self {
        self.moderation = Some(provider);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the full pipeline for an already sanitized and validated request.
    #[instrument(skip(self, request), fields(culture = %request.culture, tone = %request.tone))]
    pub async fn generate(&self, request: &ScenarioRequest) -> GenerationOutcome {
        let start = Instant::now();
        let outcome = self.run(request, start).await;
        metrics::histogram!(telemetry::GENERATION_DURATION_SECONDS,
            "outcome" => outcome.label(),
        )
        .record(start.elapsed().as_secs_f64());
        outcome
    }

    async fn run(&self, request: &ScenarioRequest, start: Instant) -> GenerationOutcome {
        if self.is_flagged(&request.scenario).await {
            return GenerationOutcome::Failed(MythError::ContentRejected);
        }

        let prompt = self.prompts.build(request);

        let raw = match self
            .complete(SYSTEM_INSTRUCTION, &prompt.text, self.config.temperature)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(provider = self.completion.name(), error = %e, "generation call failed");
                return GenerationOutcome::Failed(MythError::GenerationFailed(e.to_string()));
            }
        };

        match parse_myth(&raw) {
            Ok(parsed) => {
                let artifact =
                    parsed.into_artifact(prompt.culture, start.elapsed(), &self.config.model);
                info!(culture = %prompt.culture, "myth generated");
                GenerationOutcome::Success(artifact)
            }
            Err(e) => {
                warn!(error = %e, "unparseable model output, retrying with strict prompt");
                self.retry(request, &prompt).await
            }
        }
    }

    async fn retry(&self, request: &ScenarioRequest, prompt: &BuiltPrompt) -> GenerationOutcome {
        metrics::counter!(telemetry::RETRIES_TOTAL).increment(1);

        let raw = match self
            .complete(
                RETRY_SYSTEM_INSTRUCTION,
                &prompt.strict_text(),
                self.config.retry_temperature,
            )
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "retry call failed, serving fallback");
                return self.fallback(request, prompt, "transport");
            }
        };

        match parse_myth(&raw) {
            Ok(parsed) => {
                info!(culture = %prompt.culture, "myth generated on retry");
                GenerationOutcome::Success(parsed.into_artifact(
                    prompt.culture,
                    Duration::ZERO,
                    &self.config.model,
                ))
            }
            Err(e) => {
                warn!(error = %e, "retry output unparseable, serving fallback");
                self.fallback(request, prompt, "parse")
            }
        }
    }

    fn fallback(
        &self,
        request: &ScenarioRequest,
        prompt: &BuiltPrompt,
        stage: &'static str,
    ) -> GenerationOutcome {
        metrics::counter!(telemetry::FALLBACKS_TOTAL, "stage" => stage).increment(1);
        GenerationOutcome::Degraded(fallback_myth(&request.scenario, prompt.culture))
    }

    async fn complete(&self, system: &str, prompt: &str, temperature: f32) -> crate::Result<String> {
        let request = CompletionRequest::new(system, prompt, self.config.model.as_str())
            .max_tokens(self.config.max_tokens)
            .temperature(temperature)
            .json_mode(true);
        self.completion.complete(&request).await
    }

    /// Moderation verdict. Disabled moderation and provider errors both pass.
    async fn is_flagged(&self, scenario: &str) -> bool {
        if !self.config.moderation {
            return false;
        }
        let Some(provider) = &self.moderation else {
            return false;
        };
        match provider.is_flagged(scenario).await {
            Ok(true) => {
                warn!(provider = provider.name(), "scenario flagged by moderation");
                metrics::counter!(telemetry::MODERATION_REJECTIONS_TOTAL).increment(1);
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "moderation unavailable, allowing scenario");
                metrics::counter!(telemetry::MODERATION_ERRORS_TOTAL).increment(1);
                false
            }
        }
    }
}
