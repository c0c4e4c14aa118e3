//! Request-facing operations: "generate myth" and "health".
//!
//! ```text
//! ScenarioRequest ─► sanitize ─► validate ─► cache lookup ──hit──► artifact
//!                                                │ miss
//!                                                ▼
//!                                          MythGenerator ─► cache store (success only)
//! ```
//!
//! Degraded (fallback) artifacts are returned but not cached, so the next
//! identical request gets another chance at a real generation.
//! Caching only successes is intentional; fallbacks must stay uncached.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::cache::{CacheConfig, Clock, Fingerprint, ResponseCache, SystemClock};
use crate::culture::CultureClassifier;
use crate::generator::{GeneratorConfig, MythGenerator};
use crate::motifs::MotifRepository;
use crate::prompt::PromptBuilder;
use crate::providers::{CompletionProvider, ModerationProvider};
use crate::safety::{ContentValidator, sanitize};
use crate::telemetry;
use crate::types::{GenerationOutcome, HealthStatus, MythArtifact, ScenarioRequest};
use crate::{MythError, Result};

/// Default environment tag reported by health checks.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// The myth pipeline with its long-lived collaborators.
pub struct MythService {
    validator: ContentValidator,
    generator: MythGenerator,
    cache: ResponseCache,
    environment: String,
}

impl MythService {
    /// Create a new builder for configuring the service.
    pub fn builder() -> MythServiceBuilder {
        MythServiceBuilder::new()
    }

    pub fn new(
        validator: ContentValidator,
        generator: MythGenerator,
        cache: ResponseCache,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            validator,
            generator,
            cache,
            environment: environment.into(),
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Generate a myth, serving from cache when possible.
    ///
    /// Errors are [`MythError::Validation`], [`MythError::ContentRejected`]
    /// or [`MythError::GenerationFailed`]. A fallback artifact is `Ok`.
    #[instrument(skip(self, request), fields(culture = %request.culture))]
    pub async fn generate(&self, request: ScenarioRequest) -> Result<MythArtifact> {
        let scenario = sanitize(&request.scenario);
        if let Err(e) = self.validator.validate(&scenario) {
            record_request("failed");
            return Err(e);
        }
        let request = ScenarioRequest {
            scenario,
            ..request
        };

        let key = Fingerprint::of(&request.scenario, request.culture, &request.tone);
        if let Some(artifact) = self.cache.get(&key).await {
            debug!(key = key.as_u64(), "serving cached myth");
            record_request("cached");
            return Ok(artifact);
        }

        let outcome = self.generator.generate(&request).await;
        record_request(outcome.label());
        if let GenerationOutcome::Success(artifact) = &outcome {
            self.cache.put(key, artifact.clone()).await;
        }
        outcome.into_result()
    }

    /// Health snapshot. Always succeeds.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::now(self.environment.as_str())
    }
}

fn record_request(outcome: &'static str) {
    metrics::counter!(telemetry::REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Builder for [`MythService`].
///
/// Only the completion provider is required; everything else has defaults.
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use mythweaver::{MythService, providers::OpenAiClient};
/// # fn main() -> mythweaver::Result<()> {
/// let client = Arc::new(OpenAiClient::new("sk-...")?);
/// let service = MythService::builder()
///     .completion(client.clone())
///     .moderation(client)
///     .environment("development")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct MythServiceBuilder {
    completion: Option<Arc<dyn CompletionProvider>>,
    moderation: Option<Arc<dyn ModerationProvider>>,
    generator_config: GeneratorConfig,
    validator: ContentValidator,
    classifier: CultureClassifier,
    motifs: Option<MotifRepository>,
    cache_config: CacheConfig,
    clock: Arc<dyn Clock>,
    environment: String,
}

impl MythServiceBuilder {
    pub fn new() -> Self {
        Self {
            completion: None,
            moderation: None,
            generator_config: GeneratorConfig::default(),
            validator: ContentValidator::default(),
            classifier: CultureClassifier::default(),
            motifs: None,
            cache_config: CacheConfig::default(),
            clock: Arc::new(SystemClock),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }

    /// Set the completion provider (required).
    pub fn completion(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(provider);
        self
    }

    /// Set the moderation provider. Without one, moderation always passes.
    pub fn moderation(mut self, provider: Arc<dyn ModerationProvider>) -> Self {
        self.moderation = Some(provider);
        self
    }

    pub fn generator_config(mut self, config: GeneratorConfig) -> Self {
        self.generator_config = config;
        self
    }

    pub fn validator(mut self, validator: ContentValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn classifier(mut self, classifier: CultureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the motif dataset (default: embedded seed).
    pub fn motifs(mut self, motifs: MotifRepository) -> Self {
        self.motifs = Some(motifs);
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Set the cache time source (default: system clock).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<MythService> {
        let completion = self.completion.ok_or_else(|| {
            MythError::Configuration("no completion provider configured".into())
        })?;

        let motifs = self.motifs.unwrap_or_else(MotifRepository::with_embedded_seed);
        let prompts = PromptBuilder::new(Arc::new(self.classifier), Arc::new(motifs));

        let mut generator = MythGenerator::new(completion, prompts, self.generator_config);
        if let Some(moderation) = self.moderation {
            generator = generator.with_moderation(moderation);
        }

        let cache = ResponseCache::with_clock(&self.cache_config, self.clock);

        Ok(MythService::new(
            self.validator,
            generator,
            cache,
            self.environment,
        ))
    }
}

impl Default for MythServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
