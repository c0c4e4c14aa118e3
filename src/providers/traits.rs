//! Provider traits for the two external collaborators.
//!
//! The generation pipeline depends on these traits rather than on a concrete
//! HTTP client, so tests and alternative backends can be swapped in:
//! - [`CompletionProvider`]: structured text generation
//! - [`ModerationProvider`]: flagged / not-flagged verdicts
//!
//! Errors returned from either trait are transport or API failures. Content
//! problems (malformed JSON, schema violations) are detected by the caller.

use async_trait::async_trait;

use crate::Result;

// ============================================================================
// Completion Provider
// ============================================================================

/// One call to the completion API.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction (persona and output rules).
    pub system: String,
    /// User prompt.
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the backend for JSON-object output.
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: 1200,
            temperature: 0.7,
            json_mode: true,
        }
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }
}

/// Provider for schema-constrained text completions.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Run a completion and return the raw text payload.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

// ============================================================================
// Moderation Provider
// ============================================================================

/// Provider for content moderation verdicts.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// `true` if the text is flagged.
    async fn is_flagged(&self, text: &str) -> Result<bool>;
}
