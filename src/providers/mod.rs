//! External collaborators: completion and moderation.
//!
//! Traits live in [`traits`]; [`openai`] implements both against an
//! OpenAI-compatible HTTP API.

pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{CompletionProvider, CompletionRequest, ModerationProvider};
