//! MythWeaver - turns modern scenarios into ancient-style myths
//!
//! A scenario goes through sanitation, validation and a response cache
//! before reaching the generation pipeline: moderation, culture detection,
//! motif lookup, prompt assembly, an OpenAI-compatible completion call,
//! strict parsing, one stricter retry, and finally a deterministic fallback
//! myth when the model cannot produce valid output.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mythweaver::{MythService, ScenarioRequest, CultureTag, providers::OpenAiClient};
//!
//! #[tokio::main]
//! async fn main() -> mythweaver::Result<()> {
//!     let client = Arc::new(OpenAiClient::new("sk-your-key")?);
//!     let service = MythService::builder()
//!         .completion(client.clone())
//!         .moderation(client)
//!         .build()?;
//!
//!     let myth = service
//!         .generate(
//!             ScenarioRequest::new("My coworker keeps stealing my lunch from the fridge")
//!                 .culture(CultureTag::Norse),
//!         )
//!         .await?;
//!
//!     println!("{}\n\n{}", myth.title, myth.adapted_story);
//!     for choice in &myth.choices {
//!         println!("[{}] {}", choice.id, choice.label);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod culture;
pub mod error;
pub mod generator;
pub mod motifs;
pub mod prompt;
pub mod providers;
pub mod safety;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{INTERNAL_ERROR_MESSAGE, MythError, Result};
pub use generator::{GeneratorConfig, MythGenerator};
pub use service::{MythService, MythServiceBuilder};

pub use types::{
    CHOICE_COUNT, CHOICE_IDS, ChoiceOption, CultureChoice, CultureTag, DEFAULT_TONE,
    GenerationOutcome, HEALTHY, HealthStatus, MythArtifact, MythMetadata, ScenarioRequest,
};

/// Crate version, reported by the health endpoint.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
