//! Public types for the Mythweaver API.

mod artifact;
mod culture;
mod health;
mod outcome;
mod request;

pub use artifact::{CHOICE_COUNT, CHOICE_IDS, ChoiceOption, MythArtifact, MythMetadata};
pub use culture::{CultureChoice, CultureTag};
pub use health::{HEALTHY, HealthStatus};
pub use outcome::GenerationOutcome;
pub use request::{DEFAULT_TONE, ScenarioRequest};
