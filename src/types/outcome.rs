//! Three-way result of a generation run.

use super::artifact::MythArtifact;
use crate::{MythError, Result};

/// Outcome of one pass through the generation orchestrator.
///
/// `Degraded` is a successful-but-degraded result: the artifact was
/// synthesized locally after the model failed to produce valid output.
/// Callers must not treat it as a failed request.
#[derive(Debug)]
pub enum GenerationOutcome {
    Success(MythArtifact),
    Degraded(MythArtifact),
    Failed(MythError),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, GenerationOutcome::Degraded(_))
    }

    /// Label used for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationOutcome::Success(_) => "success",
            GenerationOutcome::Degraded(_) => "degraded",
            GenerationOutcome::Failed(_) => "failed",
        }
    }

    /// Collapse into a `Result`, treating degraded artifacts as success.
    pub fn into_result(self) -> Result<MythArtifact> {
        match self {
            GenerationOutcome::Success(artifact) | GenerationOutcome::Degraded(artifact) => {
                Ok(artifact)
            }
            GenerationOutcome::Failed(e) => Err(e),
        }
    }
}
