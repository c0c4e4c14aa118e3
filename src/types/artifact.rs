//! The generated myth and its metadata.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::culture::CultureTag;

/// Number of alternative endings every myth carries.
pub const CHOICE_COUNT: usize = 3;

/// Stable ids of the three endings, in order.
pub const CHOICE_IDS: [&str; CHOICE_COUNT] = ["c1", "c2", "c3"];

/// One alternative ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    pub outcome: String,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            outcome: outcome.into(),
        }
    }
}

/// Provenance of a generated myth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MythMetadata {
    /// Resolved culture; never `auto`.
    pub culture: CultureTag,
    pub source_motif: String,
    /// Wall-clock generation time, serialized as fractional seconds.
    #[serde(with = "duration_secs")]
    pub generation_time: Duration,
    pub model_identifier: String,
}

/// A complete myth: title, story, three endings and metadata.
///
/// The fixed-size `choices` array makes "exactly three endings" a property
/// of the type rather than a runtime check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MythArtifact {
    pub title: String,
    pub adapted_story: String,
    pub choices: [ChoiceOption; CHOICE_COUNT],
    pub meta: MythMetadata,
}

impl MythArtifact {
    /// Whether this artifact came from the local fallback template.
    pub fn is_fallback(&self) -> bool {
        self.meta.model_identifier == crate::generator::FALLBACK_MODEL_IDENTIFIER
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
