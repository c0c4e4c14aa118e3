//! Strict parsing of model output into a myth.
//!
//! Unknown fields, missing fields and schema violations are all
//! [`MythError::Parse`]. A permissive parse would let half-formed output
//! through as a success instead of routing it to the retry path.

use std::time::Duration;

use serde::Deserialize;

use crate::types::{CHOICE_COUNT, CHOICE_IDS, ChoiceOption, CultureTag, MythArtifact, MythMetadata};
use crate::{MythError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArtifact {
    title: String,
    adapted_story: String,
    choices: Vec<RawChoice>,
    meta: RawMeta,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChoice {
    id: String,
    label: String,
    outcome: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMeta {
    culture: String,
    source_motif: String,
}

/// Model output that passed schema validation, before metadata is stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMyth {
    pub title: String,
    pub adapted_story: String,
    pub choices: [ChoiceOption; CHOICE_COUNT],
    pub source_motif: String,
}

impl ParsedMyth {
    /// Complete the artifact. The model's own `meta.culture` is replaced by
    /// the resolved culture.
    pub fn into_artifact(
        self,
        culture: CultureTag,
        generation_time: Duration,
        model_identifier: &str,
    ) -> MythArtifact {
        MythArtifact {
            title: self.title,
            adapted_story: self.adapted_story,
            choices: self.choices,
            meta: MythMetadata {
                culture,
                source_motif: self.source_motif,
                generation_time,
                model_identifier: model_identifier.to_string(),
            },
        }
    }
}

/// Parse and validate raw completion text.
pub fn parse_myth(raw: &str) -> Result<ParsedMyth> {
    let artifact: RawArtifact =
        serde_json::from_str(raw.trim()).map_err(|e| MythError::Parse(e.to_string()))?;

    require_text("title", &artifact.title)?;
    require_text("adapted_story", &artifact.adapted_story)?;
    require_text("meta.culture", &artifact.meta.culture)?;
    require_text("meta.source_motif", &artifact.meta.source_motif)?;

    let choices: [RawChoice; CHOICE_COUNT] =
        artifact.choices.try_into().map_err(|v: Vec<RawChoice>| {
            MythError::Parse(format!("expected {CHOICE_COUNT} choices, got {}", v.len()))
        })?;

    for (choice, expected) in choices.iter().zip(CHOICE_IDS) {
        if choice.id != expected {
            return Err(MythError::Parse(format!(
                "choice id {:?} where {expected:?} was expected",
                choice.id
            )));
        }
        require_text("choice label", &choice.label)?;
        require_text("choice outcome", &choice.outcome)?;
    }

    Ok(ParsedMyth {
        title: artifact.title,
        adapted_story: artifact.adapted_story,
        choices: choices.map(|c| ChoiceOption::new(c.id, c.label, c.outcome)),
        source_motif: artifact.meta.source_motif,
    })
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MythError::Parse(format!("{field} is empty")));
    }
    Ok(())
}
