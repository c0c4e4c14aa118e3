//! Deterministic fallback myth.

use std::time::Duration;

use crate::types::{ChoiceOption, CultureTag, MythArtifact, MythMetadata};

/// Model identifier stamped on fallback artifacts.
pub const FALLBACK_MODEL_IDENTIFIER: &str = "fallback";

pub const FALLBACK_TITLE: &str = "The Tale of Modern Wisdom";

pub const FALLBACK_SOURCE_MOTIF: &str = "Universal heroic journey pattern";

/// Characters of the scenario quoted in the fallback story.
const EXCERPT_CHARS: usize = 100;

/// Build the fallback artifact for `scenario`. Pure; never fails.
pub fn fallback_myth(scenario: &str, culture: CultureTag) -> MythArtifact {
    let excerpt: String = scenario.chars().take(EXCERPT_CHARS).collect();
    let adapted_story = format!(
        "In times long past, when the world was young and mysteries abounded, there lived one \
         who faced a challenge much like yours: {excerpt}... This ancient tale reminds us that \
         the struggles we face today have echoed through the ages, and wisdom can be found in \
         how our ancestors might have approached such trials."
    );

    MythArtifact {
        title: FALLBACK_TITLE.to_string(),
        adapted_story,
        choices: [
            ChoiceOption::new(
                "c1",
                "Seek Wisdom",
                "The protagonist seeks counsel from the elders, finding guidance in ancient traditions.",
            ),
            ChoiceOption::new(
                "c2",
                "Trust Instinct",
                "Following inner wisdom, the protagonist forges a new path forward.",
            ),
            ChoiceOption::new(
                "c3",
                "Unite Others",
                "By bringing together allies, the protagonist finds strength in community.",
            ),
        ],
        meta: MythMetadata {
            culture,
            source_motif: FALLBACK_SOURCE_MOTIF.to_string(),
            generation_time: Duration::ZERO,
            model_identifier: FALLBACK_MODEL_IDENTIFIER.to_string(),
        },
    }
}
