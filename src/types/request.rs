//! Inbound myth generation request.

use serde::{Deserialize, Serialize};

use super::culture::CultureChoice;

/// Tone used when the caller does not supply one.
pub const DEFAULT_TONE: &str = "balanced";

/// A request to turn a modern scenario into a myth.
///
/// Deserialization normalizes the payload: the scenario is trimmed, unknown
/// cultures become `auto`, and a missing or null tone becomes `"balanced"`.
/// Length and content checks happen later, after sanitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawScenarioRequest")]
pub struct ScenarioRequest {
    pub scenario: String,
    pub culture: CultureChoice,
    pub tone: String,
}

impl ScenarioRequest {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into().trim().to_string(),
            culture: CultureChoice::Auto,
            tone: DEFAULT_TONE.to_string(),
        }
    }

    pub fn culture(mut self, culture: impl Into<CultureChoice>) -> Self {
        self.culture = culture.into();
        self
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = normalize_tone(Some(tone.into()));
        self
    }
}

#[derive(Deserialize)]
struct RawScenarioRequest {
    scenario: String,
    #[serde(default)]
    culture: CultureChoice,
    #[serde(default)]
    tone: Option<String>,
}

impl From<RawScenarioRequest> for ScenarioRequest {
    fn from(raw: RawScenarioRequest) -> Self {
        Self {
            scenario: raw.scenario.trim().to_string(),
            culture: raw.culture,
            tone: normalize_tone(raw.tone),
        }
    }
}

fn normalize_tone(tone: Option<String>) -> String {
    match tone {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => DEFAULT_TONE.to_string(),
    }
}
