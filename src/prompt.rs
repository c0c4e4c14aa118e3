//! Prompt assembly.
//!
//! The prompt is the only contract handed to the completion API, so it
//! spells out the full output schema the parser later enforces.

use std::sync::Arc;

use crate::culture::CultureClassifier;
use crate::motifs::MotifRepository;
use crate::types::{CultureTag, ScenarioRequest};

/// System instruction for the first generation attempt.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert storyteller who adapts modern scenarios into ancient myths. Always respond with valid JSON only.";

/// System instruction for the stricter retry attempt.
pub const RETRY_SYSTEM_INSTRUCTION: &str = "You must respond with valid JSON only. No other text.";

/// Appended to the user prompt on retry.
pub const RETRY_SUFFIX: &str =
    "\n\nIMPORTANT: Return ONLY valid JSON. No additional text or commentary.";

/// A prompt together with the culture and motifs it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub culture: CultureTag,
    pub motifs: String,
    pub text: String,
}

impl BuiltPrompt {
    /// The same prompt with the stricter retry instruction appended.
    pub fn strict_text(&self) -> String {
        format!("{}{RETRY_SUFFIX}", self.text)
    }
}

/// Builds generation prompts from requests.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    classifier: Arc<CultureClassifier>,
    motifs: Arc<MotifRepository>,
}

impl PromptBuilder {
    pub fn new(classifier: Arc<CultureClassifier>, motifs: Arc<MotifRepository>) -> Self {
        Self { classifier, motifs }
    }

    /// Resolve the culture, look up its motifs and render the prompt.
    pub fn build(&self, request: &ScenarioRequest) -> BuiltPrompt {
        let culture = self.classifier.resolve(request.culture, &request.scenario);
        let motifs = self.motifs.motifs_for_tag(culture);
        let text = render(culture, &motifs, &request.scenario, &request.tone);
        BuiltPrompt {
            culture,
            motifs,
            text,
        }
    }
}

fn render(culture: CultureTag, motifs: &str, scenario: &str, tone: &str) -> String {
    let name = culture.display_name();
    let tag = culture.as_str();
    format!(
        r#"You are a master storyteller, cultural historian, and respectful adapter of public-domain myths. Using only public domain sources and folklore motifs (Project Gutenberg, Sacred-Texts collections, or in-repo seed motifs), adapt the user's modern scenario into an ancient-style myth consistent with the requested culture.

Guidelines:
- Preserve essential mythic motifs and symbolic language from the chosen culture.
- Make the plot fit the modern scenario while maintaining mythic archetypes (hero, guide, trickster, boon, taboo, test).
- Use poetic yet clear language that is accessible to modern readers.
- Provide exactly 3 alternative interactive endings, each reflecting a different moral or interpretation.
- Output must be valid JSON with no extra commentary.

Cultural Context: {name}
Relevant Motifs: {motifs}

Modern Scenario: {scenario}

Tone: {tone}

Return JSON:
{{
"title": "<short evocative title>",
"adapted_story": "<full story text, ~350-900 words>",
"choices": [
{{"id":"c1","label":"<label>","outcome":"<text>"}},
{{"id":"c2","label":"<label>","outcome":"<text>"}},
{{"id":"c3","label":"<label>","outcome":"<text>"}}
],
"meta": {{"culture":"{tag}","source_motif":"<motif reference>"}}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motifs::MotifRecord;
    use crate::types::CultureChoice;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(
            Arc::new(CultureClassifier::default()),
            Arc::new(MotifRepository::with_embedded_seed()),
        )
    }

    #[test]
    fn auto_culture_is_detected() {
        let req = ScenarioRequest::new("viking odin valhalla at the office party");
        let prompt = builder().build(&req);
        assert_eq!(prompt.culture, CultureTag::Norse);
        assert!(prompt.text.contains("Cultural Context: Norse"));
        assert!(prompt.text.contains("Tree of worlds"));
        assert!(prompt.text.contains(r#""culture":"norse""#));
    }

    #[test]
    fn explicit_culture_wins_over_keywords() {
        let req = ScenarioRequest::new("viking odin valhalla at the office party")
            .culture(CultureChoice::Specific(CultureTag::NativeAmerican));
        let prompt = builder().build(&req);
        assert_eq!(prompt.culture, CultureTag::NativeAmerican);
        assert!(prompt.text.contains("Cultural Context: Native American"));
        assert!(prompt.text.contains(r#""culture":"native_american""#));
    }

    #[test]
    fn carries_scenario_tone_and_schema() {
        let req = ScenarioRequest::new("My flight got cancelled twice").tone("playful");
        let prompt = builder().build(&req);
        assert!(prompt.text.contains("Modern Scenario: My flight got cancelled twice"));
        assert!(prompt.text.contains("Tone: playful"));
        assert!(prompt.text.contains("exactly 3 alternative interactive endings"));
        for id in ["c1", "c2", "c3"] {
            assert!(prompt.text.contains(&format!(r#"{{"id":"{id}""#)));
        }
        assert!(prompt.text.contains("source_motif"));
        assert!(prompt.text.contains("trickster"));
    }

    #[test]
    fn unknown_motifs_fall_back_to_universal() {
        let builder = PromptBuilder::new(
            Arc::new(CultureClassifier::default()),
            Arc::new(MotifRepository::from_records(vec![MotifRecord::new(
                "greek", "Labyrinth",
            )])),
        );
        let req = ScenarioRequest::new("Moving house this weekend").culture(CultureTag::Celtic);
        let prompt = builder.build(&req);
        assert!(prompt.motifs.starts_with("Hero's journey"));
    }

    #[test]
    fn strict_text_appends_retry_instruction() {
        let req = ScenarioRequest::new("Moving house this weekend");
        let prompt = builder().build(&req);
        let strict = prompt.strict_text();
        assert!(strict.starts_with(&prompt.text));
        assert!(strict.ends_with("No additional text or commentary."));
    }
}
