//! Keyword-based culture detection.
//!
//! Each culture owns a list of keywords. A culture's score is the number of
//! its keywords that appear anywhere in the lowercased scenario (plain
//! substring containment, no word boundaries). The highest score wins.
//!
//! # Tie-break
//!
//! The keyword table is an ordered list. On a tie the culture that appears
//! first in the table wins. With the default table that is declaration order
//! of [`CultureTag`]. When nothing scores, the result is
//! [`CultureTag::DEFAULT`] (Greek), never `auto`.

use serde::Deserialize;

use crate::types::{CultureChoice, CultureTag};

/// Keywords associated with one culture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CultureKeywords {
    pub culture: CultureTag,
    pub keywords: Vec<String>,
}

impl CultureKeywords {
    pub fn new(culture: CultureTag, keywords: &[&str]) -> Self {
        Self {
            culture,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Number of keywords contained in `lowered`.
    fn score(&self, lowered: &str) -> usize {
        self.keywords
            .iter()
            .filter(|k| !k.is_empty() && lowered.contains(k.as_str()))
            .count()
    }
}

/// Scores scenarios against an ordered keyword table.
#[derive(Debug, Clone)]
pub struct CultureClassifier {
    table: Vec<CultureKeywords>,
}

impl Default for CultureClassifier {
    fn default() -> Self {
        Self::new(default_table())
    }
}

impl CultureClassifier {
    /// Build a classifier from an ordered table. Keywords are lowercased.
    pub fn new(table: Vec<CultureKeywords>) -> Self {
        let table = table
            .into_iter()
            .map(|mut entry| {
                entry.keywords = entry.keywords.iter().map(|k| k.to_lowercase()).collect();
                entry
            })
            .collect();
        Self { table }
    }

    pub fn table(&self) -> &[CultureKeywords] {
        &self.table
    }

    /// Per-culture scores in table order, zero scores included.
    pub fn scores(&self, scenario: &str) -> Vec<(CultureTag, usize)> {
        let lowered = scenario.to_lowercase();
        self.table
            .iter()
            .map(|entry| (entry.culture, entry.score(&lowered)))
            .collect()
    }

    /// Pick the best-matching culture, or Greek if nothing matches.
    pub fn detect(&self, scenario: &str) -> CultureTag {
        let mut best: Option<(CultureTag, usize)> = None;
        for (culture, score) in self.scores(scenario) {
            if score == 0 {
                continue;
            }
            // strictly greater: earlier entries keep ties
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((culture, score));
            }
        }
        best.map(|(culture, _)| culture)
            .unwrap_or(CultureTag::DEFAULT)
    }

    /// Resolve a requested culture: explicit tags pass through, `auto` is detected.
    pub fn resolve(&self, choice: CultureChoice, scenario: &str) -> CultureTag {
        match choice {
            CultureChoice::Specific(tag) => tag,
            CultureChoice::Auto => self.detect(scenario),
        }
    }
}

/// Built-in keyword table, in [`CultureTag`] declaration order.
pub fn default_table() -> Vec<CultureKeywords> {
    vec![
        CultureKeywords::new(
            CultureTag::Greek,
            &[
                "democracy", "philosophy", "theater", "olympics", "mediterranean", "athens",
                "sparta", "zeus", "apollo", "athena", "poseidon",
            ],
        ),
        CultureKeywords::new(
            CultureTag::Norse,
            &[
                "viking", "nordic", "scandinavia", "iceland", "norway", "sweden", "denmark",
                "odin", "thor", "loki", "valhalla", "runes",
            ],
        ),
        CultureKeywords::new(
            CultureTag::Indian,
            &[
                "india", "hindu", "buddhism", "karma", "dharma", "yoga", "sanskrit", "ganges",
                "himalaya", "brahma", "vishnu", "shiva", "krishna",
            ],
        ),
        CultureKeywords::new(
            CultureTag::Japanese,
            &[
                "japan", "samurai", "ninja", "zen", "shinto", "tokyo", "kyoto", "cherry",
                "blossom", "amaterasu", "susanoo", "tsukuyomi",
            ],
        ),
        CultureKeywords::new(
            CultureTag::Egyptian,
            &[
                "egypt", "pharaoh", "pyramid", "sphinx", "nile", "cairo", "alexandria", "ra",
                "isis", "osiris", "anubis", "thoth", "hieroglyphs",
            ],
        ),
        CultureKeywords::new(
            CultureTag::Celtic,
            &[
                "ireland", "scotland", "wales", "druid", "celtic", "gaelic", "shamrock",
                "leprechaun", "brigid", "lugh", "morrigan",
            ],
        ),
        CultureKeywords::new(
            CultureTag::Chinese,
            &[
                "china", "tao", "confucius", "buddha", "dragon", "phoenix", "beijing", "jade",
                "emperor", "yin", "yang", "chi", "feng", "shui",
            ],
        ),
        CultureKeywords::new(
            CultureTag::African,
            &[
                "africa", "tribal", "sahara", "congo", "nile", "ancestor", "spirit", "anansi",
                "ubuntu", "griot", "baobab", "savanna",
            ],
        ),
        CultureKeywords::new(
            CultureTag::NativeAmerican,
            &[
                "native", "american", "tribal", "spirit", "nature", "eagle", "wolf", "great",
                "spirit", "medicine", "wheel", "totem", "shaman",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norse_keywords_detect_norse() {
        let c = CultureClassifier::default();
        assert_eq!(c.detect("viking odin valhalla"), CultureTag::Norse);
    }

    #[test]
    fn no_keywords_defaults_to_greek() {
        let c = CultureClassifier::default();
        assert_eq!(
            c.detect("My coworker keeps stealing my lunch from the fridge"),
            CultureTag::Greek
        );
        assert_eq!(c.detect(""), CultureTag::Greek);
    }

    #[test]
    fn keywords_match_as_substrings() {
        let c = CultureClassifier::default();
        // "celtic" 0, "scotland" + "ireland" = 2
        assert_eq!(
            c.detect("I got lost hiking in Scotland and Ireland"),
            CultureTag::Celtic
        );
        // "ra" hides inside "pyramid"
        let scores = c.scores("pyramid");
        assert!(scores.contains(&(CultureTag::Egyptian, 2)));
    }

    #[test]
    fn ties_go_to_first_in_table_order() {
        let c = CultureClassifier::default();
        // "tribal" scores one for both African and Native American
        assert_eq!(
            c.detect("Our tribal council meeting went long"),
            CultureTag::African
        );
        // japanese, egyptian and african each score one
        assert_eq!(c.detect("the zen garden by the nile"), CultureTag::Japanese);
    }

    #[test]
    fn table_order_is_the_contract() {
        let c = CultureClassifier::new(vec![
            CultureKeywords::new(CultureTag::Celtic, &["stone"]),
            CultureKeywords::new(CultureTag::Norse, &["stone"]),
        ]);
        assert_eq!(c.detect("a standing STONE"), CultureTag::Celtic);

        let c = CultureClassifier::new(vec![
            CultureKeywords::new(CultureTag::Norse, &["stone"]),
            CultureKeywords::new(CultureTag::Celtic, &["stone"]),
        ]);
        assert_eq!(c.detect("a standing stone"), CultureTag::Norse);
    }

    #[test]
    fn higher_score_beats_earlier_entry() {
        let c = CultureClassifier::default();
        assert_eq!(
            c.detect("a dragon and a phoenix met in beijing"),
            CultureTag::Chinese
        );
    }

    #[test]
    fn resolve_passes_explicit_tags_through() {
        let c = CultureClassifier::default();
        assert_eq!(
            c.resolve(CultureTag::Celtic.into(), "viking odin valhalla"),
            CultureTag::Celtic
        );
        assert_eq!(
            c.resolve(CultureChoice::Auto, "viking odin valhalla"),
            CultureTag::Norse
        );
    }
}
