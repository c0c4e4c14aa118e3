//! Input sanitation and coarse content screening.
//!
//! [`sanitize`] strips markup and anything outside a small character
//! allow-list. [`ContentValidator`] rejects scenarios that are too short,
//! too long, or contain a disallowed term. Neither is a moderation system:
//! they exist to turn away cheap, obvious cases before any API round-trip.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{MythError, Result};

/// Default minimum scenario length, in characters after trimming.
pub const DEFAULT_MIN_LENGTH: usize = 10;

/// Default maximum scenario length, in characters after sanitation.
pub const DEFAULT_MAX_LENGTH: usize = 2000;

/// Default disallowed terms (matched as case-insensitive substrings).
pub const DEFAULT_DISALLOWED_TERMS: &[&str] =
    &["hate", "violence", "illegal", "harmful", "explicit"];

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid markup regex"));

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\w\s\-.,!?;:()'"]"#).expect("valid allow-list regex"));

/// Strip `<...>` markup and unsafe characters, then trim.
///
/// Pure and idempotent; always returns a string, possibly empty.
pub fn sanitize(text: &str) -> String {
    let without_markup = MARKUP.replace_all(text, "");
    let safe = UNSAFE_CHARS.replace_all(&without_markup, "");
    safe.trim().to_string()
}

/// Heuristic scenario filter.
///
/// Term list and bounds are data, not logic: build one from configuration
/// with [`ContentValidator::new`] or take the defaults.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    min_length: usize,
    max_length: usize,
    disallowed_terms: Vec<String>,
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_LENGTH,
            DEFAULT_MAX_LENGTH,
            DEFAULT_DISALLOWED_TERMS.iter().map(|t| t.to_string()),
        )
    }
}

impl ContentValidator {
    pub fn new(
        min_length: usize,
        max_length: usize,
        disallowed_terms: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            min_length,
            max_length,
            disallowed_terms: disallowed_terms
                .into_iter()
                .map(|t| t.to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// `false` if the trimmed scenario is shorter than the minimum or
    /// contains any disallowed term.
    pub fn is_acceptable(&self, scenario: &str) -> bool {
        if scenario.trim().chars().count() < self.min_length {
            return false;
        }
        let lower = scenario.to_lowercase();
        !self
            .disallowed_terms
            .iter()
            .any(|term| lower.contains(term.as_str()))
    }

    /// Full request check on an already-sanitized scenario.
    ///
    /// Returns a [`MythError::Validation`] whose message names the violated
    /// constraint.
    pub fn validate(&self, scenario: &str) -> Result<()> {
        if scenario.trim().is_empty() {
            return Err(MythError::Validation("Scenario cannot be empty".into()));
        }
        if !self.is_acceptable(scenario) {
            return Err(MythError::Validation(
                "Scenario content is not appropriate or too short".into(),
            ));
        }
        if scenario.chars().count() > self.max_length {
            return Err(MythError::Validation(format!(
                "Scenario too long. Maximum {} characters allowed.",
                self.max_length
            )));
        }
        Ok(())
    }
}
