//! Motif repository: narrative patterns per culture.
//!
//! Motifs come from one of two sources:
//! 1. **Dataset file**: a JSON array of `{ "culture", "motif" }` records,
//!    read once at startup from a configured path
//! 2. **Embedded seed**: compiled-in JSON covering every known culture,
//!    used whenever the file is absent, unreadable or corrupt
//!
//! Once loaded the repository is immutable and can be shared across
//! concurrent requests without locking.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::CultureTag;

/// Returned when no record matches the requested culture.
pub const UNIVERSAL_MOTIFS: &str =
    "Hero's journey; wise mentor; transformative trial; choice of paths; return with wisdom";

/// Raw JSON seed data compiled into the binary.
const EMBEDDED_SEED: &str = include_str!("seed.json");

/// One `{culture, motif}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifRecord {
    pub culture: String,
    pub motif: String,
}

impl MotifRecord {
    pub fn new(culture: impl Into<String>, motif: impl Into<String>) -> Self {
        Self {
            culture: culture.into(),
            motif: motif.into(),
        }
    }
}

/// Read-only motif dataset.
#[derive(Debug, Clone, Default)]
pub struct MotifRepository {
    records: Vec<MotifRecord>,
}

impl MotifRepository {
    /// Create a repository from explicit records.
    pub fn from_records(records: Vec<MotifRecord>) -> Self {
        Self { records }
    }

    /// Create a repository from the embedded seed data.
    pub fn with_embedded_seed() -> Self {
        match serde_json::from_str::<Vec<MotifRecord>>(EMBEDDED_SEED) {
            Ok(records) => Self::from_records(records),
            Err(e) => {
                // Seed is compiled in and tested; an empty repository still
                // answers with the universal motifs.
                warn!(error = %e, "failed to parse embedded motif seed");
                Self::default()
            }
        }
    }

    /// Load from `path` if given and readable, otherwise use the embedded seed.
    pub fn load(path: Option<&Path>) -> Self {
        match path.and_then(load_file) {
            Some(records) => {
                debug!(count = records.len(), "loaded motif dataset");
                Self::from_records(records)
            }
            None => Self::with_embedded_seed(),
        }
    }

    /// All records, in dataset order.
    pub fn records(&self) -> &[MotifRecord] {
        &self.records
    }

    /// Motifs for `culture` joined with `"; "`, or [`UNIVERSAL_MOTIFS`].
    ///
    /// Culture names match case-insensitively. Never returns an empty string.
    pub fn motifs_for(&self, culture: &str) -> String {
        let wanted = culture.trim().to_lowercase();
        let matches: Vec<&str> = self
            .records
            .iter()
            .filter(|r| r.culture.trim().to_lowercase() == wanted)
            .map(|r| r.motif.as_str())
            .filter(|m| !m.trim().is_empty())
            .collect();
        if matches.is_empty() {
            UNIVERSAL_MOTIFS.to_string()
        } else {
            matches.join("; ")
        }
    }

    /// Convenience wrapper over [`motifs_for`](Self::motifs_for).
    pub fn motifs_for_tag(&self, culture: CultureTag) -> String {
        self.motifs_for(culture.as_str())
    }
}

/// Read a dataset file. Returns `None` on missing or corrupt file.
fn load_file(path: &Path) -> Option<Vec<MotifRecord>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "motif dataset unreadable, using embedded seed");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(records) => Some(records),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt motif dataset, using embedded seed");
            None
        }
    }
}
