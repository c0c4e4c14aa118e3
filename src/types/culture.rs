//! Cultural traditions a myth can be told in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A known mythological tradition.
///
/// Closed set; not extensible at runtime. Declaration order is significant:
/// it is the default order of the culture classifier's keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultureTag {
    Greek,
    Norse,
    Indian,
    Japanese,
    Egyptian,
    Celtic,
    Chinese,
    African,
    NativeAmerican,
}

impl CultureTag {
    /// Every known culture, in declaration order.
    pub const ALL: [CultureTag; 9] = [
        CultureTag::Greek,
        CultureTag::Norse,
        CultureTag::Indian,
        CultureTag::Japanese,
        CultureTag::Egyptian,
        CultureTag::Celtic,
        CultureTag::Chinese,
        CultureTag::African,
        CultureTag::NativeAmerican,
    ];

    /// Culture used when nothing in a scenario points anywhere else.
    pub const DEFAULT: CultureTag = CultureTag::Greek;

    /// Wire identifier (`"native_american"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CultureTag::Greek => "greek",
            CultureTag::Norse => "norse",
            CultureTag::Indian => "indian",
            CultureTag::Japanese => "japanese",
            CultureTag::Egyptian => "egyptian",
            CultureTag::Celtic => "celtic",
            CultureTag::Chinese => "chinese",
            CultureTag::African => "african",
            CultureTag::NativeAmerican => "native_american",
        }
    }

    /// Human-readable name used in prompts (`"Native American"`).
    pub fn display_name(&self) -> &'static str {
        match self {
            CultureTag::Greek => "Greek",
            CultureTag::Norse => "Norse",
            CultureTag::Indian => "Indian",
            CultureTag::Japanese => "Japanese",
            CultureTag::Egyptian => "Egyptian",
            CultureTag::Celtic => "Celtic",
            CultureTag::Chinese => "Chinese",
            CultureTag::African => "African",
            CultureTag::NativeAmerican => "Native American",
        }
    }
}

impl fmt::Display for CultureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CultureTag {
    type Err = String;

    /// Case-insensitive parse of the wire identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CultureTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == lower)
            .ok_or_else(|| format!("unknown culture: {s}"))
    }
}

/// The culture a caller asked for: a specific tradition or `"auto"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CultureChoice {
    /// Let the classifier pick from the scenario text.
    #[default]
    Auto,
    Specific(CultureTag),
}

impl CultureChoice {
    pub const AUTO: &'static str = "auto";

    /// Lenient parse: unknown values are coerced to [`CultureChoice::Auto`].
    pub fn parse_lenient(s: &str) -> Self {
        s.parse::<CultureTag>()
            .map(CultureChoice::Specific)
            .unwrap_or(CultureChoice::Auto)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CultureChoice::Auto => Self::AUTO,
            CultureChoice::Specific(tag) => tag.as_str(),
        }
    }
}

impl From<CultureTag> for CultureChoice {
    fn from(tag: CultureTag) -> Self {
        CultureChoice::Specific(tag)
    }
}

impl fmt::Display for CultureChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CultureChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CultureChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(CultureChoice::parse_lenient)
            .unwrap_or_default())
    }
}
