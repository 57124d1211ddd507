//! Operation identifiers.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// One public text-processing capability.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Condense text.
    Summarize,
    /// Translate text into another language.
    Translate,
    /// Pull schema-shaped data out of text.
    Extract,
    /// Assign one of a fixed set of categories.
    Classify,
    /// Correct grammar and spelling.
    Grammar,
    /// Label sentiment.
    Sentiment,
    /// List the main points.
    KeyPoints,
    /// Rewrite with a different tone or style.
    Rewrite,
    /// Answer a question about the text.
    Answer,
    /// Identify the language.
    DetectLanguage,
    /// Produce tags or hashtags.
    GenerateTags,
    /// Replace personally identifiable information.
    Anonymize,
    /// Compare two texts.
    Compare,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Summarize,
        Self::Translate,
        Self::Extract,
        Self::Classify,
        Self::Grammar,
        Self::Sentiment,
        Self::KeyPoints,
        Self::Rewrite,
        Self::Answer,
        Self::DetectLanguage,
        Self::GenerateTags,
        Self::Anonymize,
        Self::Compare,
    ];

    /// Returns the snake-case name (`"key_points"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Translate => "translate",
            Self::Extract => "extract",
            Self::Classify => "classify",
            Self::Grammar => "grammar",
            Self::Sentiment => "sentiment",
            Self::KeyPoints => "key_points",
            Self::Rewrite => "rewrite",
            Self::Answer => "answer",
            Self::DetectLanguage => "detect_language",
            Self::GenerateTags => "generate_tags",
            Self::Anonymize => "anonymize",
            Self::Compare => "compare",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == needle)
            .ok_or_else(|| Error::validation(format!("unknown operation `{s}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_names() {
        for op in Operation::ALL {
            let parsed = op.to_string().parse::<Operation>().expect("parse");
            assert_eq!(op, parsed);
        }
    }

    #[test]
    fn accepts_kebab_case() {
        assert_eq!(
            "Detect-Language".parse::<Operation>().unwrap(),
            Operation::DetectLanguage
        );
        assert!("shout".parse::<Operation>().is_err());
    }
}
