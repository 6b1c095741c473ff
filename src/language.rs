use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Transcript language, as declared by the `@Languages:` header.
///
/// Only the languages with a classifier lexicon are recognised; any other
/// code leaves the transcript language unset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
)]
pub enum Language {
    #[strum(serialize = "spa")]
    Spanish,
    #[strum(serialize = "eng")]
    English,
}

impl Language {
    /// Reads the first code of a `@Languages:` value (`"spa, eng"` -> Spanish).
    pub fn from_header(value: &str) -> Option<Self> {
        value
            .split(|c: char| c == ',' || c.is_whitespace())
            .find(|code| !code.is_empty())
            .and_then(|code| code.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header() {
        assert_eq!(Language::from_header("spa"), Some(Language::Spanish));
        assert_eq!(Language::from_header(" eng, spa"), Some(Language::English));
        assert_eq!(Language::from_header("fra"), None);
        assert_eq!(Language::from_header(""), None);
    }

    #[test]
    fn test_display_is_chat_code() {
        assert_eq!(Language::Spanish.to_string(), "spa");
        assert_eq!(Language::English.as_ref(), "eng");
    }
}
