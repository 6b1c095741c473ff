//! Addressee resolution.
//!
//! Files coded with an `%xds` tier carry one letter per utterance. Files
//! without it mark child-directed speech inline with `[+ CHI]` or `[+ OCH]`;
//! everything else is taken to be addressed to an adult.

use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Addressee {
    TargetChild,
    OtherChild,
    Adult,
    Other,
    Unknown,
    /// Adult and target child at once.
    Both,
    Pet,
}

impl Addressee {
    /// Maps an `%xds` code.
    pub fn from_xds(code: &str) -> Option<Self> {
        match code {
            "T" => Some(Addressee::TargetChild),
            "C" => Some(Addressee::OtherChild),
            "A" => Some(Addressee::Adult),
            "O" => Some(Addressee::Other),
            "U" => Some(Addressee::Unknown),
            "B" => Some(Addressee::Both),
            "P" => Some(Addressee::Pet),
            _ => None,
        }
    }

    /// Speech the target child hears as addressed to them.
    pub fn is_child_directed(&self) -> bool {
        matches!(self, Addressee::TargetChild | Addressee::Both)
    }
}

/// Inline tags, checked in order; the first one present wins.
const INLINE_TAGS: &[(&str, Addressee)] = &[
    ("[+ CHI]", Addressee::TargetChild),
    ("[+ OCH]", Addressee::OtherChild),
];

/// Resolves the addressee from inline tags and strips every tag from `text`.
/// Spacing elsewhere in the text is left untouched.
pub fn resolve_inline(text: &str) -> (String, Addressee) {
    let addressee = INLINE_TAGS
        .iter()
        .find(|(tag, _)| text.contains(tag))
        .map_or(Addressee::Adult, |(_, addressee)| *addressee);

    let mut visible = text.to_string();
    for (tag, _) in INLINE_TAGS {
        while let Some(at) = visible.find(tag) {
            visible = remove_at(&visible, at, tag.len());
        }
    }
    (visible, addressee)
}

// joins the text around a removed span with a single space
fn remove_at(text: &str, at: usize, len: usize) -> String {
    let before = text[..at].trim_end();
    let after = text[at + len..].trim_start();
    if before.is_empty() || after.is_empty() {
        format!("{before}{after}")
    } else {
        format!("{before} {after}")
    }
}

/// Resolves the addressee from an `%xds` code, logging unknown codes.
pub fn resolve_xds(code: &str, line: usize) -> Addressee {
    match Addressee::from_xds(code) {
        Some(addressee) => addressee,
        None => {
            tracing::warn!("Unknown addressee '{}' in line {}", code, line);
            Addressee::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_target_child() {
        let (text, addressee) = resolve_inline("mirá el perro [+ CHI] .");
        assert_eq!(addressee, Addressee::TargetChild);
        assert_eq!(text, "mirá el perro .");
    }

    #[test]
    fn test_inline_first_tag_wins() {
        let (text, addressee) = resolve_inline("vení [+ OCH] [+ CHI] .");
        assert_eq!(addressee, Addressee::TargetChild);
        assert_eq!(text, "vení .");
    }

    #[test]
    fn test_inline_tag_keeps_spacing() {
        let (tagged, _) = resolve_inline("vení  acá [+ OCH] .");
        let (untagged, _) = resolve_inline("vení  acá .");
        assert_eq!(tagged, "vení  acá .");
        assert_eq!(tagged, untagged);

        let (trailing, addressee) = resolve_inline("mirá [+ CHI]");
        assert_eq!(trailing, "mirá");
        assert_eq!(addressee, Addressee::TargetChild);
    }

    #[test]
    fn test_inline_default_adult() {
        let (text, addressee) = resolve_inline("qué hora es ?");
        assert_eq!(addressee, Addressee::Adult);
        assert_eq!(text, "qué hora es ?");
    }

    #[test]
    fn test_xds_codes() {
        assert_eq!(resolve_xds("T", 1), Addressee::TargetChild);
        assert_eq!(resolve_xds("C", 1), Addressee::OtherChild);
        assert_eq!(resolve_xds("B", 1), Addressee::Both);
        assert_eq!(resolve_xds("P", 1), Addressee::Pet);
        assert_eq!(resolve_xds("Z", 1), Addressee::Unknown);
    }

    #[test]
    fn test_child_directed() {
        assert!(Addressee::TargetChild.is_child_directed());
        assert!(Addressee::Both.is_child_directed());
        assert!(!Addressee::OtherChild.is_child_directed());
    }
}
