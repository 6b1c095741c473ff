//! # Morphological Tier Decoding
//!
//! Each whitespace separated token of a `%mor` tier has the shape
//! `category|lexeme<extra>`:
//!
//! * `category` – everything before the first pipe (`v`, `n:prop`, `pro:sub`)
//! * `lexeme` – the run of letters right after the pipe
//! * `extra` – whatever follows the lexeme (`-3S&PRES`, `~pro:clit|3S`, `=give`)
//!
//! Tokens without a pipe (terminators like `.`, `?`, `+...`) are dropped
//! silently. Tokens that carry a pipe but do not decode are dropped with a
//! warning. Alternative analyses are joined with `^`; the first one is decoded
//! and the rest are kept verbatim in [`MorphUnit::alternatives`].
//!
//! Two fixed tables clean up known tagger mistakes: [`STOP_WORDS`] removes
//! units entirely, and [`REPLACEMENTS`] maps mis-tagged lexemes to their
//! standard form.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const AMBIGUITY_MARKER: char = '^';

lazy_static! {
    static ref RE_MOR_UNIT: Regex = Regex::new(r"^([^|\s]+)\|(\p{L}+)(.*)$").unwrap();
}

/// One decoded word of the morphological tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphUnit {
    pub category: String,
    pub lexeme: String,
    pub extra: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl MorphUnit {
    pub fn new(category: &str, lexeme: &str, extra: &str) -> Self {
        Self {
            category: category.to_string(),
            lexeme: lexeme.to_string(),
            extra: extra.to_string(),
            alternatives: Vec::new(),
        }
    }

    /// `category|lexeme`, the key used by composite criteria.
    pub fn composite(&self) -> String {
        format!("{}|{}", self.category, self.lexeme)
    }

    pub fn is_ambiguous(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

/// A stop-word entry. `None` fields match anything.
#[derive(Debug, Clone, Copy)]
pub struct StopWord {
    pub category: Option<&'static str>,
    pub lexeme: &'static str,
    pub extra_contains: Option<&'static str>,
}

impl StopWord {
    pub fn matches(&self, unit: &MorphUnit) -> bool {
        self.category.map_or(true, |c| c == unit.category)
            && self.lexeme == unit.lexeme
            && self.extra_contains.map_or(true, |e| unit.extra.contains(e))
    }
}

pub const STOP_WORDS: &[StopWord] = &[
    // "dale", tagged as an imperative with a clitic
    StopWord {
        category: Some("imp"),
        lexeme: "da",
        extra_contains: Some("~pro:clit|3S"),
    },
    // unintelligible / untranscribed material
    StopWord {
        category: None,
        lexeme: "xxx",
        extra_contains: None,
    },
    StopWord {
        category: None,
        lexeme: "yyy",
        extra_contains: None,
    },
    StopWord {
        category: None,
        lexeme: "www",
        extra_contains: None,
    },
];

/// Hypocoristic and mis-tagged forms mapped to the standard lexeme.
pub const REPLACEMENTS: &[(&str, &str)] = &[("papi", "papá"), ("mami", "mamá"), ("vamos", "i")];

pub fn is_stop_word(unit: &MorphUnit) -> bool {
    STOP_WORDS.iter().any(|stop| stop.matches(unit))
}

fn normalize_lexeme(lexeme: &str) -> Option<&'static str> {
    REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == lexeme)
        .map(|(_, to)| *to)
}

/// Decoded `%mor` tier of one utterance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MorTier {
    pub units: Vec<MorphUnit>,
    /// At least one token carried alternative analyses.
    pub ambiguous: bool,
}

/// Decodes a single token, or returns `None` when it is discarded.
pub fn parse_mor_unit(token: &str, line: usize) -> Option<MorphUnit> {
    let mut segments = token.split(AMBIGUITY_MARKER);
    let first = segments.next().unwrap_or_default();
    let alternatives: Vec<String> = segments
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if !first.contains('|') {
        return None;
    }

    let Some(caps) = RE_MOR_UNIT.captures(first) else {
        tracing::warn!("Malformed mor token '{}' discarded (line {})", token, line);
        return None;
    };

    let mut unit = MorphUnit {
        category: caps[1].to_string(),
        lexeme: caps[2].to_string(),
        extra: caps[3].to_string(),
        alternatives,
    };

    if is_stop_word(&unit) {
        tracing::debug!("Stop word '{}' removed (line {})", token, line);
        return None;
    }

    if let Some(standard) = normalize_lexeme(&unit.lexeme) {
        unit.lexeme = standard.to_string();
    }

    Some(unit)
}

#[tracing::instrument(level = "debug", skip(content))]
pub fn parse_mor_tier(content: &str, line: usize) -> MorTier {
    let mut tier = MorTier::default();
    for token in content.split_whitespace() {
        if token.contains(AMBIGUITY_MARKER) {
            tier.ambiguous = true;
        }
        if let Some(unit) = parse_mor_unit(token, line) {
            tier.units.push(unit);
        }
    }
    tier
}
