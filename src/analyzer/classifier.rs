//! # Word Class Classification
//!
//! Finds which positions of a morphological tier count as verbs, nouns and
//! adjectives.
//!
//! Verbs are found destructively over a [`WorkingSet`] so a unit is never
//! counted twice:
//!
//! 1. light-verb constructions (`tener que` + infinitive, `have to` + verb)
//!    contribute their head and consume every matched unit;
//! 2. copula + participle/gerund contribute the second unit;
//! 3. every remaining unit with a single-verb category is a verb.
//!
//! Nouns exclude anything already claimed as a verb. Adjectives follow their
//! category, and in Spanish a participle right after a copula is an adjective
//! as well, regardless of whether step 2 also counted it as a verb.

use serde::{Deserialize, Serialize};

use super::{
    criteria::{Criteria, MatchField, WorkingSet},
    lexicon::{Lexicon, COPULA, PARTICIPLE},
};
use crate::{config::ClassifierConfig, language::Language, tier::MorphUnit};

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
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    Verb,
    Noun,
    Adjective,
}

/// Positions of one utterance's morphological tier, by word class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordClasses {
    pub verbs: Vec<usize>,
    pub nouns: Vec<usize>,
    pub adjectives: Vec<usize>,
    /// A light-verb or copula construction was collapsed.
    pub has_light_verbs: bool,
}

impl WordClasses {
    pub fn indexes(&self, class: WordClass) -> &[usize] {
        match class {
            WordClass::Verb => &self.verbs,
            WordClass::Noun => &self.nouns,
            WordClass::Adjective => &self.adjectives,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerbScan {
    pub verbs: Vec<usize>,
    pub has_light_verbs: bool,
}

pub fn classify_verbs(units: &[MorphUnit], lexicon: &Lexicon, config: &ClassifierConfig) -> VerbScan {
    let mut working = WorkingSet::new(units);
    let mut verbs = Vec::new();

    if config.process_light_verbs {
        for pattern in &lexicon.light_verbs {
            verbs.extend(working.drain_matches(pattern, |matched| matched.last().copied()));
        }
        for pattern in &lexicon.copula_patterns {
            verbs.extend(working.drain_matches(pattern, |matched| matched.get(1).copied()));
        }
    }
    let has_light_verbs = working.remaining() < units.len();

    let single = Criteria::new().then(
        MatchField::Category,
        &lexicon.single_verb_categories(config),
    );
    verbs.extend(working.drain_matches(&single, |matched| matched.first().copied()));

    verbs.sort_unstable();
    VerbScan {
        verbs,
        has_light_verbs,
    }
}

/// Nouns, skipping positions already claimed as verbs.
pub fn classify_nouns(units: &[MorphUnit], lexicon: &Lexicon, verbs: &[usize]) -> Vec<usize> {
    units
        .iter()
        .enumerate()
        .filter(|(index, unit)| lexicon.is_noun(&unit.category) && !verbs.contains(index))
        .map(|(index, _)| index)
        .collect()
}

pub fn classify_adjectives(units: &[MorphUnit], lexicon: &Lexicon) -> Vec<usize> {
    units
        .iter()
        .enumerate()
        .filter(|(index, unit)| {
            lexicon.is_adjective(&unit.category)
                || (lexicon.participle_adjectives
                    && unit.category == PARTICIPLE
                    && index
                        .checked_sub(1)
                        .is_some_and(|previous| units[previous].category == COPULA))
        })
        .map(|(index, _)| index)
        .collect()
}

#[tracing::instrument(level = "trace", skip(units, config))]
pub fn classify(
    units: &[MorphUnit],
    language: Option<Language>,
    config: &ClassifierConfig,
) -> WordClasses {
    let lexicon = Lexicon::for_language(language);
    let VerbScan {
        verbs,
        has_light_verbs,
    } = classify_verbs(units, lexicon, config);
    let nouns = classify_nouns(units, lexicon, &verbs);
    let adjectives = classify_adjectives(units, lexicon);

    WordClasses {
        verbs,
        nouns,
        adjectives,
        has_light_verbs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::morphology::parse_mor_tier;
    use pretty_assertions::assert_eq;

    fn spanish(tier: &str) -> WordClasses {
        let units = parse_mor_tier(tier, 1).units;
        classify(&units, Some(Language::Spanish), &ClassifierConfig::default())
    }

    #[test]
    fn test_tener_que_collapses_to_head() {
        let classes = spanish("aux|tene lk|que v|juga-3S");
        assert_eq!(classes.verbs, vec![2]);
        assert!(classes.has_light_verbs);
    }

    #[test]
    fn test_plain_verbs() {
        let classes = spanish("pro:sub|yo v|quiere-1S n|agua .");
        assert_eq!(classes.verbs, vec![1]);
        assert_eq!(classes.nouns, vec![2]);
        assert!(!classes.has_light_verbs);
    }

    #[test]
    fn test_coordinated_verbs_all_count() {
        let classes = spanish("v|corre-3S conj|y v|salta-3S");
        assert_eq!(classes.verbs, vec![0, 2]);
    }

    #[test]
    fn test_repeated_light_verbs() {
        let classes = spanish("v|pode-1S inf|juga conj|y v|pode-1S inf|corre");
        assert_eq!(classes.verbs, vec![1, 4]);
        assert!(classes.has_light_verbs);
    }

    #[test]
    fn test_copula_participle() {
        let classes = spanish("pro|eso cop|se-3S part|rompe-PP");
        assert_eq!(classes.verbs, vec![2]);
        assert!(classes.has_light_verbs);
        // the Spanish adjective rule fires on the same unit
        assert_eq!(classes.adjectives, vec![2]);
    }

    #[test]
    fn test_copula_gerund() {
        let classes = spanish("cop|se-3S ger|juga-GER");
        assert_eq!(classes.verbs, vec![1]);
        assert!(classes.has_light_verbs);
        assert!(classes.adjectives.is_empty());
    }

    #[test]
    fn test_estar_is_a_light_verb_root() {
        // "esta" is consumed by the light-verb table before the copula table runs
        let classes = spanish("cop|esta-3S part|cansa-PP");
        assert_eq!(classes.verbs, vec![1]);
        assert!(classes.has_light_verbs);
        assert_eq!(classes.adjectives, vec![1]);
    }

    #[test]
    fn test_english_copula_participle() {
        let units = parse_mor_tier("pro:sub|he cop|be&3S part|tire-PASTP .", 1).units;
        let classes = classify(&units, Some(Language::English), &ClassifierConfig::default());
        assert_eq!(classes.verbs, vec![2]);
        assert!(classes.has_light_verbs);
        assert!(classes.adjectives.is_empty());
    }

    #[test]
    fn test_copula_alone_depends_on_config() {
        let units = parse_mor_tier("cop|es-3S adj|lindo", 1).units;
        let default = classify(&units, Some(Language::Spanish), &ClassifierConfig::default());
        assert!(default.verbs.is_empty());
        assert_eq!(default.adjectives, vec![1]);

        let config = ClassifierConfig {
            count_copula_and_auxiliary: true,
            ..ClassifierConfig::default()
        };
        let counted = classify(&units, Some(Language::Spanish), &config);
        assert_eq!(counted.verbs, vec![0]);
    }

    #[test]
    fn test_light_verbs_disabled() {
        let units = parse_mor_tier("aux|tene lk|que v|juga-3S", 1).units;
        let config = ClassifierConfig {
            process_light_verbs: false,
            count_copula_and_auxiliary: true,
        };
        let classes = classify(&units, Some(Language::Spanish), &config);
        assert_eq!(classes.verbs, vec![0, 2]);
        assert!(!classes.has_light_verbs);
    }

    #[test]
    fn test_english_have_to() {
        let units = parse_mor_tier("pro:sub|I v|have inf|to v|go .", 1).units;
        let classes = classify(&units, Some(Language::English), &ClassifierConfig::default());
        assert_eq!(classes.verbs, vec![3]);
        assert!(classes.has_light_verbs);
    }

    #[test]
    fn test_english_infinitive_marker_not_counted() {
        let units = parse_mor_tier("pro:sub|I v|want inf|to v|play", 1).units;
        let classes = classify(&units, Some(Language::English), &ClassifierConfig::default());
        assert_eq!(classes.verbs, vec![1, 3]);
    }

    #[test]
    fn test_nouns_exclude_verbs() {
        let units = vec![
            MorphUnit::new("n", "run", ""),
            MorphUnit::new("n", "dog", ""),
        ];
        let lexicon = Lexicon::for_language(Some(Language::English));
        assert_eq!(classify_nouns(&units, lexicon, &[0]), vec![1]);
    }

    #[test]
    fn test_classification_does_not_touch_units() {
        let units = parse_mor_tier("aux|tene lk|que v|juga-3S n|pelota", 1).units;
        let before = units.clone();
        let first = classify(&units, Some(Language::Spanish), &ClassifierConfig::default());
        let second = classify(&units, Some(Language::Spanish), &ClassifierConfig::default());
        assert_eq!(first, second);
        assert_eq!(units, before);
    }

    #[test]
    fn test_indexes_by_class() {
        let classes = spanish("v|quiere-3S n|agua adj|fria");
        assert_eq!(classes.indexes(WordClass::Verb), &[0]);
        assert_eq!(classes.indexes(WordClass::Noun), &[1]);
        assert_eq!(classes.indexes(WordClass::Adjective), &[2]);
    }
}
