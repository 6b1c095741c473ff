//! Per-language category sets and verb-phrase tables used by the classifier.

use lazy_static::lazy_static;

use super::criteria::{Criteria, MatchField};
use crate::{config::ClassifierConfig, language::Language};

/// Categories counted as verbs before copula/auxiliary and language exclusions.
pub const VERB_CATEGORIES: &[&str] = &["v", "ger", "part", "aux", "imp", "inf", "cop"];
pub const COPULA: &str = "cop";
pub const AUXILIARY: &str = "aux";
pub const PARTICIPLE: &str = "part";
/// Comma, never counted as a word.
pub const COMMA: &str = "cm";

// auxiliary roots that hand their count to the following verb
const SPANISH_LIGHT_VERB_ROOTS: &[&[&str]] = &[
    &["i", "a"],
    &["tene", "que"],
    &["pode"],
    &["habe"],
    &["esta"],
    &["deja", "de"],
    &["debe"],
    &["acaba", "de"],
    &["termina", "de"],
    &["habe", "que"],
    &["esta", "por"],
    &["empeza", "a"],
    &["empeza", "por"],
    &["comienzo", "a"],
    &["comenza", "a"],
    &["pone", "a"],
    &["volve", "a"],
];
const SPANISH_HEAD_CATEGORIES: &[&str] = &["inf", "ger", "part", "v"];

const ENGLISH_LIGHT_VERB_ROOTS: &[&[&str]] = &[
    &["have", "to"],
    &["got", "to"],
    &["go", "to"],
    &["need", "to"],
];
const ENGLISH_HEAD_CATEGORIES: &[&str] = &["v"];

#[derive(Debug, Clone)]
pub struct Lexicon {
    pub language: Language,
    /// Auxiliary + head patterns; the last matched unit is the verb.
    pub light_verbs: Vec<Criteria>,
    /// Copula + participle/gerund patterns; the second unit is the verb.
    pub copula_patterns: Vec<Criteria>,
    /// Categories never counted as standalone verbs in this language.
    pub excluded_verb_categories: Vec<&'static str>,
    pub noun_categories: Vec<&'static str>,
    pub adjective_categories: Vec<&'static str>,
    /// A participle right after a copula is also an adjective.
    pub participle_adjectives: bool,
}

fn light_verb_table(roots: &[&[&str]], heads: &[&str]) -> Vec<Criteria> {
    roots
        .iter()
        .map(|root| {
            root.iter()
                .fold(Criteria::new(), |criteria, lexeme| {
                    criteria.then(MatchField::Lexeme, &[*lexeme])
                })
                .then(MatchField::Category, heads)
        })
        .collect()
}

lazy_static! {
    static ref SPANISH: Lexicon = Lexicon {
        language: Language::Spanish,
        light_verbs: light_verb_table(SPANISH_LIGHT_VERB_ROOTS, SPANISH_HEAD_CATEGORIES),
        copula_patterns: vec![Criteria::uniform(
            MatchField::Category,
            &[&[COPULA], &["ger", PARTICIPLE]]
        )],
        excluded_verb_categories: vec![],
        noun_categories: vec!["n"],
        adjective_categories: vec!["adj"],
        participle_adjectives: true,
    };
    static ref ENGLISH: Lexicon = Lexicon {
        language: Language::English,
        light_verbs: light_verb_table(ENGLISH_LIGHT_VERB_ROOTS, ENGLISH_HEAD_CATEGORIES),
        copula_patterns: vec![Criteria::uniform(
            MatchField::Category,
            &[&[COPULA], &[PARTICIPLE]]
        )],
        // infinitive marker "to"
        excluded_verb_categories: vec!["inf"],
        noun_categories: vec!["n", "n:gerund", "n:pt"],
        adjective_categories: vec!["adj"],
        participle_adjectives: false,
    };
}

impl Lexicon {
    /// Lexicon for a transcript language; unset falls back to Spanish.
    pub fn for_language(language: Option<Language>) -> &'static Lexicon {
        match language {
            Some(Language::English) => &ENGLISH,
            Some(Language::Spanish) | None => &SPANISH,
        }
    }

    /// Categories counted when a verb stands on its own.
    pub fn single_verb_categories(&self, config: &ClassifierConfig) -> Vec<&'static str> {
        VERB_CATEGORIES
            .iter()
            .copied()
            .filter(|category| {
                config.count_copula_and_auxiliary || (*category != COPULA && *category != AUXILIARY)
            })
            .filter(|category| !self.excluded_verb_categories.contains(category))
            .collect()
    }

    pub fn is_noun(&self, category: &str) -> bool {
        self.noun_categories.iter().any(|c| *c == category)
    }

    pub fn is_adjective(&self, category: &str) -> bool {
        self.adjective_categories.iter().any(|c| *c == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_light_verb_table_shape() {
        let lexicon = Lexicon::for_language(Some(Language::Spanish));
        assert_eq!(lexicon.light_verbs.len(), SPANISH_LIGHT_VERB_ROOTS.len());

        let tener_que = &lexicon.light_verbs[1];
        assert_eq!(tener_que.len(), 3);
        assert_eq!(tener_que.positions()[0].field, MatchField::Lexeme);
        assert_eq!(tener_que.positions()[2].field, MatchField::Category);
        assert_eq!(tener_que.positions()[2].alternatives, vec!["inf", "ger", "part", "v"]);
    }

    #[test]
    fn test_single_verb_categories() {
        let spanish = Lexicon::for_language(Some(Language::Spanish));
        let english = Lexicon::for_language(Some(Language::English));
        let default = ClassifierConfig::default();
        let with_cop = ClassifierConfig {
            count_copula_and_auxiliary: true,
            ..ClassifierConfig::default()
        };

        assert_eq!(
            spanish.single_verb_categories(&default),
            vec!["v", "ger", "part", "imp", "inf"]
        );
        assert_eq!(
            spanish.single_verb_categories(&with_cop),
            VERB_CATEGORIES.to_vec()
        );
        assert_eq!(
            english.single_verb_categories(&default),
            vec!["v", "ger", "part", "imp"]
        );
    }

    #[test]
    fn test_unset_language_uses_spanish() {
        assert_eq!(Lexicon::for_language(None).language, Language::Spanish);
    }
}
