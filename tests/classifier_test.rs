mod common;

use std::collections::BTreeMap;

use chatfile::{
    analyzer::classifier::classify, parse_query, Addressee, ClassifierConfig, Error, Language,
    Transcript, TranscriptConfig, TypeTokenRatio, WordClass,
};
use pretty_assertions::assert_eq;

fn counts(entries: &[(&str, usize)]) -> BTreeMap<String, usize> {
    entries
        .iter()
        .map(|(lexeme, count)| (lexeme.to_string(), *count))
        .collect()
}

#[test]
fn it_collapses_light_verbs_onto_their_head() {
    let transcript = Transcript::parse(&common::home_recording(), &TranscriptConfig::default());
    let classes = transcript.word_classes().unwrap();

    // tener que + comer
    assert_eq!(classes[0].verbs, vec![2]);
    assert!(classes[0].has_light_verbs);
    // ir a + dormir
    assert_eq!(classes[4].verbs, vec![6]);
    assert!(classes[4].has_light_verbs);
    // plain imperative
    assert_eq!(classes[5].verbs, vec![0]);
    assert!(!classes[5].has_light_verbs);
}

#[test]
fn it_counts_word_classes() {
    let transcript = Transcript::parse(&common::home_recording(), &TranscriptConfig::default());

    assert_eq!(
        transcript.lexeme_counts(WordClass::Verb).unwrap(),
        counts(&[("cansa", 1), ("come", 2), ("dormi", 1), ("mira", 1)])
    );
    assert_eq!(
        transcript.lexeme_counts(WordClass::Noun).unwrap(),
        counts(&[("nena", 1)])
    );
    // the participle after the copula counts as verb and as adjective
    assert_eq!(
        transcript.lexeme_counts(WordClass::Adjective).unwrap(),
        counts(&[("cansa", 1)])
    );

    assert_eq!(
        transcript.count_class_by_speaker(WordClass::Verb).unwrap(),
        counts(&[("FAT", 1), ("MOT", 4)])
    );
    let by_addressee = transcript.count_class_by_addressee(WordClass::Verb).unwrap();
    assert_eq!(by_addressee.get(&Addressee::TargetChild), Some(&3));
    assert_eq!(by_addressee.get(&Addressee::Adult), Some(&2));
}

#[test]
fn it_classifies_english_transcripts() {
    let source = "@Languages:\teng\n*MOT:\tyou have to eat your peas .\n%mor:\tpro:per|you v|have inf|to v|eat det:poss|your n|pea-PL .\n*MOT:\tI want to go swimming .\n%mor:\tpro:sub|I v|want inf|to v|go n:gerund|swim-PRESP .\n";
    let transcript = Transcript::parse(source, &TranscriptConfig::default());
    assert_eq!(transcript.language(), Some(Language::English));

    let classes = transcript.word_classes().unwrap();
    assert_eq!(classes[0].verbs, vec![3]);
    assert!(classes[0].has_light_verbs);
    assert_eq!(classes[0].nouns, vec![5]);
    assert_eq!(classes[1].verbs, vec![1, 3]);
    assert_eq!(classes[1].nouns, vec![4]);
}

#[test]
fn it_counts_copulas_when_asked() {
    let source = "@Languages:\tspa\n*MOT:\tes lindo .\n%mor:\tcop|se-3S adj|lindo .\n";
    let default = Transcript::parse(source, &TranscriptConfig::default());
    assert_eq!(default.count_class(WordClass::Verb).unwrap(), 0);

    let config = TranscriptConfig {
        classifier: ClassifierConfig {
            count_copula_and_auxiliary: true,
            ..ClassifierConfig::default()
        },
        ..TranscriptConfig::default()
    };
    let counted = Transcript::parse(source, &config);
    assert_eq!(counted.count_class(WordClass::Verb).unwrap(), 1);
}

#[test]
fn it_classifies_without_touching_the_tier() {
    let transcript = Transcript::parse(&common::home_recording(), &TranscriptConfig::default());
    let before: Vec<_> = transcript.utterances().iter().map(|u| u.morphology.clone()).collect();

    let first = transcript.word_classes().unwrap().to_vec();
    let second = transcript.word_classes().unwrap().to_vec();
    assert_eq!(first, second);

    let again: Vec<_> = transcript
        .utterances()
        .iter()
        .map(|u| classify(u.morphology(), transcript.language(), &ClassifierConfig::default()))
        .collect();
    assert_eq!(first, again);

    let after: Vec<_> = transcript.utterances().iter().map(|u| u.morphology.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn it_finds_utterances_by_query() {
    let transcript = Transcript::parse(&common::home_recording(), &TranscriptConfig::default());

    let hits = transcript
        .find_by_criteria(&parse_query("lex:tene lex:que cat:inf,v").unwrap())
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].utterance.line_number, 6);
    assert_eq!(hits[0].indexes, vec![0, 1, 2]);

    let hits = transcript
        .find_by_criteria(&parse_query("cop ger,part").unwrap())
        .unwrap();
    let found: Vec<(usize, Vec<String>)> = hits
        .iter()
        .map(|hit| {
            (
                hit.utterance.line_number,
                hit.units.iter().map(|u| u.composite()).collect(),
            )
        })
        .collect();
    assert_eq!(
        found,
        vec![(14, vec!["cop|esta".to_string(), "part|cansa".to_string()])]
    );

    let father = transcript.utterance(14).unwrap();
    let criteria = parse_query("mor:n|nena").unwrap();
    assert_eq!(transcript.apply_criteria(father, &criteria).unwrap(), vec![1]);
}

#[test]
fn it_rejects_bad_queries() {
    assert!(matches!(parse_query("cat:"), Err(Error::Query { .. })));
    assert!(matches!(parse_query("cop,"), Err(Error::Query { .. })));
}

#[test]
fn it_measures_lexical_diversity() {
    let transcript = Transcript::parse(&common::home_recording(), &TranscriptConfig::default());
    let child_directed = transcript
        .lexical_diversity(&TypeTokenRatio, Some(Addressee::TargetChild))
        .unwrap();
    // tene que come | come | mira papá: 5 types over 6 tokens
    assert!((child_directed - 5.0 / 6.0).abs() < 1e-9);
}
