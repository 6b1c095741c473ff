//! # Transcripts
//!
//! [`Transcript::parse`] runs the whole pipeline over a CHAT source:
//!
//! 1. [`split_blocks`] cuts the text into marker blocks.
//! 2. `@Languages` sets the language; every `*SPK:` block opens an utterance
//!    and the `%tier:` blocks that follow are decoded through [`TierCode`] and
//!    attached to it. Unknown tiers are kept verbatim.
//! 3. Utterances by an ignored speaker are dropped together with their tiers.
//! 4. The addressee of every remaining utterance is resolved.
//! 5. The line filter and the child-directed filter run, and the survivors
//!    are numbered from 1.
//!
//! Everything after that is a read-only view. Word classes are computed the
//! first time a class-dependent view is requested and kept for the lifetime
//! of the transcript.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use serde::Serialize;

use crate::{
    addressee::{resolve_inline, resolve_xds, Addressee},
    analyzer::{classify, lexicon::COMMA, Criteria, WordClass, WordClasses},
    config::{TranscriptConfig, TurnConfig},
    diversity::LexicalDiversity,
    language::Language,
    tier::{
        activity::dominant_activity, bullet::extract_inline, split_blocks, Activity, Block,
        Bullet, MorphUnit, PragmaticFunction, Sigil, TierCode, TierValue,
    },
    turns::{Turn, TurnMode, TurnSegmenter},
    ChatResult, Error,
};

const LANGUAGES_HEADER: &str = "Languages";

/// One utterance and the dependent tiers attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    /// 1-based source line of the `*` marker.
    pub line_number: usize,
    /// 1-based position among the utterances that survived filtering.
    pub number: usize,
    pub speaker: String,
    /// Visible text, without bullets or addressee tags.
    pub text: String,
    pub addressee: Addressee,
    pub bullet: Option<Bullet>,
    /// `None` when the file has no `%mor` tier at all; `Some(vec![])` when the
    /// tier exists but nothing in it decoded.
    pub morphology: Option<Vec<MorphUnit>>,
    pub pragmatic: Option<PragmaticFunction>,
    pub activities: Option<Vec<Activity>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub raw_tiers: BTreeMap<String, String>,
}

impl Utterance {
    pub fn morphology(&self) -> &[MorphUnit] {
        self.morphology.as_deref().unwrap_or_default()
    }

    pub fn has_morphology(&self) -> bool {
        self.morphology.is_some()
    }

    /// No words to analyse: an empty `%mor` tier, or without one, no letters
    /// left in the text.
    pub fn is_empty(&self) -> bool {
        match &self.morphology {
            Some(units) => units.is_empty(),
            None => !self.text.chars().any(char::is_alphabetic),
        }
    }

    /// Morphological units that count as words (commas excluded).
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    fn words(&self) -> impl Iterator<Item = &MorphUnit> {
        self.morphology().iter().filter(|unit| unit.category != COMMA)
    }
}

/// An utterance matched by a criteria search.
#[derive(Debug, Clone, Serialize)]
pub struct CriteriaHit<'a> {
    pub utterance: &'a Utterance,
    pub indexes: Vec<usize>,
    pub units: Vec<&'a MorphUnit>,
}

#[derive(Debug)]
pub struct Transcript {
    name: String,
    path: Option<PathBuf>,
    language: Option<Language>,
    utterances: Vec<Utterance>,
    speakers: Vec<String>,
    has_morphology: bool,
    ambiguous_lines: Vec<usize>,
    config: TranscriptConfig,
    word_classes: OnceLock<Vec<WordClasses>>,
}

/// An utterance while its tiers are still being collected.
#[derive(Debug)]
struct PendingUtterance {
    line_number: usize,
    speaker: String,
    text: String,
    inline_bullet: Option<Bullet>,
    sound_bullet: Option<Bullet>,
    morphology: Option<Vec<MorphUnit>>,
    ambiguous: bool,
    pragmatic: Option<PragmaticFunction>,
    activities: Option<Vec<Activity>>,
    xds: Option<String>,
    raw_tiers: BTreeMap<String, String>,
}

impl PendingUtterance {
    fn open(block: &Block) -> Self {
        let (text, inline_bullet) = extract_inline(&block.content);
        Self {
            line_number: block.line,
            speaker: block.code.clone(),
            text,
            inline_bullet,
            sound_bullet: None,
            morphology: None,
            ambiguous: false,
            pragmatic: None,
            activities: None,
            xds: None,
            raw_tiers: BTreeMap::new(),
        }
    }

    fn attach(&mut self, block: &Block) {
        let Some(code) = TierCode::lookup(&block.code) else {
            self.raw_tiers
                .insert(block.code.clone(), block.content.clone());
            return;
        };

        match code.decode(&block.content, self.line_number) {
            TierValue::Morphology(tier) => {
                self.ambiguous |= tier.ambiguous;
                self.morphology = Some(tier.units);
            }
            TierValue::Pragmatic(function) => self.pragmatic = Some(function),
            TierValue::Activity(activities) => self.activities = Some(activities),
            TierValue::Addressee(code) if !code.is_empty() => self.xds = Some(code),
            TierValue::Addressee(_) => {}
            TierValue::Sound(bullet) => self.sound_bullet = bullet,
        }
    }

    /// Resolves the addressee. With `xds_coded` set the `%xds` value decides
    /// and a missing value means an adult; otherwise inline tags decide.
    fn resolve(self, xds_coded: bool) -> (Utterance, bool) {
        let (text, addressee) = match (&self.xds, xds_coded) {
            (Some(code), _) => (self.text, resolve_xds(code, self.line_number)),
            (None, true) => (self.text, Addressee::Adult),
            (None, false) => resolve_inline(&self.text),
        };

        let utterance = Utterance {
            line_number: self.line_number,
            number: 0,
            speaker: self.speaker,
            text,
            addressee,
            bullet: self.inline_bullet.or(self.sound_bullet),
            morphology: self.morphology,
            pragmatic: self.pragmatic,
            activities: self.activities,
            raw_tiers: self.raw_tiers,
        };
        (utterance, self.ambiguous)
    }
}

impl Transcript {
    /// Parses transcript text. Tier level problems are logged and replaced
    /// with fallback values, so parsing text never fails.
    #[tracing::instrument(level = "debug", skip(source, config))]
    pub fn parse(source: &str, config: &TranscriptConfig) -> Self {
        let mut language = None;
        let mut languages_seen = false;
        let mut pending: Vec<PendingUtterance> = Vec::new();
        let mut speakers: Vec<String> = Vec::new();
        // false while the current utterance belongs to an ignored speaker
        let mut collecting = false;

        for block in split_blocks(source) {
            match block.sigil {
                Sigil::Header if block.code == LANGUAGES_HEADER && !languages_seen => {
                    languages_seen = true;
                    language = Language::from_header(&block.content);
                    if language.is_none() {
                        tracing::warn!(
                            "Unsupported language '{}' (line {}), language left unset",
                            block.content,
                            block.line
                        );
                    }
                }
                Sigil::Header => {}
                Sigil::Speaker => {
                    collecting = !config.speaker_ignore.contains(&block.code);
                    if !collecting {
                        tracing::trace!("Ignoring {} utterance at line {}", block.code, block.line);
                        continue;
                    }
                    if !speakers.contains(&block.code) {
                        speakers.push(block.code.clone());
                    }
                    pending.push(PendingUtterance::open(&block));
                }
                Sigil::Dependent => match pending.last_mut() {
                    Some(utterance) if collecting => utterance.attach(&block),
                    Some(_) => {}
                    None => tracing::debug!(
                        "Tier %{} before the first utterance (line {})",
                        block.code,
                        block.line
                    ),
                },
            }
        }

        if !languages_seen {
            tracing::warn!("No @Languages header found");
        }

        let has_morphology = pending.iter().any(|p| p.morphology.is_some());
        let xds_coded = pending.iter().any(|p| p.xds.is_some());

        let mut utterances = Vec::with_capacity(pending.len());
        let mut ambiguous_lines = Vec::new();
        for utterance in pending {
            let (mut utterance, ambiguous) = utterance.resolve(xds_coded);

            if !config.line_filter.is_empty() && !config.line_filter.contains(&utterance.line_number) {
                continue;
            }
            if config.child_directed_only && !utterance.addressee.is_child_directed() {
                continue;
            }

            utterance.number = utterances.len() + 1;
            if has_morphology && utterance.morphology.is_none() {
                utterance.morphology = Some(Vec::new());
            }
            if ambiguous && !ambiguous_lines.contains(&utterance.line_number) {
                ambiguous_lines.push(utterance.line_number);
            }
            utterances.push(utterance);
        }

        tracing::debug!(
            "Parsed {} utterances from {} speakers",
            utterances.len(),
            speakers.len()
        );

        Self {
            name: String::new(),
            path: None,
            language,
            utterances,
            speakers,
            has_morphology,
            ambiguous_lines,
            config: config.clone(),
            word_classes: OnceLock::new(),
        }
    }

    /// Reads and parses a `.cha` file. The transcript is named after the file stem.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &TranscriptConfig) -> ChatResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut transcript = Self::parse(&source, config);
        transcript.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        transcript.path = Some(path.to_path_buf());
        Ok(transcript)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    /// Speakers in order of first appearance, ignored speakers excluded.
    pub fn speakers(&self) -> &[String] {
        &self.speakers
    }

    pub fn has_morphology(&self) -> bool {
        self.has_morphology
    }

    pub fn has_bullets(&self) -> bool {
        self.utterances.iter().any(|u| u.bullet.is_some())
    }

    /// Lines whose `%mor` tier carried alternative analyses.
    pub fn ambiguous_lines(&self) -> &[usize] {
        &self.ambiguous_lines
    }

    pub fn config(&self) -> &TranscriptConfig {
        &self.config
    }

    pub fn utterance(&self, line_number: usize) -> Option<&Utterance> {
        self.utterances
            .iter()
            .find(|u| u.line_number == line_number)
    }

    /// Utterances with `from <= line_number < to`.
    pub fn utterances_between(&self, from: usize, to: usize) -> Vec<&Utterance> {
        self.utterances
            .iter()
            .filter(|u| u.line_number >= from && u.line_number < to)
            .collect()
    }

    pub fn utterances_by_speaker(&self) -> BTreeMap<&str, Vec<&Utterance>> {
        let mut grouped: BTreeMap<&str, Vec<&Utterance>> = BTreeMap::new();
        for utterance in &self.utterances {
            grouped
                .entry(utterance.speaker.as_str())
                .or_default()
                .push(utterance);
        }
        grouped
    }

    pub fn count_utterances(&self) -> usize {
        self.utterances.len()
    }

    pub fn count_utterances_by_addressee(&self) -> BTreeMap<Addressee, usize> {
        let mut counts = BTreeMap::new();
        for utterance in &self.utterances {
            *counts.entry(utterance.addressee).or_insert(0) += 1;
        }
        counts
    }

    fn require_morphology(&self, operation: &'static str) -> ChatResult<()> {
        if self.has_morphology {
            Ok(())
        } else {
            Err(Error::missing_mor(operation))
        }
    }

    pub fn count_words(&self, utterance: &Utterance) -> ChatResult<usize> {
        self.require_morphology("count_words")?;
        Ok(utterance.word_count())
    }

    pub fn count_words_by_addressee(&self) -> ChatResult<BTreeMap<Addressee, usize>> {
        self.require_morphology("count_words_by_addressee")?;
        let mut counts = BTreeMap::new();
        for utterance in &self.utterances {
            *counts.entry(utterance.addressee).or_insert(0) += utterance.word_count();
        }
        Ok(counts)
    }

    /// Verb, noun and adjective positions for every utterance, aligned with
    /// [`Transcript::utterances`]. Computed once.
    pub fn word_classes(&self) -> ChatResult<&[WordClasses]> {
        self.require_morphology("word_classes")?;
        let classes = self.word_classes.get_or_init(|| {
            tracing::debug!("Classifying {} utterances", self.utterances.len());
            self.utterances
                .iter()
                .map(|u| classify(u.morphology(), self.language, &self.config.classifier))
                .collect()
        });
        Ok(classes.as_slice())
    }

    /// Classified units of every utterance, paired with their utterance.
    fn classified(
        &self,
        class: WordClass,
    ) -> ChatResult<impl Iterator<Item = (&Utterance, &MorphUnit)>> {
        let classes = self.word_classes()?;
        Ok(self
            .utterances
            .iter()
            .zip(classes)
            .flat_map(move |(utterance, classes)| {
                let units = utterance.morphology();
                classes
                    .indexes(class)
                    .iter()
                    .filter_map(move |index| units.get(*index).map(|unit| (utterance, unit)))
            }))
    }

    pub fn count_class(&self, class: WordClass) -> ChatResult<usize> {
        Ok(self.classified(class)?.count())
    }

    /// Lexeme frequencies for one word class.
    pub fn lexeme_counts(&self, class: WordClass) -> ChatResult<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for (_, unit) in self.classified(class)? {
            *counts.entry(unit.lexeme.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub fn count_class_by_speaker(&self, class: WordClass) -> ChatResult<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for (utterance, _) in self.classified(class)? {
            *counts.entry(utterance.speaker.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub fn count_class_by_addressee(
        &self,
        class: WordClass,
    ) -> ChatResult<BTreeMap<Addressee, usize>> {
        let mut counts = BTreeMap::new();
        for (utterance, _) in self.classified(class)? {
            *counts.entry(utterance.addressee).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Matches `criteria` against one utterance's morphology.
    pub fn apply_criteria(&self, utterance: &Utterance, criteria: &Criteria) -> ChatResult<Vec<usize>> {
        self.require_morphology("apply_criteria")?;
        criteria.validate()?;
        Ok(criteria.find_in(utterance.morphology()))
    }

    /// Every utterance with a match, with the matched units.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn find_by_criteria(&self, criteria: &Criteria) -> ChatResult<Vec<CriteriaHit<'_>>> {
        self.require_morphology("find_by_criteria")?;
        criteria.validate()?;

        Ok(self
            .utterances
            .iter()
            .filter_map(|utterance| {
                let units = utterance.morphology();
                let indexes = criteria.find_in(units);
                if indexes.is_empty() {
                    return None;
                }
                let matched = indexes.iter().filter_map(|i| units.get(*i)).collect();
                Some(CriteriaHit {
                    utterance,
                    indexes,
                    units: matched,
                })
            })
            .collect())
    }

    /// Highest scoring activity of every utterance, aligned with
    /// [`Transcript::utterances`].
    pub fn dominant_activities(&self) -> Vec<Option<Activity>> {
        self.utterances
            .iter()
            .map(|utterance| {
                let dominant = utterance.activities.as_deref().and_then(dominant_activity);
                if dominant.is_none() && utterance.addressee.is_child_directed() {
                    tracing::warn!(
                        "Empty activity in child-directed utterance (line {})",
                        utterance.line_number
                    );
                }
                dominant
            })
            .collect()
    }

    /// Lexical diversity over the lexemes of every utterance, optionally
    /// restricted to one addressee.
    pub fn lexical_diversity<M>(&self, metric: &M, addressee: Option<Addressee>) -> ChatResult<f64>
    where
        M: LexicalDiversity + ?Sized,
    {
        self.require_morphology("lexical_diversity")?;
        let tokens: Vec<&str> = self
            .utterances
            .iter()
            .filter(|u| addressee.map_or(true, |a| u.addressee == a))
            .flat_map(|u| u.words().map(|unit| unit.lexeme.as_str()))
            .collect();
        tracing::debug!("{} over {} tokens", metric.name(), tokens.len());
        Ok(metric.measure(&tokens))
    }

    /// Turns of every speaker in `mode`, with the default emptiness rule.
    pub fn turns<'a>(&'a self, mode: TurnMode, config: &TurnConfig) -> BTreeMap<&'a str, Vec<Turn<'a>>> {
        TurnSegmenter::new(config, mode).segment(&self.utterances, &self.speakers)
    }
}
