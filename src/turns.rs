//! # Turn Segmentation
//!
//! Groups each speaker's utterances into turns addressed to one addressee
//! class. A turn opens on an utterance by the speaker to the target
//! addressee and then, for every following non-empty utterance:
//!
//! * a silence of `max_gap_ms` or more since the turn's last utterance closes
//!   it, and the utterance is considered again as the start of a new turn;
//! * the same speaker to the target addressee extends it;
//! * the same speaker to anyone else closes it;
//! * another speaker counts as an intervention, and the turn closes once the
//!   interventions exceed the tolerance of the mode.
//!
//! Intervention counters restart with every new turn. A turn still open when
//! the utterances run out is kept.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{addressee::Addressee, config::TurnConfig, tier::Bullet, transcript::Utterance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    /// Speech to the target child.
    ChildDirected,
    /// Speech between adults. Without `allow_interventions` any other
    /// speaker closes the turn.
    AdultDirected { allow_interventions: bool },
}

impl TurnMode {
    pub fn target(&self) -> Addressee {
        match self {
            TurnMode::ChildDirected => Addressee::TargetChild,
            TurnMode::AdultDirected { .. } => Addressee::Adult,
        }
    }

    /// Whether single utterance turns are reported by default. Adult-directed
    /// speech only counts exchanges of two or more utterances.
    pub fn keeps_single_turns(&self) -> bool {
        matches!(self, TurnMode::ChildDirected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn<'a> {
    pub speaker: &'a str,
    pub addressee: Addressee,
    pub utterances: Vec<&'a Utterance>,
}

impl Turn<'_> {
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// From the start of the first utterance to the end of the last one,
    /// when both are bulleted.
    pub fn span(&self) -> Option<Bullet> {
        let start = self.utterances.first()?.bullet?.start;
        let end = self.utterances.last()?.bullet?.end;
        Some(Bullet::new(start, end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Append,
    /// Intervention within tolerance.
    Keep,
    Close,
    /// Closed by silence; the utterance may open the next turn.
    GapClose,
}

#[derive(Debug)]
struct OpenTurn<'a> {
    utterances: Vec<&'a Utterance>,
    child_interventions: usize,
    other_interventions: usize,
}

impl<'a> OpenTurn<'a> {
    fn new(first: &'a Utterance) -> Self {
        Self {
            utterances: vec![first],
            child_interventions: 0,
            other_interventions: 0,
        }
    }

    fn finish(self, speaker: &'a str, addressee: Addressee) -> Turn<'a> {
        Turn {
            speaker,
            addressee,
            utterances: self.utterances,
        }
    }
}

pub struct TurnSegmenter<'c, F = fn(&Utterance) -> bool> {
    config: &'c TurnConfig,
    mode: TurnMode,
    is_empty: F,
}

impl<'c> TurnSegmenter<'c> {
    /// Segmenter skipping utterances with nothing to analyse ([`Utterance::is_empty`]).
    pub fn new(config: &'c TurnConfig, mode: TurnMode) -> Self {
        Self {
            config,
            mode,
            is_empty: Utterance::is_empty,
        }
    }
}

impl<'c, F> TurnSegmenter<'c, F>
where
    F: Fn(&Utterance) -> bool,
{
    /// Replaces the rule deciding which utterances are skipped.
    pub fn with_emptiness<G>(self, is_empty: G) -> TurnSegmenter<'c, G>
    where
        G: Fn(&Utterance) -> bool,
    {
        TurnSegmenter {
            config: self.config,
            mode: self.mode,
            is_empty,
        }
    }

    /// Speakers that never own turns in this mode.
    pub fn is_excluded(&self, speaker: &str) -> bool {
        speaker == self.config.code_speaker
            || (matches!(self.mode, TurnMode::AdultDirected { .. })
                && speaker == self.config.child_speaker)
    }

    /// Turns of every speaker not excluded by the mode. Every such speaker
    /// gets an entry, possibly without turns.
    #[tracing::instrument(level = "debug", skip(self, utterances, speakers), fields(mode = ?self.mode))]
    pub fn segment<'a>(
        &self,
        utterances: &'a [Utterance],
        speakers: &'a [String],
    ) -> BTreeMap<&'a str, Vec<Turn<'a>>> {
        speakers
            .iter()
            .map(String::as_str)
            .filter(|speaker| !self.is_excluded(speaker))
            .map(|speaker| (speaker, self.segment_speaker(utterances, speaker)))
            .collect()
    }

    pub fn segment_speaker<'a>(&self, utterances: &'a [Utterance], speaker: &'a str) -> Vec<Turn<'a>> {
        let target = self.mode.target();
        let mut turns = Vec::new();
        let mut open: Option<OpenTurn<'a>> = None;

        for utterance in utterances.iter().filter(|u| !(self.is_empty)(*u)) {
            if let Some(turn) = open.as_mut() {
                let step = self.step(turn, utterance, speaker, target);
                match step {
                    Step::Append => {
                        turn.utterances.push(utterance);
                        continue;
                    }
                    Step::Keep => continue,
                    Step::Close | Step::GapClose => {
                        if let Some(done) = open.take() {
                            turns.push(done.finish(speaker, target));
                        }
                        if step == Step::Close {
                            continue;
                        }
                    }
                }
            }

            if utterance.speaker == speaker && utterance.addressee == target {
                open = Some(OpenTurn::new(utterance));
            }
        }

        if let Some(done) = open {
            turns.push(done.finish(speaker, target));
        }

        tracing::debug!("{}: {} turns", speaker, turns.len());
        turns
    }

    fn step(
        &self,
        turn: &mut OpenTurn<'_>,
        utterance: &Utterance,
        speaker: &str,
        target: Addressee,
    ) -> Step {
        let previous = turn.utterances.last().and_then(|u| u.bullet);
        if let (Some(previous), Some(current)) = (previous, utterance.bullet) {
            if current.gap_after(&previous) >= self.config.max_gap_ms {
                return Step::GapClose;
            }
        }

        if utterance.speaker == speaker {
            return if utterance.addressee == target {
                Step::Append
            } else {
                Step::Close
            };
        }

        let within_tolerance = match self.mode {
            TurnMode::ChildDirected if utterance.speaker == self.config.child_speaker => {
                turn.child_interventions += 1;
                turn.child_interventions <= self.config.cds_max_child_interventions
            }
            TurnMode::ChildDirected => {
                turn.other_interventions += 1;
                turn.other_interventions <= self.config.cds_max_other_interventions
            }
            TurnMode::AdultDirected {
                allow_interventions: true,
            } => {
                turn.other_interventions += 1;
                turn.other_interventions <= self.config.ads_max_other_interventions
            }
            TurnMode::AdultDirected {
                allow_interventions: false,
            } => false,
        };

        if within_tolerance {
            Step::Keep
        } else {
            Step::Close
        }
    }
}

/// Drops turns made of a single utterance.
pub fn drop_single_utterance_turns(turns: &mut BTreeMap<&str, Vec<Turn<'_>>>) {
    for speaker_turns in turns.values_mut() {
        speaker_turns.retain(|turn| turn.len() > 1);
    }
}
