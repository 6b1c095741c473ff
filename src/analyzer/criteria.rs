//! # Criteria Matching
//!
//! A [`Criteria`] is an ordered list of positions, each accepting a set of
//! alternative values read from a unit's category, lexeme or
//! `category|lexeme` composite. [`Criteria::find`] returns the indexes of the
//! leftmost contiguous run of units satisfying every position in order.
//!
//! The scan is single pass: when a unit fails the current position after some
//! progress, progress is dropped and the scan moves on without re-testing that
//! unit against the first position. `None` slots are placeholders for units
//! already consumed by an earlier match and are skipped without breaking
//! contiguity.

use serde::{Deserialize, Serialize};

use crate::{tier::MorphUnit, ChatResult, Error};

/// Which part of a unit a criteria position is compared against.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
pub enum MatchField {
    #[default]
    #[strum(serialize = "cat")]
    Category,
    #[strum(serialize = "lex")]
    Lexeme,
    /// `category|lexeme`
    #[strum(serialize = "mor")]
    Composite,
}

impl MatchField {
    pub fn matches(&self, unit: &MorphUnit, value: &str) -> bool {
        match self {
            MatchField::Category => unit.category == value,
            MatchField::Lexeme => unit.lexeme == value,
            MatchField::Composite => value
                .split_once('|')
                .is_some_and(|(category, lexeme)| {
                    unit.category == category && unit.lexeme == lexeme
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub field: MatchField,
    pub alternatives: Vec<String>,
}

impl Position {
    pub fn new(field: MatchField, alternatives: &[&str]) -> Self {
        Self {
            field,
            alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn accepts(&self, unit: &MorphUnit) -> bool {
        self.alternatives
            .iter()
            .any(|value| self.field.matches(unit, value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Criteria {
    positions: Vec<Position>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Every position compared on the same field.
    pub fn uniform(field: MatchField, sets: &[&[&str]]) -> Self {
        Self {
            positions: sets.iter().map(|set| Position::new(field, set)).collect(),
        }
    }

    /// Appends a position.
    pub fn then(mut self, field: MatchField, alternatives: &[&str]) -> Self {
        self.positions.push(Position::new(field, alternatives));
        self
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn validate(&self) -> ChatResult<()> {
        if self.positions.is_empty() {
            return Err(Error::criteria("criteria needs at least one position"));
        }
        if let Some(index) = self.positions.iter().position(|p| p.alternatives.is_empty()) {
            return Err(Error::criteria(format!(
                "position {} has no alternatives",
                index + 1
            )));
        }
        Ok(())
    }

    /// Leftmost match over a slot sequence; empty when nothing matches.
    pub fn find(&self, slots: &[Option<&MorphUnit>]) -> Vec<usize> {
        if self.positions.is_empty() {
            return Vec::new();
        }

        let mut matched = Vec::with_capacity(self.positions.len());
        for (index, slot) in slots.iter().enumerate() {
            let Some(unit) = slot else {
                continue;
            };

            if self.positions[matched.len()].accepts(unit) {
                matched.push(index);
                if matched.len() == self.positions.len() {
                    return matched;
                }
            } else if !matched.is_empty() {
                matched.clear();
            }
        }

        Vec::new()
    }

    /// [`Criteria::find`] over a plain unit sequence.
    pub fn find_in(&self, units: &[MorphUnit]) -> Vec<usize> {
        let slots: Vec<Option<&MorphUnit>> = units.iter().map(Some).collect();
        self.find(&slots)
    }
}

/// Working copy of a unit sequence. Consumed units become tombstones so
/// indexes keep pointing into the original sequence.
#[derive(Debug, Clone)]
pub struct WorkingSet<'a> {
    slots: Vec<Option<&'a MorphUnit>>,
}

impl<'a> WorkingSet<'a> {
    pub fn new(units: &'a [MorphUnit]) -> Self {
        Self {
            slots: units.iter().map(Some).collect(),
        }
    }

    pub fn find(&self, criteria: &Criteria) -> Vec<usize> {
        criteria.find(&self.slots)
    }

    pub fn consume(&mut self, indexes: &[usize]) {
        for index in indexes {
            if let Some(slot) = self.slots.get_mut(*index) {
                *slot = None;
            }
        }
    }

    /// Repeatedly matches `criteria`, consuming every match. `pick` selects
    /// the index reported for each match.
    pub fn drain_matches<P>(&mut self, criteria: &Criteria, pick: P) -> Vec<usize>
    where
        P: Fn(&[usize]) -> Option<usize>,
    {
        let mut picked = Vec::new();
        loop {
            let matched = self.find(criteria);
            if matched.is_empty() {
                return picked;
            }
            picked.extend(pick(&matched));
            self.consume(&matched);
        }
    }

    pub fn remaining(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
