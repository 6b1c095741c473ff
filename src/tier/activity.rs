use serde::{Deserialize, Serialize};

/// Activity code of a `%dad` tier.
///
/// Each code carries a score; when an utterance lists several activities the
/// highest scoring one is taken as dominant.
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
#[strum(serialize_all = "UPPERCASE")]
pub enum Activity {
    /// Undetermined
    Ind,
    /// Adult conversation
    Caa,
    /// Adult-child conversation
    Cab,
    Juo,
    Juf,
    Jue,
    Lec,
    /// Household chores
    Com,
    Hig,
    Dom,
    Cal,
    Mtv,
}

impl Activity {
    pub fn score(&self) -> i32 {
        match self {
            Activity::Ind => -1,
            Activity::Caa => 0,
            Activity::Cab => 1,
            Activity::Com => 2,
            Activity::Mtv => 3,
            Activity::Juo | Activity::Juf => 4,
            Activity::Hig | Activity::Dom | Activity::Cal => 5,
            Activity::Jue | Activity::Lec => 6,
        }
    }
}

/// Decodes a `%dad` value such as `$CAB:JUO`.
///
/// A single invalid code invalidates the whole tier, which then decodes to `[IND]`.
pub fn parse_activity_tier(content: &str, line: usize) -> Vec<Activity> {
    let codes = content.trim();
    let codes = codes.strip_prefix('$').unwrap_or(codes);

    let mut activities = Vec::new();
    for code in codes.split(':').map(str::trim) {
        match code.parse::<Activity>() {
            Ok(activity) => activities.push(activity),
            Err(_) => {
                tracing::warn!("Activity '{}' is invalid, using IND (line {})", code, line);
                return vec![Activity::Ind];
            }
        }
    }
    activities
}

/// Highest scoring activity; the first one wins on ties.
pub fn dominant_activity(activities: &[Activity]) -> Option<Activity> {
    let mut iter = activities.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |best, activity| {
        if activity.score() > best.score() {
            activity
        } else {
            best
        }
    }))
}
