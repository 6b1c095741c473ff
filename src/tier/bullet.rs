//! Time-alignment bullets.
//!
//! CHAT marks media offsets with the NAK control character (`\u{15}`), either
//! inline at the end of an utterance (`\u{15}1200_3400\u{15}`) or as the value of
//! a `%snd` tier (`\u{15}"file"_1200_3400\u{15}`). Both resolve to a [`Bullet`].

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const BULLET_CONTROL: char = '\u{15}';

lazy_static! {
    static ref RE_INLINE_BULLET: Regex = Regex::new(r"\x15([^\x15]*)\x15").unwrap();
}

/// Start/end offsets in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    pub start: u64,
    pub end: u64,
}

impl Bullet {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Milliseconds from the end of `previous` to the start of `self`; zero when they overlap.
    pub fn gap_after(&self, previous: &Bullet) -> u64 {
        self.start.saturating_sub(previous.end)
    }
}

/// Reads the last two `_`-separated numeric fields, ignoring control chars
/// and any leading media name.
fn parse_fields(raw: &str) -> Option<Bullet> {
    let cleaned = raw.trim().trim_matches(BULLET_CONTROL);
    let mut fields = cleaned.rsplit('_');
    let end = fields.next()?.trim().parse().ok()?;
    let start = fields.next()?.trim().parse().ok()?;
    Some(Bullet { start, end })
}

/// Removes the first inline bullet from utterance text.
///
/// Returns the visible text and the bullet, if one could be decoded. A
/// control-delimited segment that is not a bullet is still removed.
pub fn extract_inline(text: &str) -> (String, Option<Bullet>) {
    match RE_INLINE_BULLET.captures(text) {
        Some(caps) => {
            let bullet = caps.get(1).and_then(|m| parse_fields(m.as_str()));
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let mut visible = String::with_capacity(text.len());
            visible.push_str(text[..whole.start].trim_end());
            let tail = text[whole.end..].trim();
            if !tail.is_empty() {
                visible.push(' ');
                visible.push_str(tail);
            }
            (visible.trim().to_string(), bullet)
        }
        None => (text.trim().to_string(), None),
    }
}

/// Decodes the value of a `%snd` tier.
pub fn parse_sound_tier(content: &str) -> Option<Bullet> {
    let bullet = parse_fields(content);
    if bullet.is_none() {
        tracing::warn!("Could not read a time bullet from sound tier '{}'", content);
    }
    bullet
}
