//! # Tier Parsing
//!
//! Turns raw transcript text into blocks ([`marker`]) and decodes the
//! dependent tiers the analysis understands. Decoding is dispatched through
//! the closed [`TierCode`] enum; tiers with any other code are kept verbatim
//! by the caller.
//!
//! ```text
//! %mor  -> morphology::parse_mor_tier  -> TierValue::Morphology
//! %pra  -> pragmatic::parse_pragmatic_tier -> TierValue::Pragmatic
//! %dad  -> activity::parse_activity_tier   -> TierValue::Activity
//! %xds  -> addressee code (resolved later)  -> TierValue::Addressee
//! %snd  -> bullet::parse_sound_tier        -> TierValue::Sound
//! ```

pub mod activity;
pub mod bullet;
pub mod marker;
pub mod morphology;
pub mod pragmatic;

pub use activity::Activity;
pub use bullet::Bullet;
pub use marker::{split_blocks, Block, Sigil};
pub use morphology::{MorTier, MorphUnit};
pub use pragmatic::PragmaticFunction;

/// Dependent tiers with a dedicated decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TierCode {
    Mor,
    Pra,
    Dad,
    Xds,
    Snd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TierValue {
    Morphology(MorTier),
    Pragmatic(PragmaticFunction),
    Activity(Vec<Activity>),
    Addressee(String),
    Sound(Option<Bullet>),
}

impl TierCode {
    /// Looks up the decoder for a tier code; `None` for tiers kept raw.
    pub fn lookup(code: &str) -> Option<Self> {
        code.parse().ok()
    }

    pub fn decode(&self, content: &str, line: usize) -> TierValue {
        match self {
            TierCode::Mor => TierValue::Morphology(morphology::parse_mor_tier(content, line)),
            TierCode::Pra => {
                TierValue::Pragmatic(pragmatic::parse_pragmatic_tier(content, line))
            }
            TierCode::Dad => TierValue::Activity(activity::parse_activity_tier(content, line)),
            TierCode::Xds => TierValue::Addressee(content.trim().to_string()),
            TierCode::Snd => TierValue::Sound(bullet::parse_sound_tier(content)),
        }
    }
}
