//! # chatfile: CHAT Transcript Analysis
//!
//! Parses CHAT (`.cha`) transcripts, the annotation format of child language
//! acquisition corpora, into utterances with decoded dependent tiers, and
//! derives corpus measures from them.
//!
//! ## Processing Pipeline
//!
//! ```text
//! .cha text → Blocks → Utterances (+ tiers) → Addressees → Filters → Transcript
//!                                                                     ├→ Word classes
//!                                                                     ├→ Criteria search
//!                                                                     └→ Turns
//! ```
//!
//! ### Tier Parsing
//!
//! The [`tier`] module splits the text into `*SPEAKER:`, `%tier:` and
//! `@Header` blocks and decodes the dependent tiers it knows about:
//! morphology (`%mor`), pragmatic function (`%pra`), activity (`%dad`),
//! addressee (`%xds`) and sound bullets (`%snd`).
//!
//! ### Transcripts
//!
//! [`Transcript`] owns the parsed utterances and exposes read-only views:
//! lookups by line, grouping by speaker, and utterance, word and word-class
//! counts keyed by speaker or [`Addressee`].
//!
//! ### Analysis
//!
//! The [`analyzer`] module holds the criteria matcher over morphological
//! units, a textual query language for it, and the verb/noun/adjective
//! classifier with its per-language lexicons. The [`turns`] module groups
//! utterances into conversational turns.
//!
//! ## Example
//!
//! ```
//! use chatfile::{Transcript, TranscriptConfig, WordClass};
//!
//! let source = "@Languages:\tspa\n*MOT:\ttenés que jugar [+ CHI] .\n%mor:\taux|tene lk|que v|juga-INF .\n";
//! let transcript = Transcript::parse(source, &TranscriptConfig::default());
//!
//! let verbs = transcript.lexeme_counts(WordClass::Verb).unwrap();
//! assert_eq!(verbs.get("juga"), Some(&1));
//! ```

pub mod addressee;
pub mod analyzer;
pub mod config;
pub mod diversity;
pub mod error;
pub mod language;
pub mod tier;
pub mod transcript;
pub mod turns;

// Re-exports
pub use addressee::Addressee;
pub use analyzer::{parse_query, Criteria, MatchField, WordClass, WordClasses};
pub use config::{AnalysisConfig, ClassifierConfig, TranscriptConfig, TurnConfig};
pub use diversity::{LexicalDiversity, TypeTokenRatio};
pub use error::*;
pub use language::Language;
pub use tier::{Activity, Bullet, MorphUnit, PragmaticFunction};
pub use transcript::{CriteriaHit, Transcript, Utterance};
pub use turns::{drop_single_utterance_turns, Turn, TurnMode, TurnSegmenter};

#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
