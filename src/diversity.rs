//! Lexical diversity measures.
//!
//! Richer statistics (HD-D, MTLD) are left to dedicated libraries; anything
//! that takes a token sequence and returns a score can implement
//! [`LexicalDiversity`] and be passed to
//! [`Transcript::lexical_diversity`](crate::Transcript::lexical_diversity).

use std::collections::HashSet;

pub trait LexicalDiversity {
    fn name(&self) -> &'static str;

    fn measure(&self, tokens: &[&str]) -> f64;
}

/// Distinct tokens over total tokens; zero for an empty sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeTokenRatio;

impl LexicalDiversity for TypeTokenRatio {
    fn name(&self) -> &'static str {
        "ttr"
    }

    fn measure(&self, tokens: &[&str]) -> f64 {
        if tokens.is_empty() {
            return 0.0;
        }
        let types: HashSet<&str> = tokens.iter().copied().collect();
        types.len() as f64 / tokens.len() as f64
    }
}
