use serde::{Deserialize, Serialize};

/// Pragmatic function code of a `%pra` tier.
///
/// Invalid codes decode to [`PragmaticFunction::Missing`].
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
pub enum PragmaticFunction {
    Pvn,
    Dan,
    Den,
    Pvv,
    Dav,
    Daa,
    Dev,
    Ind,
    #[strum(serialize = "?")]
    Missing,
}

/// Decodes a `%pra` value such as `$PVN`.
pub fn parse_pragmatic_tier(content: &str, line: usize) -> PragmaticFunction {
    let code = content.trim();
    let code = code.strip_prefix('$').unwrap_or(code).trim();
    match code.parse::<PragmaticFunction>() {
        Ok(function) if function != PragmaticFunction::Missing => function,
        _ => {
            tracing::warn!(
                "Pragmatic function '{}' is invalid, using '{}' (line {})",
                code,
                PragmaticFunction::Missing,
                line
            );
            PragmaticFunction::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_valid_codes() {
        assert_eq!(parse_pragmatic_tier("$PVN", 1), PragmaticFunction::Pvn);
        assert_eq!(parse_pragmatic_tier(" DAA ", 1), PragmaticFunction::Daa);
        assert_eq!(parse_pragmatic_tier("$IND", 1), PragmaticFunction::Ind);
    }

    #[test]
    fn test_invalid_code_falls_back_to_missing() {
        assert_eq!(parse_pragmatic_tier("$XYZ", 1), PragmaticFunction::Missing);
        assert_eq!(parse_pragmatic_tier("", 1), PragmaticFunction::Missing);
        assert_eq!(parse_pragmatic_tier("?", 1), PragmaticFunction::Missing);
    }

    #[test]
    fn test_display_round_trips() {
        for function in PragmaticFunction::iter() {
            assert_eq!(function.to_string().parse::<PragmaticFunction>().unwrap(), function);
        }
    }
}
