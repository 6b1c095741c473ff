//! # Block Markers
//!
//! A CHAT transcript is a sequence of blocks, each introduced by a marker at
//! the start of a line:
//!
//! * `*CODE:` – a speaker utterance ([`Sigil::Speaker`])
//! * `%code:` – a dependent tier attached to the preceding utterance ([`Sigil::Dependent`])
//! * `@Name:` or `@Name` – a file header ([`Sigil::Header`])
//!
//! A block runs until the next marker. Lines that do not start with a marker
//! (usually tab-indented) continue the current block. `@End` stops parsing.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{map, opt},
    error::{context, VerboseError},
    sequence::{preceded, terminated},
    IResult,
};

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sigil {
    Speaker,   // *
    Dependent, // %
    Header,    // @
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    pub sigil: Sigil,
    pub code: &'a str,
}

/// One marker line plus its continuation lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub sigil: Sigil,
    pub code: String,
    pub content: String,
    /// 1-based source line of the marker.
    pub line: usize,
}

fn parse_code(input: &str) -> ParserResult<&str> {
    context(
        "marker code",
        take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '+')),
    )(input)
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_speaker_marker(input: &str) -> ParserResult<Marker> {
    context(
        "speaker marker",
        map(
            terminated(preceded(char('*'), parse_code), char(':')),
            |code| Marker {
                sigil: Sigil::Speaker,
                code,
            },
        ),
    )(input)
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_dependent_marker(input: &str) -> ParserResult<Marker> {
    context(
        "dependent tier marker",
        map(
            terminated(preceded(char('%'), parse_code), char(':')),
            |code| Marker {
                sigil: Sigil::Dependent,
                code,
            },
        ),
    )(input)
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_header_marker(input: &str) -> ParserResult<Marker> {
    context(
        "header marker",
        map(
            terminated(preceded(char('@'), parse_code), opt(char(':'))),
            |code| Marker {
                sigil: Sigil::Header,
                code,
            },
        ),
    )(input)
}

pub fn parse_marker(input: &str) -> ParserResult<Marker> {
    context(
        "marker",
        alt((
            parse_speaker_marker,
            parse_dependent_marker,
            parse_header_marker,
        )),
    )(input)
}

/// Splits transcript text into marker blocks.
#[tracing::instrument(level = "debug", skip(source))]
pub fn split_blocks(source: &str) -> Vec<Block> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut blocks: Vec<Block> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        match parse_marker(raw) {
            Ok((rest, marker)) => {
                if marker.sigil == Sigil::Header && marker.code == "End" {
                    break;
                }
                blocks.push(Block {
                    sigil: marker.sigil,
                    code: marker.code.to_string(),
                    content: rest.trim().to_string(),
                    line: index + 1,
                });
            }
            Err(_) => {
                let text = raw.trim();
                if text.is_empty() {
                    continue;
                }
                match blocks.last_mut() {
                    Some(block) => {
                        if !block.content.is_empty() {
                            block.content.push(' ');
                        }
                        block.content.push_str(text);
                    }
                    None => tracing::debug!("Skipping text before first marker (line {})", index + 1),
                }
            }
        }
    }

    tracing::debug!("{} blocks", blocks.len());
    blocks
}
