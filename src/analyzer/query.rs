//! Textual criteria queries.
//!
//! ```text
//! query     := position (whitespace position)*
//! position  := [field ':'] value (',' value)*
//! field     := "cat" | "lex" | "mor"        (default: cat)
//! ```
//!
//! `lex:tene lex:que cat:inf,v` matches "tener que" followed by an infinitive
//! or a finite verb; `cop ger,part` matches a copula followed by a gerund or
//! participle; `mor:v|juga` matches the composite `category|lexeme`.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, value},
    error::{context, convert_error, VerboseError},
    multi::separated_list1,
    sequence::{delimited, pair, terminated},
    IResult,
};

use super::criteria::{Criteria, MatchField, Position};
use crate::{ChatResult, Error};

type QueryResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

fn parse_field(input: &str) -> QueryResult<MatchField> {
    context(
        "field",
        terminated(
            alt((
                value(MatchField::Category, tag("cat")),
                value(MatchField::Lexeme, tag("lex")),
                value(MatchField::Composite, tag("mor")),
            )),
            char(':'),
        ),
    )(input)
}

fn parse_value(input: &str) -> QueryResult<&str> {
    context(
        "value",
        take_while1(|c: char| !c.is_whitespace() && c != ','),
    )(input)
}

fn parse_position(input: &str) -> QueryResult<Position> {
    context(
        "position",
        map(
            pair(opt(parse_field), separated_list1(char(','), parse_value)),
            |(field, values)| Position {
                field: field.unwrap_or_default(),
                alternatives: values.into_iter().map(str::to_string).collect(),
            },
        ),
    )(input)
}

/// Parses a textual query into [`Criteria`].
#[tracing::instrument(level = "debug")]
pub fn parse_query(input: &str) -> ChatResult<Criteria> {
    let result = all_consuming(delimited(
        multispace0,
        separated_list1(multispace1, parse_position),
        multispace0,
    ))(input);

    match result {
        Ok((_, positions)) => {
            let criteria = Criteria::from_positions(positions);
            criteria.validate()?;
            Ok(criteria)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::Query {
            message: convert_error(input, e),
            found: input.to_string(),
        }),
        Err(nom::Err::Incomplete(needed)) => Err(Error::Query {
            message: format!("Incomplete query, {:?}", needed),
            found: input.to_string(),
        }),
    }
}
