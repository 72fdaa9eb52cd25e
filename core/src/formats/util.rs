use winnow::{
    branch::alt,
    bytes::{take_till0, take_till1, take_while0, take_while1},
    sequence::{delimited, preceded},
    IResult, Parser,
};

/// Separators between `key=value` pairs, spaces, tabs and commas are all accepted.
pub fn separator(input: &str) -> IResult<&str, &str> {
    take_while0(|c: char| c == ',' || c.is_whitespace())
        .context("separator")
        .parse_next(input)
}

pub fn non_separator(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ',' || c.is_whitespace())
        .context("non_separator")
        .parse_next(input)
}

/// A double-quoted string, returning the contents without the quotes.
///
/// ```ignore
/// assert_eq!(quoted("\"t = 0.5\" I=2"), Ok((" I=2", "t = 0.5")));
/// ```
pub fn quoted(input: &str) -> IResult<&str, &str> {
    delimited("\"", take_till0(|c: char| c == '"'), "\"")
        .context("quoted")
        .parse_next(input)
}

/// Skips everything up to the next double quote and parses the quoted string there.
pub fn next_quoted(input: &str) -> IResult<&str, &str> {
    preceded(take_till0(|c: char| c == '"'), quoted).parse_next(input)
}

pub fn key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')
        .context("key")
        .parse_next(input)
}

fn equals(input: &str) -> IResult<&str, &str> {
    let space = |c: char| c == ' ' || c == '\t';
    delimited(take_while0(space), "=", take_while0(space))
        .context("equals")
        .parse_next(input)
}

pub fn value(input: &str) -> IResult<&str, &str> {
    alt((quoted, non_separator)).context("value").parse_next(input)
}

/// A single `key=value` pair, whitespace around the `=` is allowed.
pub fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    (key, preceded(equals, value))
        .context("key_value")
        .parse_next(input)
}

/// Convenience function for applying a parser and storing the remaining input into the reference.
pub fn parse<'a, O>(
    input: &mut &'a str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> Option<O> {
    let (remaining, value) = parser(*input).ok()?;
    *input = remaining;
    Some(value)
}
