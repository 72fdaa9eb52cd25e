use std::io::BufRead;

use tracing::debug;

use super::{cursor::LineCursor, err::Error, scan::ZoneMarker};
use crate::formats::util::{next_quoted, parse};

pub const COMMENT_SIGIL: char = '#';
pub const VARIABLES_KEYWORD: &str = "VARIABLES";

/// File-scope information preceding the first zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Trimmed comment lines, including the leading `#`
    pub comments: Vec<String>,
    /// Variable names in declaration order
    pub variables: Vec<String>,
}

#[derive(Debug, Default)]
struct HeaderParser {
    comments: Vec<String>,
    variables: Option<Vec<String>>,
}

impl HeaderParser {
    fn line(&mut self, line: &str) {
        let line = line.trim();
        if line.starts_with(COMMENT_SIGIL) {
            self.comments.push(line.to_string());
        } else if line.contains(VARIABLES_KEYWORD) {
            if self.variables.is_some() {
                debug!(line, "Replacing previous variable declaration");
            }
            self.variables = Some(variable_names(line));
        }
    }

    fn finish(self) -> Result<Header, Error> {
        match self.variables {
            Some(variables) if !variables.is_empty() => Ok(Header {
                comments: self.comments,
                variables,
            }),
            _ => Err(Error::VariablesNotFound),
        }
    }
}

/// Extracts the names after the first `=`.
///
/// Names are normally double-quoted. If none are, the list is split on commas and whitespace.
fn variable_names(line: &str) -> Vec<String> {
    let Some((_, mut list)) = line.split_once('=') else {
        return Vec::new();
    };

    let mut names = Vec::new();
    while let Some(name) = parse(&mut list, next_quoted) {
        names.push(name.to_string());
    }

    if names.is_empty() {
        names = list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }
    names
}

impl Header {
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, Error> {
        let mut parser = HeaderParser::default();
        for line in lines {
            parser.line(line);
        }
        parser.finish()
    }

    /// Reads the header from a cursor at the start of the input.
    ///
    /// Consumes every line before `first_zone`, the marker line itself is parsed from the
    /// scanned text and left in the input for the zone reader.
    pub fn from_cursor<R: BufRead>(
        cursor: &mut LineCursor<R>,
        first_zone: &ZoneMarker,
    ) -> Result<Self, Error> {
        let mut parser = HeaderParser::default();
        let read = cursor.consume::<Error>(first_zone.line, |_, line| {
            parser.line(line);
            Ok(())
        })?;
        if read < first_zone.line {
            return Err(Error::UnexpectedEof {
                line: cursor.position(),
                target: first_zone.line,
            });
        }
        parser.line(&first_zone.text);
        parser.finish()
    }
}
