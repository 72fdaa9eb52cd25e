use std::io::BufRead;

use serde::Serialize;

use super::{
    err::Error,
    zone::{self, ZoneAttributes},
};

/// Keyword introducing a zone, matched case-sensitively anywhere in a line.
pub const ZONE_KEYWORD: &str = "ZONE";

/// A line introducing a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneMarker {
    /// Zero-based position among all zones of the file
    pub index: usize,
    /// Zero-based line index
    pub line: usize,
    /// Raw text of the line, without the line ending
    pub text: String,
}

impl ZoneMarker {
    pub fn attributes(&self) -> ZoneAttributes {
        zone::attributes(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneScan {
    pub zones: Vec<ZoneMarker>,
    /// Zero-based index of the last line in the input
    pub last_line: usize,
}

impl ZoneScan {
    /// Scans `rdr` for lines containing [`ZONE_KEYWORD`], recording the line indices and texts.
    ///
    /// An input without any zone markers is not an error here, `zones` is just empty.
    pub fn from_reader(mut rdr: impl BufRead) -> Result<Self, Error> {
        let mut zones = Vec::new();
        let mut buf = String::new();
        let mut lines = 0;

        loop {
            buf.clear();
            if rdr.read_line(&mut buf)? == 0 {
                break;
            }
            if buf.contains(ZONE_KEYWORD) {
                zones.push(ZoneMarker {
                    index: zones.len(),
                    line: lines,
                    text: buf.trim_end_matches(&['\r', '\n'][..]).to_string(),
                });
            }
            lines += 1;
        }

        if lines == 0 {
            return Err(Error::EmptyInput);
        }

        Ok(Self {
            zones,
            last_line: lines - 1,
        })
    }
}
