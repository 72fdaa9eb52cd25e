use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use super::{err::ZoneDataError, scan::ZONE_KEYWORD};
use crate::formats::util::{key_value, non_separator, parse, separator};

/// The `key=value` pairs of a zone marker line, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneAttributes {
    pairs: Vec<(String, String)>,
}

impl ZoneAttributes {
    /// Looks up the first value for `key`, ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The zone title, `T=...` with quotes stripped.
    pub fn label(&self) -> Option<&str> {
        self.get("T")
    }

    fn dimension(&self, key: &'static str) -> Result<Option<usize>, ZoneDataError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let dim = value
            .parse::<usize>()
            .map_err(|err| ZoneDataError::InvalidDimension {
                key,
                value: value.to_string(),
                err,
            })?;
        if dim == 0 {
            return Err(ZoneDataError::ZeroDimension(key));
        }
        Ok(Some(dim))
    }
}

/// Parses the attributes following the [`ZONE_KEYWORD`] in `line`.
///
/// Values may be bare or double-quoted, pairs are separated by commas and/or whitespace.
/// Tokens that are not `key=value` pairs are skipped.
pub fn attributes(line: &str) -> ZoneAttributes {
    let mut input = match line.find(ZONE_KEYWORD) {
        Some(pos) => &line[pos + ZONE_KEYWORD.len()..],
        None => line,
    };

    let mut pairs = Vec::new();
    loop {
        parse(&mut input, separator);
        if input.is_empty() {
            break;
        }
        if let Some((key, value)) = parse(&mut input, key_value) {
            pairs.push((key.to_string(), value.to_string()));
        } else if parse(&mut input, non_separator).is_none() {
            break;
        }
    }

    ZoneAttributes { pairs }
}

/// Grid dimensions shared by every loaded zone.
///
/// Captured once from the first selected zone, later zones are assumed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Constructor)]
pub struct GridSchema {
    pub dim1: usize,
    pub dim2: usize,
    pub dim3: usize,
}

impl GridSchema {
    /// Reads `I`, `J` and `K`. `I` is required, `J` and `K` default to 1.
    pub fn from_attributes(attributes: &ZoneAttributes) -> Result<Self, ZoneDataError> {
        let dim1 = attributes
            .dimension("I")?
            .ok_or(ZoneDataError::MissingDimension("I"))?;
        let dim2 = attributes.dimension("J")?.unwrap_or(1);
        let dim3 = attributes.dimension("K")?.unwrap_or(1);
        let schema = Self::new(dim1, dim2, dim3);
        schema.points()?;
        Ok(schema)
    }

    /// Number of grid points, which is also the number of data lines per zone.
    ///
    /// Fails if the product does not fit an array shape.
    pub fn points(&self) -> Result<usize, ZoneDataError> {
        self.dim1
            .checked_mul(self.dim2)
            .and_then(|n| n.checked_mul(self.dim3))
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(ZoneDataError::GridTooLarge {
                dim1: self.dim1,
                dim2: self.dim2,
                dim3: self.dim3,
            })
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.dim1, self.dim2, self.dim3)
    }

    /// Whether `attributes` declare different dimensions than this schema.
    pub fn differs_from(&self, attributes: &ZoneAttributes) -> bool {
        match Self::from_attributes(attributes) {
            Ok(other) => other != *self,
            Err(_) => true,
        }
    }
}
