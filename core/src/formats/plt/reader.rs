use std::io::BufRead;

use tracing::{debug, warn};

use super::{
    cursor::LineCursor,
    err::{Error, ZoneDataError},
    scan::ZoneMarker,
    zone::GridSchema,
};

/// The raw data of one zone, one column per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBlock {
    pub label: String,
    /// `columns[v]` holds variable `v` for every grid point, in file order
    pub columns: Vec<Vec<f64>>,
}

/// Reads selected zones in increasing line order from a forward-only cursor.
#[derive(Debug)]
pub struct ZoneReader<R> {
    cursor: LineCursor<R>,
    n_variables: usize,
    schema: GridSchema,
}

impl<R: BufRead> ZoneReader<R> {
    pub fn new(cursor: LineCursor<R>, n_variables: usize, schema: GridSchema) -> Self {
        Self {
            cursor,
            n_variables,
            schema,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Skips to `marker`, consumes the marker line and reads `schema.points()` data lines.
    pub fn read_zone(&mut self, marker: &ZoneMarker) -> Result<ZoneBlock, Error> {
        debug!(zone = marker.index, line = marker.line, marker = %marker.text, "Reading zone");

        self.cursor.advance_to(marker.line)?;
        if self.cursor.next_line()?.is_none() {
            return Err(Error::UnexpectedEof {
                line: self.cursor.position(),
                target: marker.line,
            });
        }

        let attributes = marker.attributes();
        let label = match attributes.label() {
            Some(label) => label.to_string(),
            None => {
                warn!(zone = marker.index, "Zone has no title (T=...), using an empty label");
                String::new()
            }
        };
        if self.schema.differs_from(&attributes) {
            warn!(
                zone = marker.index,
                schema = ?self.schema,
                "Zone declares different dimensions than the first loaded zone, reading it with the first zone's dimensions"
            );
        }

        let zone = marker.index;
        let expected = self
            .schema
            .points()
            .map_err(|kind| Error::MalformedZoneData {
                zone,
                line: marker.line,
                kind,
            })?;
        // Grown per row, never sized from the declared grid
        let mut columns = vec![Vec::new(); self.n_variables];

        let read = self.cursor.consume(expected, |line, text| {
            parse_row(text, &mut columns)
                .map_err(|kind| Error::MalformedZoneData { zone, line, kind })
        })?;
        if read < expected {
            return Err(Error::MalformedZoneData {
                zone,
                line: self.cursor.position(),
                kind: ZoneDataError::Truncated { read, expected },
            });
        }

        Ok(ZoneBlock { label, columns })
    }
}

/// Parses one whitespace separated data row, appending value `v` to `columns[v]`.
fn parse_row(text: &str, columns: &mut [Vec<f64>]) -> Result<(), ZoneDataError> {
    let mut got = 0;
    for (i, value) in text.split_whitespace().enumerate() {
        if let Some(column) = columns.get_mut(i) {
            let value = value
                .parse::<f64>()
                .map_err(|err| ZoneDataError::ParseFloat {
                    column: i + 1,
                    value: value.to_string(),
                    err,
                })?;
            column.push(value);
        }
        got += 1;
    }

    if got != columns.len() {
        return Err(ZoneDataError::WrongValueCount {
            got,
            expected: columns.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"VARIABLES = "A", "B"
ZONE T="first" I=2, J=1, K=1
1.0 10.0
2.0 20.0
ZONE T="second" I=2, J=1, K=1
3.0 30.0
4.0 40.0
ZONE T="third" I=2, J=1, K=1
5.0 50.0
6.0 60.0
"#;

    fn marker(index: usize, line: usize, label: &str) -> ZoneMarker {
        ZoneMarker {
            index,
            line,
            text: format!("ZONE T=\"{label}\" I=2, J=1, K=1"),
        }
    }

    fn reader(input: &str) -> ZoneReader<&[u8]> {
        let mut cursor = LineCursor::new(input.as_bytes());
        cursor.advance_to(1).unwrap();
        ZoneReader::new(cursor, 2, GridSchema::new(2, 1, 1))
    }

    #[test]
    fn reads_consecutive_zones() {
        let mut rdr = reader(INPUT);

        let zone = rdr.read_zone(&marker(0, 1, "first")).unwrap();
        assert_eq!(zone.label, "first");
        assert_eq!(zone.columns, [vec![1.0, 2.0], vec![10.0, 20.0]]);
        assert_eq!(rdr.position(), 4);

        let zone = rdr.read_zone(&marker(1, 4, "second")).unwrap();
        assert_eq!(zone.columns, [vec![3.0, 4.0], vec![30.0, 40.0]]);
        assert_eq!(rdr.position(), 7);
    }

    #[test]
    fn skips_unselected_zones() {
        let mut rdr = reader(INPUT);
        let zone = rdr.read_zone(&marker(2, 7, "third")).unwrap();
        assert_eq!(rdr.position(), 10);
        assert_eq!(zone.label, "third");
        assert_eq!(zone.columns, [vec![5.0, 6.0], vec![50.0, 60.0]]);
    }

    #[test]
    fn refuses_to_go_back() {
        let mut rdr = reader(INPUT);
        rdr.read_zone(&marker(1, 4, "second")).unwrap();
        assert!(matches!(
            rdr.read_zone(&marker(0, 1, "first")),
            Err(Error::CursorRegression { .. })
        ));
    }

    #[test]
    fn wrong_column_count() {
        let mut rdr = reader("VARIABLES = \"A\", \"B\"\nZONE T=\"x\" I=2\n1.0 2.0\n3.0\n");
        assert!(matches!(
            rdr.read_zone(&marker(0, 1, "x")),
            Err(Error::MalformedZoneData {
                zone: 0,
                line: 3,
                kind: ZoneDataError::WrongValueCount {
                    got: 1,
                    expected: 2
                }
            })
        ));
    }

    #[test]
    fn non_numeric_value() {
        let mut rdr = reader("VARIABLES = \"A\", \"B\"\nZONE T=\"x\" I=2\n1.0 2.0\n3.0 abc\n");
        assert!(matches!(
            rdr.read_zone(&marker(0, 1, "x")),
            Err(Error::MalformedZoneData {
                line: 3,
                kind: ZoneDataError::ParseFloat { column: 2, .. },
                ..
            })
        ));
    }

    #[test]
    fn truncated_zone() {
        let mut rdr = reader("VARIABLES = \"A\", \"B\"\nZONE T=\"x\" I=2\n1.0 2.0\n");
        assert!(matches!(
            rdr.read_zone(&marker(0, 1, "x")),
            Err(Error::MalformedZoneData {
                kind: ZoneDataError::Truncated {
                    read: 1,
                    expected: 2
                },
                ..
            })
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_declared_grid_is_truncated() {
        let input = "VARIABLES = \"A\", \"B\"\nZONE T=\"x\" I=100000 J=100000 K=100000\n1.0 2.0\n";
        let mut cursor = LineCursor::new(input.as_bytes());
        cursor.advance_to(1).unwrap();
        let mut rdr = ZoneReader::new(cursor, 2, GridSchema::new(100_000, 100_000, 100_000));
        let marker = ZoneMarker {
            index: 0,
            line: 1,
            text: "ZONE T=\"x\" I=100000 J=100000 K=100000".to_string(),
        };
        assert!(matches!(
            rdr.read_zone(&marker),
            Err(Error::MalformedZoneData {
                kind: ZoneDataError::Truncated {
                    read: 1,
                    expected: 1_000_000_000_000_000
                },
                ..
            })
        ));
    }

    #[test]
    fn parses_exponents() {
        let mut columns = vec![Vec::new(), Vec::new()];
        parse_row("  1.5E-03\t-2e+2 ", &mut columns).unwrap();
        assert_eq!(columns, [vec![1.5e-3], vec![-2e2]]);
    }
}
