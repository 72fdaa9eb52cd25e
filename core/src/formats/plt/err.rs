use std::{
    num::{ParseFloatError, ParseIntError},
    path::PathBuf,
};

use miette::Diagnostic;
use ndarray::ShapeError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("File {path} does not exist")]
    #[diagnostic(code(plt_tbx::plt::source_not_found))]
    SourceNotFound { path: PathBuf },

    #[error("Input is empty")]
    #[diagnostic(code(plt_tbx::plt::empty_input))]
    EmptyInput,

    #[error("No zones found")]
    #[diagnostic(
        code(plt_tbx::plt::no_zones),
        help("Zones are introduced by a line containing the keyword ZONE")
    )]
    NoZonesFound,

    #[error("First zone {first_zone} is out of range, {zone_count} zones found")]
    #[diagnostic(code(plt_tbx::plt::zone_index_out_of_range))]
    ZoneIndexOutOfRange {
        first_zone: usize,
        zone_count: usize,
    },

    #[error("Zone selection is empty (first zone {first_zone}, count {n_zones:?}, skip {skip_zones})")]
    #[diagnostic(code(plt_tbx::plt::empty_selection))]
    EmptySelection {
        first_zone: usize,
        n_zones: Option<usize>,
        skip_zones: usize,
    },

    #[error("Missing VARIABLES declaration")]
    #[diagnostic(
        code(plt_tbx::plt::variables_not_found),
        help("Expected a line like VARIABLES = \"A\", \"B\" before the first zone")
    )]
    VariablesNotFound,

    #[error("Malformed data in zone {zone} (line {line}): {kind}")]
    #[diagnostic(code(plt_tbx::plt::malformed_zone_data))]
    MalformedZoneData {
        /// Zero-based index of the zone in the scanned file
        zone: usize,
        /// Zero-based line index the problem was found at
        line: usize,
        #[source]
        kind: ZoneDataError,
    },

    #[error("Unexpected end of input at line {line}, expected to reach line {target}")]
    #[diagnostic(
        code(plt_tbx::plt::unexpected_eof),
        help("The file might have changed between the scan and the read pass")
    )]
    UnexpectedEof { line: usize, target: usize },

    #[error("Read cursor at line {position} can't move back to line {target}")]
    #[diagnostic(code(plt_tbx::plt::cursor_regression))]
    CursorRegression { position: usize, target: usize },

    #[error("Assembling the variable arrays resulted in shape error: {0}")]
    #[diagnostic(code(plt_tbx::plt::shape))]
    Shape(#[from] ShapeError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(plt_tbx::plt::io))]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, Diagnostic)]
pub enum ZoneDataError {
    #[error("Missing dimension {0}")]
    #[diagnostic(code(plt_tbx::plt::zone::missing_dimension))]
    MissingDimension(&'static str),

    #[error("Invalid dimension {key}={value}: {err}")]
    #[diagnostic(code(plt_tbx::plt::zone::invalid_dimension))]
    InvalidDimension {
        key: &'static str,
        value: String,
        #[source]
        err: ParseIntError,
    },

    #[error("Dimension {0} must not be zero")]
    #[diagnostic(code(plt_tbx::plt::zone::zero_dimension))]
    ZeroDimension(&'static str),

    #[error("Float parsing error (column {column}: {err})")]
    #[diagnostic(code(plt_tbx::plt::zone::parse_float))]
    ParseFloat {
        /// One-based column within the row
        column: usize,
        value: String,
        #[source]
        err: ParseFloatError,
    },

    #[error("Wrong number of values ({got} columns, expected {expected})")]
    #[diagnostic(code(plt_tbx::plt::zone::wrong_value_count))]
    WrongValueCount { got: usize, expected: usize },

    #[error("Zone ended after {read} data lines, expected {expected}")]
    #[diagnostic(code(plt_tbx::plt::zone::truncated))]
    Truncated { read: usize, expected: usize },

    #[error("Zone holds {got} grid points, expected {expected}")]
    #[diagnostic(code(plt_tbx::plt::zone::point_count))]
    PointCount { got: usize, expected: usize },

    #[error("Grid {dim1}x{dim2}x{dim3} has too many points")]
    #[diagnostic(
        code(plt_tbx::plt::zone::grid_too_large),
        help("The I, J and K attributes of the zone marker are probably corrupt")
    )]
    GridTooLarge {
        dim1: usize,
        dim2: usize,
        dim3: usize,
    },
}
