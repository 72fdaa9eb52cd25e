//! ASCII Tecplot-style `.plt` files, as written by e.g. the VERB radiation belt code.
//!
//! A file consists of a header (comments starting with `#` and a `VARIABLES = "A", "B"`
//! declaration) followed by zones, each introduced by a `ZONE T="label" I=.. J=.. K=..` line
//! and `I*J*K` data rows with one column per variable.
//!
//! Loading happens in two sequential passes over the input: the first one only records
//! where the zones are, the second one reads the header and the selected zones with a
//! forward-only cursor.

mod assemble;
mod cursor;
mod err;
mod header;
mod reader;
mod scan;
mod select;
mod transform;
mod zone;


use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

pub use assemble::ArrayAssembler;
pub use cursor::LineCursor;
pub use err::{Error, ZoneDataError};
pub use header::Header;
pub use reader::{ZoneBlock, ZoneReader};
pub use scan::{ZoneMarker, ZoneScan, ZONE_KEYWORD};
pub use select::ZoneSelection;
pub use transform::{make_3d, permute, squeeze, TransformOptions};
pub use zone::{GridSchema, ZoneAttributes};

/// One declared variable with its data over all loaded zones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    /// `(zones, size1, size2, size3)` as read, before any transform
    pub data: ArrayD<f64>,
    pub size1: usize,
    pub size2: usize,
    pub size3: usize,
    /// Header comments, shared by all variables of a file
    pub comments: Arc<[String]>,
    /// One label per loaded zone, shared by all variables of a file
    pub zone_labels: Arc<[String]>,
}

impl Variable {
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn zone_count(&self) -> usize {
        self.zone_labels.len()
    }
}

/// The loaded variables, shaped the way [`LoadOptions::varout`] asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// The file declares exactly one variable
    Single(Variable),
    /// Fixed sequence in declaration order
    Tuple(Box<[Variable]>),
    /// Growable list in declaration order
    List(Vec<Variable>),
}

impl Output {
    fn package(mut variables: Vec<Variable>, varout: bool) -> Self {
        if variables.len() == 1 {
            if let Some(var) = variables.pop() {
                return Self::Single(var);
            }
        }
        if varout {
            Self::Tuple(variables.into_boxed_slice())
        } else {
            Self::List(variables)
        }
    }

    pub fn as_slice(&self) -> &[Variable] {
        match self {
            Self::Single(var) => std::slice::from_ref(var),
            Self::Tuple(vars) => &vars[..],
            Self::List(vars) => &vars[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.as_slice().iter()
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.iter().find(|var| var.name == name)
    }

    pub fn into_vec(self) -> Vec<Variable> {
        match self {
            Self::Single(var) => vec![var],
            Self::Tuple(vars) => vars.into_vec(),
            Self::List(vars) => vars,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Reverse the grid axes, `(zones, i, j, k)` -> `(zones, k, j, i)`
    pub permute: bool,
    /// Remove all axes of length 1
    pub squeeze: bool,
    /// Move the zone axis to the end
    pub make_3d: bool,
    /// Return multiple variables as [`Output::Tuple`] instead of [`Output::List`]
    pub varout: bool,
    /// Zero-based index of the first zone to load
    pub first_zone: usize,
    /// Maximum number of zones to load
    pub n_zones: Option<usize>,
    /// Number of zones skipped between two loaded zones
    pub skip_zones: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            permute: false,
            squeeze: false,
            make_3d: false,
            varout: true,
            first_zone: 0,
            n_zones: None,
            skip_zones: 0,
        }
    }
}

impl LoadOptions {
    pub fn selection(&self) -> ZoneSelection {
        ZoneSelection {
            first_zone: self.first_zone,
            n_zones: self.n_zones,
            skip_zones: self.skip_zones,
        }
    }

    pub fn transform(&self) -> TransformOptions {
        TransformOptions {
            permute: self.permute,
            make_3d: self.make_3d,
            squeeze: self.squeeze,
        }
    }
}

/// Loads the `.plt` file at `path`, opening it once for each pass.
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Output, Error> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    load_with(|| File::open(path).map(BufReader::new), options)
}

/// Loads `.plt` data held in memory.
pub fn load_str(input: &str, options: &LoadOptions) -> Result<Output, Error> {
    load_with(|| Ok(input.as_bytes()), options)
}

/// Loads `.plt` data from the streams returned by `open`.
///
/// `open` is called twice and has to yield the same content both times:
/// once to scan for zones, once to read the header and the selected zones.
#[instrument(skip(open))]
pub fn load_with<R, F>(mut open: F, options: &LoadOptions) -> Result<Output, Error>
where
    R: BufRead,
    F: FnMut() -> io::Result<R>,
{
    info!("Scanning file for number of zones");
    let scan = ZoneScan::from_reader(open()?)?;
    info!("{} zones found", scan.zones.len());

    let Some(first_marker) = scan.zones.first() else {
        return Err(Error::NoZonesFound);
    };
    let selected = options.selection().select(&scan.zones)?;

    let mut cursor = LineCursor::new(open()?);
    let header = Header::from_cursor(&mut cursor, first_marker)?;

    // The first selected zone defines the grid for all of them
    let schema_marker = selected[0];
    let malformed_schema = |kind: ZoneDataError| Error::MalformedZoneData {
        zone: schema_marker.index,
        line: schema_marker.line,
        kind,
    };
    let schema =
        GridSchema::from_attributes(&schema_marker.attributes()).map_err(malformed_schema)?;

    let mut assembler =
        ArrayAssembler::new(&header.variables, schema).map_err(malformed_schema)?;
    let mut reader = ZoneReader::new(cursor, header.variables.len(), schema);
    for marker in selected {
        let block = reader.read_zone(marker)?;
        assembler
            .push(block)
            .map_err(|kind| Error::MalformedZoneData {
                zone: marker.index,
                line: reader.position(),
                kind,
            })?;
    }

    let transform = options.transform();
    let variables = assembler
        .finish(header.comments)?
        .into_iter()
        .map(|var| transform.apply(var))
        .collect();

    Ok(Output::package(variables, options.varout))
}
