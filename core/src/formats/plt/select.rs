use serde::{Deserialize, Serialize};

use super::{err::Error, scan::ZoneMarker};

/// Which zones to load: start at `first_zone`, then every `skip_zones + 1`-th, at most `n_zones`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSelection {
    /// Zero-based index of the first zone to load
    pub first_zone: usize,
    /// Maximum number of zones to load, all remaining zones if `None`
    pub n_zones: Option<usize>,
    /// Number of zones skipped between two loaded zones
    pub skip_zones: usize,
}

impl ZoneSelection {
    pub fn stride(&self) -> usize {
        self.skip_zones + 1
    }

    /// Selects the zones to load, without any I/O.
    ///
    /// The returned zones keep the order of `zones`, so their line indices are strictly increasing.
    pub fn select<'a>(&self, zones: &'a [ZoneMarker]) -> Result<Vec<&'a ZoneMarker>, Error> {
        if self.first_zone > zones.len() {
            return Err(Error::ZoneIndexOutOfRange {
                first_zone: self.first_zone,
                zone_count: zones.len(),
            });
        }

        let selected = zones[self.first_zone..]
            .iter()
            .step_by(self.stride())
            .take(self.n_zones.unwrap_or(usize::MAX))
            .collect::<Vec<_>>();

        if selected.is_empty() {
            return Err(Error::EmptySelection {
                first_zone: self.first_zone,
                n_zones: self.n_zones,
                skip_zones: self.skip_zones,
            });
        }

        Ok(selected)
    }
}
