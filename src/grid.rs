use ndarray::{s, Array1, Array2, Array3, ArrayView1};

use crate::config::{BandConfig, Constants};
use crate::error::RegridError;

/// Horizontal min/max extent of a source grid (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Envelope {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Curvilinear horizontal mesh of the source model grid.
///
/// Rows and columns need not align with constant-latitude/longitude lines,
/// though HRRR grids are near-rectilinear over small domains.
#[derive(Debug, Clone)]
pub struct SourceGrid {
    /// Latitude at each node (degrees north), shape (nlat, nlon)
    pub lats: Array2<f64>,
    /// Longitude at each node (degrees east), shape (nlat, nlon)
    pub lons: Array2<f64>,
    envelope: Envelope,
}

impl SourceGrid {
    pub fn new(lats: Array2<f64>, lons: Array2<f64>) -> Result<Self, RegridError> {
        if lats.dim() != lons.dim() {
            return Err(RegridError::ShapeMismatch {
                context: "longitude grid".to_string(),
                expected: lats.shape().to_vec(),
                found: lons.shape().to_vec(),
            });
        }
        let (nlat, nlon) = lats.dim();
        if nlat < 2 {
            return Err(RegridError::GridTooSmall {
                axis: "latitude",
                len: nlat,
            });
        }
        if nlon < 2 {
            return Err(RegridError::GridTooSmall {
                axis: "longitude",
                len: nlon,
            });
        }
        // f64::min/max skip NaN operands, so a stray NaN node cannot poison
        // the envelope
        let envelope = Envelope {
            lat_min: lats.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
            lat_max: lats.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
            lon_min: lons.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
            lon_max: lons.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        };
        Ok(Self {
            lats,
            lons,
            envelope,
        })
    }

    pub fn nlat(&self) -> usize {
        self.lats.nrows()
    }

    pub fn nlon(&self) -> usize {
        self.lats.ncols()
    }

    /// Overall horizontal extent, used by the bounds policy.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// One named field variable on the source grid.
#[derive(Debug, Clone)]
pub struct SourceField {
    /// Field name (e.g. "u", "v", "w", "pres", "t")
    pub name: String,
    /// Units string carried through to downstream writers
    pub units: String,
    /// Values, shape (nlevel, nlat, nlon)
    pub data: Array3<f64>,
}

impl SourceField {
    pub fn new(name: &str, units: &str, data: Array3<f64>) -> Self {
        Self {
            name: name.to_string(),
            units: units.to_string(),
            data,
        }
    }
}

/// A source grid plus the geopotential-height array and field variables.
///
/// `heights` doubles as the vertical coordinate: the profile `heights[:, i, j]`
/// gives the physical height of every level above column (i, j). Profiles are
/// expected monotonic in index within the usable range but this is not
/// verified; bracket-finding tolerates local ties and reversals.
#[derive(Debug, Clone)]
pub struct SourceVolume {
    pub grid: SourceGrid,
    /// Geopotential height (gpm), shape (nlevel, nlat, nlon)
    pub heights: Array3<f64>,
    fields: Vec<SourceField>,
}

impl SourceVolume {
    pub fn new(grid: SourceGrid, heights: Array3<f64>) -> Result<Self, RegridError> {
        let (nlevel, nlat, nlon) = heights.dim();
        if (nlat, nlon) != grid.lats.dim() {
            return Err(RegridError::ShapeMismatch {
                context: "geopotential height".to_string(),
                expected: vec![nlevel, grid.nlat(), grid.nlon()],
                found: heights.shape().to_vec(),
            });
        }
        if nlevel < 2 {
            return Err(RegridError::GridTooSmall {
                axis: "level",
                len: nlevel,
            });
        }
        Ok(Self {
            grid,
            heights,
            fields: Vec::new(),
        })
    }

    pub fn nlevel(&self) -> usize {
        self.heights.shape()[0]
    }

    /// Add a field variable, rejecting any shape that disagrees with the
    /// height array.
    pub fn add_field(&mut self, field: SourceField) -> Result<(), RegridError> {
        if field.data.dim() != self.heights.dim() {
            return Err(RegridError::ShapeMismatch {
                context: format!("field {}", field.name),
                expected: self.heights.shape().to_vec(),
                found: field.data.shape().to_vec(),
            });
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn get_field(&self, name: &str) -> Option<&SourceField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn fields(&self) -> &[SourceField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Vertical height profile of one horizontal column.
    pub fn height_profile(&self, i: usize, j: usize) -> ArrayView1<'_, f64> {
        self.heights.slice(s![.., i, j])
    }

    /// Summary of one column's height profile.
    pub fn profile_stats(&self, i: usize, j: usize) -> ProfileStats {
        let profile = self.height_profile(i, j);
        let min = profile.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = profile.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let nan_count = profile.iter().filter(|v| v.is_nan()).count();
        let mut inversions = 0;
        for k in 1..profile.len() {
            if profile[k] <= profile[k - 1] {
                inversions += 1;
            }
        }
        ProfileStats {
            n_levels: profile.len(),
            min,
            max,
            inversions,
            nan_count,
        }
    }
}

/// Column-local height profile summary, used to spot suspect columns
/// before trusting the nearest-level vertical locator on them.
#[derive(Debug, Clone, Copy)]
pub struct ProfileStats {
    pub n_levels: usize,
    /// Lowest level height (m), NaN levels ignored
    pub min: f64,
    /// Highest level height (m), NaN levels ignored
    pub max: f64,
    /// Adjacent level pairs that fail to increase
    pub inversions: usize,
    pub nan_count: usize,
}

impl std::fmt::Display for ProfileStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} levels, gh range [{:.1}, {:.1}] m, {} inversions, {} NaN",
            self.n_levels, self.min, self.max, self.inversions, self.nan_count
        )
    }
}

/// A single query location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPoint {
    /// Latitude (degrees north)
    pub lat: f64,
    /// Longitude (degrees east)
    pub lon: f64,
    /// Altitude (m), compared against geopotential height
    pub height: f64,
}

/// Named altitude bands of the CFD domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Mid => "mid",
            Band::High => "high",
        }
    }

    pub fn from_name(name: &str) -> Option<Band> {
        match name {
            "low" => Some(Band::Low),
            "mid" => Some(Band::Mid),
            "high" => Some(Band::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dense target lattice for one altitude band: the Cartesian product of
/// three independent 1D coordinate arrays, evaluated pointwise.
#[derive(Debug, Clone)]
pub struct BandGrid {
    pub band: Band,
    /// Target latitudes (degrees north)
    pub lats: Array1<f64>,
    /// Target longitudes (degrees east)
    pub lons: Array1<f64>,
    /// Target altitudes (m)
    pub altitudes: Array1<f64>,
}

impl BandGrid {
    pub fn new(band: Band, lats: Array1<f64>, lons: Array1<f64>, altitudes: Array1<f64>) -> Self {
        Self {
            band,
            lats,
            lons,
            altitudes,
        }
    }

    /// Build the lattice for a configured band over the domain bounding box.
    pub fn from_config(config: &BandConfig, constants: &Constants) -> Self {
        Self {
            band: config.band,
            lats: Array1::linspace(constants.lat_min, constants.lat_max, config.n_lat),
            lons: Array1::linspace(constants.lon_min, constants.lon_max, config.n_lon),
            altitudes: Array1::linspace(config.alt_min, config.alt_max, config.n_levels),
        }
    }

    /// Output array shape: (n_altitude, n_lat, n_lon).
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.altitudes.len(), self.lats.len(), self.lons.len())
    }

    pub fn n_points(&self) -> usize {
        self.altitudes.len() * self.lats.len() * self.lons.len()
    }
}
