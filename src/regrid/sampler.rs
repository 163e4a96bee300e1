use crate::grid::{SourceField, SourceVolume, TargetPoint};
use crate::math::interpolate::{corner_cube, interp_weight, trilinear, Weights};
use crate::math::locate::{
    bracket_from_center, find_bracketing_indices, nearest_cell, nearest_index, vertical_bracket,
    CellBracket, HorizontalLocator,
};

// 1D coordinate axes extracted once for the rectilinear fast path
#[derive(Debug, Clone)]
struct RectilinearAxes {
    lat_axis: Vec<f64>,
    lon_axis: Vec<f64>,
}

#[derive(Debug)]
enum Strategy {
    Curvilinear,
    Rectilinear(RectilinearAxes),
}

/// Samples field values at arbitrary target points by trilinear
/// interpolation over a source volume.
///
/// Bracket indices and weights are computed once per point and reused for
/// every requested field. Out-of-domain points yield NaN, per the bounds
/// policy: the horizontal envelope check and the column-local vertical
/// range check each short-circuit before any bracket math.
#[derive(Debug)]
pub struct PointSampler<'a> {
    volume: &'a SourceVolume,
    strategy: Strategy,
}

impl<'a> PointSampler<'a> {
    pub fn new(volume: &'a SourceVolume, locator: HorizontalLocator) -> Self {
        let strategy = match locator {
            HorizontalLocator::Curvilinear => Strategy::Curvilinear,
            HorizontalLocator::Rectilinear => Strategy::Rectilinear(RectilinearAxes {
                lat_axis: volume.grid.lats.column(0).to_vec(),
                lon_axis: volume.grid.lons.row(0).to_vec(),
            }),
        };
        Self { volume, strategy }
    }

    /// Bracketing cell and weights for one target point, or `None` when the
    /// point is outside the horizontal envelope or the local vertical range.
    pub fn locate(&self, point: &TargetPoint) -> Option<(CellBracket, Weights)> {
        let grid = &self.volume.grid;
        if !grid.envelope().contains(point.lat, point.lon) {
            return None;
        }

        let (center, (i0, i1), (j0, j1)) = match &self.strategy {
            Strategy::Curvilinear => {
                let (i_c, j_c) =
                    nearest_cell(grid.lats.view(), grid.lons.view(), point.lat, point.lon);
                let i_pair =
                    bracket_from_center(i_c, grid.lats[[i_c, j_c]], point.lat, grid.nlat());
                let j_pair =
                    bracket_from_center(j_c, grid.lons[[i_c, j_c]], point.lon, grid.nlon());
                ((i_c, j_c), i_pair, j_pair)
            }
            Strategy::Rectilinear(axes) => {
                let i_pair = find_bracketing_indices(&axes.lat_axis, point.lat);
                let j_pair = find_bracketing_indices(&axes.lon_axis, point.lon);
                let i_c = nearest_index(&axes.lat_axis, point.lat);
                let j_c = nearest_index(&axes.lon_axis, point.lon);
                ((i_c, j_c), i_pair, j_pair)
            }
        };

        // vertical bracketing against the nearest column's own profile
        let profile = self.volume.height_profile(center.0, center.1);
        let (k0, k1) = vertical_bracket(profile, point.height)?;

        let b = CellBracket {
            k0,
            k1,
            i0,
            i1,
            j0,
            j1,
        };
        let lon0 = grid.lons[[b.i0, b.j0]];
        let lon1 = grid.lons[[b.i0, b.j1]];
        let lat0 = grid.lats[[b.i0, b.j0]];
        let lat1 = grid.lats[[b.i1, b.j0]];
        let gh0 = self.volume.heights[[b.k0, b.i0, b.j0]];
        let gh1 = self.volume.heights[[b.k1, b.i0, b.j0]];
        let w = Weights {
            wx: interp_weight(point.lon, lon0, lon1),
            wy: interp_weight(point.lat, lat0, lat1),
            wz: interp_weight(point.height, gh0, gh1),
        };
        Some((b, w))
    }

    /// Interpolated value of one field at one point; NaN when out of domain.
    pub fn sample(&self, point: &TargetPoint, field: &SourceField) -> f64 {
        match self.locate(point) {
            Some((b, w)) => trilinear(&corner_cube(field.data.view(), &b), &w),
            None => f64::NAN,
        }
    }

    /// Interpolated values of several fields at one point, computing the
    /// cell and weights once. NaN per field when out of domain.
    pub fn sample_fields(&self, point: &TargetPoint, fields: &[&SourceField]) -> Vec<f64> {
        match self.locate(point) {
            Some((b, w)) => fields
                .iter()
                .map(|f| trilinear(&corner_cube(f.data.view(), &b), &w))
                .collect(),
            None => vec![f64::NAN; fields.len()],
        }
    }
}
