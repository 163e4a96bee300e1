use ndarray::{ArrayView1, ArrayView2};

use crate::math::physics::manhattan_deg;

/// Strategy for locating the horizontal cell containing a query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalLocator {
    /// Manhattan nearest-node search over the full 2D lat/lon arrays.
    /// Works on curvilinear grids; an approximation that does not guarantee
    /// containment on strongly skewed or sparse grids.
    #[default]
    Curvilinear,
    /// Binary search on `lats[:, 0]` and `lons[0, :]` treated as sorted 1D
    /// axes. Only valid for axis-aligned grids; caller-selected.
    Rectilinear,
}

impl HorizontalLocator {
    pub fn from_name(name: &str) -> Option<HorizontalLocator> {
        match name {
            "curvilinear" => Some(HorizontalLocator::Curvilinear),
            "rectilinear" => Some(HorizontalLocator::Rectilinear),
            _ => None,
        }
    }
}

/// Bracketing index pairs for one query point along the (k, i, j) axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBracket {
    pub k0: usize,
    pub k1: usize,
    pub i0: usize,
    pub i1: usize,
    pub j0: usize,
    pub j1: usize,
}

/// Bracketing indices of `value` in a sorted ascending coordinate array.
///
/// Returns `(0, 1)` before the first interval, `(n-2, n-1)` at or past the
/// last, otherwise `(idx-1, idx)` with leftmost insertion-point semantics.
/// Precondition: `coords` sorted ascending with at least 2 entries;
/// violating the sort yields an undefined bracket.
pub fn find_bracketing_indices(coords: &[f64], value: f64) -> (usize, usize) {
    let n = coords.len();
    let idx = coords.partition_point(|&c| c < value);
    if idx == 0 {
        (0, 1)
    } else if idx >= n {
        (n - 2, n - 1)
    } else {
        (idx - 1, idx)
    }
}

/// Index of the entry nearest to `value` (first winner on ties).
pub fn nearest_index(coords: &[f64], value: f64) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (k, &c) in coords.iter().enumerate() {
        let d = (c - value).abs();
        if d < best_d {
            best_d = d;
            best = k;
        }
    }
    best
}

/// Grid node nearest to the query point by Manhattan degree distance,
/// searched over the full 2D curvilinear grid.
pub fn nearest_cell(
    lats: ArrayView2<'_, f64>,
    lons: ArrayView2<'_, f64>,
    lat: f64,
    lon: f64,
) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_d = f64::INFINITY;
    for ((i, j), &node_lat) in lats.indexed_iter() {
        let d = manhattan_deg(node_lat, lons[[i, j]], lat, lon);
        if d < best_d {
            best_d = d;
            best = (i, j);
        }
    }
    best
}

/// Bracketing pair around a center index along one axis, chosen by which
/// side of the center coordinate the query falls on, clamped to `[0, n-1]`.
///
/// At the grid edge the pair degenerates to zero width; the degenerate
/// weight policy then selects the edge node.
pub fn bracket_from_center(center: usize, center_coord: f64, query: f64, n: usize) -> (usize, usize) {
    if center_coord < query {
        (center, (center + 1).min(n - 1))
    } else {
        (center.saturating_sub(1), center)
    }
}

/// Vertical bracketing levels for a target height within one column's
/// height profile, or `None` when the height lies outside the column-local
/// range.
///
/// Uses nearest-level search rather than sorted search so that locally
/// non-monotonic profiles (model noise) still bracket sensibly. NaN levels
/// are skipped in both the range check and the nearest-level search.
pub fn vertical_bracket(profile: ArrayView1<'_, f64>, target_height: f64) -> Option<(usize, usize)> {
    let min = profile.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = profile.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    if !(target_height >= min && target_height <= max) {
        return None;
    }
    let nlevel = profile.len();
    let mut k_c = 0;
    let mut best_d = f64::INFINITY;
    for (k, &gh) in profile.iter().enumerate() {
        let d = (gh - target_height).abs();
        if d < best_d {
            best_d = d;
            k_c = k;
        }
    }
    Some(bracket_from_center(
        k_c,
        profile[k_c],
        target_height,
        nlevel,
    ))
}
