use ndarray::ArrayView3;
use num_traits::Float;

use crate::math::locate::CellBracket;

/// Generic linear interpolation between two values
pub fn lin_interp<T: Float>(v0: T, v1: T, fac: T) -> T {
    v0 + (v1 - v0) * fac
}

/// Fractional position of `x` within the interval `[x0, x1]`.
///
/// A zero-width interval yields 0.0, selecting the lower corner; this is
/// the defined degenerate-interval policy, not an error. The result leaves
/// `[0, 1]` when an endpoint bracket was clamped at the grid edge.
pub fn interp_weight(x: f64, x0: f64, x1: f64) -> f64 {
    if x1 == x0 {
        return 0.0;
    }
    (x - x0) / (x1 - x0)
}

/// Fractional position of a query point within its bracketing cube along
/// longitude (`wx`), latitude (`wy`), and height (`wz`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

/// The 8 corner samples of one field, indexed `[k][i][j]` with 0 = lower
/// bracket and 1 = upper bracket on each axis.
pub type CornerCube = [[[f64; 2]; 2]; 2];

/// Extract the 8 corner samples of a field for one bracketing cell.
pub fn corner_cube(field: ArrayView3<'_, f64>, b: &CellBracket) -> CornerCube {
    [
        [
            [field[[b.k0, b.i0, b.j0]], field[[b.k0, b.i0, b.j1]]],
            [field[[b.k0, b.i1, b.j0]], field[[b.k0, b.i1, b.j1]]],
        ],
        [
            [field[[b.k1, b.i0, b.j0]], field[[b.k1, b.i0, b.j1]]],
            [field[[b.k1, b.i1, b.j0]], field[[b.k1, b.i1, b.j1]]],
        ],
    ]
}

/// 8-term trilinear blend of the corner cube.
///
/// Each corner contributes the product of its axis weights: `(1 - w)` on
/// the lower side, `w` on the upper side. NaN corners propagate to a NaN
/// result; never panics on finite input.
pub fn trilinear(cube: &CornerCube, w: &Weights) -> f64 {
    let Weights { wx, wy, wz } = *w;
    cube[0][0][0] * (1.0 - wx) * (1.0 - wy) * (1.0 - wz)
        + cube[0][0][1] * wx * (1.0 - wy) * (1.0 - wz)
        + cube[0][1][0] * (1.0 - wx) * wy * (1.0 - wz)
        + cube[0][1][1] * wx * wy * (1.0 - wz)
        + cube[1][0][0] * (1.0 - wx) * (1.0 - wy) * wz
        + cube[1][0][1] * wx * (1.0 - wy) * wz
        + cube[1][1][0] * (1.0 - wx) * wy * wz
        + cube[1][1][1] * wx * wy * wz
}
