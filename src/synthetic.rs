//! Fabricated HRRR-shaped source volumes with analytically known fields,
//! used by the demo binary and the integration tests in place of real
//! model output.

use ndarray::{Array2, Array3};

use crate::config::Constants;
use crate::error::RegridError;
use crate::grid::{SourceField, SourceGrid, SourceVolume};
use crate::math::physics::omega_to_w;

/// Height of the lowest model level (m)
pub const GH_BASE: f64 = 80.0;
/// Height spacing between model levels (m)
pub const GH_STEP: f64 = 120.0;

/// Surface u-wind (m/s) and linear shear with height (1/s scaled)
pub const U_SURFACE: f64 = 1.5;
pub const U_SHEAR: f64 = 0.01;
/// Surface v-wind (m/s) and linear shear with height
pub const V_SURFACE: f64 = -3.0;
pub const V_SHEAR: f64 = 0.005;

/// Constant pressure vertical velocity (Pa/s)
pub const OMEGA: f64 = -0.4;
/// Surface temperature (K) and lapse rate (K/m)
pub const T_SURFACE: f64 = 288.15;
pub const LAPSE_RATE: f64 = 0.0065;
/// Surface pressure (Pa) and scale height (m)
pub const P_SURFACE: f64 = 101_325.0;
pub const SCALE_HEIGHT: f64 = 8_400.0;

/// Analytic u profile; trilinear regridding of the synthetic volume must
/// reproduce this exactly (the field is linear in height and the height
/// levels are horizontally uniform).
pub fn u_at_height(height: f64) -> f64 {
    U_SURFACE + U_SHEAR * height
}

/// Analytic v profile.
pub fn v_at_height(height: f64) -> f64 {
    V_SURFACE + V_SHEAR * height
}

pub fn t_at_height(height: f64) -> f64 {
    T_SURFACE - LAPSE_RATE * height
}

pub fn pres_at_height(height: f64) -> f64 {
    P_SURFACE * (-height / SCALE_HEIGHT).exp()
}

/// Build a synthetic source volume over the configured domain box.
///
/// The horizontal grid is axis-aligned and padded one grid spacing beyond
/// the target bounding box so that band lattices fall strictly inside the
/// envelope. Height levels are horizontally uniform at
/// `GH_BASE + k * GH_STEP`; the default eight levels span 80-920 m,
/// covering all three altitude bands. Carries u, v, w, pres, t, and gh
/// itself as field variables.
pub fn synthetic_volume(
    nlev: usize,
    nlat: usize,
    nlon: usize,
    constants: &Constants,
) -> Result<SourceVolume, RegridError> {
    let lat_pad = (constants.lat_max - constants.lat_min) / (nlat.max(2) - 1) as f64;
    let lon_pad = (constants.lon_max - constants.lon_min) / (nlon.max(2) - 1) as f64;
    let lat_lo = constants.lat_min - lat_pad;
    let lat_hi = constants.lat_max + lat_pad;
    let lon_lo = constants.lon_min - lon_pad;
    let lon_hi = constants.lon_max + lon_pad;

    let lats = Array2::from_shape_fn((nlat, nlon), |(i, _)| {
        lat_lo + (lat_hi - lat_lo) * i as f64 / (nlat - 1) as f64
    });
    let lons = Array2::from_shape_fn((nlat, nlon), |(_, j)| {
        lon_lo + (lon_hi - lon_lo) * j as f64 / (nlon - 1) as f64
    });
    let grid = SourceGrid::new(lats, lons)?;

    let heights =
        Array3::from_shape_fn((nlev, nlat, nlon), |(k, _, _)| GH_BASE + GH_STEP * k as f64);

    let u = heights.mapv(u_at_height);
    let v = heights.mapv(v_at_height);
    let t = heights.mapv(t_at_height);
    let pres = heights.mapv(pres_at_height);
    // convert the constant omega to geometric vertical velocity per node
    let mut w = Array3::zeros((nlev, nlat, nlon));
    for (idx, w_val) in w.indexed_iter_mut() {
        *w_val = omega_to_w(OMEGA, pres[idx], t[idx], constants);
    }

    let mut volume = SourceVolume::new(grid, heights.clone())?;
    volume.add_field(SourceField::new("gh", "gpm", heights))?;
    volume.add_field(SourceField::new("u", "m s-1", u))?;
    volume.add_field(SourceField::new("v", "m s-1", v))?;
    volume.add_field(SourceField::new("w", "m s-1", w))?;
    volume.add_field(SourceField::new("pres", "Pa", pres))?;
    volume.add_field(SourceField::new("t", "K", t))?;
    Ok(volume)
}
