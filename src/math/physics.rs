use crate::config::Constants;

/// Convert pressure vertical velocity (omega, Pa/s) to geometric vertical
/// velocity (m/s): w = -omega * R * T / (p * g)
pub fn omega_to_w(omega: f64, pressure: f64, temperature: f64, constants: &Constants) -> f64 {
    -omega * constants.r_dry * temperature / (pressure * constants.g)
}

/// Horizontal wind speed from components
pub fn wind_speed(u: f64, v: f64) -> f64 {
    u.hypot(v)
}

/// Wind direction (degrees, mathematical convention: counterclockwise
/// from east), wrapped to [0, 360)
pub fn wind_direction(u: f64, v: f64) -> f64 {
    v.atan2(u).to_degrees().rem_euclid(360.0)
}

/// Manhattan distance in degrees, the horizontal nearest-node metric
pub fn manhattan_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    (lat1 - lat2).abs() + (lon1 - lon2).abs()
}

/// Great-circle distance between two geographic points (Haversine formula)
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, earth_radius: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();

    let a =
        (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    earth_radius * c
}
