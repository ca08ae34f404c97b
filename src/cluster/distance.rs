use std::f64::consts::PI;

use super::point::Position;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in kilometers
pub const EARTH_R: f64 = 6371.0;

/// Calculates squared Euclidean distance on the flat (lat, lon) plane
pub fn distance_planar_sq(p1: &Position, p2: &Position) -> f64 {
    let v1 = p1.0[0] - p2.0[0];
    let v2 = p1.0[1] - p2.0[1];

    v1 * v1 + v2 * v2
}

/// Calculates Euclidean distance on the flat (lat, lon) plane, in degrees
///
/// This is the assignment metric. Ties are decided on this value, so two
/// centroids whose squared distances differ only below sqrt rounding count
/// as equally near.
pub fn distance_planar(p1: &Position, p2: &Position) -> f64 {
    distance_planar_sq(p1, p2).sqrt()
}

/// Calculates spherical (equirectangular) distance between two positions
///
/// Used for reporting only, the engine itself stays on the flat plane.
///
/// # Returns
///
/// Distance in kilometers
pub fn distance_spherical(p1: &Position, p2: &Position) -> f64 {
    let v1 = (p1.0[0] - p2.0[0]) * DEGREE_RAD;
    let v1 = v1 * v1;

    let v2 = (p1.0[1] - p2.0[1]) * DEGREE_RAD * ((p1.0[0] + p2.0[0]) / 2.0 * DEGREE_RAD).cos();
    let v2 = v2 * v2;

    EARTH_R * (v1 + v2).sqrt()
}
