use std::f32::consts::PI;

use bevy::prelude::*;

/// Degrees of rotation per hour of right ascension
const DEGREES_PER_HOUR: f32 = 15.0;

/// Maps equatorial coordinates onto a sphere of the given radius.
///
/// +Y is the north celestial pole, RA 0h lies on +X and RA increases
/// towards -Z. Total over all finite inputs; RA wraps through the trig
/// functions so 25h lands on 1h.
pub fn to_cartesian(ra_hours: f32, dec_degrees: f32, radius: f32) -> Vec3 {
    let ra = (ra_hours * DEGREES_PER_HOUR).to_radians();
    let dec = dec_degrees.to_radians();

    Vec3::new(
        radius * dec.cos() * ra.cos(),
        radius * dec.sin(),
        -radius * dec.cos() * ra.sin(),
    )
}

/// Converts a right ascension in radians to hours
pub fn radians_to_hours(ra: f32) -> f32 { ra * 12.0 / PI }
