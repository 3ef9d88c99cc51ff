//! CPU mirror of `assets/shaders/star_field.wgsl`.
//!
//! The shader is the authority at render time. Catalog sizing and the label
//! policy use these copies, and the tests pin the curves.

use super::constants::MAGNITUDE_LIMIT;
use super::constants::POGSON_RATIO;

/// Widest field of view the zoom curves are anchored to
pub const REFERENCE_FOV: f32 = 90.0;

/// Relative brightness against the faintest ingested magnitude
pub fn pogson_brightness(magnitude: f32) -> f32 {
    POGSON_RATIO.powf((MAGNITUDE_LIMIT - magnitude) / 2.5)
}

/// Alpha weight applied to a star sprite, piecewise linear and non-increasing.
/// Only the WGSL copy runs; this one keeps the curve under test.
#[cfg(test)]
fn magnitude_weight(magnitude: f32) -> f32 {
    if magnitude < 1.0 {
        1.0
    } else if magnitude < 4.0 {
        1.0 - (magnitude - 1.0) / 3.0 * 0.6
    } else {
        0.4 - (magnitude - 4.0) / 2.5 * 0.25
    }
}

/// Point size multiplier, 1.0 at 90 degrees and growing as the view narrows
pub fn zoom_factor(fov_degrees: f32) -> f32 {
    (REFERENCE_FOV / fov_degrees).ln().mul_add(0.5, 1.0)
}

#[cfg(test)]
mod shading_tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_weight_breakpoints() {
        assert!((magnitude_weight(-1.5) - 1.0).abs() < EPSILON);
        assert!((magnitude_weight(1.0) - 1.0).abs() < EPSILON);
        assert!((magnitude_weight(4.0) - 0.4).abs() < EPSILON);
        assert!((magnitude_weight(6.5) - 0.15).abs() < EPSILON);
    }

    #[test]
    fn test_weight_is_non_increasing() {
        let mut previous = magnitude_weight(-2.0);
        let mut magnitude = -2.0;
        while magnitude <= 6.5 {
            let weight = magnitude_weight(magnitude);
            assert!(
                weight <= previous + EPSILON,
                "weight rose at magnitude {magnitude}: {previous} -> {weight}"
            );
            previous = weight;
            magnitude += 0.05;
        }
    }

    #[test]
    fn test_brightness_is_one_at_the_limit() {
        assert!((pogson_brightness(MAGNITUDE_LIMIT) - 1.0).abs() < EPSILON);
        assert!((pogson_brightness(MAGNITUDE_LIMIT - 5.0) - 2.512 * 2.512).abs() < 0.01);
        assert!(pogson_brightness(0.0) > pogson_brightness(1.0));
    }

    #[test]
    fn test_zoom_factor_grows_when_narrowing() {
        assert!((zoom_factor(90.0) - 1.0).abs() < EPSILON);
        assert!(zoom_factor(45.0) > zoom_factor(75.0));
        assert!((zoom_factor(20.0) - (4.5_f32.ln() * 0.5 + 1.0)).abs() < EPSILON);
    }
}
