use bevy::prelude::*;
use rand::prelude::*;

use super::catalog::StarCatalog;
use super::catalog::StarRecord;
use super::constants::STAR_RADIUS;
use super::constants::SYNTHETIC_STAR_COUNT;
use super::constants::SYNTHETIC_STAR_MAGNITUDE;

/// Uniformly distributed point on a sphere of the given radius
fn random_sphere_position(radius: f32, rng: &mut ThreadRng) -> Vec3 {
    let azimuth_norm: f32 = rng.random_range(0.0..1.0);
    let polar_norm: f32 = rng.random_range(0.0..1.0);

    let theta = azimuth_norm * std::f32::consts::TAU;
    // uniform in cos(phi), not phi, or the poles bunch up
    let phi = 2.0f32.mul_add(polar_norm, -1.0).acos();

    Vec3::new(
        radius * theta.cos() * phi.sin(),
        radius * phi.cos(),
        radius * theta.sin() * phi.sin(),
    )
}

/// Stand-in starfield shown until (or instead of) the real catalog
pub fn synthetic_catalog(count: usize, rng: &mut ThreadRng) -> StarCatalog {
    let stars = (0..count)
        .map(|_| StarRecord {
            position:  random_sphere_position(STAR_RADIUS, rng),
            magnitude: SYNTHETIC_STAR_MAGNITUDE,
            name:      None,
        })
        .collect();

    StarCatalog {
        stars,
        ..default()
    }
}

pub fn default_synthetic_catalog() -> StarCatalog {
    synthetic_catalog(SYNTHETIC_STAR_COUNT, &mut rand::rng())
}

#[cfg(test)]
mod synthetic_tests {
    use super::*;

    #[test]
    fn test_synthetic_stars_sit_on_the_star_sphere() {
        let catalog = synthetic_catalog(500, &mut rand::rng());

        assert_eq!(catalog.len(), 500);
        assert_eq!(catalog.named_stars().count(), 0);
        for star in &catalog.stars {
            assert!((star.position.length() - STAR_RADIUS).abs() < 1e-3);
            assert!((star.magnitude - SYNTHETIC_STAR_MAGNITUDE).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_default_count() {
        assert_eq!(default_synthetic_catalog().len(), SYNTHETIC_STAR_COUNT);
    }
}
