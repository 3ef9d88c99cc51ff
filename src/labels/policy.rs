use bevy::prelude::*;

use super::config::LabelConfig;
use crate::sky::zoom_factor;

/// What a label is attached to, with the data needed to reposition it.
///
/// Lives on the label entity itself, so the entity doubles as the handle to
/// the drawable being adjusted.
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub enum LabelEntry {
    Star {
        magnitude:     f32,
        base_position: Vec3,
    },
    Picture {
        base_position: Vec3,
        base_offset:   f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    pub visible:  bool,
    pub position: Vec3,
}

/// Label level of detail for one field of view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPolicy {
    /// Faintest magnitude that still gets a label
    pub magnitude_threshold: f32,
    /// Shrinks vertical offsets as the view narrows
    pub zoom_factor:         f32,
    star_offset:             f32,
}

impl LabelPolicy {
    pub fn new(fov: f32, config: &LabelConfig) -> Self {
        let ceiling = config.fov_ceiling.max(config.fov_floor);
        let clamped = fov.clamp(config.fov_floor, ceiling);
        let span = (ceiling / config.fov_floor).ln();
        let t = if span > f32::EPSILON {
            (ceiling / clamped).ln() / span
        } else {
            0.0
        };

        let magnitude_threshold = (config.close_magnitude_threshold
            - config.wide_magnitude_threshold)
            .mul_add(t, config.wide_magnitude_threshold);

        Self {
            magnitude_threshold,
            zoom_factor: zoom_factor(fov).recip(),
            star_offset: config.star_label_offset,
        }
    }

    pub fn star_visible(&self, magnitude: f32) -> bool { magnitude <= self.magnitude_threshold }

    pub fn place(&self, entry: &LabelEntry) -> LabelPlacement {
        match *entry {
            LabelEntry::Star {
                magnitude,
                base_position,
            } => LabelPlacement {
                visible:  self.star_visible(magnitude),
                position: base_position + Vec3::Y * (self.star_offset * self.zoom_factor),
            },
            LabelEntry::Picture {
                base_position,
                base_offset,
            } => LabelPlacement {
                visible:  true,
                position: base_position - Vec3::Y * (base_offset * self.zoom_factor),
            },
        }
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn policy_at(fov: f32) -> LabelPolicy { LabelPolicy::new(fov, &LabelConfig::default()) }

    #[test]
    fn test_threshold_at_range_ends() {
        assert!((policy_at(90.0).magnitude_threshold - 1.5).abs() < EPSILON);
        assert!((policy_at(20.0).magnitude_threshold - 3.5).abs() < EPSILON);
    }

    #[test]
    fn test_threshold_clamps_outside_range() {
        assert!((policy_at(10.0).magnitude_threshold - 3.5).abs() < EPSILON);
        assert!((policy_at(120.0).magnitude_threshold - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_threshold_grows_when_zooming_in() {
        let mut previous = policy_at(90.0).magnitude_threshold;
        for fov in [80.0, 75.0, 60.0, 45.0, 30.0, 20.0] {
            let threshold = policy_at(fov).magnitude_threshold;
            assert!(threshold > previous, "threshold fell at fov {fov}");
            previous = threshold;
        }
    }

    #[test]
    fn test_magnitude_at_threshold_is_visible() {
        let policy = policy_at(90.0);
        let at = LabelEntry::Star {
            magnitude:     1.5,
            base_position: Vec3::ZERO,
        };
        let fainter = LabelEntry::Star {
            magnitude:     1.51,
            base_position: Vec3::ZERO,
        };
        assert!(policy.place(&at).visible);
        assert!(!policy.place(&fainter).visible);
    }

    #[test]
    fn test_star_offset_shrinks_with_zoom() {
        let base_position = Vec3::new(10.0, 5.0, -3.0);
        let entry = LabelEntry::Star {
            magnitude: 0.0,
            base_position,
        };

        let wide = policy_at(90.0).place(&entry);
        assert!(wide.position.distance(base_position + Vec3::Y * 0.8) < EPSILON);

        let close = policy_at(20.0).place(&entry);
        let expected = 0.8 / (4.5_f32.ln() * 0.5 + 1.0);
        assert!((close.position.y - base_position.y - expected).abs() < EPSILON);
        assert_eq!(close.position.x, base_position.x);
    }

    #[test]
    fn test_picture_label_sits_below() {
        let base_position = Vec3::new(0.0, 10.0, -40.0);
        let entry = LabelEntry::Picture {
            base_position,
            base_offset: 2.3,
        };

        let placement = policy_at(90.0).place(&entry);
        assert!(placement.visible);
        assert!((placement.position.y - 7.7).abs() < EPSILON);
    }
}
