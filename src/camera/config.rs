use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use super::constants::CAMERA_FAR;
use super::constants::CAMERA_NEAR;
use super::constants::DEFAULT_FOV;
use super::constants::MAX_FOV;
use super::constants::MIN_FOV;
use super::constants::WHEEL_FOV_STEP;
use super::controller::FovLimits;
use super::controller::ViewerState;
use super::dispatch_effect;
use crate::viewer_input::Inspector;
use crate::viewer_input::inspector_active;

pub struct CameraConfigPlugin;

impl Plugin for CameraConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            ResourceInspectorPlugin::<CameraConfig>::default()
                .run_if(inspector_active(Inspector::Camera)),
        )
        .init_resource::<CameraConfig>()
        .add_systems(Update, sync_fov_limits);
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct CameraConfig {
    pub clear_color: Color,
    #[inspector(min = 10.0, max = 90.0, display = NumberDisplay::Slider)]
    pub default_fov: f32,
    #[inspector(min = 10.0, max = 90.0, display = NumberDisplay::Slider)]
    pub min_fov:     f32,
    #[inspector(min = 10.0, max = 90.0, display = NumberDisplay::Slider)]
    pub max_fov:     f32,
    /// Degrees per wheel tick
    #[inspector(min = 0.5, max = 20.0, display = NumberDisplay::Slider)]
    pub wheel_step:  f32,
    pub near:        f32,
    pub far:         f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            default_fov: DEFAULT_FOV,
            min_fov:     MIN_FOV,
            max_fov:     MAX_FOV,
            wheel_step:  WHEEL_FOV_STEP,
            near:        CAMERA_NEAR,
            far:         CAMERA_FAR,
        }
    }
}

impl CameraConfig {
    /// Limits for the controller, never wider than the 10 to 90 degree range
    pub fn fov_limits(&self) -> FovLimits {
        let min_fov = self.min_fov.clamp(MIN_FOV, MAX_FOV);
        let max_fov = self.max_fov.clamp(MIN_FOV, MAX_FOV);
        let min = min_fov.min(max_fov);
        let max = max_fov.max(min_fov);
        FovLimits {
            min,
            max,
            default: self.default_fov.clamp(min, max),
            wheel_step: self.wheel_step,
        }
    }
}

/// Pushes inspector edits into the controller, re-clamping the current zoom
fn sync_fov_limits(
    mut commands: Commands,
    config: Res<CameraConfig>,
    mut viewer: ResMut<ViewerState>,
) {
    if !config.is_changed() {
        return;
    }

    viewer.limits = config.fov_limits();
    let fov = viewer.camera.fov;
    if let Some(effect) = viewer.set_fov(fov) {
        dispatch_effect(&mut commands, effect);
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_limits_stay_within_range() {
        let config = CameraConfig {
            min_fov:     1.0,
            max_fov:     120.0,
            default_fov: 100.0,
            ..default()
        };
        let limits = config.fov_limits();

        assert!((limits.min - MIN_FOV).abs() < EPSILON);
        assert!((limits.max - MAX_FOV).abs() < EPSILON);
        assert!((limits.default - MAX_FOV).abs() < EPSILON);
    }

    #[test]
    fn test_swapped_limits_are_ordered() {
        let config = CameraConfig {
            min_fov: 60.0,
            max_fov: 30.0,
            ..default()
        };
        let limits = config.fov_limits();

        assert!((limits.min - 30.0).abs() < EPSILON);
        assert!((limits.max - 60.0).abs() < EPSILON);
        assert!(limits.default >= limits.min && limits.default <= limits.max);
    }
}
