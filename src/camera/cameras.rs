use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::config::CameraConfig;
use super::controller::ViewerState;
use super::dispatch_effect;
use crate::schedule::ViewerSet;
use crate::viewer_input::ResetView;

pub struct CamerasPlugin;

impl Plugin for CamerasPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_sky_camera)
            .add_observer(reset_view)
            .add_systems(
                Update,
                (
                    apply_viewer_to_camera.in_set(ViewerSet::CameraUpdate),
                    update_clear_color,
                ),
            );
    }
}

/// The one camera; it sits at the origin and only rotates and zooms
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct SkyCamera;

fn spawn_sky_camera(mut commands: Commands, config: Res<CameraConfig>, viewer: Res<ViewerState>) {
    commands.spawn((
        Name::new("SkyCamera"),
        SkyCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: viewer.camera.fov.to_radians(),
            near: config.near,
            far: config.far,
            ..default()
        }),
        Transform::from_rotation(viewer.camera.orientation),
    ));
}

fn apply_viewer_to_camera(
    viewer: Res<ViewerState>,
    camera: Single<(&mut Transform, &mut Projection), With<SkyCamera>>,
) {
    if !viewer.is_changed() {
        return;
    }

    let (mut transform, mut projection) = camera.into_inner();
    transform.translation = Vec3::ZERO;
    transform.rotation = viewer.camera.orientation;

    if let Projection::Perspective(perspective) = projection.as_mut() {
        perspective.fov = viewer.camera.fov.to_radians();
    }
}

fn reset_view(_: On<Start<ResetView>>, mut commands: Commands, mut viewer: ResMut<ViewerState>) {
    debug!("resetting view");
    if let Some(effect) = viewer.reset_view() {
        dispatch_effect(&mut commands, effect);
    }
}

fn update_clear_color(camera_config: Res<CameraConfig>, mut clear_color: ResMut<ClearColor>) {
    if camera_config.is_changed() {
        clear_color.0 = camera_config.clear_color;
    }
}
