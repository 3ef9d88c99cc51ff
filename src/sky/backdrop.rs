use bevy::light::NotShadowCaster;
use bevy::prelude::*;

use super::constants::BACKDROP_COLOR;
use super::constants::BACKDROP_RADIUS;
use super::constants::BACKDROP_SEGMENTS;

pub struct BackdropPlugin;

impl Plugin for BackdropPlugin {
    fn build(&self, app: &mut App) { app.add_systems(Startup, spawn_backdrop); }
}

/// Dark blue sphere enclosing everything else, seen from the inside
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct Backdrop;

fn backdrop_material() -> StandardMaterial {
    StandardMaterial {
        base_color: BACKDROP_COLOR,
        unlit: true,
        // the camera sits inside, so the back faces are the ones we see
        cull_mode: None,
        ..default()
    }
}

fn spawn_backdrop(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = Sphere::new(BACKDROP_RADIUS)
        .mesh()
        .uv(BACKDROP_SEGMENTS, BACKDROP_SEGMENTS);

    commands.spawn((
        Name::new("Backdrop"),
        Backdrop,
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(backdrop_material())),
        Transform::IDENTITY,
        NotShadowCaster,
    ));
}

#[cfg(test)]
mod backdrop_tests {
    use super::*;

    #[test]
    fn test_backdrop_is_visible_from_inside() {
        let material = backdrop_material();
        assert!(material.unlit);
        assert_eq!(material.cull_mode, None);
        assert_eq!(material.base_color, BACKDROP_COLOR);
    }
}
