use bevy::prelude::*;

use crate::camera::CameraState;
use crate::camera::SelectionRequested;
use crate::camera::ViewerState;
use crate::sky::PICTURE_SIZE;
use crate::sky::PictureMarker;

pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) { app.add_observer(pick_picture); }
}

/// A picture was clicked; carries the picture entity
#[derive(Event, Clone, Copy, Debug)]
pub struct PictureSelected {
    pub entity: Entity,
}

/// Square quad that always faces the camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Billboard {
    pub center:      Vec3,
    pub right:       Vec3,
    pub up:          Vec3,
    pub half_extent: f32,
}

impl Billboard {
    /// Billboard of the given edge length oriented like `camera`
    pub fn facing(camera: &CameraState, center: Vec3, size: f32) -> Self {
        Self {
            center,
            right: camera.right(),
            up: camera.up(),
            half_extent: size * 0.5,
        }
    }

    fn normal(&self) -> Vec3 { self.right.cross(self.up) }

    /// Distance along `ray` to the quad, if the ray crosses it in front of the origin
    pub fn intersect(&self, ray: Ray3d) -> Option<f32> {
        let normal = self.normal();
        let denominator = ray.direction.dot(normal);
        if denominator.abs() <= f32::EPSILON {
            return None;
        }

        let distance = (self.center - ray.origin).dot(normal) / denominator;
        if distance <= 0.0 {
            return None;
        }

        let local = ray.get_point(distance) - self.center;
        let inside = local.dot(self.right).abs() <= self.half_extent
            && local.dot(self.up).abs() <= self.half_extent;
        inside.then_some(distance)
    }
}

/// Nearest candidate hit by `ray`, with its distance
pub fn pick_nearest<T>(
    ray: Ray3d,
    candidates: impl IntoIterator<Item = (T, Billboard)>,
) -> Option<(T, f32)> {
    candidates
        .into_iter()
        .filter_map(|(id, billboard)| billboard.intersect(ray).map(|distance| (id, distance)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}

/// Visible pictures as billboards facing the current camera
pub fn visible_billboards<'a>(
    camera: &'a CameraState,
    pictures: impl IntoIterator<Item = (Entity, &'a PictureMarker)> + 'a,
) -> impl Iterator<Item = (Entity, Billboard)> + 'a {
    pictures
        .into_iter()
        .filter(|(_, marker)| marker.visible)
        .map(|(entity, marker)| (entity, Billboard::facing(camera, marker.position, PICTURE_SIZE)))
}

fn pick_picture(
    request: On<SelectionRequested>,
    mut commands: Commands,
    viewer: Res<ViewerState>,
    pictures: Query<(Entity, &PictureMarker)>,
) {
    let camera = &viewer.camera;
    let ray = camera.ray_through(request.ndc, viewer.aspect_ratio());

    let Some((entity, distance)) = pick_nearest(ray, visible_billboards(camera, &pictures)) else {
        return;
    };

    if let Ok((_, marker)) = pictures.get(entity) {
        info!(
            "picked {} (RA {:.3}h, Dec {:.3}°) at distance {distance:.2}",
            marker.name, marker.ra, marker.dec
        );
    }
    commands.trigger(PictureSelected { entity });
}

#[cfg(test)]
mod picking_tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn create_test_camera() -> CameraState { CameraState::default() }

    #[test]
    fn test_center_hit() {
        let camera = create_test_camera();
        let billboard = Billboard::facing(&camera, Vec3::new(0.0, 0.0, -40.0), 3.0);
        let ray = camera.ray_through(Vec2::ZERO, 1.0);

        let Some(distance) = billboard.intersect(ray) else {
            panic!("ray through the center must hit");
        };
        assert!((distance - 40.0).abs() < EPSILON);
    }

    #[test]
    fn test_edges_and_misses() {
        let camera = create_test_camera();
        let billboard = Billboard::facing(&camera, Vec3::new(0.0, 0.0, -40.0), 3.0);

        let ray_towards =
            |target: Vec3| Ray3d::new(Vec3::ZERO, Dir3::new_unchecked(target.normalize()));
        let inside = ray_towards(Vec3::new(1.4, 0.0, -40.0));
        let outside = ray_towards(Vec3::new(1.6, 0.0, -40.0));
        let backwards = Ray3d::new(Vec3::ZERO, Dir3::Z);

        assert!(billboard.intersect(inside).is_some());
        assert!(billboard.intersect(outside).is_none());
        assert!(billboard.intersect(backwards).is_none());
    }

    #[test]
    fn test_nearest_hit_wins() {
        let camera = create_test_camera();
        let ray = camera.ray_through(Vec2::ZERO, 1.0);
        let candidates = [
            ("far", Billboard::facing(&camera, Vec3::new(0.0, 0.0, -45.0), 3.0)),
            ("near", Billboard::facing(&camera, Vec3::new(0.5, 0.0, -30.0), 3.0)),
            ("aside", Billboard::facing(&camera, Vec3::new(20.0, 0.0, -10.0), 3.0)),
        ];

        let Some((id, distance)) = pick_nearest(ray, candidates) else {
            panic!("expected a hit");
        };
        assert_eq!(id, "near");
        assert!((distance - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_no_candidates_no_hit() {
        let camera = create_test_camera();
        let ray = camera.ray_through(Vec2::new(0.9, 0.9), 1.0);
        let none: [(u8, Billboard); 0] = [];
        assert!(pick_nearest(ray, none).is_none());
    }

    #[test]
    fn test_hidden_pictures_are_not_candidates() {
        let camera = create_test_camera();
        let shown = PictureMarker::new("shown", 0.0, 0.0, "a.jpg", 40.0);
        let mut hidden = PictureMarker::new("hidden", 0.0, 0.0, "b.jpg", 40.0);
        hidden.visible = false;

        let mut world = World::new();
        let entities = [world.spawn_empty().id(), world.spawn_empty().id()];
        let pictures = [(entities[0], &shown), (entities[1], &hidden)];
        let candidates: Vec<_> = visible_billboards(&camera, pictures).collect();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0, entities[0]);
    }
}
