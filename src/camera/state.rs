use bevy::prelude::*;

use super::constants::DEFAULT_FOV;

/// Viewer orientation and zoom. The camera never leaves the origin.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct CameraState {
    pub orientation: Quat,
    /// Vertical field of view in degrees
    pub fov:         f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            orientation: Quat::IDENTITY,
            fov:         DEFAULT_FOV,
        }
    }
}

impl CameraState {
    #[cfg(test)]
    pub fn forward(&self) -> Vec3 { self.orientation * Vec3::NEG_Z }

    pub fn right(&self) -> Vec3 { self.orientation * Vec3::X }

    pub fn up(&self) -> Vec3 { self.orientation * Vec3::Y }

    fn half_height(&self) -> f32 { (self.fov.to_radians() * 0.5).tan() }

    /// Ray from the origin through a point given in normalized device coordinates
    pub fn ray_through(&self, ndc: Vec2, aspect_ratio: f32) -> Ray3d {
        let half_height = self.half_height();
        let local = Vec3::new(
            ndc.x * half_height * aspect_ratio,
            ndc.y * half_height,
            -1.0,
        );
        let direction = Dir3::new(self.orientation * local).unwrap_or(Dir3::NEG_Z);
        Ray3d::new(Vec3::ZERO, direction)
    }

    /// Projects a world point to normalized device coordinates plus its view depth.
    /// Returns `None` for points on or behind the camera plane.
    pub fn project(&self, point: Vec3, aspect_ratio: f32) -> Option<(Vec2, f32)> {
        let local = self.orientation.inverse() * point;
        let depth = -local.z;
        if depth <= f32::EPSILON {
            return None;
        }

        let half_height = self.half_height();
        let ndc = Vec2::new(
            local.x / (depth * half_height * aspect_ratio),
            local.y / (depth * half_height),
        );
        Some((ndc, depth))
    }

    /// Turns to face `target` with world +Y kept up
    pub fn look_at(&mut self, target: Vec3) {
        if target.length_squared() <= f32::EPSILON {
            return;
        }
        self.orientation = Transform::IDENTITY.looking_at(target, Vec3::Y).rotation;
    }
}

/// Converts a logical pixel position (origin top-left) to NDC (y up)
pub fn client_to_ndc(position: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (position.x / viewport.x).mul_add(2.0, -1.0),
        -(position.y / viewport.y).mul_add(2.0, -1.0),
    )
}

/// Converts NDC back to a logical pixel position
pub fn ndc_to_client(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    )
}
