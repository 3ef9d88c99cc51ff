/// Field of view the viewer opens with, in degrees
pub const DEFAULT_FOV: f32 = 75.0;

/// Narrowest zoom, in degrees
pub const MIN_FOV: f32 = 10.0;

/// Widest zoom, in degrees
pub const MAX_FOV: f32 = 90.0;

/// Degrees of field of view per wheel tick
pub const WHEEL_FOV_STEP: f32 = 5.0;

pub const CAMERA_NEAR: f32 = 0.1;

pub const CAMERA_FAR: f32 = 1000.0;

/// Viewport used until the first window resize arrives
pub const FALLBACK_VIEWPORT_WIDTH: f32 = 1280.0;
pub const FALLBACK_VIEWPORT_HEIGHT: f32 = 720.0;
