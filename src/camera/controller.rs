//! Drag-to-look, pinch and wheel zoom as a plain state machine.
//!
//! [`ViewerState`] consumes [`ViewerInput`] events in arrival order and
//! reports anything the rest of the app has to react to as a
//! [`ViewerEffect`]. Nothing in here touches the ECS, so the whole
//! interaction model can be driven from tests.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::constants::DEFAULT_FOV;
use super::constants::FALLBACK_VIEWPORT_HEIGHT;
use super::constants::FALLBACK_VIEWPORT_WIDTH;
use super::constants::MAX_FOV;
use super::constants::MIN_FOV;
use super::constants::WHEEL_FOV_STEP;
use super::state::CameraState;
use super::state::client_to_ndc;

/// Raw input, positions in logical pixels with the origin top-left
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewerInput {
    PointerDown { position: Vec2 },
    PointerMove { position: Vec2 },
    PointerUp,
    Click { position: Vec2 },
    TouchStart { id: u64, position: Vec2 },
    TouchMove { id: u64, position: Vec2 },
    TouchEnd { id: u64 },
    /// Positive scrolls down, which zooms out
    Wheel { delta_y: f32 },
    Resize { size: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewerEffect {
    /// Field of view changed; carries the new value in degrees
    FovChanged(f32),
    /// A click that should pick, in normalized device coordinates
    SelectAt(Vec2),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub has_moved:         bool,
    pub start_orientation: Quat,
    pub start_pointer_ndc: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchSession {
    pub start_distance: f32,
    pub start_fov:      f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragSession),
    Pinching(PinchSession),
}

/// Zoom bounds the controller clamps to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FovLimits {
    pub min:        f32,
    pub max:        f32,
    pub default:    f32,
    pub wheel_step: f32,
}

impl Default for FovLimits {
    fn default() -> Self {
        Self {
            min:        MIN_FOV,
            max:        MAX_FOV,
            default:    DEFAULT_FOV,
            wheel_step: WHEEL_FOV_STEP,
        }
    }
}

impl FovLimits {
    pub fn clamp(&self, fov: f32) -> f32 { fov.clamp(self.min, self.max) }
}

/// Orientation after dragging `delta_ndc` from `start`.
///
/// Always derived from the drag start, so any sequence of moves ending at the
/// same pointer position yields the same orientation.
pub fn drag_orientation(
    start: Quat,
    delta_ndc: Vec2,
    fov_degrees: f32,
    aspect_ratio: f32,
) -> Quat {
    let fov = fov_degrees.to_radians();
    let yaw = delta_ndc.x * fov * aspect_ratio;
    let pitch = -delta_ndc.y * fov;
    (Quat::from_rotation_y(yaw) * start * Quat::from_rotation_x(pitch)).normalize()
}

#[derive(Resource, Clone, Debug)]
pub struct ViewerState {
    pub camera:       CameraState,
    pub limits:       FovLimits,
    gesture:          Gesture,
    touches:          BTreeMap<u64, Vec2>,
    viewport:         Vec2,
    /// Set by a release that ended a moved drag, or that ended no drag at all
    click_suppressed: bool,
}

impl Default for ViewerState {
    fn default() -> Self { Self::new(FovLimits::default()) }
}

impl ViewerState {
    pub fn new(limits: FovLimits) -> Self {
        Self {
            camera: CameraState {
                orientation: Quat::IDENTITY,
                fov:         limits.clamp(limits.default),
            },
            limits,
            gesture: Gesture::Idle,
            touches: BTreeMap::new(),
            viewport: Vec2::new(FALLBACK_VIEWPORT_WIDTH, FALLBACK_VIEWPORT_HEIGHT),
            click_suppressed: true,
        }
    }

    #[cfg(test)]
    pub const fn gesture(&self) -> Gesture { self.gesture }

    pub const fn viewport(&self) -> Vec2 { self.viewport }

    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    pub fn to_ndc(&self, position: Vec2) -> Vec2 { client_to_ndc(position, self.viewport) }

    pub fn handle(&mut self, input: ViewerInput) -> Option<ViewerEffect> {
        match input {
            ViewerInput::PointerDown { position } => {
                self.begin_drag(position);
                None
            },
            ViewerInput::PointerMove { position } => {
                self.drag_to(position);
                None
            },
            ViewerInput::PointerUp => {
                self.end_gesture();
                None
            },
            ViewerInput::Click { position } => {
                (!self.click_suppressed && self.gesture == Gesture::Idle)
                    .then(|| ViewerEffect::SelectAt(self.to_ndc(position)))
            },
            ViewerInput::TouchStart { id, position } => {
                self.touch_start(id, position);
                None
            },
            ViewerInput::TouchMove { id, position } => self.touch_move(id, position),
            ViewerInput::TouchEnd { id } => {
                self.touch_end(id);
                None
            },
            ViewerInput::Wheel { delta_y } => self.wheel(delta_y),
            ViewerInput::Resize { size } => {
                if size.x > 0.0 && size.y > 0.0 {
                    self.viewport = size;
                }
                None
            },
        }
    }

    /// Sets the field of view directly, clamped; reports whether it changed
    pub fn set_fov(&mut self, fov: f32) -> Option<ViewerEffect> {
        let fov = self.limits.clamp(fov);
        if (fov - self.camera.fov).abs() <= f32::EPSILON {
            return None;
        }
        self.camera.fov = fov;
        Some(ViewerEffect::FovChanged(fov))
    }

    /// Back to the opening view
    pub fn reset_view(&mut self) -> Option<ViewerEffect> {
        self.camera.orientation = Quat::IDENTITY;
        self.set_fov(self.limits.default)
    }

    pub fn focus_on(&mut self, target: Vec3) { self.camera.look_at(target); }

    fn begin_drag(&mut self, position: Vec2) {
        self.gesture = Gesture::Dragging(DragSession {
            has_moved:         false,
            start_orientation: self.camera.orientation,
            start_pointer_ndc: self.to_ndc(position),
        });
    }

    fn drag_to(&mut self, position: Vec2) {
        let Gesture::Dragging(mut session) = self.gesture else {
            return;
        };

        let delta = self.to_ndc(position) - session.start_pointer_ndc;
        self.camera.orientation = drag_orientation(
            session.start_orientation,
            delta,
            self.camera.fov,
            self.aspect_ratio(),
        );
        session.has_moved = true;
        self.gesture = Gesture::Dragging(session);
    }

    fn end_gesture(&mut self) {
        self.click_suppressed = match self.gesture {
            Gesture::Dragging(session) => session.has_moved,
            Gesture::Idle | Gesture::Pinching(_) => true,
        };
        self.gesture = Gesture::Idle;
    }

    fn touch_distance(&self) -> Option<f32> {
        let mut points = self.touches.values();
        let (Some(a), Some(b)) = (points.next(), points.next()) else {
            return None;
        };
        Some(a.distance(*b))
    }

    fn begin_pinch(&mut self) {
        let Some(start_distance) = self.touch_distance() else {
            return;
        };
        self.gesture = Gesture::Pinching(PinchSession {
            start_distance,
            start_fov: self.camera.fov,
        });
    }

    fn touch_start(&mut self, id: u64, position: Vec2) {
        self.touches.insert(id, position);
        match self.touches.len() {
            1 => self.begin_drag(position),
            2 => self.begin_pinch(),
            _ => {},
        }
    }

    fn touch_move(&mut self, id: u64, position: Vec2) -> Option<ViewerEffect> {
        let touch = self.touches.get_mut(&id)?;
        *touch = position;

        match (self.gesture, self.touches.len()) {
            (Gesture::Dragging(_), 1) => {
                self.drag_to(position);
                None
            },
            (Gesture::Pinching(pinch), 2) => {
                let distance = self.touch_distance()?;
                if distance <= f32::EPSILON {
                    return None;
                }
                let fov = self
                    .limits
                    .clamp(pinch.start_fov * pinch.start_distance / distance);
                self.camera.fov = fov;
                Some(ViewerEffect::FovChanged(fov))
            },
            _ => None,
        }
    }

    fn touch_end(&mut self, id: u64) {
        if self.touches.remove(&id).is_none() {
            return;
        }

        match self.touches.len() {
            0 => self.end_gesture(),
            1 => {
                if let Some(&remaining) = self.touches.values().next() {
                    self.begin_drag(remaining);
                }
            },
            2 => self.begin_pinch(),
            _ => {},
        }
    }

    fn wheel(&mut self, delta_y: f32) -> Option<ViewerEffect> {
        if delta_y.abs() <= f32::EPSILON || !delta_y.is_finite() {
            return None;
        }
        let step = self.limits.wheel_step.copysign(delta_y);
        let fov = self.limits.clamp(self.camera.fov + step);
        self.camera.fov = fov;
        Some(ViewerEffect::FovChanged(fov))
    }
}

#[cfg(test)]
mod controller_tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn create_test_viewer() -> ViewerState {
        let mut viewer = ViewerState::default();
        viewer.handle(ViewerInput::Resize {
            size: Vec2::new(800.0, 800.0),
        });
        viewer
    }

    fn quat_close(a: Quat, b: Quat) -> bool { a.dot(b).abs() > 1.0 - EPSILON }

    #[test]
    fn test_drag_yaw_is_proportional_to_fov() {
        let mut viewer = create_test_viewer();
        // center of the viewport is NDC (0, 0); x = 600 is NDC 0.5
        viewer.handle(ViewerInput::PointerDown {
            position: Vec2::new(400.0, 400.0),
        });
        viewer.handle(ViewerInput::PointerMove {
            position: Vec2::new(600.0, 400.0),
        });

        let expected = Quat::from_rotation_y(0.5 * 75.0_f32.to_radians());
        assert!(quat_close(viewer.camera.orientation, expected));
    }

    #[test]
    fn test_drag_is_path_independent() {
        let mut stepped = create_test_viewer();
        let mut jumped = create_test_viewer();
        let start = Vec2::new(100.0, 700.0);
        let end = Vec2::new(650.0, 120.0);

        stepped.handle(ViewerInput::PointerDown { position: start });
        for i in 1..=20 {
            let t = i as f32 / 20.0;
            let wobble = Vec2::new(0.0, (t * 13.0).sin() * 50.0);
            stepped.handle(ViewerInput::PointerMove {
                position: start.lerp(end, t) + wobble,
            });
        }
        stepped.handle(ViewerInput::PointerMove { position: end });

        jumped.handle(ViewerInput::PointerDown { position: start });
        jumped.handle(ViewerInput::PointerMove { position: end });

        assert!(quat_close(
            stepped.camera.orientation,
            jumped.camera.orientation
        ));
        assert!(stepped.camera.orientation.is_normalized());
    }

    #[test]
    fn test_move_without_press_does_nothing() {
        let mut viewer = create_test_viewer();
        viewer.handle(ViewerInput::PointerMove {
            position: Vec2::new(10.0, 10.0),
        });
        assert_eq!(viewer.camera.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_no_pick_after_drag() {
        let mut viewer = create_test_viewer();
        let position = Vec2::new(300.0, 300.0);

        viewer.handle(ViewerInput::PointerDown { position });
        viewer.handle(ViewerInput::PointerMove {
            position: position + Vec2::new(3.0, 0.0),
        });
        viewer.handle(ViewerInput::PointerUp);
        assert_eq!(viewer.handle(ViewerInput::Click { position }), None);
    }

    #[test]
    fn test_click_without_move_picks() {
        let mut viewer = create_test_viewer();
        let position = Vec2::new(400.0, 400.0);

        viewer.handle(ViewerInput::PointerDown { position });
        viewer.handle(ViewerInput::PointerUp);
        assert_eq!(
            viewer.handle(ViewerInput::Click { position }),
            Some(ViewerEffect::SelectAt(Vec2::ZERO))
        );
    }

    #[test]
    fn test_new_press_resets_has_moved() {
        let mut viewer = create_test_viewer();
        let position = Vec2::new(200.0, 200.0);

        viewer.handle(ViewerInput::PointerDown { position });
        viewer.handle(ViewerInput::PointerMove {
            position: Vec2::new(250.0, 200.0),
        });
        viewer.handle(ViewerInput::PointerUp);

        viewer.handle(ViewerInput::PointerDown { position });
        viewer.handle(ViewerInput::PointerUp);
        assert!(matches!(
            viewer.handle(ViewerInput::Click { position }),
            Some(ViewerEffect::SelectAt(_))
        ));
    }

    #[test]
    fn test_release_without_press_does_not_pick() {
        let mut viewer = create_test_viewer();
        let position = Vec2::new(400.0, 400.0);

        // a clean click first, so nothing is left over from an earlier drag
        viewer.handle(ViewerInput::PointerDown { position });
        viewer.handle(ViewerInput::PointerUp);
        assert!(viewer.handle(ViewerInput::Click { position }).is_some());

        // pressed over the panel, so no drag was opened
        viewer.handle(ViewerInput::PointerUp);
        assert_eq!(viewer.handle(ViewerInput::Click { position }), None);
    }

    #[test]
    fn test_wheel_steps_and_clamps() {
        let mut viewer = create_test_viewer();

        assert_eq!(
            viewer.handle(ViewerInput::Wheel { delta_y: 120.0 }),
            Some(ViewerEffect::FovChanged(80.0))
        );
        assert_eq!(
            viewer.handle(ViewerInput::Wheel { delta_y: -3.0 }),
            Some(ViewerEffect::FovChanged(75.0))
        );
        assert_eq!(viewer.handle(ViewerInput::Wheel { delta_y: 0.0 }), None);

        for _ in 0..30 {
            viewer.handle(ViewerInput::Wheel { delta_y: -1.0 });
        }
        assert!((viewer.camera.fov - MIN_FOV).abs() < EPSILON);

        for _ in 0..30 {
            viewer.handle(ViewerInput::Wheel { delta_y: 1.0 });
        }
        assert!((viewer.camera.fov - MAX_FOV).abs() < EPSILON);
    }

    #[test]
    fn test_pinch_scales_and_clamps() {
        let mut viewer = create_test_viewer();

        viewer.handle(ViewerInput::TouchStart {
            id:       1,
            position: Vec2::new(300.0, 400.0),
        });
        viewer.handle(ViewerInput::TouchStart {
            id:       2,
            position: Vec2::new(500.0, 400.0),
        });
        assert!(matches!(viewer.gesture(), Gesture::Pinching(_)));

        // fingers twice as far apart halves the field of view
        let effect = viewer.handle(ViewerInput::TouchMove {
            id:       2,
            position: Vec2::new(700.0, 400.0),
        });
        assert_eq!(effect, Some(ViewerEffect::FovChanged(37.5)));

        for x in [790.0, 2000.0, 300.5, 301.0] {
            viewer.handle(ViewerInput::TouchMove {
                id:       2,
                position: Vec2::new(x, 400.0),
            });
            assert!((MIN_FOV..=MAX_FOV).contains(&viewer.camera.fov));
        }
        assert!((viewer.camera.fov - MAX_FOV).abs() < EPSILON);
    }

    #[test]
    fn test_pinch_to_single_touch_rearms_drag() {
        let mut viewer = create_test_viewer();
        viewer.handle(ViewerInput::TouchStart {
            id:       1,
            position: Vec2::new(300.0, 400.0),
        });
        viewer.handle(ViewerInput::TouchStart {
            id:       2,
            position: Vec2::new(500.0, 400.0),
        });
        viewer.handle(ViewerInput::TouchMove {
            id:       1,
            position: Vec2::new(200.0, 400.0),
        });
        viewer.handle(ViewerInput::TouchEnd { id: 2 });

        let Gesture::Dragging(session) = viewer.gesture() else {
            panic!("expected a drag after lifting one finger");
        };
        assert_eq!(session.start_pointer_ndc, viewer.to_ndc(Vec2::new(200.0, 400.0)));
        assert!(!session.has_moved);

        viewer.handle(ViewerInput::TouchEnd { id: 1 });
        assert_eq!(viewer.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_single_touch_drag_rotates() {
        let mut viewer = create_test_viewer();
        viewer.handle(ViewerInput::TouchStart {
            id:       7,
            position: Vec2::new(400.0, 400.0),
        });
        viewer.handle(ViewerInput::TouchMove {
            id:       7,
            position: Vec2::new(400.0, 200.0),
        });

        let expected = Quat::from_rotation_x(-0.5 * 75.0_f32.to_radians());
        assert!(quat_close(viewer.camera.orientation, expected));
    }

    #[test]
    fn test_reset_view() {
        let mut viewer = create_test_viewer();
        viewer.handle(ViewerInput::Wheel { delta_y: 1.0 });
        viewer.focus_on(Vec3::X);

        assert_eq!(viewer.reset_view(), Some(ViewerEffect::FovChanged(DEFAULT_FOV)));
        assert_eq!(viewer.camera.orientation, Quat::IDENTITY);
        assert_eq!(viewer.reset_view(), None);
    }
}
