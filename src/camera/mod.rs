mod cameras;
mod config;
mod constants;
mod controller;
mod input;
mod state;

use bevy::prelude::*;
use cameras::CamerasPlugin;
use config::CameraConfigPlugin;
use controller::ViewerEffect;
pub use controller::ViewerState;
use input::CameraInputPlugin;
pub use state::CameraState;
pub use state::ndc_to_client;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerState>()
            .add_plugins(CameraConfigPlugin)
            .add_plugins(CamerasPlugin)
            .add_plugins(CameraInputPlugin);
    }
}

/// Field of view changed, in degrees. Triggered for wheel, pinch and resets.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct FovChanged {
    pub fov: f32,
}

/// A click that didn't drag, in normalized device coordinates
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct SelectionRequested {
    pub ndc: Vec2,
}

/// Turns a controller effect into the matching global event
pub fn dispatch_effect(commands: &mut Commands, effect: ViewerEffect) {
    match effect {
        ViewerEffect::FovChanged(fov) => commands.trigger(FovChanged { fov }),
        ViewerEffect::SelectAt(ndc) => commands.trigger(SelectionRequested { ndc }),
    }
}
