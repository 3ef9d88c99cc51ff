use bevy::prelude::*;

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum ViewerSet {
    UserInput,
    CameraUpdate,
    SceneUpdates,
    Labels,
}

pub struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        // input mutates the controller, the camera copies it, then everything
        // that depends on where the camera points reads the settled state
        app.configure_sets(
            Update,
            (
                ViewerSet::UserInput,
                ViewerSet::CameraUpdate,
                ViewerSet::SceneUpdates,
                ViewerSet::Labels,
            )
                .chain(),
        );
    }
}
