//! Keyboard bindings. Pointer, touch and wheel input bypass this and go
//! straight to the camera controller, which needs raw positions in order.

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

pub struct ViewerInputPlugin;

impl Plugin for ViewerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin)
            .add_input_context::<ViewerControls>()
            .init_resource::<InspectorToggles>()
            .add_systems(Startup, spawn_viewer_controls)
            .add_observer(toggle_camera_inspector)
            .add_observer(toggle_label_inspector)
            .add_observer(toggle_grid_inspector);
    }
}

#[derive(Component)]
pub struct ViewerControls;

/// Orientation back to identity and zoom back to default
#[derive(InputAction)]
#[action_output(bool)]
pub struct ResetView;

/// Shows or hides every picture at once
#[derive(InputAction)]
#[action_output(bool)]
pub struct TogglePictures;

/// Collapses or expands the picture panel
#[derive(InputAction)]
#[action_output(bool)]
pub struct TogglePanel;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ToggleCameraInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ToggleLabelInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ToggleGridInspector;

fn spawn_viewer_controls(mut commands: Commands) {
    commands.spawn((
        Name::new("ViewerControls"),
        ViewerControls,
        actions!(ViewerControls[
            (Action::<ResetView>::new(), bindings![KeyCode::Home]),
            (Action::<TogglePictures>::new(), bindings![KeyCode::KeyP]),
            (Action::<TogglePanel>::new(), bindings![KeyCode::Tab]),
            (Action::<ToggleCameraInspector>::new(), bindings![KeyCode::F1]),
            (Action::<ToggleLabelInspector>::new(), bindings![KeyCode::F2]),
            (Action::<ToggleGridInspector>::new(), bindings![KeyCode::F3]),
        ]),
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inspector {
    Camera,
    Labels,
    Grid,
}

/// Which config inspectors are open; all start closed
#[derive(Resource, Default, Debug)]
pub struct InspectorToggles {
    camera: bool,
    labels: bool,
    grid:   bool,
}

impl InspectorToggles {
    pub const fn is_open(&self, inspector: Inspector) -> bool {
        match inspector {
            Inspector::Camera => self.camera,
            Inspector::Labels => self.labels,
            Inspector::Grid => self.grid,
        }
    }

    pub const fn toggle(&mut self, inspector: Inspector) {
        match inspector {
            Inspector::Camera => self.camera = !self.camera,
            Inspector::Labels => self.labels = !self.labels,
            Inspector::Grid => self.grid = !self.grid,
        }
    }
}

/// Run condition for a `ResourceInspectorPlugin`
pub fn inspector_active(
    inspector: Inspector,
) -> impl FnMut(Res<InspectorToggles>) -> bool + Clone {
    move |toggles: Res<InspectorToggles>| toggles.is_open(inspector)
}

fn toggle_camera_inspector(
    _: On<Start<ToggleCameraInspector>>,
    mut toggles: ResMut<InspectorToggles>,
) {
    toggles.toggle(Inspector::Camera);
}

fn toggle_label_inspector(
    _: On<Start<ToggleLabelInspector>>,
    mut toggles: ResMut<InspectorToggles>,
) {
    toggles.toggle(Inspector::Labels);
}

fn toggle_grid_inspector(
    _: On<Start<ToggleGridInspector>>,
    mut toggles: ResMut<InspectorToggles>,
) {
    toggles.toggle(Inspector::Grid);
}
