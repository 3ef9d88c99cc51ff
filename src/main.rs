//! skysphere - An interactive celestial sphere viewer built with Bevy 0.18
//!
//! Features:
//! - Star catalog ingestion from CSV with magnitude-scaled sprites
//! - Equatorial coordinate grid with hour and declination labels
//! - Picture billboards pinned to the sky from a JSON manifest
//! - Drag to look around, pinch or scroll to zoom, click a picture for details
//! - Bevy Remote Protocol (BRP) support for debugging

mod asset_loader;
mod camera;
mod labels;
mod picking;
mod schedule;
mod sky;
mod traits;
mod ui;
mod viewer_input;

use bevy::prelude::*;
#[cfg(target_arch = "wasm32")]
use bevy::window::PresentMode;
#[cfg(target_arch = "wasm32")]
use bevy::window::WindowMode;
use bevy_brp_extras::BrpExtrasPlugin;
use bevy_inspector_egui::bevy_egui::EguiPlugin;

use crate::asset_loader::AssetLoaderPlugin;
use crate::camera::CameraPlugin;
use crate::labels::LabelsPlugin;
use crate::picking::PickingPlugin;
use crate::schedule::SchedulePlugin;
use crate::sky::SkyPlugin;
use crate::ui::UiPlugin;
use crate::viewer_input::ViewerInputPlugin;

fn main() {
    let mut app = App::new();

    // Get effective port from BrpExtrasPlugin to include in window title if non-default
    let brp_plugin = BrpExtrasPlugin::default();
    let (effective_port, _) = brp_plugin.get_effective_port();
    let window_title = if effective_port == bevy_brp_extras::DEFAULT_REMOTE_PORT {
        "skysphere".to_string()
    } else {
        format!("skysphere - {effective_port}")
    };

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: window_title,
            ..default()
        }),
        ..default()
    }));

    #[cfg(target_arch = "wasm32")]
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: window_title,
            present_mode: PresentMode::AutoNoVsync, // Reduces input lag.
            mode: WindowMode::BorderlessFullscreen(MonitorSelection::Current),
            ..default()
        }),
        ..default()
    }));

    app.add_plugins((
        EguiPlugin::default(),
        AssetLoaderPlugin,
        brp_plugin,
        CameraPlugin,
        LabelsPlugin,
        PickingPlugin,
        SchedulePlugin,
        SkyPlugin,
        UiPlugin,
        ViewerInputPlugin,
    ))
    .run();
}
