use bevy::ecs::message::MessageReader;
use bevy::input::ButtonState;
use bevy::input::mouse::MouseWheel;
use bevy::input::touch::TouchInput;
use bevy::input::touch::TouchPhase;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy::window::WindowEvent;
use bevy::window::WindowResized;

use super::controller::ViewerInput;
use super::controller::ViewerState;
use super::dispatch_effect;
use crate::schedule::ViewerSet;
use crate::ui::PointerOverPanel;

pub struct CameraInputPlugin;

impl Plugin for CameraInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, seed_viewport).add_systems(
            Update,
            (track_resize, read_mouse, read_touches, read_wheel)
                .chain()
                .in_set(ViewerSet::UserInput),
        );
    }
}

fn feed(commands: &mut Commands, viewer: &mut ViewerState, input: ViewerInput) {
    if let Some(effect) = viewer.handle(input) {
        dispatch_effect(commands, effect);
    }
}

fn seed_viewport(window: Single<&Window, With<PrimaryWindow>>, mut viewer: ResMut<ViewerState>) {
    viewer.handle(ViewerInput::Resize {
        size: window.size(),
    });
}

fn track_resize(mut reader: MessageReader<WindowResized>, mut viewer: ResMut<ViewerState>) {
    for event in reader.read() {
        debug!("viewport resized to {}x{}", event.width, event.height);
        viewer.handle(ViewerInput::Resize {
            size: Vec2::new(event.width, event.height),
        });
    }
}

/// Mouse events are replayed in arrival order, so only moves that happen
/// after a press count towards its drag
fn read_mouse(
    mut commands: Commands,
    mut events: MessageReader<WindowEvent>,
    window: Single<&Window, With<PrimaryWindow>>,
    over_panel: Res<PointerOverPanel>,
    mut viewer: ResMut<ViewerState>,
    mut cursor: Local<Option<Vec2>>,
) {
    for event in events.read() {
        match event {
            WindowEvent::CursorMoved(moved) => {
                *cursor = Some(moved.position);
                feed(
                    &mut commands,
                    &mut viewer,
                    ViewerInput::PointerMove {
                        position: moved.position,
                    },
                );
            },
            WindowEvent::CursorLeft(_) => *cursor = None,
            WindowEvent::MouseButtonInput(input) if input.button == MouseButton::Left => {
                let position = cursor.or_else(|| window.cursor_position());
                match (input.state, position) {
                    (ButtonState::Pressed, Some(position)) if !over_panel.0 => {
                        feed(&mut commands, &mut viewer, ViewerInput::PointerDown { position });
                    },
                    (ButtonState::Pressed, _) => {},
                    (ButtonState::Released, position) => {
                        feed(&mut commands, &mut viewer, ViewerInput::PointerUp);
                        if let Some(position) = position
                            && !over_panel.0
                        {
                            feed(&mut commands, &mut viewer, ViewerInput::Click { position });
                        }
                    },
                }
            },
            _ => {},
        }
    }
}

/// Touches never produce clicks. A touch that lands on the panel is left to
/// the panel; its later moves are ignored because the controller never saw it
fn read_touches(
    mut commands: Commands,
    mut touches: MessageReader<TouchInput>,
    over_panel: Res<PointerOverPanel>,
    mut viewer: ResMut<ViewerState>,
) {
    for touch in touches.read() {
        let input = match touch.phase {
            TouchPhase::Started if over_panel.0 => continue,
            TouchPhase::Started => ViewerInput::TouchStart {
                id:       touch.id,
                position: touch.position,
            },
            TouchPhase::Moved => ViewerInput::TouchMove {
                id:       touch.id,
                position: touch.position,
            },
            TouchPhase::Ended | TouchPhase::Canceled => ViewerInput::TouchEnd { id: touch.id },
        };
        feed(&mut commands, &mut viewer, input);
    }
}

fn read_wheel(
    mut commands: Commands,
    mut wheel: MessageReader<MouseWheel>,
    over_panel: Res<PointerOverPanel>,
    mut viewer: ResMut<ViewerState>,
) {
    for event in wheel.read() {
        if over_panel.0 {
            continue;
        }
        // winit reports scrolling down as negative
        feed(&mut commands, &mut viewer, ViewerInput::Wheel { delta_y: -event.y });
    }
}
