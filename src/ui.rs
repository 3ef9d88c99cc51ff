//! Picture list panel and the selection popup, drawn with egui.

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiContexts;
use bevy_inspector_egui::bevy_egui::EguiPrimaryContextPass;
use bevy_inspector_egui::bevy_egui::egui;

use crate::picking::PictureSelected;
use crate::sky::FocusPicture;
use crate::sky::PictureMarker;
use crate::sky::PictureRegistry;
use crate::sky::TogglePictureVisibility;
use crate::viewer_input::TogglePanel;

const PANEL_WIDTH: f32 = 280.0;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerOverPanel>()
            .init_resource::<PanelState>()
            .init_resource::<Selection>()
            .add_observer(select_picture)
            .add_observer(toggle_panel_key)
            .add_systems(
                EguiPrimaryContextPass,
                (picture_panel, selection_popup, track_pointer_over_panel).chain(),
            );
    }
}

/// Set while the pointer is over any egui area, so camera input can ignore it
#[derive(Resource, Default, Debug)]
pub struct PointerOverPanel(pub bool);

#[derive(Resource, Default, Debug)]
pub struct PanelState {
    pub collapsed: bool,
}

impl PanelState {
    pub const fn toggle(&mut self) { self.collapsed = !self.collapsed; }

    pub const fn toggle_label(&self) -> &'static str {
        if self.collapsed {
            "Show Panel"
        } else {
            "Hide Panel"
        }
    }
}

/// The picture whose details are on screen, if any
#[derive(Resource, Default, Debug)]
pub struct Selection(pub Option<Entity>);

pub const fn visibility_label(all_visible: bool) -> &'static str {
    if all_visible {
        "Hide All Pictures"
    } else {
        "Show All Pictures"
    }
}

fn select_picture(selected: On<PictureSelected>, mut selection: ResMut<Selection>) {
    selection.0 = Some(selected.entity);
}

fn toggle_panel_key(_: On<Start<TogglePanel>>, mut panel: ResMut<PanelState>) { panel.toggle(); }

fn picture_panel(
    mut commands: Commands,
    mut contexts: EguiContexts,
    mut panel: ResMut<PanelState>,
    registry: Res<PictureRegistry>,
    pictures: Query<&PictureMarker>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::SidePanel::right("picture_panel")
        .resizable(false)
        .default_width(PANEL_WIDTH)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Pictures");
                if ui.button(panel.toggle_label()).clicked() {
                    panel.toggle();
                }
            });

            if panel.collapsed {
                return;
            }

            if ui.button(visibility_label(registry.all_visible)).clicked() {
                commands.trigger(TogglePictureVisibility);
            }
            ui.separator();

            if registry.pictures.is_empty() {
                ui.label("No pictures loaded");
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for &entity in &registry.pictures {
                    let Ok(marker) = pictures.get(entity) else {
                        continue;
                    };
                    if ui.button(marker.list_entry()).clicked() {
                        commands.trigger(FocusPicture { entity });
                    }
                }
            });
        });

    Ok(())
}

fn selection_popup(
    mut contexts: EguiContexts,
    mut selection: ResMut<Selection>,
    pictures: Query<&PictureMarker>,
) -> Result {
    let Some(entity) = selection.0 else {
        return Ok(());
    };
    let Ok(marker) = pictures.get(entity) else {
        selection.0 = None;
        return Ok(());
    };

    let ctx = contexts.ctx_mut()?;
    let mut close = false;
    egui::Window::new("Picture")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(marker.details());
            close = ui.button("OK").clicked();
        });

    if close {
        selection.0 = None;
    }
    Ok(())
}

fn track_pointer_over_panel(
    mut contexts: EguiContexts,
    mut over_panel: ResMut<PointerOverPanel>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let over = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
    if over_panel.0 != over {
        over_panel.0 = over;
    }
    Ok(())
}

#[cfg(test)]
mod ui_tests {
    use super::*;

    #[test]
    fn test_button_labels() {
        let mut panel = PanelState::default();
        assert_eq!(panel.toggle_label(), "Hide Panel");
        panel.toggle();
        assert_eq!(panel.toggle_label(), "Show Panel");

        assert_eq!(visibility_label(true), "Hide All Pictures");
        assert_eq!(visibility_label(false), "Show All Pictures");
    }

    #[test]
    fn test_picking_a_picture_selects_it() {
        let mut app = App::new();
        app.init_resource::<Selection>().add_observer(select_picture);

        let entity = app.world_mut().spawn_empty().id();
        app.world_mut().trigger(PictureSelected { entity });

        assert_eq!(app.world().resource::<Selection>().0, Some(entity));
    }
}
