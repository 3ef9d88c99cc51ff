mod anchor;
mod config;
mod policy;

use std::collections::HashSet;

pub use anchor::LabelAnchor;
use anchor::FollowsPicture;
use anchor::project_labels;
pub use anchor::label_bundle;
use bevy::color::palettes::tailwind;
use bevy::prelude::*;
pub use config::LabelConfig;
use config::LabelConfigPlugin;
pub use policy::LabelEntry;
pub use policy::LabelPolicy;

use crate::asset_loader::CatalogReady;
use crate::camera::FovChanged;
use crate::camera::ViewerState;
use crate::schedule::ViewerSet;
use crate::sky::PICTURE_LABEL_SIZE;
use crate::sky::PictureMarker;
use crate::sky::STAR_LABEL_SIZE;
use crate::sky::StarCatalog;

pub struct LabelsPlugin;

impl Plugin for LabelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(LabelConfigPlugin)
            .add_observer(spawn_star_labels)
            .add_observer(apply_policy_on_fov)
            .add_systems(
                Update,
                (
                    sync_picture_labels,
                    apply_policy_to_new_labels,
                    update_label_opacity,
                    project_labels,
                )
                    .chain()
                    .in_set(ViewerSet::Labels),
            );
    }
}

const STAR_LABEL_COLOR: Srgba = tailwind::AMBER_100;
const PICTURE_LABEL_COLOR: Srgba = tailwind::SKY_200;

fn apply_policy<'a>(
    policy: &LabelPolicy,
    labels: impl IntoIterator<Item = (&'a LabelEntry, Mut<'a, LabelAnchor>)>,
) {
    for (entry, mut anchor) in labels {
        let placement = policy.place(entry);
        if anchor.position != placement.position || anchor.shown != placement.visible {
            anchor.position = placement.position;
            anchor.shown = placement.visible;
        }
    }
}

fn spawn_star_labels(
    ready: On<CatalogReady>,
    mut commands: Commands,
    catalogs: Res<Assets<StarCatalog>>,
    config: Res<LabelConfig>,
) {
    let Some(catalog) = catalogs.get(ready.id) else {
        return;
    };

    let mut count = 0_usize;
    for star in catalog.named_stars() {
        let Some(name) = star.name.clone() else {
            continue;
        };
        commands.spawn((
            Name::new(format!("StarLabel {name}")),
            label_bundle(
                name,
                LabelAnchor::new(star.position, STAR_LABEL_SIZE),
                STAR_LABEL_COLOR.into(),
                &config,
            ),
            LabelEntry::Star {
                magnitude:     star.magnitude,
                base_position: star.position,
            },
        ));
        count += 1;
    }
    debug!("spawned {count} star labels");
}

fn apply_policy_on_fov(
    changed: On<FovChanged>,
    config: Res<LabelConfig>,
    mut labels: Query<(&LabelEntry, &mut LabelAnchor)>,
) {
    let policy = LabelPolicy::new(changed.fov, &config);
    apply_policy(&policy, &mut labels);
}

/// Newly spawned labels and config edits don't come with a field of view
/// change, so they are placed from the current one
fn apply_policy_to_new_labels(
    viewer: Res<ViewerState>,
    config: Res<LabelConfig>,
    mut labels: Query<(&LabelEntry, &mut LabelAnchor)>,
    added: Query<(), Added<LabelEntry>>,
) {
    if !config.is_changed() && added.is_empty() {
        return;
    }
    let policy = LabelPolicy::new(viewer.camera.fov, &config);
    apply_policy(&policy, &mut labels);
}

/// Picture names are optional; they are rebuilt when the option changes and
/// added for pictures that arrive later
fn sync_picture_labels(
    mut commands: Commands,
    config: Res<LabelConfig>,
    pictures: Query<(Entity, &PictureMarker)>,
    added: Query<(), Added<PictureMarker>>,
    labels: Query<(Entity, &FollowsPicture)>,
) {
    if !config.is_changed() && added.is_empty() {
        return;
    }

    let mut labelled = HashSet::new();
    for (label, follows) in &labels {
        if config.is_changed() || !config.picture_labels {
            commands.entity(label).despawn();
        } else {
            labelled.insert(follows.0);
        }
    }

    if !config.picture_labels {
        return;
    }

    for (picture, marker) in &pictures {
        if labelled.contains(&picture) {
            continue;
        }
        commands.spawn((
            Name::new(format!("PictureLabel {}", marker.name)),
            label_bundle(
                marker.name.clone(),
                LabelAnchor::new(marker.position, PICTURE_LABEL_SIZE),
                PICTURE_LABEL_COLOR.into(),
                &config,
            ),
            LabelEntry::Picture {
                base_position: marker.position,
                base_offset:   config.picture_label_offset,
            },
            FollowsPicture(picture),
        ));
    }
}

fn update_label_opacity(
    config: Res<LabelConfig>,
    mut colors: Query<&mut TextColor, With<LabelAnchor>>,
) {
    if !config.is_changed() {
        return;
    }
    for mut color in &mut colors {
        color.0 = color.0.with_alpha(config.opacity);
    }
}
