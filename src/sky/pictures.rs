use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::constants::DEFAULT_PLACEMENT_RADIUS;
use super::constants::PICTURE_SIZE;
use super::coordinates::to_cartesian;
use super::manifest::PictureEntry;
use super::manifest::PictureManifest;
use crate::asset_loader::ManifestReady;
use crate::camera::ViewerState;
use crate::schedule::ViewerSet;
use crate::traits::TransformExt;
use crate::traits::VisibilityExt;
use crate::viewer_input::TogglePictures;

pub struct PicturesPlugin;

impl Plugin for PicturesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PictureRegistry>()
            .add_observer(spawn_pictures)
            .add_observer(toggle_pictures_key)
            .add_observer(apply_picture_visibility)
            .add_observer(focus_picture)
            .add_systems(Update, face_camera.in_set(ViewerSet::SceneUpdates));
    }
}

/// A user image pinned to the sky. `visible` is the only field that changes.
#[derive(Component, Reflect, Clone, Debug, PartialEq)]
#[reflect(Component)]
pub struct PictureMarker {
    pub name:      String,
    /// Hours
    pub ra:        f32,
    /// Degrees
    pub dec:       f32,
    pub image_url: String,
    pub position:  Vec3,
    pub visible:   bool,
}

impl PictureMarker {
    pub fn new(
        name: impl Into<String>,
        ra: f32,
        dec: f32,
        image_url: impl Into<String>,
        radius: f32,
    ) -> Self {
        Self {
            name: name.into(),
            ra,
            dec,
            image_url: image_url.into(),
            position: to_cartesian(ra, dec, radius),
            visible: true,
        }
    }

    /// Line shown in the picture list
    pub fn list_entry(&self) -> String {
        format!("{} (RA: {:.2}h, Dec: {:.2}°)", self.name, self.ra, self.dec)
    }

    /// Text shown when the picture is clicked
    pub fn details(&self) -> String {
        format!("{}\nRA: {:.3}h\nDec: {:.3}°", self.name, self.ra, self.dec)
    }
}

impl From<&PictureEntry> for PictureMarker {
    fn from(entry: &PictureEntry) -> Self {
        Self::new(
            entry.name.clone(),
            entry.ra,
            entry.dec,
            entry.img.clone(),
            DEFAULT_PLACEMENT_RADIUS,
        )
    }
}

/// Pictures in manifest order, for the list UI
#[derive(Resource, Debug)]
pub struct PictureRegistry {
    pub pictures:    Vec<Entity>,
    pub all_visible: bool,
}

impl Default for PictureRegistry {
    fn default() -> Self {
        Self {
            pictures:    Vec::new(),
            all_visible: true,
        }
    }
}

/// Flip every picture between shown and hidden
#[derive(Event, Clone, Copy, Debug)]
pub struct TogglePictureVisibility;

/// Turn the camera towards a picture
#[derive(Event, Clone, Copy, Debug)]
pub struct FocusPicture {
    pub entity: Entity,
}

/// Pictures are opaque so they write depth; the additive star field and the
/// grid lines behind them fail the depth test instead of showing through
fn picture_material(image: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(image),
        unlit: true,
        alpha_mode: AlphaMode::Opaque,
        cull_mode: None,
        ..default()
    }
}

fn spawn_pictures(
    ready: On<ManifestReady>,
    mut commands: Commands,
    manifests: Res<Assets<PictureManifest>>,
    asset_server: Res<AssetServer>,
    viewer: Res<ViewerState>,
    mut registry: ResMut<PictureRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(manifest) = manifests.get(ready.id) else {
        return;
    };
    info!(
        "placing {} pictures ({} skipped)",
        manifest.entries.len(),
        manifest.skipped
    );

    let mesh = meshes.add(Rectangle::new(PICTURE_SIZE, PICTURE_SIZE));
    let visibility = Visibility::shown(registry.all_visible);

    for entry in &manifest.entries {
        let mut marker = PictureMarker::from(entry);
        marker.visible = registry.all_visible;

        let material = materials.add(picture_material(
            asset_server.load(marker.image_url.clone()),
        ));

        let transform = Transform::from_trs(marker.position, viewer.camera.orientation, Vec3::ONE);
        let entity = commands
            .spawn((
                Name::new(format!("Picture {}", marker.name)),
                marker,
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material),
                transform,
                visibility,
            ))
            .id();
        registry.pictures.push(entity);
    }
}

fn toggle_pictures_key(_: On<Start<TogglePictures>>, mut commands: Commands) {
    commands.trigger(TogglePictureVisibility);
}

fn apply_picture_visibility(
    _: On<TogglePictureVisibility>,
    mut registry: ResMut<PictureRegistry>,
    mut pictures: Query<(&mut PictureMarker, &mut Visibility)>,
) {
    registry.all_visible = !registry.all_visible;
    let visible = registry.all_visible;
    debug!("pictures visible: {visible}");

    for (mut marker, mut visibility) in &mut pictures {
        marker.visible = visible;
        *visibility = Visibility::shown(visible);
    }
}

fn focus_picture(
    focus: On<FocusPicture>,
    pictures: Query<&PictureMarker>,
    mut viewer: ResMut<ViewerState>,
) {
    let Ok(marker) = pictures.get(focus.entity) else {
        return;
    };
    debug!("focusing on {}", marker.name);
    viewer.focus_on(marker.position);
}

/// Billboards share the camera's rotation so they always face the viewer
fn face_camera(viewer: Res<ViewerState>, mut pictures: Query<&mut Transform, With<PictureMarker>>) {
    if !viewer.is_changed() {
        return;
    }
    for mut transform in &mut pictures {
        transform.rotation = viewer.camera.orientation;
    }
}

#[cfg(test)]
mod picture_tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_marker_from_manifest_entry() {
        let entry = PictureEntry {
            name: "M31".to_string(),
            ra:   0.7,
            dec:  41.3,
            img:  "m31.jpg".to_string(),
        };
        let marker = PictureMarker::from(&entry);

        assert_eq!(marker.name, "M31");
        assert_eq!(marker.image_url, "m31.jpg");
        assert!(marker.visible);
        assert!(marker.position.distance(to_cartesian(0.7, 41.3, 40.0)) < EPSILON);
    }

    #[test]
    fn test_pictures_write_depth() {
        let material = picture_material(Handle::default());
        assert_eq!(material.alpha_mode, AlphaMode::Opaque);
        assert!(material.unlit);
        assert!(material.base_color_texture.is_some());
    }

    #[test]
    fn test_display_text() {
        let marker = PictureMarker::new("M42", 5.5883, -5.391, "m42.jpg", 40.0);
        assert_eq!(marker.list_entry(), "M42 (RA: 5.59h, Dec: -5.39°)");
        assert_eq!(marker.details(), "M42\nRA: 5.588h\nDec: -5.391°");
    }
}
