mod backdrop;
mod catalog;
mod constants;
mod coordinates;
mod grid;
mod manifest;
mod pictures;
mod shading;
mod star_field;
mod synthetic;

use backdrop::BackdropPlugin;
use bevy::prelude::*;
pub use catalog::StarCatalog;
pub use catalog::StarCatalogLoader;
pub use constants::PICTURE_LABEL_SIZE;
pub use constants::PICTURE_SIZE;
pub use constants::STAR_LABEL_SIZE;
use grid::GridPlugin;
pub use manifest::PictureManifest;
pub use manifest::PictureManifestLoader;
pub use pictures::FocusPicture;
pub use pictures::PictureMarker;
pub use pictures::PictureRegistry;
pub use pictures::TogglePictureVisibility;
use pictures::PicturesPlugin;
pub use shading::zoom_factor;
use star_field::StarFieldPlugin;

/// Everything drawn on or inside the celestial sphere
pub struct SkyPlugin;

impl Plugin for SkyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(BackdropPlugin)
            .add_plugins(GridPlugin)
            .add_plugins(StarFieldPlugin)
            .add_plugins(PicturesPlugin);
    }
}
