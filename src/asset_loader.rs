//! The catalog and manifest are requested once at startup and announced when they land.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::sky::PictureManifest;
use crate::sky::PictureManifestLoader;
use crate::sky::StarCatalog;
use crate::sky::StarCatalogLoader;

pub struct AssetLoaderPlugin;

impl Plugin for AssetLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AssetsState>()
            .init_asset::<StarCatalog>()
            .init_asset_loader::<StarCatalogLoader>()
            .init_asset::<PictureManifest>()
            .init_asset_loader::<PictureManifestLoader>()
            .init_resource::<SkyAssetPaths>()
            .init_resource::<SkyAssets>()
            .add_systems(PreStartup, load_assets)
            .add_systems(
                Update,
                check_asset_loading.run_if(in_state(AssetsState::Loading)),
            );
    }
}

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AssetsState {
    #[default]
    Loading,
    /// Both loads finished, successfully or not
    Settled,
}

/// Where the catalog and manifest live, relative to the asset directory
#[derive(Resource, Clone, Debug)]
pub struct SkyAssetPaths {
    pub catalog:  String,
    pub manifest: String,
}

impl Default for SkyAssetPaths {
    fn default() -> Self {
        Self {
            catalog:  "hyg_v42.csv".to_string(),
            manifest: "pictures.json".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadProgress {
    #[default]
    Pending,
    Ready,
    Failed,
}

#[derive(Resource, Clone, Debug, Default)]
pub struct SkyAssets {
    pub catalog:           Handle<StarCatalog>,
    pub manifest:          Handle<PictureManifest>,
    pub catalog_progress:  LoadProgress,
    pub manifest_progress: LoadProgress,
}

/// The star catalog finished loading and parsed with the required columns
#[derive(Event, Clone, Copy, Debug)]
pub struct CatalogReady {
    pub id: AssetId<StarCatalog>,
}

/// The picture manifest finished loading
#[derive(Event, Clone, Copy, Debug)]
pub struct ManifestReady {
    pub id: AssetId<PictureManifest>,
}

pub fn load_assets(
    mut sky_assets: ResMut<SkyAssets>,
    paths: Res<SkyAssetPaths>,
    asset_server: Res<AssetServer>,
) {
    *sky_assets = SkyAssets {
        catalog: asset_server.load(paths.catalog.clone()),
        manifest: asset_server.load(paths.manifest.clone()),
        ..default()
    };
}

/// Maps an asset server load state onto our progress, `None` while still loading
fn progress_of(state: Option<LoadState>) -> Option<LoadProgress> {
    match state? {
        LoadState::Loaded => Some(LoadProgress::Ready),
        LoadState::Failed(e) => {
            warn!("{e}");
            Some(LoadProgress::Failed)
        },
        LoadState::NotLoaded | LoadState::Loading => None,
    }
}

pub fn check_asset_loading(
    mut commands: Commands,
    mut next_state: ResMut<NextState<AssetsState>>,
    asset_server: Res<AssetServer>,
    mut sky_assets: ResMut<SkyAssets>,
) {
    if sky_assets.catalog_progress == LoadProgress::Pending
        && let Some(progress) = progress_of(asset_server.get_load_state(sky_assets.catalog.id()))
    {
        sky_assets.catalog_progress = progress;
        if progress == LoadProgress::Ready {
            commands.trigger(CatalogReady {
                id: sky_assets.catalog.id(),
            });
        } else {
            warn!("star catalog unavailable, keeping synthetic stars");
        }
    }

    if sky_assets.manifest_progress == LoadProgress::Pending
        && let Some(progress) = progress_of(asset_server.get_load_state(sky_assets.manifest.id()))
    {
        sky_assets.manifest_progress = progress;
        if progress == LoadProgress::Ready {
            commands.trigger(ManifestReady {
                id: sky_assets.manifest.id(),
            });
        } else {
            warn!("picture manifest unavailable, showing no pictures");
        }
    }

    if sky_assets.catalog_progress != LoadProgress::Pending
        && sky_assets.manifest_progress != LoadProgress::Pending
    {
        info!("sky assets settled");
        next_state.set(AssetsState::Settled);
    }
}

#[cfg(test)]
mod asset_progress_tests {
    use super::*;

    #[test]
    fn test_progress_mapping() {
        assert_eq!(progress_of(None), None);
        assert_eq!(progress_of(Some(LoadState::Loading)), None);
        assert_eq!(progress_of(Some(LoadState::NotLoaded)), None);
        assert_eq!(progress_of(Some(LoadState::Loaded)), Some(LoadProgress::Ready));
    }
}
