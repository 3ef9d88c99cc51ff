use bevy::asset::AssetLoader;
use bevy::asset::LoadContext;
use bevy::asset::io::Reader;
use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read picture manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("picture manifest is not a JSON array: {0}")]
    Json(#[from] serde_json::Error),
}

/// One `pictures.json` entry; `ra` in hours, `dec` in degrees
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PictureEntry {
    pub name: String,
    pub ra:   f32,
    pub dec:  f32,
    pub img:  String,
}

#[derive(Asset, TypePath, Clone, Debug, Default)]
pub struct PictureManifest {
    pub entries: Vec<PictureEntry>,
    pub skipped: usize,
}

/// Parses the manifest, keeping every well-formed entry.
///
/// The document itself must be an array; entries missing fields or with the
/// wrong types are skipped so one typo doesn't hide every picture.
pub fn parse_manifest(bytes: &[u8]) -> Result<PictureManifest, ManifestError> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;

    let mut manifest = PictureManifest::default();
    for value in values {
        match serde_json::from_value::<PictureEntry>(value) {
            Ok(entry) => manifest.entries.push(entry),
            Err(e) => {
                warn!("skipping picture manifest entry: {e}");
                manifest.skipped += 1;
            },
        }
    }
    Ok(manifest)
}

/// Loads `.json` picture manifests as [`PictureManifest`] assets
#[derive(Default, TypePath)]
pub struct PictureManifestLoader;

impl AssetLoader for PictureManifestLoader {
    type Asset = PictureManifest;
    type Settings = ();
    type Error = ManifestError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        parse_manifest(&bytes)
    }

    fn extensions(&self) -> &[&str] { &["json"] }
}

#[cfg(test)]
mod manifest_tests {
    use super::*;

    #[test]
    fn test_single_entry() {
        let json = br#"[{"name":"M31","ra":0.7,"dec":41.3,"img":"m31.jpg"}]"#;
        let Ok(manifest) = parse_manifest(json) else {
            panic!("manifest should parse");
        };

        assert_eq!(
            manifest.entries,
            vec![PictureEntry {
                name: "M31".to_string(),
                ra:   0.7,
                dec:  41.3,
                img:  "m31.jpg".to_string(),
            }]
        );
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let json = br#"[
            {"name":"M42","ra":5.59,"dec":-5.39,"img":"m42.jpg"},
            {"name":"no coordinates","img":"x.jpg"},
            {"name":"M45","ra":"3.79","dec":24.1,"img":"m45.jpg"}
        ]"#;
        let Ok(manifest) = parse_manifest(json) else {
            panic!("manifest should parse");
        };

        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(manifest.entries[0].name, "M42");
        assert_eq!(manifest.skipped, 2);
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            parse_manifest(br#"{"name":"M31"}"#),
            Err(ManifestError::Json(_))
        ));
        assert!(parse_manifest(b"").is_err());
    }

    #[test]
    fn test_empty_array() {
        let Ok(manifest) = parse_manifest(b"[]") else {
            panic!("empty manifest should parse");
        };
        assert!(manifest.entries.is_empty());
    }
}
