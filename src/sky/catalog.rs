use bevy::asset::AssetLoader;
use bevy::asset::LoadContext;
use bevy::asset::io::Reader;
use bevy::prelude::*;
use thiserror::Error;

use super::constants::DEC_HEADERS;
use super::constants::DEFAULT_NAME_COLUMN;
use super::constants::MAGNITUDE_HEADERS;
use super::constants::MAGNITUDE_LIMIT;
use super::constants::MAX_CATALOG_STARS;
use super::constants::NAME_HEADERS;
use super::constants::RA_HEADERS;
use super::constants::STAR_RADIUS;
use super::coordinates::radians_to_hours;
use super::coordinates::to_cartesian;
use super::shading::pogson_brightness;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read star catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("star catalog is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("star catalog is missing ra/dec/mag columns (headers: {headers:?})")]
    MissingColumns { headers: Vec<String> },
}

/// Unit of the angle columns, decided by the RA header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum AngleUnit {
    /// RA in hours, Dec in degrees
    #[default]
    HoursDegrees,
    /// RA and Dec in radians
    Radians,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IngestOptions {
    pub magnitude_limit: f32,
    pub max_stars:       usize,
    pub radius:          f32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            magnitude_limit: MAGNITUDE_LIMIT,
            max_stars:       MAX_CATALOG_STARS,
            radius:          STAR_RADIUS,
        }
    }
}

/// One accepted catalog row, read-only after ingestion
#[derive(Clone, Debug, PartialEq)]
pub struct StarRecord {
    pub position:  Vec3,
    pub magnitude: f32,
    pub name:      Option<String>,
}

impl StarRecord {
    /// Point size in pixels before the zoom factor is applied
    pub fn display_size(&self) -> f32 { pogson_brightness(self.magnitude) }
}

#[derive(Asset, TypePath, Clone, Debug, Default)]
pub struct StarCatalog {
    pub stars:        Vec<StarRecord>,
    pub angle_unit:   AngleUnit,
    pub skipped_rows: usize,
}

impl StarCatalog {
    pub fn len(&self) -> usize { self.stars.len() }

    pub fn is_empty(&self) -> bool { self.stars.is_empty() }

    pub fn positions(&self) -> Vec<Vec3> { self.stars.iter().map(|star| star.position).collect() }

    pub fn sizes(&self) -> Vec<f32> { self.stars.iter().map(StarRecord::display_size).collect() }

    pub fn magnitudes(&self) -> Vec<f32> { self.stars.iter().map(|star| star.magnitude).collect() }

    /// Stars with a non-empty proper name, in catalog order
    pub fn named_stars(&self) -> impl Iterator<Item = &StarRecord> {
        self.stars.iter().filter(|star| star.name.is_some())
    }
}

/// Column positions resolved from the header row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Columns {
    ra:        usize,
    dec:       usize,
    magnitude: usize,
    name:      usize,
}

fn clean_field(field: &str) -> &str { field.trim().trim_matches(|c| c == '"' || c == '\'') }

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| aliases.contains(&header.as_str()))
}

fn parse_header(line: &str) -> Vec<String> {
    line.split(',')
        .map(|field| clean_field(field).to_lowercase())
        .collect()
}

fn parse_number(field: Option<&str>) -> Option<f32> {
    let value = clean_field(field?).parse::<f32>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses catalog text into star records.
///
/// Rows that fail to parse or are fainter than the magnitude limit are
/// skipped; ingestion stops once `max_stars` rows have been accepted.
pub fn ingest(text: &str, options: &IngestOptions) -> Result<StarCatalog, CatalogError> {
    let mut lines = text.lines();
    let headers = parse_header(lines.next().unwrap_or_default());

    let (Some(ra), Some(dec), Some(magnitude)) = (
        find_column(&headers, RA_HEADERS),
        find_column(&headers, DEC_HEADERS),
        find_column(&headers, MAGNITUDE_HEADERS),
    ) else {
        return Err(CatalogError::MissingColumns { headers });
    };

    let columns = Columns {
        ra,
        dec,
        magnitude,
        name: find_column(&headers, NAME_HEADERS).unwrap_or(DEFAULT_NAME_COLUMN),
    };

    let angle_unit = if headers[columns.ra].contains("rad") {
        AngleUnit::Radians
    } else {
        AngleUnit::HoursDegrees
    };
    debug!("catalog columns {columns:?}, angle unit {angle_unit:?}");

    let mut catalog = StarCatalog {
        angle_unit,
        ..default()
    };

    for line in lines.map(str::trim).filter(|line| !line.is_empty()) {
        if catalog.stars.len() >= options.max_stars {
            break;
        }

        match parse_row(line, columns, angle_unit, options) {
            Some(star) => catalog.stars.push(star),
            None => catalog.skipped_rows += 1,
        }
    }

    Ok(catalog)
}

fn parse_row(
    line: &str,
    columns: Columns,
    angle_unit: AngleUnit,
    options: &IngestOptions,
) -> Option<StarRecord> {
    let fields: Vec<&str> = line.split(',').collect();

    let ra = parse_number(fields.get(columns.ra).copied())?;
    let dec = parse_number(fields.get(columns.dec).copied())?;
    let magnitude = parse_number(fields.get(columns.magnitude).copied())?;

    if magnitude > options.magnitude_limit {
        return None;
    }

    let (ra_hours, dec_degrees) = match angle_unit {
        AngleUnit::Radians => (radians_to_hours(ra), dec.to_degrees()),
        AngleUnit::HoursDegrees => (ra, dec),
    };

    let name = fields
        .get(columns.name)
        .map(|field| clean_field(field))
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Some(StarRecord {
        position: to_cartesian(ra_hours, dec_degrees, options.radius),
        magnitude,
        name,
    })
}

/// Loads `.csv` star catalogs as [`StarCatalog`] assets
#[derive(Default, TypePath)]
pub struct StarCatalogLoader;

impl AssetLoader for StarCatalogLoader {
    type Asset = StarCatalog;
    type Settings = ();
    type Error = CatalogError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let text = String::from_utf8(bytes)?;
        ingest(&text, &IngestOptions::default())
    }

    fn extensions(&self) -> &[&str] { &["csv"] }
}
