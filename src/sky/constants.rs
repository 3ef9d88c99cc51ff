use bevy::color::Color;

// ============================================================================
// Sphere radii
// ============================================================================

/// Radius of the inward-facing backdrop sphere
pub const BACKDROP_RADIUS: f32 = 50.0;

/// Segment count used for both sectors and stacks of the backdrop sphere
pub const BACKDROP_SEGMENTS: u32 = 64;

/// Radius at which catalog and synthetic stars are placed
pub const STAR_RADIUS: f32 = 45.0;

/// Radius of the coordinate grid
pub const GRID_RADIUS: f32 = 40.0;

/// Default radius for anything placed by RA/Dec without an explicit radius
pub const DEFAULT_PLACEMENT_RADIUS: f32 = 40.0;

/// Grid labels sit slightly outside the grid so lines don't cut through them
pub const GRID_LABEL_RADIUS: f32 = GRID_RADIUS + 2.0;

// ============================================================================
// Catalog ingestion
// ============================================================================

/// Faintest magnitude that is still ingested
pub const MAGNITUDE_LIMIT: f32 = 6.5;

/// Upper bound on accepted catalog rows
pub const MAX_CATALOG_STARS: usize = 10_000;

/// Column holding the proper name in the HYG layout, used when no name header exists
pub const DEFAULT_NAME_COLUMN: usize = 6;

/// Pogson's ratio, brightness factor per magnitude step
pub const POGSON_RATIO: f32 = 2.512;

/// Header aliases for right ascension
pub const RA_HEADERS: &[&str] = &["ra", "rarad", "ra_rad"];

/// Header aliases for declination
pub const DEC_HEADERS: &[&str] = &["dec", "decrad", "dec_rad"];

/// Header aliases for apparent magnitude
pub const MAGNITUDE_HEADERS: &[&str] = &["mag", "v", "vmag", "absmag"];

/// Header names that identify a name column
pub const NAME_HEADERS: &[&str] = &["proper", "name"];

// ============================================================================
// Synthetic fallback
// ============================================================================

/// Number of random stars shown until a catalog loads
pub const SYNTHETIC_STAR_COUNT: usize = 1000;

/// Magnitude assigned to every synthetic star
pub const SYNTHETIC_STAR_MAGNITUDE: f32 = 5.0;

// ============================================================================
// Grid
// ============================================================================

/// Declination step between meridian samples, in degrees
pub const MERIDIAN_SAMPLE_STEP_DEGREES: u8 = 5;

/// Parallel samples per hour of right ascension (one every 0.1h)
pub const PARALLEL_SAMPLES_PER_HOUR: u16 = 10;

/// Parallels are drawn from -75 to 75 degrees in these steps
pub const PARALLEL_STEP_DEGREES: usize = 15;

/// Outermost parallel drawn, in degrees
pub const PARALLEL_LIMIT_DEGREES: i16 = 75;

/// Gizmo depth bias for grid lines. Pictures are flat quads tangent to the
/// grid sphere, so unbiased lines near a picture's edge sit in front of it.
/// At 0.05 the lines test as if 5% further away, still short of the backdrop.
pub const GRID_DEPTH_BIAS: f32 = 0.05;

/// Hour labels are placed along the equator every this many hours
pub const HOUR_LABEL_STEP: usize = 2;

/// Label size for grid annotations
pub const GRID_LABEL_SIZE: f32 = 2.0;

/// Label size for named stars
pub const STAR_LABEL_SIZE: f32 = 0.5;

/// Label size for picture names
pub const PICTURE_LABEL_SIZE: f32 = 0.5;

/// Ordinary grid line colour (#666666)
pub const GRID_LINE_COLOR: Color = Color::srgb(0.4, 0.4, 0.4);

/// Equator line colour (#4a9eff)
pub const EQUATOR_LINE_COLOR: Color = Color::srgb(0.290, 0.620, 1.0);

/// Backdrop sphere colour (#000033)
pub const BACKDROP_COLOR: Color = Color::srgb(0.0, 0.0, 0.2);

// ============================================================================
// Pictures
// ============================================================================

/// Edge length of a square picture billboard
pub const PICTURE_SIZE: f32 = 3.0;
