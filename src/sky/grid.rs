use bevy::color::palettes::tailwind;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use super::constants::EQUATOR_LINE_COLOR;
use super::constants::GRID_DEPTH_BIAS;
use super::constants::GRID_LABEL_RADIUS;
use super::constants::GRID_LABEL_SIZE;
use super::constants::GRID_LINE_COLOR;
use super::constants::GRID_RADIUS;
use super::constants::HOUR_LABEL_STEP;
use super::constants::MERIDIAN_SAMPLE_STEP_DEGREES;
use super::constants::PARALLEL_LIMIT_DEGREES;
use super::constants::PARALLEL_SAMPLES_PER_HOUR;
use super::constants::PARALLEL_STEP_DEGREES;
use super::coordinates::to_cartesian;
use crate::labels::LabelAnchor;
use crate::labels::LabelConfig;
use crate::labels::label_bundle;
use crate::viewer_input::Inspector;
use crate::viewer_input::inspector_active;

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<GridGizmo>()
            .add_plugins(
                ResourceInspectorPlugin::<GridConfig>::default()
                    .run_if(inspector_active(Inspector::Grid)),
            )
            .init_resource::<GridConfig>()
            .insert_resource(CelestialGrid::new(GRID_RADIUS))
            .add_systems(Startup, spawn_grid_labels)
            .add_systems(
                Update,
                (configure_grid_gizmo, draw_grid, sync_grid_labels).chain(),
            );
    }
}

#[derive(Default, Reflect, GizmoConfigGroup)]
struct GridGizmo {}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct GridConfig {
    pub show_grid:     bool,
    pub line_color:    Color,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub line_alpha:    f32,
    pub equator_color: Color,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub equator_alpha: f32,
    pub label_color:   Color,
    #[inspector(min = 0.5, max = 5.0, display = NumberDisplay::Slider)]
    pub line_width:    f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show_grid:     true,
            line_color:    GRID_LINE_COLOR,
            line_alpha:    0.5,
            equator_color: EQUATOR_LINE_COLOR,
            equator_alpha: 0.7,
            label_color:   Color::from(tailwind::SLATE_200),
            line_width:    1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridLineKind {
    Meridian,
    Parallel,
    Equator,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridLine {
    pub kind:   GridLineKind,
    pub points: Vec<Vec3>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridLabel {
    pub text:     String,
    pub position: Vec3,
}

/// Hour and declination annotations spawned from [`CelestialGrid::labels`]
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct GridLabelText;

/// Meridians, parallels, equator and their annotations, built once
#[derive(Resource, Clone, Debug)]
pub struct CelestialGrid {
    pub lines:  Vec<GridLine>,
    pub labels: Vec<GridLabel>,
}

impl CelestialGrid {
    pub fn new(radius: f32) -> Self {
        let mut lines = Vec::new();

        let meridian_samples = 180 / MERIDIAN_SAMPLE_STEP_DEGREES;
        for hour in 0..24_u8 {
            let points = (0..=meridian_samples)
                .map(|i| {
                    let dec = f32::from(i * MERIDIAN_SAMPLE_STEP_DEGREES) - 90.0;
                    to_cartesian(f32::from(hour), dec, radius)
                })
                .collect();
            lines.push(GridLine {
                kind: GridLineKind::Meridian,
                points,
            });
        }

        for dec in parallel_declinations() {
            lines.push(GridLine {
                kind:   GridLineKind::Parallel,
                points: parallel(f32::from(dec), radius),
            });
        }

        lines.push(GridLine {
            kind:   GridLineKind::Equator,
            points: parallel(0.0, radius),
        });

        Self {
            lines,
            labels: grid_labels(),
        }
    }
}

/// Non-zero parallels from -75 to 75 degrees
fn parallel_declinations() -> impl Iterator<Item = i16> {
    (-PARALLEL_LIMIT_DEGREES..=PARALLEL_LIMIT_DEGREES)
        .step_by(PARALLEL_STEP_DEGREES)
        .filter(|dec| *dec != 0)
}

/// One full turn of RA plus a step, so the loop closes
fn parallel(dec: f32, radius: f32) -> Vec<Vec3> {
    let samples = 24 * PARALLEL_SAMPLES_PER_HOUR + 1;
    let step = f32::from(PARALLEL_SAMPLES_PER_HOUR).recip();
    (0..=samples)
        .map(|i| to_cartesian(f32::from(i) * step, dec, radius))
        .collect()
}

fn grid_labels() -> Vec<GridLabel> {
    let hours = (0..24)
        .step_by(HOUR_LABEL_STEP)
        .map(|hour: u8| GridLabel {
            text:     format!("{hour}h"),
            position: to_cartesian(f32::from(hour), 0.0, GRID_LABEL_RADIUS),
        });

    let degrees = parallel_declinations().map(|dec| GridLabel {
        text:     format!("{dec:+}°"),
        position: to_cartesian(0.0, f32::from(dec), GRID_LABEL_RADIUS),
    });

    hours.chain(degrees).collect()
}

fn configure_grid_gizmo(config: Res<GridConfig>, mut config_store: ResMut<GizmoConfigStore>) {
    if !config.is_changed() {
        return;
    }
    let (gizmo_config, _) = config_store.config_mut::<GridGizmo>();
    gizmo_config.enabled = config.show_grid;
    gizmo_config.line.width = config.line_width;
    gizmo_config.depth_bias = GRID_DEPTH_BIAS;
}

fn draw_grid(mut gizmos: Gizmos<GridGizmo>, grid: Res<CelestialGrid>, config: Res<GridConfig>) {
    let line_color = config.line_color.with_alpha(config.line_alpha);
    let equator_color = config.equator_color.with_alpha(config.equator_alpha);

    for line in &grid.lines {
        let color = match line.kind {
            GridLineKind::Equator => equator_color,
            GridLineKind::Meridian | GridLineKind::Parallel => line_color,
        };
        gizmos.linestrip(line.points.iter().copied(), color);
    }
}

/// Labels follow the grid's visibility and colour; opacity stays with the label config
fn sync_grid_labels(
    config: Res<GridConfig>,
    mut labels: Query<(&mut LabelAnchor, &mut TextColor), With<GridLabelText>>,
) {
    if !config.is_changed() {
        return;
    }
    for (mut anchor, mut color) in &mut labels {
        anchor.shown = config.show_grid;
        color.0 = config.label_color.with_alpha(color.0.alpha());
    }
}

fn spawn_grid_labels(
    mut commands: Commands,
    grid: Res<CelestialGrid>,
    config: Res<LabelConfig>,
    grid_config: Res<GridConfig>,
) {
    for label in &grid.labels {
        commands.spawn((
            Name::new(format!("GridLabel {}", label.text)),
            GridLabelText,
            label_bundle(
                label.text.clone(),
                LabelAnchor::new(label.position, GRID_LABEL_SIZE),
                grid_config.label_color,
                &config,
            ),
        ));
    }
}

#[cfg(test)]
mod grid_tests {
    use super::*;
    use crate::sky::constants::BACKDROP_RADIUS;
    use crate::sky::constants::DEFAULT_PLACEMENT_RADIUS;
    use crate::sky::constants::PICTURE_SIZE;

    const EPSILON: f32 = 1e-3;

    fn create_test_grid() -> CelestialGrid { CelestialGrid::new(GRID_RADIUS) }

    fn count(grid: &CelestialGrid, kind: GridLineKind) -> usize {
        grid.lines.iter().filter(|line| line.kind == kind).count()
    }

    /// Depth the line shader tests against: clip depth scaled by `1 - bias`
    fn biased_distance(distance: f32) -> f32 { distance / (1.0 - GRID_DEPTH_BIAS) }

    #[test]
    fn test_grid_lines_stay_behind_pictures() {
        // the farthest point of a picture quad is its corner
        let half = PICTURE_SIZE * 0.5;
        let corner = DEFAULT_PLACEMENT_RADIUS.hypot(half.hypot(half));

        assert!(corner > GRID_RADIUS);
        assert!(biased_distance(GRID_RADIUS) > corner);
        assert!(biased_distance(GRID_RADIUS) < BACKDROP_RADIUS);
    }

    #[test]
    fn test_line_counts() {
        let grid = create_test_grid();
        assert_eq!(count(&grid, GridLineKind::Meridian), 24);
        assert_eq!(count(&grid, GridLineKind::Parallel), 10);
        assert_eq!(count(&grid, GridLineKind::Equator), 1);
    }

    #[test]
    fn test_meridians_run_pole_to_pole() {
        let grid = create_test_grid();
        let Some(meridian) = grid
            .lines
            .iter()
            .find(|line| line.kind == GridLineKind::Meridian)
        else {
            panic!("no meridian");
        };

        assert_eq!(meridian.points.len(), 37);
        let (Some(first), Some(last)) = (meridian.points.first(), meridian.points.last()) else {
            panic!("empty meridian");
        };
        assert!(first.distance(Vec3::NEG_Y * GRID_RADIUS) < EPSILON);
        assert!(last.distance(Vec3::Y * GRID_RADIUS) < EPSILON);
    }

    #[test]
    fn test_every_point_is_on_the_grid_sphere() {
        let grid = create_test_grid();
        for point in grid.lines.iter().flat_map(|line| &line.points) {
            assert!((point.length() - GRID_RADIUS).abs() < EPSILON);
        }
    }

    #[test]
    fn test_parallels_close() {
        let grid = create_test_grid();
        for line in grid
            .lines
            .iter()
            .filter(|line| line.kind != GridLineKind::Meridian)
        {
            let (Some(first), Some(last)) = (line.points.first(), line.points.last()) else {
                panic!("empty parallel");
            };
            // the last sample is one step past the start
            assert!(first.distance(*last) < GRID_RADIUS * 0.05);
        }
    }

    #[test]
    fn test_labels() {
        let grid = create_test_grid();
        let texts: Vec<_> = grid.labels.iter().map(|label| label.text.as_str()).collect();

        assert_eq!(
            &texts[..12],
            &["0h", "2h", "4h", "6h", "8h", "10h", "12h", "14h", "16h", "18h", "20h", "22h"]
        );
        assert!(texts.contains(&"+15°"));
        assert!(texts.contains(&"-75°"));
        assert!(!texts.contains(&"+0°"));
        assert_eq!(texts.len(), 22);

        for label in &grid.labels {
            assert!((label.position.length() - GRID_LABEL_RADIUS).abs() < EPSILON);
        }
    }
}
