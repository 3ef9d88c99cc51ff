//! Labels are UI text nodes pinned to a point on the sphere. Each frame the
//! point is projected through the viewer camera and the node is moved there.

use bevy::prelude::*;

use super::config::LabelConfig;
use crate::camera::CameraState;
use crate::camera::ViewerState;
use crate::camera::ndc_to_client;
use crate::picking::pick_nearest;
use crate::picking::visible_billboards;
use crate::sky::PictureMarker;

/// How tall a label quad is relative to its nominal size
const LABEL_HEIGHT_RATIO: f32 = 1.5;

/// Labels this far past the screen edge in NDC are not laid out
const OFFSCREEN_NDC_LIMIT: f32 = 1.2;

/// Font size changes smaller than this are not written back
const FONT_SIZE_TOLERANCE: f32 = 0.1;

/// Where a label sits in the world and whether its owner wants it drawn
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub struct LabelAnchor {
    pub position: Vec3,
    /// World-space size, as if the label were a sprite at `position`
    pub size:     f32,
    pub shown:    bool,
}

impl LabelAnchor {
    pub const fn new(position: Vec3, size: f32) -> Self {
        Self {
            position,
            size,
            shown: true,
        }
    }
}

/// Ties a label to the picture it names
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq, Eq)]
#[reflect(Component)]
pub struct FollowsPicture(pub Entity);

/// Text node for a label; starts hidden until the first layout pass places it
pub fn label_bundle(
    text: impl Into<String>,
    anchor: LabelAnchor,
    color: Color,
    config: &LabelConfig,
) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: config.min_font_size,
            ..default()
        },
        TextColor(color.with_alpha(config.opacity)),
        Node {
            position_type: PositionType::Absolute,
            ..default()
        },
        Visibility::Hidden,
        anchor,
    )
}

/// Font size in logical pixels for a label of world `size` seen at `depth`
pub fn label_font_size(
    size: f32,
    depth: f32,
    fov_degrees: f32,
    viewport_height: f32,
    config: &LabelConfig,
) -> f32 {
    let visible_height = 2.0 * depth * (fov_degrees.to_radians() * 0.5).tan();
    if visible_height <= f32::EPSILON {
        return config.min_font_size;
    }
    let pixels = size * LABEL_HEIGHT_RATIO / visible_height * viewport_height;
    (pixels * config.glyph_ratio).max(config.min_font_size)
}

/// Where a projected label lands, in logical pixels, and how far away it is
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPlacement {
    pub client: Vec2,
    pub depth:  f32,
}

/// Projects `position`; `None` when it is behind the viewer or well off screen
pub fn place_on_screen(
    camera: &CameraState,
    position: Vec3,
    viewport: Vec2,
) -> Option<ScreenPlacement> {
    let aspect_ratio = if viewport.y > 0.0 {
        viewport.x / viewport.y
    } else {
        1.0
    };
    let (ndc, depth) = camera.project(position, aspect_ratio)?;
    if ndc.abs().max_element() > OFFSCREEN_NDC_LIMIT {
        return None;
    }
    Some(ScreenPlacement {
        client: ndc_to_client(ndc, viewport),
        depth,
    })
}

/// True when a visible picture other than `own` sits between the viewer and `position`
pub fn occluded_by_picture(
    camera: &CameraState,
    position: Vec3,
    own: Option<Entity>,
    pictures: &[(Entity, &PictureMarker)],
) -> bool {
    let Ok(direction) = Dir3::new(position) else {
        return false;
    };
    let ray = Ray3d::new(Vec3::ZERO, direction);
    let others = visible_billboards(camera, pictures.iter().copied())
        .filter(|(entity, _)| Some(*entity) != own);

    pick_nearest(ray, others).is_some_and(|(_, distance)| distance < position.length())
}

pub fn project_labels(
    viewer: Res<ViewerState>,
    config: Res<LabelConfig>,
    pictures: Query<(Entity, &PictureMarker)>,
    mut labels: Query<(
        &LabelAnchor,
        Option<&FollowsPicture>,
        &ComputedNode,
        &mut Node,
        &mut TextFont,
        &mut Visibility,
    )>,
) {
    let camera = &viewer.camera;
    let viewport = viewer.viewport();
    let pictures: Vec<_> = pictures.iter().collect();

    for (anchor, follows, computed, mut node, mut font, mut visibility) in &mut labels {
        let own = follows.map(|follows| follows.0);
        let owner_visible = own.is_none_or(|picture| {
            pictures
                .iter()
                .any(|(entity, marker)| *entity == picture && marker.visible)
        });

        let placement = (anchor.shown && owner_visible)
            .then(|| place_on_screen(camera, anchor.position, viewport))
            .flatten()
            .filter(|_| !occluded_by_picture(camera, anchor.position, own, &pictures));

        let Some(placement) = placement else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };
        visibility.set_if_neq(Visibility::Inherited);

        let font_size = label_font_size(
            anchor.size,
            placement.depth,
            camera.fov,
            viewport.y,
            &config,
        );
        if (font.font_size - font_size).abs() > FONT_SIZE_TOLERANCE {
            font.font_size = font_size;
        }

        // centre the text on the projected point
        let half_extent = computed.size() * computed.inverse_scale_factor() * 0.5;
        let left = Val::Px(placement.client.x - half_extent.x);
        let top = Val::Px(placement.client.y - half_extent.y);
        if node.left != left || node.top != top {
            node.left = left;
            node.top = top;
        }
    }
}
