use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use crate::viewer_input::Inspector;
use crate::viewer_input::inspector_active;

pub struct LabelConfigPlugin;

impl Plugin for LabelConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            ResourceInspectorPlugin::<LabelConfig>::default()
                .run_if(inspector_active(Inspector::Labels)),
        )
        .init_resource::<LabelConfig>();
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct LabelConfig {
    /// Field of view at which the threshold stops growing
    #[inspector(min = 10.0, max = 90.0, display = NumberDisplay::Slider)]
    pub fov_floor:                 f32,
    /// Field of view at which the threshold is at its lowest
    #[inspector(min = 10.0, max = 90.0, display = NumberDisplay::Slider)]
    pub fov_ceiling:               f32,
    /// Faintest labelled magnitude when fully zoomed out
    #[inspector(min = -2.0, max = 6.5, display = NumberDisplay::Slider)]
    pub wide_magnitude_threshold:  f32,
    /// Faintest labelled magnitude when fully zoomed in
    #[inspector(min = -2.0, max = 6.5, display = NumberDisplay::Slider)]
    pub close_magnitude_threshold: f32,
    #[inspector(min = 0.0, max = 5.0, display = NumberDisplay::Slider)]
    pub star_label_offset:         f32,
    #[inspector(min = 0.0, max = 5.0, display = NumberDisplay::Slider)]
    pub picture_label_offset:      f32,
    pub picture_labels:            bool,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub opacity:                   f32,
    /// Share of a label's height taken up by its glyphs
    #[inspector(min = 0.1, max = 1.0, display = NumberDisplay::Slider)]
    pub glyph_ratio:               f32,
    #[inspector(min = 1.0, max = 24.0, display = NumberDisplay::Slider)]
    pub min_font_size:             f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            fov_floor:                 20.0,
            fov_ceiling:               90.0,
            wide_magnitude_threshold:  1.5,
            close_magnitude_threshold: 3.5,
            star_label_offset:         0.8,
            picture_label_offset:      2.3,
            picture_labels:            false,
            opacity:                   0.6,
            // 40px glyphs on a 128px tall label
            glyph_ratio:               0.3125,
            min_font_size:             6.0,
        }
    }
}
