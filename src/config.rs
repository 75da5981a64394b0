// Plot styling configuration

use crate::figure::Rgb;
use serde::{Deserialize, Serialize};

/// Styling shared by the three diagnostic plots.
///
/// Sizes are in pixels, font sizes in points. The defaults reproduce the
/// classic matplotlib look of these charts (100 dpi figures, default blue
/// bars, red cumulative curve, purple variable names).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlotConfig {
    pub scree_size: (u32, u32),
    pub circle_size: (u32, u32),
    pub plane_size: (u32, u32),

    pub bar_color: Rgb,
    pub cumulative_color: Rgb,
    pub vector_color: Rgb,
    pub circle_label_color: Rgb,
    pub circle_edge_color: Rgb,
    pub reference_line_color: Rgb,
    /// Colour used for every point label on factorial planes.
    pub point_label_color: Rgb,
    /// Series colours, cycled in order for grouped scatter plots.
    pub palette: Vec<Rgb>,

    pub bar_label_font_size: u32,
    pub circle_label_font_size: u32,
    pub point_label_font_size: u32,
    pub legend_font_size: u32,

    /// Opacity of loading segments once arrows are no longer drawn.
    pub segment_alpha: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            scree_size: (900, 600),
            circle_size: (600, 600),
            plane_size: (1000, 1000),
            bar_color: Rgb(31, 119, 180),
            cumulative_color: Rgb::RED,
            vector_color: Rgb::BLUE,
            circle_label_color: Rgb::PURPLE,
            circle_edge_color: Rgb::BLACK,
            reference_line_color: Rgb::GREY,
            point_label_color: Rgb::BLACK,
            palette: vec![
                Rgb(31, 119, 180),
                Rgb(255, 127, 14),
                Rgb(44, 160, 44),
                Rgb(214, 39, 40),
                Rgb(148, 103, 189),
                Rgb(140, 86, 75),
                Rgb(227, 119, 194),
                Rgb(127, 127, 127),
                Rgb(188, 189, 34),
                Rgb(23, 190, 207),
            ],
            bar_label_font_size: 15,
            circle_label_font_size: 15,
            point_label_font_size: 10,
            legend_font_size: 8,
            segment_alpha: 0.7,
        }
    }
}

impl PlotConfig {
    /// Palette colour for the `series_index`-th series, cycling when exhausted.
    pub fn series_color(&self, series_index: usize) -> Rgb {
        if self.palette.is_empty() {
            return self.bar_color;
        }
        self.palette[series_index % self.palette.len()]
    }
}
