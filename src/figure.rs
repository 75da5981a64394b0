// Backend-independent description of a rendered PCA figure

use serde::{Deserialize, Serialize};

/// An opaque RGB colour.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const GREY: Rgb = Rgb(128, 128, 128);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
}

/// Axis-aligned rectangle in data coordinates.
///
/// Used both for the visible window of a figure and for the window in which
/// point labels are drawn. Containment is inclusive on every edge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

/// Explicit `(xmin, xmax, ymin, ymax)` override supplied by the caller.
pub type Lims = Bounds;

impl Bounds {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }

    /// `[-half_width, half_width]` on both axes.
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width, -half_width, half_width)
    }

    /// Every edge multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.xmin * factor,
            self.xmax * factor,
            self.ymin * factor,
            self.ymax * factor,
        )
    }

    /// Inclusive point containment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// How the tick labels of one axis are laid out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Ticks {
    /// Let the backend pick tick positions.
    Auto,
    /// No tick labels and no tick marks.
    Hidden,
    /// Tick labels exactly at these positions.
    At(Vec<f64>),
}

/// A single drawable primitive, in data coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Mark {
    /// Vertical bar centred on `x`, rising from zero to `height`.
    Bar {
        x: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    /// Polyline through `points`.
    Line {
        points: Vec<(f64, f64)>,
        color: Rgb,
        dashed: bool,
        markers: bool,
    },
    /// Vector from the origin to `tip`, with a visible arrowhead.
    Arrow { tip: (f64, f64), color: Rgb },
    /// Straight segment without arrowhead.
    Segment {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgb,
        alpha: f64,
    },
    /// Unfilled circle; `radius` is in data units.
    Circle {
        center: (f64, f64),
        radius: f64,
        edge: Rgb,
    },
    /// One scatter series. `indices[i]` is the observation that produced `points[i]`.
    Scatter {
        points: Vec<(f64, f64)>,
        indices: Vec<usize>,
        color: Rgb,
        alpha: f64,
        label: Option<String>,
    },
    Text {
        at: (f64, f64),
        text: String,
        font_size: u32,
        h_align: HAlign,
        v_align: VAlign,
        /// Counter-clockwise rotation in degrees.
        rotation: f64,
        color: Rgb,
        alpha: f64,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legend {
    pub position: LegendPosition,
    pub font_size: u32,
}

/// Which of the three diagnostic plots a figure is.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Scree,
    /// Zero-based component indices of the plane.
    CorrelationCircle { d1: usize, d2: usize },
    FactorialPlane { d1: usize, d2: usize },
}

/// A fully laid-out figure, ready to be handed to a sink.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: FigureKind,
    /// Width and height in pixels.
    pub size: (u32, u32),
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub view: Bounds,
    pub x_ticks: Ticks,
    pub y_ticks: Ticks,
    /// Tick mark length in pixels; zero draws tick labels without marks.
    pub tick_length: u32,
    pub marks: Vec<Mark>,
    pub legend: Option<Legend>,
}

impl Figure {
    pub(crate) fn new(kind: FigureKind, size: (u32, u32), view: Bounds) -> Self {
        Self {
            kind,
            size,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            view,
            x_ticks: Ticks::Auto,
            y_ticks: Ticks::Auto,
            tick_length: 5,
            marks: Vec::new(),
            legend: None,
        }
    }

    /// File-name friendly identifier, e.g. `correlation_circle_F1_F2`.
    pub fn file_stem(&self) -> String {
        match self.kind {
            FigureKind::Scree => "scree".to_string(),
            FigureKind::CorrelationCircle { d1, d2 } => {
                format!("correlation_circle_F{}_F{}", d1 + 1, d2 + 1)
            }
            FigureKind::FactorialPlane { d1, d2 } => {
                format!("factorial_plane_F{}_F{}", d1 + 1, d2 + 1)
            }
        }
    }

    pub fn bars(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(|m| matches!(m, Mark::Bar { .. }))
    }

    pub fn arrows(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(|m| matches!(m, Mark::Arrow { .. }))
    }

    pub fn segments(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(|m| matches!(m, Mark::Segment { .. }))
    }

    pub fn scatters(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(|m| matches!(m, Mark::Scatter { .. }))
    }

    /// Text contents of every `Text` mark, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
