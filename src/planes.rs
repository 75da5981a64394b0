// Factorial planes: observations projected onto pairs of principal components

use std::collections::BTreeMap;
use std::fmt::Display;

use ndarray::{ArrayView1, ArrayView2};

use crate::axes::{component_label, drawable_planes, AxisPair};
use crate::config::PlotConfig;
use crate::figure::{
    Bounds, Figure, FigureKind, HAlign, Legend, LegendPosition, Lims, Mark, VAlign,
};

/// Padding applied to the view around the data (or around explicit limits).
pub const PLANE_MARGIN: f64 = 1.1;

/// Half-length of the dashed reference lines through the origin.
pub const PLANE_REFERENCE_SPAN: f64 = 100.0;

/// Optional inputs of [`factorial_planes`].
///
/// `T` is the type of the illustrative (categorical) variable.
#[derive(Debug, Clone, Copy)]
pub struct PlaneOptions<'a, T = String> {
    /// One name per observation.
    pub labels: Option<&'a [String]>,
    /// Point opacity.
    pub alpha: f64,
    /// One category per observation; points are grouped and coloured by it.
    pub illustrative: Option<&'a [T]>,
    /// Explicit view bounds, padded by [`PLANE_MARGIN`].
    pub lims: Option<Lims>,
}

impl<T> Default for PlaneOptions<'_, T> {
    fn default() -> Self {
        PlaneOptions {
            labels: None,
            alpha: 1.0,
            illustrative: None,
            lims: None,
        }
    }
}

/// Observation indices per distinct category, categories in ascending order.
///
/// Every index appears in exactly one group.
pub fn group_by_category<T: Ord>(categories: &[T]) -> Vec<(&T, Vec<usize>)> {
    let mut groups: BTreeMap<&T, Vec<usize>> = BTreeMap::new();
    for (i, value) in categories.iter().enumerate() {
        groups.entry(value).or_default().push(i);
    }
    groups.into_iter().collect()
}

/// View bounds and label window for one plane.
///
/// With explicit `lims` the view is the limits padded by [`PLANE_MARGIN`]
/// while labels are kept to the unpadded limits. Otherwise both are the
/// square `[-b, b]` where `b` is the padded largest absolute coordinate.
pub fn plane_bounds(xs: ArrayView1<f64>, ys: ArrayView1<f64>, lims: Option<Lims>) -> (Bounds, Bounds) {
    match lims {
        Some(lims) => (lims.scaled(PLANE_MARGIN), lims),
        None => {
            let boundary = xs
                .iter()
                .chain(ys.iter())
                .fold(0.0_f64, |acc, v| acc.max(v.abs()))
                * PLANE_MARGIN;
            let square = Bounds::symmetric(boundary);
            (square, square)
        }
    }
}

/// Picks the legend corner whose quadrant of the view holds the fewest points.
///
/// Ties go to the first corner in the order upper-right, upper-left,
/// lower-left, lower-right.
pub fn best_legend_position(view: &Bounds, points: impl Iterator<Item = (f64, f64)>) -> LegendPosition {
    let x_mid = (view.xmin + view.xmax) / 2.0;
    let y_mid = (view.ymin + view.ymax) / 2.0;
    let mut counts = [0usize; 4];
    for (x, y) in points.filter(|&(x, y)| view.contains(x, y)) {
        let quadrant = match (x >= x_mid, y >= y_mid) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        };
        counts[quadrant] += 1;
    }
    let corners = [
        LegendPosition::UpperRight,
        LegendPosition::UpperLeft,
        LegendPosition::LowerLeft,
        LegendPosition::LowerRight,
    ];
    let mut best = 0;
    for q in 1..4 {
        if counts[q] < counts[best] {
            best = q;
        }
    }
    corners[best]
}

/// Lays out one factorial plane per drawable axis pair.
///
/// * `x_projected` - Projected observations, shape (n_observations, n_components).
/// * `n_comp` - Pairs with `d2 >= n_comp` are skipped.
/// * `ratios` - Explained-variance ratios, used for the axis captions.
/// * `axis_ranks` - Requested planes, zero-based.
pub fn factorial_planes<T: Ord + Display>(
    x_projected: ArrayView2<f64>,
    n_comp: usize,
    ratios: ArrayView1<f64>,
    axis_ranks: &[AxisPair],
    options: &PlaneOptions<T>,
    config: &PlotConfig,
) -> Vec<Figure> {
    drawable_planes(axis_ranks, n_comp)
        .map(|(d1, d2)| factorial_plane(x_projected, ratios, d1, d2, options, config))
        .collect()
}

/// Lays out the factorial plane of a single pair `(d1, d2)`.
pub fn factorial_plane<T: Ord + Display>(
    x_projected: ArrayView2<f64>,
    ratios: ArrayView1<f64>,
    d1: usize,
    d2: usize,
    options: &PlaneOptions<T>,
    config: &PlotConfig,
) -> Figure {
    let xs = x_projected.column(d1);
    let ys = x_projected.column(d2);
    let (view, label_window) = plane_bounds(xs, ys, options.lims);

    let mut figure = Figure::new(FigureKind::FactorialPlane { d1, d2 }, config.plane_size, view);

    match options.illustrative {
        None => {
            figure.marks.push(Mark::Scatter {
                points: xs.iter().copied().zip(ys.iter().copied()).collect(),
                indices: (0..xs.len()).collect(),
                color: config.series_color(0),
                alpha: options.alpha,
                label: None,
            });
        }
        Some(categories) => {
            let groups = group_by_category(categories);
            for (series, (value, indices)) in groups.into_iter().enumerate() {
                figure.marks.push(Mark::Scatter {
                    points: indices.iter().map(|&i| (xs[i], ys[i])).collect(),
                    indices,
                    color: config.series_color(series),
                    alpha: options.alpha,
                    label: Some(value.to_string()),
                });
            }
            figure.legend = Some(Legend {
                position: best_legend_position(
                    &view,
                    xs.iter().copied().zip(ys.iter().copied()),
                ),
                font_size: config.legend_font_size,
            });
        }
    }

    if let Some(labels) = options.labels {
        for (i, (&x, &y)) in xs.iter().zip(ys.iter()).enumerate() {
            if label_window.contains(x, y) {
                figure.marks.push(Mark::Text {
                    at: (x, y),
                    text: labels[i].clone(),
                    font_size: config.point_label_font_size,
                    h_align: HAlign::Center,
                    v_align: VAlign::Bottom,
                    rotation: 0.0,
                    color: config.point_label_color,
                    alpha: 1.0,
                });
            }
        }
    }

    let span = PLANE_REFERENCE_SPAN;
    for points in [vec![(-span, 0.0), (span, 0.0)], vec![(0.0, -span), (0.0, span)]] {
        figure.marks.push(Mark::Line {
            points,
            color: config.reference_line_color,
            dashed: true,
            markers: false,
        });
    }

    figure.x_label = component_label(d1, ratios);
    figure.y_label = component_label(d2, ratios);
    figure.title = format!(
        "projection of observations (on F{} and F{})",
        d1 + 1,
        d2 + 1
    );

    log::debug!(
        "Laid out factorial plane F{}/F{} with {} observations.",
        d1 + 1,
        d2 + 1,
        xs.len()
    );
    figure
}
