// Correlation circles: variable loadings on pairs of principal components

use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::axes::{component_label, drawable_planes, AxisPair};
use crate::config::PlotConfig;
use crate::figure::{Bounds, Figure, FigureKind, HAlign, Lims, Mark, Ticks, VAlign};

/// Below this many variables loadings are drawn as arrows; from it on, as
/// plain segments so that arrowheads do not clutter the circle.
pub const ARROW_VARIABLE_LIMIT: usize = 30;

/// Optional inputs of [`correlation_circles`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleOptions<'a> {
    /// One name per variable.
    pub labels: Option<&'a [String]>,
    /// Rotation of the variable names, in degrees.
    pub label_rotation: f64,
    /// Explicit view bounds; overrides any data-derived bounds.
    pub lims: Option<Lims>,
}

/// View bounds for one circle.
///
/// Explicit `lims` win; with fewer than [`ARROW_VARIABLE_LIMIT`] variables the
/// unit square is used; otherwise the extent of the loadings on both axes.
pub fn circle_bounds(
    xs: ArrayView1<f64>,
    ys: ArrayView1<f64>,
    lims: Option<Lims>,
) -> Bounds {
    if let Some(lims) = lims {
        return lims;
    }
    if xs.len() < ARROW_VARIABLE_LIMIT {
        return Bounds::new(-1.0, 1.0, -1.0, 1.0);
    }
    let (xmin, xmax) = extent(xs);
    let (ymin, ymax) = extent(ys);
    Bounds::new(xmin, xmax, ymin, ymax)
}

fn extent(values: ArrayView1<f64>) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Lays out one correlation circle per drawable axis pair.
///
/// * `pcs` - Loadings, shape (n_components, n_variables).
/// * `n_comp` - Pairs with `d2 >= n_comp` are skipped.
/// * `ratios` - Explained-variance ratios, used for the axis captions.
/// * `axis_ranks` - Requested planes, zero-based.
///
/// Indices outside `pcs` or `ratios` panic, as do label slices shorter than
/// the number of variables.
pub fn correlation_circles(
    pcs: ArrayView2<f64>,
    n_comp: usize,
    ratios: ArrayView1<f64>,
    axis_ranks: &[AxisPair],
    options: &CircleOptions,
    config: &PlotConfig,
) -> Vec<Figure> {
    drawable_planes(axis_ranks, n_comp)
        .map(|(d1, d2)| correlation_circle(pcs, ratios, d1, d2, options, config))
        .collect()
}

/// Lays out the correlation circle of a single plane `(d1, d2)`.
pub fn correlation_circle(
    pcs: ArrayView2<f64>,
    ratios: ArrayView1<f64>,
    d1: usize,
    d2: usize,
    options: &CircleOptions,
    config: &PlotConfig,
) -> Figure {
    let xs = pcs.index_axis(Axis(0), d1);
    let ys = pcs.index_axis(Axis(0), d2);
    let n_variables = xs.len();
    let bounds = circle_bounds(xs, ys, options.lims);

    let mut figure = Figure::new(
        FigureKind::CorrelationCircle { d1, d2 },
        config.circle_size,
        bounds,
    );

    let as_arrows = n_variables < ARROW_VARIABLE_LIMIT;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        if as_arrows {
            figure.marks.push(Mark::Arrow {
                tip: (x, y),
                color: config.vector_color,
            });
        } else {
            figure.marks.push(Mark::Segment {
                from: (0.0, 0.0),
                to: (x, y),
                color: config.vector_color,
                alpha: config.segment_alpha,
            });
        }
    }

    if let Some(labels) = options.labels {
        for (i, (&x, &y)) in xs.iter().zip(ys.iter()).enumerate() {
            if bounds.contains(x, y) {
                figure.marks.push(Mark::Text {
                    at: (x, y),
                    text: labels[i].clone(),
                    font_size: config.circle_label_font_size,
                    h_align: HAlign::Center,
                    v_align: VAlign::Center,
                    rotation: options.label_rotation,
                    color: config.circle_label_color,
                    alpha: 1.0,
                });
            }
        }
    }

    figure.marks.push(Mark::Circle {
        center: (0.0, 0.0),
        radius: 1.0,
        edge: config.circle_edge_color,
    });

    figure.x_ticks = Ticks::Hidden;
    figure.y_ticks = Ticks::Hidden;

    for points in [vec![(-1.0, 0.0), (1.0, 0.0)], vec![(0.0, -1.0), (0.0, 1.0)]] {
        figure.marks.push(Mark::Line {
            points,
            color: config.reference_line_color,
            dashed: true,
            markers: false,
        });
    }

    figure.x_label = component_label(d1, ratios);
    figure.y_label = component_label(d2, ratios);
    figure.title = format!("correlation circle (F{} and F{})", d1 + 1, d2 + 1);

    log::debug!(
        "Laid out correlation circle F{}/F{} with {} variables ({}).",
        d1 + 1,
        d2 + 1,
        n_variables,
        if as_arrows { "arrows" } else { "segments" }
    );
    figure
}
