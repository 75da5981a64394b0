// SVG rendering of laid-out figures through plotters

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::figure::{Bounds, Figure, HAlign, Legend, LegendPosition, Mark, Rgb, Ticks, VAlign};
use crate::PlotError;

type SvgChart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

type Point = (f64, f64);

const FONT: &str = "sans-serif";
const CIRCLE_RESOLUTION: usize = 180;
// Dash geometry and arrowheads are sized relative to the view (unit square).
const DASH_LENGTH: f64 = 0.015;
const DASH_GAP: f64 = 0.01;
const ARROW_HEAD_LENGTH: f64 = 0.035;
const ARROW_HEAD_HALF_WIDTH: f64 = 0.015;

/// Renders a figure to an SVG document.
///
/// Uses plotters' built-in font metrics, so no system fonts are required.
pub fn render_svg(figure: &Figure) -> Result<String, PlotError> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, figure.size).into_drawing_area();
        draw_figure(&root, figure)?;
        root.present()?;
    }
    Ok(buffer)
}

fn draw_figure(root: &DrawingArea<SVGBackend<'_>, Shift>, figure: &Figure) -> Result<(), PlotError> {
    root.fill(&WHITE)?;

    let view = drawable_view(&figure.view);
    let mut chart = ChartBuilder::on(root)
        .caption(figure.title.as_str(), (FONT, 20))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(view.xmin..view.xmax, view.ymin..view.ymax)?;

    let integer_labels = |v: &f64| format!("{:.0}", v);
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .set_all_tick_mark_size(figure.tick_length as i32);
        match &figure.x_ticks {
            Ticks::Auto => {}
            Ticks::Hidden => {
                mesh.x_labels(0);
            }
            Ticks::At(positions) => {
                mesh.x_labels(positions.len()).x_label_formatter(&integer_labels);
            }
        }
        match &figure.y_ticks {
            Ticks::Auto => {}
            Ticks::Hidden => {
                mesh.y_labels(0);
            }
            Ticks::At(positions) => {
                mesh.y_labels(positions.len()).y_label_formatter(&integer_labels);
            }
        }
        mesh.draw()?;
    }

    for mark in &figure.marks {
        draw_mark(&mut chart, &view, mark)?;
    }

    if let Some(legend) = figure.legend {
        draw_legend(&mut chart, legend)?;
    }
    Ok(())
}

/// The figure view, widened where an axis range is empty so plotters can map it.
fn drawable_view(view: &Bounds) -> Bounds {
    let widen = |lo: f64, hi: f64| {
        if hi > lo {
            (lo, hi)
        } else {
            (lo - 1.0, hi + 1.0)
        }
    };
    let (xmin, xmax) = widen(view.xmin, view.xmax);
    let (ymin, ymax) = widen(view.ymin, view.ymax);
    Bounds::new(xmin, xmax, ymin, ymax)
}

fn to_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn checked_alpha(alpha: f64) -> f64 {
    if !(0.0..=1.0).contains(&alpha) {
        log::warn!("Opacity {} is outside [0, 1]; clamping.", alpha);
    }
    if alpha.is_nan() {
        1.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

/// Snaps a counter-clockwise angle in degrees to the nearest quarter turn.
pub(crate) fn font_transform(rotation: f64) -> FontTransform {
    let quarter_turns = (rotation / 90.0).round();
    if (quarter_turns * 90.0 - rotation).abs() > 1e-9 {
        log::debug!("Text rotation {} snapped to {} degrees.", rotation, quarter_turns * 90.0);
    }
    match (quarter_turns as i64).rem_euclid(4) {
        1 => FontTransform::Rotate270,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}

fn anchor(h_align: HAlign, v_align: VAlign) -> Pos {
    let h = match h_align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    };
    let v = match v_align {
        VAlign::Top => VPos::Top,
        VAlign::Center => VPos::Center,
        VAlign::Bottom => VPos::Bottom,
    };
    Pos::new(h, v)
}

/// Liang-Barsky clipping of segment `a`-`b` against `view`.
pub(crate) fn clip_segment(view: &Bounds, a: Point, b: Point) -> Option<(Point, Point)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, a.0 - view.xmin),
        (dx, view.xmax - a.0),
        (-dy, a.1 - view.ymin),
        (dy, view.ymax - a.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Splits `a`-`b` into dash pieces, measuring lengths in view-normalized units.
fn dash_pieces(view: &Bounds, a: Point, b: Point) -> Vec<(Point, Point)> {
    let width = view.xmax - view.xmin;
    let height = view.ymax - view.ymin;
    let length = (((b.0 - a.0) / width).powi(2) + ((b.1 - a.1) / height).powi(2)).sqrt();
    if length <= 0.0 {
        return Vec::new();
    }
    let lerp = |t: f64| (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1));
    let mut pieces = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + DASH_LENGTH).min(length);
        pieces.push((lerp(start / length), lerp(end / length)));
        start += DASH_LENGTH + DASH_GAP;
    }
    pieces
}

fn draw_segment(chart: &mut SvgChart, view: &Bounds, a: Point, b: Point, style: ShapeStyle) -> Result<(), PlotError> {
    if let Some((p, q)) = clip_segment(view, a, b) {
        chart.draw_series(std::iter::once(PathElement::new(vec![p, q], style)))?;
    }
    Ok(())
}

fn draw_mark(chart: &mut SvgChart, view: &Bounds, mark: &Mark) -> Result<(), PlotError> {
    match mark {
        Mark::Bar { x, width, height, color } => {
            let left = (x - width / 2.0).max(view.xmin);
            let right = (x + width / 2.0).min(view.xmax);
            let top = height.clamp(view.ymin, view.ymax);
            let base = 0.0_f64.clamp(view.ymin, view.ymax);
            if left < right {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(left, base), (right, top)],
                    to_color(*color).filled(),
                )))?;
            }
        }
        Mark::Line { points, color, dashed, markers } => {
            let style = to_color(*color).stroke_width(2);
            for pair in points.windows(2) {
                if let Some((p, q)) = clip_segment(view, pair[0], pair[1]) {
                    if *dashed {
                        for (s, e) in dash_pieces(view, p, q) {
                            draw_segment(chart, view, s, e, style)?;
                        }
                    } else {
                        draw_segment(chart, view, p, q, style)?;
                    }
                }
            }
            if *markers {
                let marker_style = to_color(*color).filled();
                chart.draw_series(
                    points
                        .iter()
                        .filter(|&&(x, y)| view.contains(x, y))
                        .map(|&p| Circle::new(p, 4, marker_style)),
                )?;
            }
        }
        Mark::Arrow { tip, color } => {
            let style = to_color(*color).stroke_width(1);
            draw_segment(chart, view, (0.0, 0.0), *tip, style)?;
            if view.contains(tip.0, tip.1) {
                if let Some(head) = arrow_head(view, *tip) {
                    chart.draw_series(std::iter::once(Polygon::new(head, to_color(*color).filled())))?;
                }
            }
        }
        Mark::Segment { from, to, color, alpha } => {
            let style = to_color(*color).mix(checked_alpha(*alpha)).stroke_width(1);
            draw_segment(chart, view, *from, *to, style)?;
        }
        Mark::Circle { center, radius, edge } => {
            let style = to_color(*edge).stroke_width(1);
            let outline: Vec<Point> = (0..=CIRCLE_RESOLUTION)
                .map(|i| {
                    let theta = 2.0 * std::f64::consts::PI * i as f64 / CIRCLE_RESOLUTION as f64;
                    (center.0 + radius * theta.cos(), center.1 + radius * theta.sin())
                })
                .collect();
            for pair in outline.windows(2) {
                draw_segment(chart, view, pair[0], pair[1], style)?;
            }
        }
        Mark::Scatter { points, color, alpha, label, .. } => {
            let rgb = to_color(*color);
            let style = rgb.mix(checked_alpha(*alpha)).filled();
            let anno = chart.draw_series(
                points
                    .iter()
                    .filter(|&&(x, y)| view.contains(x, y))
                    .map(|&p| Circle::new(p, 3, style)),
            )?;
            if let Some(label) = label {
                anno.label(label.as_str())
                    .legend(move |(x, y)| Circle::new((x, y), 3, rgb.filled()));
            }
        }
        Mark::Text { at, text, font_size, h_align, v_align, rotation, color, alpha } => {
            if view.contains(at.0, at.1) {
                let text_color = to_color(*color).mix(checked_alpha(*alpha));
                let style = (FONT, *font_size as f64)
                    .into_font()
                    .transform(font_transform(*rotation))
                    .color(&text_color)
                    .pos(anchor(*h_align, *v_align));
                chart.draw_series(std::iter::once(Text::new(text.clone(), *at, style)))?;
            }
        }
    }
    Ok(())
}

/// Triangle at `tip` pointing away from the origin.
fn arrow_head(view: &Bounds, tip: Point) -> Option<Vec<Point>> {
    let width = view.xmax - view.xmin;
    let height = view.ymax - view.ymin;
    let (nx, ny) = (tip.0 / width, tip.1 / height);
    let norm = (nx * nx + ny * ny).sqrt();
    if norm <= f64::EPSILON {
        return None;
    }
    let (ux, uy) = (nx / norm, ny / norm);
    let length = ARROW_HEAD_LENGTH.min(norm);
    let (bx, by) = (nx - ux * length, ny - uy * length);
    let (px, py) = (-uy * ARROW_HEAD_HALF_WIDTH, ux * ARROW_HEAD_HALF_WIDTH);
    let back = |x: f64, y: f64| (x * width, y * height);
    Some(vec![tip, back(bx + px, by + py), back(bx - px, by - py)])
}

fn draw_legend<'a, 'b: 'a>(chart: &mut SvgChart<'a, 'b>, legend: Legend) -> Result<(), PlotError> {
    let position = match legend.position {
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    };
    chart
        .configure_series_labels()
        .position(position)
        .label_font((FONT, legend.font_size as f64))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}
