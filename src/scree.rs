// Scree plot: explained variance per component with its cumulative curve

use ndarray::ArrayView1;

use crate::axes::percent_text;
use crate::config::PlotConfig;
use crate::figure::{Bounds, Figure, FigureKind, HAlign, Mark, Rgb, Ticks, VAlign};

const BAR_WIDTH: f64 = 0.8;

/// Ratios converted to percentages, one per component.
pub fn percentages(ratios: ArrayView1<f64>) -> Vec<f64> {
    ratios.iter().map(|r| r * 100.0).collect()
}

/// Running sum of `percentages`.
pub fn cumulative(percentages: &[f64]) -> Vec<f64> {
    percentages
        .iter()
        .scan(0.0, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect()
}

/// Lays out the scree plot ("inertia loss") for the given explained-variance ratios.
///
/// One bar per component at x = 1..=n, each annotated with its percentage,
/// overlaid with the cumulative percentage curve. An empty ratio vector
/// yields an empty chart.
pub fn scree_plot(ratios: ArrayView1<f64>, config: &PlotConfig) -> Figure {
    let scree = percentages(ratios);
    let cumsum = cumulative(&scree);
    let n = scree.len();

    let top = scree
        .iter()
        .chain(cumsum.iter())
        .fold(0.0_f64, |acc, &v| acc.max(v));
    let view = Bounds::new(-0.5, n as f64 + 0.5, 0.0, (top * 1.05).max(1.0));

    let mut figure = Figure::new(FigureKind::Scree, config.scree_size, view);
    figure.title = "inertia loss".to_string();
    figure.x_label = "principal components".to_string();
    figure.y_label = "percentage of inertia".to_string();
    figure.x_ticks = Ticks::At((0..=n).map(|i| i as f64).collect());
    figure.tick_length = 0;

    for (i, &height) in scree.iter().enumerate() {
        figure.marks.push(Mark::Bar {
            x: (i + 1) as f64,
            width: BAR_WIDTH,
            height,
            color: config.bar_color,
        });
    }

    figure.marks.push(Mark::Line {
        points: cumsum
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as f64, c))
            .collect(),
        color: config.cumulative_color,
        dashed: false,
        markers: true,
    });

    for (i, ratio) in ratios.iter().enumerate() {
        figure.marks.push(Mark::Text {
            at: ((i + 1) as f64, scree[i]),
            text: percent_text(*ratio),
            font_size: config.bar_label_font_size,
            h_align: HAlign::Center,
            v_align: VAlign::Bottom,
            rotation: 0.0,
            color: Rgb::BLACK,
            alpha: 1.0,
        });
    }

    log::debug!("Laid out scree plot with {} components.", n);
    figure
}
