// src/layout_tests.rs
#![cfg(test)]
use crate::axes::{component_label, drawable_planes, percent_text};
use crate::circles::{circle_bounds, correlation_circles, CircleOptions, ARROW_VARIABLE_LIMIT};
use crate::config::PlotConfig;
use crate::figure::{Bounds, FigureKind, HAlign, LegendPosition, Mark, Ticks, VAlign};
use crate::planes::{best_legend_position, factorial_planes, group_by_category, plane_bounds, PlaneOptions};
use crate::scree::{cumulative, percentages, scree_plot};

use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_loadings(n_components: usize, n_variables: usize, seed: u64) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_fn((n_components, n_variables), |_| rng.gen_range(-1.0..=1.0))
}

fn names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}

#[cfg(test)]
mod axes_tests {
    use super::*;

    #[test]
    fn test_component_label_uses_one_based_index_and_one_decimal() {
        let ratios = array![0.4231, 0.25];
        assert_eq!(component_label(0, ratios.view()), "F1 (42.3%)");
        assert_eq!(component_label(1, ratios.view()), "F2 (25.0%)");
    }

    #[test]
    fn test_percent_text() {
        assert_eq!(percent_text(0.5), "50.0");
        assert_eq!(percent_text(0.0), "0.0");
        assert_eq!(percent_text(0.12345), "12.3");
    }

    #[test]
    fn test_drawable_planes_filters_on_second_axis_and_keeps_order() {
        let ranks = [(0, 1), (2, 3), (4, 5), (0, 2)];
        let kept: Vec<_> = drawable_planes(&ranks, 4).collect();
        assert_eq!(kept, vec![(0, 1), (2, 3), (0, 2)]);

        let none: Vec<_> = drawable_planes(&ranks, 1).collect();
        assert!(none.is_empty());
    }
}

#[cfg(test)]
mod scree_tests {
    use super::*;

    #[test]
    fn test_percentages_and_cumulative() {
        let ratios = array![0.5, 0.3, 0.2];
        let pct = percentages(ratios.view());
        let cum = cumulative(&pct);
        for (got, want) in pct.iter().zip([50.0, 30.0, 20.0]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
        }
        for (got, want) in cum.iter().zip([50.0, 80.0, 100.0]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_scree_plot_layout() {
        let ratios = array![0.5, 0.3, 0.2];
        let figure = scree_plot(ratios.view(), &PlotConfig::default());

        assert_eq!(figure.kind, FigureKind::Scree);
        assert_eq!(figure.title, "inertia loss");
        assert_eq!(figure.x_label, "principal components");
        assert_eq!(figure.y_label, "percentage of inertia");
        assert_eq!(figure.tick_length, 0);
        assert_eq!(figure.x_ticks, Ticks::At(vec![0.0, 1.0, 2.0, 3.0]));

        let bars: Vec<(f64, f64)> = figure
            .bars()
            .map(|m| match m {
                Mark::Bar { x, height, .. } => (*x, *height),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(bars.len(), 3);
        for ((x, h), (want_x, want_h)) in bars.iter().zip([(1.0, 50.0), (2.0, 30.0), (3.0, 20.0)]) {
            assert_abs_diff_eq!(*x, want_x);
            assert_abs_diff_eq!(*h, want_h, epsilon = 1e-9);
        }

        let cumulative_line = figure
            .marks
            .iter()
            .find_map(|m| match m {
                Mark::Line { points, markers: true, color, .. } => Some((points.clone(), *color)),
                _ => None,
            })
            .expect("cumulative line is missing");
        assert_eq!(cumulative_line.1, PlotConfig::default().cumulative_color);
        let ys: Vec<f64> = cumulative_line.0.iter().map(|p| p.1).collect();
        assert_abs_diff_eq!(ys[2], 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ys[1], 80.0, epsilon = 1e-9);

        assert_eq!(figure.texts(), vec!["50.0", "30.0", "20.0"]);
        assert!(figure.view.ymax >= 100.0);
    }

    #[test]
    fn test_bar_annotations_sit_on_top_of_bars() {
        let figure = scree_plot(array![0.7, 0.3].view(), &PlotConfig::default());
        for mark in &figure.marks {
            if let Mark::Text { at, h_align, v_align, .. } = mark {
                assert_eq!(*h_align, HAlign::Center);
                assert_eq!(*v_align, VAlign::Bottom);
                assert!(at.1 > 0.0);
            }
        }
    }

    #[test]
    fn test_scree_plot_with_no_components() {
        let figure = scree_plot(Array1::<f64>::zeros(0).view(), &PlotConfig::default());
        assert_eq!(figure.bars().count(), 0);
        assert!(figure.texts().is_empty());
        assert_eq!(figure.x_ticks, Ticks::At(vec![0.0]));
        assert!(figure.view.ymax > figure.view.ymin);
    }
}

#[cfg(test)]
mod circle_tests {
    use super::*;

    #[test]
    fn test_arrows_below_limit() {
        let pcs = random_loadings(3, 5, 1);
        let figures = correlation_circles(
            pcs.view(),
            3,
            array![0.5, 0.3, 0.2].view(),
            &[(0, 1)],
            &CircleOptions::default(),
            &PlotConfig::default(),
        );
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].arrows().count(), 5);
        assert_eq!(figures[0].segments().count(), 0);
        assert_eq!(figures[0].view, Bounds::new(-1.0, 1.0, -1.0, 1.0));
    }

    #[test]
    fn test_segments_from_limit_on() {
        for n_variables in [ARROW_VARIABLE_LIMIT, 35] {
            let pcs = random_loadings(2, n_variables, 2);
            let figures = correlation_circles(
                pcs.view(),
                2,
                array![0.6, 0.4].view(),
                &[(0, 1)],
                &CircleOptions::default(),
                &PlotConfig::default(),
            );
            let figure = &figures[0];
            assert_eq!(figure.arrows().count(), 0);
            assert_eq!(figure.segments().count(), n_variables);
            for mark in figure.segments() {
                if let Mark::Segment { from, alpha, .. } = mark {
                    assert_eq!(*from, (0.0, 0.0));
                    assert_abs_diff_eq!(*alpha, 0.7);
                }
            }
        }
        let just_below = random_loadings(2, ARROW_VARIABLE_LIMIT - 1, 3);
        let figures = correlation_circles(
            just_below.view(),
            2,
            array![0.6, 0.4].view(),
            &[(0, 1)],
            &CircleOptions::default(),
            &PlotConfig::default(),
        );
        let figure = &figures[0];
        assert_eq!(figure.arrows().count(), ARROW_VARIABLE_LIMIT - 1);
    }

    #[test]
    fn test_bounds_follow_loadings_extent_for_many_variables() {
        let mut pcs = Array2::zeros((2, 32));
        pcs[[0, 3]] = -0.4;
        pcs[[0, 7]] = 0.9;
        pcs[[1, 1]] = -0.8;
        pcs[[1, 30]] = 0.2;
        let bounds = circle_bounds(pcs.row(0), pcs.row(1), None);
        assert_eq!(bounds, Bounds::new(-0.4, 0.9, -0.8, 0.2));
    }

    #[test]
    fn test_explicit_lims_are_used_verbatim() {
        let lims = Bounds::new(-0.3, 0.7, -0.2, 0.5);
        for n_variables in [4, 40] {
            let pcs = random_loadings(2, n_variables, 4);
            assert_eq!(circle_bounds(pcs.row(0), pcs.row(1), Some(lims)), lims);
            let options = CircleOptions { lims: Some(lims), ..Default::default() };
            let figures = correlation_circles(
                pcs.view(),
                2,
                array![0.6, 0.4].view(),
                &[(0, 1)],
                &options,
                &PlotConfig::default(),
            );
            let figure = &figures[0];
            assert_eq!(figure.view, lims);
        }
    }

    #[test]
    fn test_labels_only_inside_bounds_inclusive() {
        let pcs = array![[0.5, 1.0, 0.2, -0.1], [0.5, 0.0, 0.9, 0.1]];
        let labels = names("v", 4);
        let options = CircleOptions {
            labels: Some(labels.as_slice()),
            label_rotation: 45.0,
            lims: Some(Bounds::new(-0.5, 1.0, -0.5, 0.5)),
        };
        let figures = correlation_circles(
            pcs.view(),
            2,
            array![0.6, 0.4].view(),
            &[(0, 1)],
            &options,
            &PlotConfig::default(),
        );
        let figure = &figures[0];
        // v1 sits exactly on xmax, v2 is above ymax.
        assert_eq!(figure.texts(), vec!["v0", "v1", "v3"]);
        // Every vector is drawn even when its label is not.
        assert_eq!(figure.arrows().count(), 4);
        for mark in &figure.marks {
            if let Mark::Text { rotation, color, alpha, h_align, v_align, .. } = mark {
                assert_abs_diff_eq!(*rotation, 45.0);
                assert_eq!(*color, PlotConfig::default().circle_label_color);
                assert_abs_diff_eq!(*alpha, 1.0);
                assert_eq!((*h_align, *v_align), (HAlign::Center, VAlign::Center));
            }
        }
    }

    #[test]
    fn test_circle_decorations_and_captions() {
        let pcs = random_loadings(3, 6, 5);
        let figures = correlation_circles(
            pcs.view(),
            3,
            array![0.4231, 0.3, 0.2].view(),
            &[(0, 2)],
            &CircleOptions::default(),
            &PlotConfig::default(),
        );
        let figure = &figures[0];
        assert_eq!(figure.kind, FigureKind::CorrelationCircle { d1: 0, d2: 2 });
        assert_eq!(figure.x_label, "F1 (42.3%)");
        assert_eq!(figure.y_label, "F3 (20.0%)");
        assert_eq!(figure.title, "correlation circle (F1 and F3)");
        assert_eq!(figure.x_ticks, Ticks::Hidden);
        assert_eq!(figure.y_ticks, Ticks::Hidden);
        assert_eq!(figure.size, (600, 600));
        assert!(figure.marks.contains(&Mark::Circle {
            center: (0.0, 0.0),
            radius: 1.0,
            edge: PlotConfig::default().circle_edge_color,
        }));
        let dashed: Vec<&Vec<(f64, f64)>> = figure
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Line { points, dashed: true, .. } => Some(points),
                _ => None,
            })
            .collect();
        assert_eq!(dashed, vec![&vec![(-1.0, 0.0), (1.0, 0.0)], &vec![(0.0, -1.0), (0.0, 1.0)]]);
    }

    #[test]
    fn test_one_figure_per_qualifying_pair() {
        let pcs = random_loadings(6, 8, 6);
        let ratios = array![0.3, 0.2, 0.15, 0.1, 0.1, 0.05];
        let figures = correlation_circles(
            pcs.view(),
            4,
            ratios.view(),
            &[(0, 1), (2, 3), (4, 5)],
            &CircleOptions::default(),
            &PlotConfig::default(),
        );
        let kinds: Vec<FigureKind> = figures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FigureKind::CorrelationCircle { d1: 0, d2: 1 },
                FigureKind::CorrelationCircle { d1: 2, d2: 3 },
            ]
        );
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_component_fails_fast() {
        let pcs = random_loadings(2, 4, 7);
        correlation_circles(
            pcs.view(),
            5,
            array![0.6, 0.4].view(),
            &[(0, 3)],
            &CircleOptions::default(),
            &PlotConfig::default(),
        );
    }
}

#[cfg(test)]
mod plane_tests {
    use super::*;

    #[test]
    fn test_group_by_category_is_sorted_and_partitions_indices() {
        let categories = ["b", "a", "c", "a"];
        let groups = group_by_category(&categories);
        let flattened: Vec<(&str, Vec<usize>)> = groups.iter().map(|(k, v)| (**k, v.clone())).collect();
        assert_eq!(
            flattened,
            vec![("a", vec![1, 3]), ("b", vec![0]), ("c", vec![2])]
        );
    }

    #[test]
    fn test_illustrative_variable_yields_one_series_per_category() {
        let projected = array![[1.0, 2.0], [-1.0, 0.5], [0.3, -0.7], [2.0, 1.0]];
        let categories = ["a", "b", "a", "c"];
        let options = PlaneOptions {
            illustrative: Some(&categories[..]),
            alpha: 0.5,
            ..Default::default()
        };
        let figures = factorial_planes(
            projected.view(),
            2,
            array![0.6, 0.4].view(),
            &[(0, 1)],
            &options,
            &PlotConfig::default(),
        );
        let figure = &figures[0];

        let series: Vec<(Option<String>, Vec<usize>, Vec<(f64, f64)>)> = figure
            .scatters()
            .map(|m| match m {
                Mark::Scatter { label, indices, points, alpha, .. } => {
                    assert_abs_diff_eq!(*alpha, 0.5);
                    (label.clone(), indices.clone(), points.clone())
                }
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].0.as_deref(), Some("a"));
        assert_eq!(series[0].1, vec![0, 2]);
        assert_eq!(series[0].2, vec![(1.0, 2.0), (0.3, -0.7)]);
        assert_eq!(series[1].1, vec![1]);
        assert_eq!(series[2].1, vec![3]);

        let mut all: Vec<usize> = series.iter().flat_map(|s| s.1.iter().copied()).collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3]);

        let legend = figure.legend.expect("grouped planes carry a legend");
        assert_eq!(legend.font_size, PlotConfig::default().legend_font_size);
    }

    #[test]
    fn test_single_series_without_illustrative_variable() {
        let projected = array![[1.0, 2.0, 0.0], [-1.0, 0.5, 0.0]];
        let options: PlaneOptions = PlaneOptions::default();
        let figures = factorial_planes(
            projected.view(),
            3,
            array![0.6, 0.3, 0.1].view(),
            &[(0, 1)],
            &options,
            &PlotConfig::default(),
        );
        let figure = &figures[0];
        assert_eq!(figure.scatters().count(), 1);
        assert!(figure.legend.is_none());
        match figure.scatters().next() {
            Some(Mark::Scatter { label, indices, alpha, .. }) => {
                assert!(label.is_none());
                assert_eq!(indices, &vec![0, 1]);
                assert_abs_diff_eq!(*alpha, 1.0);
            }
            other => panic!("unexpected mark {:?}", other),
        };
    }

    #[test]
    fn test_computed_bounds_are_symmetric_and_padded() {
        let projected = array![[1.0, -3.0, 100.0], [-2.0, 0.5, 100.0]];
        let (view, window) = plane_bounds(projected.column(0), projected.column(1), None);
        assert_abs_diff_eq!(view.xmax, 3.3, epsilon = 1e-12);
        assert_abs_diff_eq!(view.xmin, -3.3, epsilon = 1e-12);
        assert_abs_diff_eq!(view.ymin, -3.3, epsilon = 1e-12);
        assert_abs_diff_eq!(view.ymax, 3.3, epsilon = 1e-12);
        assert_eq!(view, window);
    }

    #[test]
    fn test_explicit_lims_are_padded_for_view_only() {
        let projected = array![[1.0, -3.0], [-2.0, 0.5]];
        let lims = Bounds::new(-2.0, 1.0, -3.0, 0.5);
        let (view, window) = plane_bounds(projected.column(0), projected.column(1), Some(lims));
        assert_eq!(window, lims);
        assert_abs_diff_eq!(view.xmin, -2.2, epsilon = 1e-12);
        assert_abs_diff_eq!(view.xmax, 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(view.ymin, -3.3, epsilon = 1e-12);
        assert_abs_diff_eq!(view.ymax, 0.55, epsilon = 1e-12);
    }

    #[test]
    fn test_point_labels_respect_window_inclusively() {
        let projected = array![[1.0, 1.0], [2.0, 0.0], [2.1, 0.0], [0.0, -1.0]];
        let labels = names("obs", 4);
        let options: PlaneOptions = PlaneOptions {
            labels: Some(labels.as_slice()),
            lims: Some(Bounds::new(-2.0, 2.0, -1.0, 1.0)),
            ..Default::default()
        };
        let figures = factorial_planes(
            projected.view(),
            2,
            array![0.6, 0.4].view(),
            &[(0, 1)],
            &options,
            &PlotConfig::default(),
        );
        let figure = &figures[0];
        // obs1 sits on xmax and obs3 on ymin; obs2 is only inside the padded view.
        assert_eq!(figure.texts(), vec!["obs0", "obs1", "obs3"]);
        for mark in &figure.marks {
            if let Mark::Text { h_align, v_align, font_size, .. } = mark {
                assert_eq!((*h_align, *v_align), (HAlign::Center, VAlign::Bottom));
                assert_eq!(*font_size, 10);
            }
        }
    }

    #[test]
    fn test_reference_lines_and_captions() {
        let projected = array![[0.1, 0.2, 0.3], [0.3, 0.1, -0.2]];
        let options: PlaneOptions = PlaneOptions::default();
        let figures = factorial_planes(
            projected.view(),
            3,
            array![0.4231, 0.35, 0.2].view(),
            &[(0, 1), (1, 2), (2, 3)],
            &options,
            &PlotConfig::default(),
        );
        assert_eq!(figures.len(), 2);
        let figure = &figures[1];
        assert_eq!(figure.kind, FigureKind::FactorialPlane { d1: 1, d2: 2 });
        assert_eq!(figure.x_label, "F2 (35.0%)");
        assert_eq!(figure.y_label, "F3 (20.0%)");
        assert_eq!(figure.title, "projection of observations (on F2 and F3)");
        assert_eq!(figure.size, (1000, 1000));
        assert_eq!(figures[0].x_label, "F1 (42.3%)");
        assert!(figure.marks.iter().any(|m| matches!(
            m,
            Mark::Line { points, dashed: true, .. } if points == &vec![(-100.0, 0.0), (100.0, 0.0)]
        )));
        assert!(figure.marks.iter().any(|m| matches!(
            m,
            Mark::Line { points, dashed: true, .. } if points == &vec![(0.0, -100.0), (0.0, 100.0)]
        )));
    }

    #[test]
    fn test_series_colors_cycle_through_palette() {
        let config = PlotConfig::default();
        let n = config.palette.len();
        let projected = Array2::from_shape_fn((n + 2, 2), |(i, j)| (i + j) as f64);
        let categories: Vec<usize> = (0..n + 2).collect();
        let options = PlaneOptions { illustrative: Some(&categories[..]), ..Default::default() };
        let figures = factorial_planes(projected.view(), 2, array![0.6, 0.4].view(), &[(0, 1)], &options, &config);
        let figure = &figures[0];
        let colors: Vec<_> = figure
            .scatters()
            .map(|m| match m {
                Mark::Scatter { color, .. } => *color,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors.len(), n + 2);
        assert_eq!(colors[n], colors[0]);
        assert_eq!(colors[n + 1], colors[1]);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn test_best_legend_position_avoids_crowded_corners() {
        let view = Bounds::symmetric(1.0);
        // Three points upper-right, one in every other quadrant: the first tie wins.
        let crowded_upper_right = vec![(0.5, 0.5), (0.6, 0.7), (0.2, 0.9), (-0.5, 0.5), (-0.5, -0.5), (0.5, -0.5)];
        assert_eq!(
            best_legend_position(&view, crowded_upper_right.into_iter()),
            LegendPosition::UpperLeft
        );
        let everywhere_but_lower_right = vec![(0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5)];
        assert_eq!(
            best_legend_position(&view, everywhere_but_lower_right.into_iter()),
            LegendPosition::LowerRight
        );
        assert_eq!(
            best_legend_position(&view, std::iter::empty()),
            LegendPosition::UpperRight
        );
    }

}
