// Diagnostic plots for principal component analysis (PCA)

#![doc = include_str!("../README.md")]

pub mod axes;
pub mod circles;
pub mod config;
pub mod figure;
pub mod model;
pub mod planes;
pub mod render;
pub mod scree;
pub mod sink;

#[cfg(test)]
mod layout_tests;

use std::error::Error;
use std::fmt::Display;

use ndarray::ArrayView2;

pub use axes::AxisPair;
pub use circles::{CircleOptions, ARROW_VARIABLE_LIMIT};
pub use config::PlotConfig;
pub use figure::{Bounds, Figure, FigureKind, Lims, Mark, Rgb};
pub use model::{ExplainedVarianceRatio, PcaSummary};
pub use planes::{PlaneOptions, PLANE_MARGIN, PLANE_REFERENCE_SPAN};
pub use sink::{FigureSink, SvgCollector, SvgDirectory};

/// Error type returned by every fallible operation of this crate.
pub type PlotError = Box<dyn Error + Send + Sync + 'static>;

/// Draws the PCA diagnostic plots and hands each figure to a sink.
///
/// Every call lays out its figures one at a time and presents each as soon
/// as it is ready, so a failure part-way leaves the earlier figures in the
/// sink. No state is shared between calls besides the sink itself.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use pca_plots::{Figure, PcaPlotter, PcaSummary, PlotConfig};
///
/// let model = PcaSummary::from_ratios(array![0.5, 0.3, 0.2]);
/// let mut plotter = PcaPlotter::new(Vec::<Figure>::new(), PlotConfig::default());
/// plotter.scree_plot(&model).unwrap();
/// assert_eq!(plotter.sink().len(), 1);
/// ```
#[derive(Debug)]
pub struct PcaPlotter<S: FigureSink> {
    sink: S,
    config: PlotConfig,
}

impl<S: FigureSink> PcaPlotter<S> {
    pub fn new(sink: S, config: PlotConfig) -> Self {
        Self { sink, config }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Draws the scree plot of `model`. Returns the number of figures presented (always 1).
    ///
    /// # Errors
    /// Returns an error if the sink fails to present the figure.
    pub fn scree_plot<M: ExplainedVarianceRatio + ?Sized>(&mut self, model: &M) -> Result<usize, PlotError> {
        let figure = scree::scree_plot(model.explained_variance_ratio(), &self.config);
        self.sink.present(&figure)?;
        Ok(1)
    }

    /// Draws one correlation circle per pair in `axis_ranks` with `d2 < n_comp`.
    ///
    /// * `pcs` - Loadings, shape (n_components, n_variables).
    ///
    /// Returns the number of figures presented.
    ///
    /// # Errors
    /// Returns an error if the sink fails to present a figure; figures
    /// presented before the failure are kept.
    pub fn correlation_circles<M: ExplainedVarianceRatio + ?Sized>(
        &mut self,
        pcs: ArrayView2<f64>,
        n_comp: usize,
        model: &M,
        axis_ranks: &[AxisPair],
        options: &CircleOptions,
    ) -> Result<usize, PlotError> {
        let ratios = model.explained_variance_ratio();
        let mut presented = 0;
        for (d1, d2) in axes::drawable_planes(axis_ranks, n_comp) {
            let figure = circles::correlation_circle(pcs, ratios, d1, d2, options, &self.config);
            self.sink.present(&figure)?;
            presented += 1;
        }
        log::info!("Presented {} correlation circle(s).", presented);
        Ok(presented)
    }

    /// Draws one factorial plane per pair in `axis_ranks` with `d2 < n_comp`.
    ///
    /// * `x_projected` - Projected observations, shape (n_observations, n_components).
    ///
    /// Returns the number of figures presented.
    ///
    /// # Errors
    /// Returns an error if the sink fails to present a figure; figures
    /// presented before the failure are kept.
    pub fn factorial_planes<M: ExplainedVarianceRatio + ?Sized, T: Ord + Display>(
        &mut self,
        x_projected: ArrayView2<f64>,
        n_comp: usize,
        model: &M,
        axis_ranks: &[AxisPair],
        options: &PlaneOptions<T>,
    ) -> Result<usize, PlotError> {
        let ratios = model.explained_variance_ratio();
        let mut presented = 0;
        for (d1, d2) in axes::drawable_planes(axis_ranks, n_comp) {
            let figure = planes::factorial_plane(x_projected, ratios, d1, d2, options, &self.config);
            self.sink.present(&figure)?;
            presented += 1;
        }
        log::info!("Presented {} factorial plane(s).", presented);
        Ok(presented)
    }
}
