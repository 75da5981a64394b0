// Summary of a PCA model fitted elsewhere

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::PlotError;

/// Anything that can report the explained-variance ratio of its components.
///
/// Ratios are fractions (not percentages), one per component, ordered by
/// decreasing variance.
pub trait ExplainedVarianceRatio {
    fn explained_variance_ratio(&self) -> ArrayView1<'_, f64>;
}

impl ExplainedVarianceRatio for Array1<f64> {
    fn explained_variance_ratio(&self) -> ArrayView1<'_, f64> {
        self.view()
    }
}

impl ExplainedVarianceRatio for Vec<f64> {
    fn explained_variance_ratio(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.as_slice())
    }
}

/// The parts of a fitted PCA model that the diagnostic plots consume.
///
/// Holds the explained-variance ratios and, optionally, the raw explained
/// variances (eigenvalues) and the component matrix. Summaries can be saved
/// to and loaded from files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PcaSummary {
    /// Fraction of total variance captured by each component.
    /// Shape: (k_components)
    explained_variance_ratio: Array1<f64>,
    /// Variance captured by each component.
    /// Shape: (k_components)
    explained_variance: Option<Array1<f64>>,
    /// Loadings, one row per component.
    /// Shape: (k_components, n_variables)
    components: Option<Array2<f64>>,
}

impl ExplainedVarianceRatio for PcaSummary {
    fn explained_variance_ratio(&self) -> ArrayView1<'_, f64> {
        self.explained_variance_ratio.view()
    }
}

impl PcaSummary {
    /// Wraps ratios that were computed by the fitting library.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use pca_plots::PcaSummary;
    ///
    /// let summary = PcaSummary::from_ratios(array![0.5, 0.3, 0.2]);
    /// assert_eq!(summary.n_components(), 3);
    /// ```
    pub fn from_ratios(explained_variance_ratio: Array1<f64>) -> Self {
        Self {
            explained_variance_ratio,
            explained_variance: None,
            components: None,
        }
    }

    /// Derives ratios from per-component variances and the total variance of the data.
    ///
    /// # Errors
    /// Returns an error if `total_variance` is not strictly positive and finite,
    /// or if any variance is negative or non-finite.
    pub fn from_explained_variance(
        explained_variance: Array1<f64>,
        total_variance: f64,
    ) -> Result<Self, PlotError> {
        if !total_variance.is_finite() || total_variance <= 0.0 {
            return Err(format!(
                "Total variance must be positive and finite, got {}.",
                total_variance
            )
            .into());
        }
        if explained_variance.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return Err("Explained variance contains negative or non-finite values.".into());
        }
        let explained_variance_ratio = explained_variance.mapv(|v| v / total_variance);
        Ok(Self {
            explained_variance_ratio,
            explained_variance: Some(explained_variance),
            components: None,
        })
    }

    /// Attaches the component matrix (one row per component).
    ///
    /// # Errors
    /// Returns an error if the number of rows differs from the number of ratios.
    pub fn with_components(mut self, components: Array2<f64>) -> Result<Self, PlotError> {
        if components.nrows() != self.explained_variance_ratio.len() {
            return Err(format!(
                "Component matrix has {} rows but the model has {} explained-variance ratios.",
                components.nrows(),
                self.explained_variance_ratio.len()
            )
            .into());
        }
        self.components = Some(components);
        Ok(self)
    }

    pub fn n_components(&self) -> usize {
        self.explained_variance_ratio.len()
    }

    pub fn explained_variance(&self) -> Option<&Array1<f64>> {
        self.explained_variance.as_ref()
    }

    /// Loadings usable as the `pcs` argument of the correlation circles.
    pub fn components(&self) -> Option<&Array2<f64>> {
        self.components.as_ref()
    }

    /// Saves the summary to a file using bincode.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or serialization fails.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), PlotError> {
        let file = File::create(path.as_ref())
            .map_err(|e| format!("Failed to create file at {:?}: {}", path.as_ref(), e))?;
        let mut writer = BufWriter::new(file);
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())
            .map_err(|e| format!("Failed to serialize PCA summary: {}", e))?;
        Ok(())
    }

    /// Loads a summary previously written by [`PcaSummary::save_model`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded, or if the
    /// decoded summary is inconsistent (length mismatches, negative or
    /// non-finite variances).
    pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Self, PlotError> {
        let file = File::open(path.as_ref())
            .map_err(|e| format!("Failed to open file at {:?}: {}", path.as_ref(), e))?;
        let mut reader = BufReader::new(file);
        let summary: PcaSummary =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
                .map_err(|e| format!("Failed to deserialize PCA summary: {}", e))?;
        summary.validate()?;
        Ok(summary)
    }

    fn validate(&self) -> Result<(), PlotError> {
        let k = self.explained_variance_ratio.len();
        if self
            .explained_variance_ratio
            .iter()
            .any(|&r| !r.is_finite() || r < 0.0)
        {
            return Err(
                "Loaded PCA summary has negative or non-finite explained-variance ratios.".into(),
            );
        }
        if let Some(ev) = self.explained_variance.as_ref() {
            if ev.len() != k {
                return Err(format!(
                    "Loaded PCA summary has {} explained variances but {} ratios.",
                    ev.len(),
                    k
                )
                .into());
            }
            if ev.iter().any(|&v| !v.is_finite() || v < 0.0) {
                return Err(
                    "Loaded PCA summary has negative or non-finite explained variances.".into(),
                );
            }
        }
        if let Some(components) = self.components.as_ref() {
            if components.nrows() != k {
                return Err(format!(
                    "Loaded PCA summary has {} component rows but {} ratios.",
                    components.nrows(),
                    k
                )
                .into());
            }
        }
        Ok(())
    }
}
