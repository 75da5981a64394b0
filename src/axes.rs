// Axis-pair selection and axis text shared by the plane plots

use ndarray::ArrayView1;

/// Zero-based component indices `(d1, d2)` spanning a factorial plane.
pub type AxisPair = (usize, usize);

/// Pairs that will actually be drawn: those with `d2 < n_comp`, in caller order.
///
/// Callers may pass more pairs than they intend to render; the rest are
/// skipped without error.
pub fn drawable_planes(
    axis_ranks: &[AxisPair],
    n_comp: usize,
) -> impl Iterator<Item = AxisPair> + '_ {
    axis_ranks.iter().copied().filter(move |&(d1, d2)| {
        let keep = d2 < n_comp;
        if !keep {
            log::trace!("Skipping plane (F{}, F{}): n_comp is {}.", d1 + 1, d2 + 1, n_comp);
        }
        keep
    })
}

/// Percentage with one decimal, e.g. `0.4231` -> `"42.3"`.
pub fn percent_text(ratio: f64) -> String {
    format!("{:.1}", ratio * 100.0)
}

/// Axis caption such as `"F1 (42.3%)"` for component `d` (zero-based).
pub fn component_label(d: usize, ratios: ArrayView1<f64>) -> String {
    format!("F{} ({}%)", d + 1, percent_text(ratios[d]))
}
