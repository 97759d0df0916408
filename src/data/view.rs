//! Terminal rendering of sample inputs as grids of filled/empty cells.

use crate::data::sample::Sample;

pub const DEFAULT_GRID_WIDTH: usize = 10;

const FILLED: &str = "[]";
const EMPTY: &str = "  ";

/// Renders `values` as rows of `width` cells, last row of the input first.
pub fn render_grid(values: &[f64], width: usize) -> String {
    let width = width.max(1);
    let starts: Vec<usize> = (0..values.len()).step_by(width).collect();

    let mut out = String::new();
    for &start in starts.iter().rev() {
        let end = (start + width).min(values.len());
        for &x in &values[start..end] {
            out.push_str(if x == 1.0 { FILLED } else { EMPTY });
        }
        out.push('\n');
    }
    out
}

pub fn render_sample(index: usize, sample: &Sample, width: usize) -> String {
    let values: Vec<f64> = sample.input().iter().copied().collect();
    format!(
        "Case {}\n{}Label: {}",
        index,
        render_grid(&values, width),
        sample.label()
    )
}
