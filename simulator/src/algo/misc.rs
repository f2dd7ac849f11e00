//! Small numerical helpers for working with sampled spectral curves.
//!
//! - **Linear interpolation**: strict (errors outside the table) and
//!   zero-extrapolating variants
//! - **Grid statistics**: median of a sample and median grid spacing

use thiserror::Error;

/// Errors that can occur during interpolation and grid operations.
#[derive(Error, Debug, PartialEq)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least 2 points")]
    InsufficientData,
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be sorted in ascending order")]
    UnsortedData,
}

/// Check that a table is usable for interpolation: equal lengths, at least
/// two points, strictly ascending finite x values.
pub fn validate_table(xs: &[f64], ys: &[f64]) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }

    if xs.len() < 2 {
        return Err(InterpError::InsufficientData);
    }

    if xs.iter().any(|x| !x.is_finite()) || xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(InterpError::UnsortedData);
    }

    Ok(())
}

// Index of the left edge of the interval containing x; xs must be validated
// and x must lie inside [xs[0], xs[n-1]].
fn bracket(x: f64, xs: &[f64]) -> Result<usize, usize> {
    xs.binary_search_by(|probe| probe.total_cmp(&x))
        .map_err(|insert_idx| insert_idx - 1)
}

fn lerp_at(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    match bracket(x, xs) {
        Ok(exact_idx) => ys[exact_idx],
        Err(i1) => {
            let i2 = i1 + 1;
            let t = (x - xs[i1]) / (xs[i2] - xs[i1]);
            ys[i1] + t * (ys[i2] - ys[i1])
        }
    }
}

/// Performs linear interpolation on 1D data using binary search.
///
/// # Arguments
///
/// * `x` - The x-coordinate at which to interpolate
/// * `xs` - Array of x-coordinates (must be sorted in ascending order)
/// * `ys` - Array of corresponding y-values (must match length of xs)
///
/// # Errors
///
/// * `InterpError::OutOfBounds` - x is outside the range \\[xs\\[0\\], xs\\[n-1\\]\\]
/// * `InterpError::InsufficientData` - Less than 2 data points provided
/// * `InterpError::MismatchedLengths` - xs and ys have different lengths
/// * `InterpError::UnsortedData` - xs array is not sorted in ascending order
///
/// # Examples
///
/// ```rust
/// use exposure_sim::algo::misc::interp;
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
/// assert_eq!(interp(1.5, &xs, &ys).unwrap(), 2.5);
/// ```
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    validate_table(xs, ys)?;

    let min_x = xs[0];
    let max_x = xs[xs.len() - 1];

    if !(min_x..=max_x).contains(&x) {
        return Err(InterpError::OutOfBounds(x, min_x, max_x));
    }

    Ok(lerp_at(x, xs, ys))
}

/// Linear interpolation that evaluates to 0.0 outside the table.
///
/// This is the boundary policy for transmission curves: no light passes
/// where the curve is undefined. The table is assumed to be validated by
/// its owner (see [`validate_table`]).
pub fn interp_or_zero(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert!(validate_table(xs, ys).is_ok());

    if xs.is_empty() || !(xs[0]..=xs[xs.len() - 1]).contains(&x) {
        return 0.0;
    }

    lerp_at(x, xs, ys)
}

/// Median of a sample (mean of the two central values for even lengths).
///
/// Returns `None` for an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median spacing between consecutive grid points.
///
/// Returns `None` when the grid has fewer than two points.
pub fn median_spacing(grid: &[f64]) -> Option<f64> {
    let diffs: Vec<f64> = grid.windows(2).map(|w| w[1] - w[0]).collect();
    median(&diffs)
}
