use ndarray::Array2;

use crate::error::SimError;

/// Normalized isotropic Gaussian kernel on a `size` x `size` pixel grid.
///
/// The kernel is centered on the geometric midpoint `(size - 1) / 2` of the
/// grid, so it is exactly symmetric under a 180° rotation for both odd and
/// even sizes. Values are normalized so the whole grid sums to 1; the part of
/// the Gaussian falling outside the grid is discarded rather than lost.
///
/// # Arguments
/// * `size` - Width and height of the grid in pixels
/// * `sigma_pix` - The standard deviation of the Gaussian PSF in pixels
///
/// # Examples
/// ```
/// use exposure_sim::image_proc::psf::gaussian_kernel;
///
/// let kernel = gaussian_kernel(21, 2.0).unwrap();
/// assert!((kernel.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn gaussian_kernel(size: usize, sigma_pix: f64) -> Result<Array2<f64>, SimError> {
    if size == 0 {
        return Err(SimError::invalid("Image size must be at least 1 pixel"));
    }
    if !sigma_pix.is_finite() || sigma_pix <= 0.0 {
        return Err(SimError::invalid(format!(
            "PSF width must be positive, got {sigma_pix} pixels"
        )));
    }

    let center = (size as f64 - 1.0) / 2.0;
    let c = sigma_pix * sigma_pix * 2.0;

    // Exponent relative to the pixel nearest the center, so the brightest
    // pixel is always exp(0) = 1 however narrow the PSF
    let nearest = center - center.floor();
    let nearest_squared = 2.0 * nearest * nearest;

    let mut kernel = Array2::from_shape_fn((size, size), |(y, x)| {
        let dx = x as f64 - center;
        let dy = y as f64 - center;
        let distance_squared = dx * dx + dy * dy;
        (-(distance_squared - nearest_squared) / c).exp()
    });

    let total = kernel.sum();
    kernel.mapv_inplace(|v| v / total);
    Ok(kernel)
}

/// Render a single unresolved point source at the center of a square image.
///
/// The Gaussian kernel is scaled so it sums to `total`, then each pixel is
/// truncated toward zero. The image sum therefore never exceeds `total` and
/// falls short of it by less than one count per pixel.
pub fn render_point_source(
    total: u64,
    sigma_pix: f64,
    size: usize,
) -> Result<Array2<u64>, SimError> {
    let kernel = gaussian_kernel(size, sigma_pix)?;
    let total = total as f64;
    Ok(kernel.mapv(|weight| (weight * total).floor() as u64))
}
