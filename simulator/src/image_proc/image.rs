use std::path::Path;

use image::{ImageBuffer, Luma};
use log::info;
use ndarray::Array2;

use crate::error::SimError;

/// 16-bit grayscale image buffer
pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Converts an ndarray Array2<u64> of counts to a 16-bit grayscale image
///
/// Values are scaled linearly so the brightest pixel maps to `u16::MAX`. An
/// all-zero array produces an all-black image. Array indices [y, x] map to
/// pixel coordinates (x, y), so array dimensions are (height, width) while
/// image dimensions are (width, height).
///
/// # Arguments
/// * `arr` - Reference to an Array2<u64> of detector counts
///
/// # Returns
/// * A new 16-bit grayscale image with the same layout as the input array
pub fn array2_to_gray16_image(arr: &Array2<u64>) -> Gray16Image {
    let (height, width) = arr.dim();
    let max = arr.iter().copied().max().unwrap_or(0);
    let scale = if max == 0 {
        0.0
    } else {
        f64::from(u16::MAX) / max as f64
    };

    ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let value = arr[[y as usize, x as usize]] as f64 * scale;
        Luma([value.round().min(f64::from(u16::MAX)) as u16])
    })
}

/// Save a count image as a 16-bit grayscale PNG scaled to its maximum
pub fn save_png(arr: &Array2<u64>, path: &Path) -> Result<(), SimError> {
    let img = array2_to_gray16_image(arr);
    img.save_with_format(path, image::ImageFormat::Png)?;
    info!("Saved {}x{} image to {}", img.width(), img.height(), path.display());
    Ok(())
}
