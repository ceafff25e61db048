use image::imageops::FilterType;
use image::DynamicImage;

/// Resampling kernel for every square variant.
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Scale `image` to exactly `side × side`, ignoring its aspect ratio.
///
/// Callers pass the square crop so no distortion happens in practice.
pub fn resize_square(image: &DynamicImage, side: u32) -> DynamicImage {
    image.resize_exact(side, side, RESIZE_FILTER)
}
