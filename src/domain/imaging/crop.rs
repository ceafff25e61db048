use image::{DynamicImage, GenericImageView};

/// Placement of the largest centered square inside a `width × height` canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareBounds {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// Compute the centered square for the given dimensions.
///
/// The longer axis is trimmed evenly on both ends; when the difference is odd
/// the extra pixel is dropped from the far end (offset rounds down).
pub fn square_bounds(width: u32, height: u32) -> SquareBounds {
    if height > width {
        SquareBounds {
            x: 0,
            y: (height - width) / 2,
            side: width,
        }
    } else if width > height {
        SquareBounds {
            x: (width - height) / 2,
            y: 0,
            side: height,
        }
    } else {
        SquareBounds {
            x: 0,
            y: 0,
            side: width,
        }
    }
}

/// Copy the centered square of `image` into a new buffer.
pub fn crop_square(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let bounds = square_bounds(width, height);
    image.crop_imm(bounds.x, bounds.y, bounds.side, bounds.side)
}
