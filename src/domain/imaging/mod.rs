//! Pure image transforms used by the variant pipeline.
//!
//! | Step   | Function / type |
//! |--------|-----------------|
//! | Crop   | [`crop::crop_square`], centered largest square, direct pixel copy |
//! | Resize | [`resize::resize_square`], `image::imageops` `Triangle` (bilinear) filter |
//! | Encode | [`encode::JpegVariantEncoder`], JPEG at quality 100 |

pub mod crop;
pub mod encode;
pub mod resize;

pub use crop::{crop_square, square_bounds, SquareBounds};
pub use encode::{EncodeError, EncodedImage, JpegVariantEncoder, VariantEncoder};
pub use resize::resize_square;
