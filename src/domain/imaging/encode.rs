use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use thiserror::Error;

pub const JPEG_QUALITY: u8 = 100;
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Unsupported(String),
}

/// Serialized variant ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

#[cfg_attr(test, mockall::automock)]
pub trait VariantEncoder: Send + Sync {
    fn encode(&self, image: &DynamicImage) -> Result<EncodedImage, EncodeError>;
}

/// Lossy JPEG encoder, quality fixed at 100 unless built otherwise.
#[derive(Debug, Clone, Copy)]
pub struct JpegVariantEncoder {
    quality: u8,
}

impl JpegVariantEncoder {
    pub fn new() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl Default for JpegVariantEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantEncoder for JpegVariantEncoder {
    fn encode(&self, image: &DynamicImage) -> Result<EncodedImage, EncodeError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(EncodeError::Unsupported(format!(
                "cannot encode a {}x{} image",
                image.width(),
                image.height()
            )));
        }

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, self.quality);
        match image.color() {
            ColorType::L8 | ColorType::Rgb8 => image.write_with_encoder(encoder)?,
            // JPEG has no alpha channel and only 8-bit samples.
            _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?,
        }

        Ok(EncodedImage {
            bytes,
            content_type: JPEG_CONTENT_TYPE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_encode_rgb_roundtrip_dimensions() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(80, 60, Rgb([1, 2, 3])));
        let encoded = JpegVariantEncoder::new().encode(&image).unwrap();

        assert_eq!(encoded.content_type, "image/jpeg");
        assert_eq!(&encoded.bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (80, 60));
    }

    #[test]
    fn test_encode_flattens_alpha() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([9, 9, 9, 128])));
        let encoded = JpegVariantEncoder::new().encode(&image).unwrap();
        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
    }

    #[test]
    fn test_encode_rejects_empty_image() {
        let image = DynamicImage::new_rgb8(0, 10);
        let result = JpegVariantEncoder::new().encode(&image);
        assert!(matches!(result, Err(EncodeError::Unsupported(_))));
    }
}
