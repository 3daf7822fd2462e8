//! Decode guard between the shell's raw image bytes and the classifier.
//!
//! The shell hands over whatever the camera or gallery produced; before it
//! reaches the classifier the core enforces byte/dimension/allocation
//! limits, downscales large frames, and normalises to JPEG.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader, Limits};
use thiserror::Error;

use crate::capabilities::PreparedImage;
use crate::{MAX_IMAGE_ALLOC, MAX_IMAGE_BYTES, MAX_IMAGE_DIMENSION, MAX_PROCESSED_DIMENSION};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImagePrepError {
    #[error("image size {size} bytes exceeds maximum {max}")]
    TooLarge { size: usize, max: usize },

    #[error("unrecognised image format")]
    UnsupportedFormat,

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),
}

/// Validate, bound and normalise raw encoded bytes for classification.
pub fn prepare_for_classification(data: &[u8]) -> Result<PreparedImage, ImagePrepError> {
    if data.len() > MAX_IMAGE_BYTES {
        return Err(ImagePrepError::TooLarge {
            size: data.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let format = image::guess_format(data).map_err(|_| ImagePrepError::UnsupportedFormat)?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
    limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
    limits.max_alloc = Some(MAX_IMAGE_ALLOC);

    let mut reader = ImageReader::with_format(Cursor::new(data), format);
    reader.limits(limits);

    let decoded = reader
        .decode()
        .map_err(|e| ImagePrepError::Decode(e.to_string()))?;

    let bounded = if decoded.width() > MAX_PROCESSED_DIMENSION
        || decoded.height() > MAX_PROCESSED_DIMENSION
    {
        decoded.resize(
            MAX_PROCESSED_DIMENSION,
            MAX_PROCESSED_DIMENSION,
            FilterType::Lanczos3,
        )
    } else {
        decoded
    };

    let (width, height) = (bounded.width(), bounded.height());

    // JPEG has no alpha channel; flatten before encoding.
    let mut encoded = Vec::new();
    DynamicImage::ImageRgb8(bounded.to_rgb8())
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Jpeg)
        .map_err(|e| ImagePrepError::Encode(e.to_string()))?;

    Ok(PreparedImage {
        data: encoded,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let pixels = image::RgbImage::from_pixel(width, height, image::Rgb([12, 120, 200]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(pixels)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .expect("encode test png");
        out
    }

    #[test]
    fn small_image_keeps_its_dimensions() {
        let prepared = prepare_for_classification(&encoded_png(64, 48)).expect("prepare");
        assert_eq!((prepared.width, prepared.height), (64, 48));
        assert!(!prepared.data.is_empty());
        assert_eq!(image::guess_format(&prepared.data).ok(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn oversized_frame_is_downscaled_preserving_aspect() {
        let prepared = prepare_for_classification(&encoded_png(2048, 512)).expect("prepare");
        assert_eq!((prepared.width, prepared.height), (1024, 256));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = prepare_for_classification(&[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(result, Err(ImagePrepError::UnsupportedFormat));
    }

    #[test]
    fn oversized_payload_is_rejected_before_decoding() {
        let data = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(
            prepare_for_classification(&data),
            Err(ImagePrepError::TooLarge { .. })
        ));
    }
}
