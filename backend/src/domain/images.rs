//! Photo downscaling for registrant uploads.
//!
//! Uploads are capped at 10 MiB, constrained to fit 600x800 with width
//! taking priority, never upscaled, and always re-encoded as PNG so the
//! object store holds exactly one format.

use image::imageops::FilterType;
use image::ImageFormat;
use sha2::{Digest, Sha256};
use std::io::Cursor;

use crate::domain::errors::DomainError;

/// Largest accepted photo upload, checked before any decode work.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_MAX_WIDTH: u32 = 600;
pub const DEFAULT_MAX_HEIGHT: u32 = 800;

/// Object key for a registrant photo. Keyed on the registrant id so a
/// re-upload overwrites the previous photo instead of orphaning it.
pub fn photo_key(registrant_id: &str) -> String {
    format!(
        "photos/{}.png",
        hex::encode(Sha256::digest(registrant_id.as_bytes()))
    )
}

/// Downscale `bytes` to fit within `max_width` x `max_height`.
///
/// Width is constrained first; only when the width already fits is the
/// height considered. Aspect ratio is preserved and images inside the box
/// pass through unscaled (but still re-encoded).
pub fn scale_to_fit(bytes: &[u8], max_width: u32, max_height: u32) -> Result<Vec<u8>, DomainError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|_| DomainError::validation("photo", "unreadable image"))?;

    let scaled = if decoded.width() > max_width {
        decoded.resize(max_width, u32::MAX, FilterType::Lanczos3)
    } else if decoded.height() > max_height {
        decoded.resize(u32::MAX, max_height, FilterType::Lanczos3)
    } else {
        decoded
    };

    let mut out = Cursor::new(Vec::new());
    scaled
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| DomainError::Encoding(format!("PNG encoding failed: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode test image");
        out.into_inner()
    }

    fn dimensions_of(bytes: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(bytes).expect("decode");
        (img.width(), img.height())
    }

    #[test]
    fn test_wide_image_constrained_by_width() {
        let scaled = scale_to_fit(&png_of(1200, 400), 600, 800).expect("scale");
        assert_eq!(dimensions_of(&scaled), (600, 200));
    }

    #[test]
    fn test_tall_image_constrained_by_height() {
        let scaled = scale_to_fit(&png_of(500, 1000), 600, 800).expect("scale");
        assert_eq!(dimensions_of(&scaled), (400, 800));
    }

    #[test]
    fn test_small_image_passes_through_unscaled() {
        let scaled = scale_to_fit(&png_of(300, 200), 600, 800).expect("scale");
        assert_eq!(dimensions_of(&scaled), (300, 200));
    }

    #[test]
    fn test_width_priority_when_both_exceed() {
        // 1600x1600 exceeds both caps; the width rule wins and the height
        // lands wherever the ratio puts it.
        let scaled = scale_to_fit(&png_of(1600, 1600), 600, 800).expect("scale");
        assert_eq!(dimensions_of(&scaled), (600, 600));
    }

    #[test]
    fn test_garbage_bytes_rejected_as_photo_validation() {
        let err = scale_to_fit(b"not an image", 600, 800).expect_err("must fail");
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, "photo"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_photo_key_is_stable_per_registrant() {
        let key = photo_key("registrant::abc");
        assert!(key.starts_with("photos/"));
        assert!(key.ends_with(".png"));
        assert_eq!(key, photo_key("registrant::abc"));
        assert_ne!(key, photo_key("registrant::def"));
    }
}
