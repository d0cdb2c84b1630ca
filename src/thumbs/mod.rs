//! On-the-fly JPEG thumbnail generation.
//!
//! Thumbnails are recomputed per request and never cached. The capability is
//! optional at the application level: the router holds an
//! `Option<Thumbnailer>` and falls through to raw serving when it is absent.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Default bounding box, matching the listing's preview pane.
pub const DEFAULT_BOUNDING_BOX: (u32, u32) = (300, 200);

/// Thumbnails are size-tuned, not fidelity-tuned.
const JPEG_QUALITY: u8 = 50;

/// Sequences decode, EXIF orientation, resize and JPEG re-encode.
#[derive(Debug, Clone, Copy)]
pub struct Thumbnailer {
    bounding_box: (u32, u32),
}

impl Default for Thumbnailer {
    fn default() -> Self {
        Self {
            bounding_box: DEFAULT_BOUNDING_BOX,
        }
    }
}

impl Thumbnailer {
    pub fn new(bounding_box: (u32, u32)) -> Self {
        Self { bounding_box }
    }

    /// Produce JPEG bytes for a downsampled rendition of the image at `path`.
    ///
    /// EXIF orientation (codes 1-8; missing or unknown metadata is a no-op)
    /// is applied before resizing so the bounding box applies to the
    /// displayed aspect ratio. The image is fitted within the box without
    /// upscaling or cropping, converted to RGB, and encoded at a fixed low
    /// quality.
    pub fn make_thumbnail(&self, path: &Path) -> Result<Vec<u8>, ImageError> {
        let mut decoder = ImageReader::open(path)
            .map_err(ImageError::IoError)?
            .with_guessed_format()
            .map_err(ImageError::IoError)?
            .into_decoder()?;
        let orientation = decoder
            .orientation()
            .unwrap_or(Orientation::NoTransforms);

        let mut img = DynamicImage::from_decoder(decoder)?;
        img.apply_orientation(orientation);

        let (max_w, max_h) = self.bounding_box;
        if img.width() > max_w || img.height() > max_h {
            img = img.resize(max_w, max_h, FilterType::Triangle);
        }

        // JPEG has no alpha; flatten to RGB before encoding.
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

        let mut buf = Cursor::new(Vec::new());
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?;
        Ok(buf.into_inner())
    }
}
