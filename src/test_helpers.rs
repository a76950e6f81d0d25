//! Shared test utilities: synthetic images written with the `image` crate.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let photo = tmp.path().join("photo.png");
//! write_png(&photo, 1200, 900);
//! ```
//!
//! Every helper writes PNG bytes regardless of the file extension, so a
//! `drawing.svg` fixture is really a PNG the backend has to sniff.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

fn write_as_png(path: &Path, img: DynamicImage) {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    std::fs::write(path, bytes).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}

/// Opaque RGB image with a gradient, so encoders have content to compress.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    write_as_png(path, DynamicImage::ImageRgb8(img));
}

/// RGBA image with an alpha ramp.
pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, ((x + y) % 256) as u8])
    });
    write_as_png(path, DynamicImage::ImageRgba8(img));
}

/// High-frequency texture; lossy encoders produce visibly different sizes per quality.
pub fn write_noisy_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
        Rgb([h as u8, (h >> 8) as u8, (h >> 16) as u8])
    });
    write_as_png(path, DynamicImage::ImageRgb8(img));
}

/// Bytes no decoder accepts.
pub fn write_garbage(path: &Path) {
    std::fs::write(path, b"this is not an image at all").unwrap();
}
