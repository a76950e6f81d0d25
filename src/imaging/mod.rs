//! Image codec layer.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `ImageReader` header decode |
//! | **Resize** | Lanczos3, fit=contain |
//! | **Encode** | `image` (PNG, AVIF), `mozjpeg` (JPEG), `webp` (WebP), `tiff` (TIFF) |
//! | **ICO** | single PNG frame in an ICO container |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Encoder**: the format policy producing an [`EncoderConfig`]
//! - **Parameters**: Data structures describing one write
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
pub mod encoder;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, ImageHeader};
pub use encoder::{ChromaSubsampling, EncoderConfig, TiffCompression, configure};
pub use params::{EncodeParams, IconParams, MAX_DIMENSION, MAX_PIXELS, ResizeBox};
pub use rust_backend::RustBackend;
