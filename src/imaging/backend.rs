//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: probe, encode and encode_icon. Everything above this layer (policy,
//! pipeline, batch, web optimisation) is backend-agnostic.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::{EncodeParams, IconParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// What a header probe reveals about an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHeader {
    /// Detected container format, lowercase (`png`, `jpeg`, ...).
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Colour interpretation: `srgb`, `b-w`, `rgb16`, `grey16` or `unknown`.
    pub color_space: String,
}

/// Trait for image codec backends.
pub trait ImageBackend: Sync {
    /// Read format, dimensions and channel layout.
    fn probe(&self, path: &Path) -> Result<ImageHeader, BackendError>;

    /// Decode, optionally resize (fit=contain) and encode with the given config.
    fn encode(&self, params: &EncodeParams) -> Result<(), BackendError>;

    /// Wrap the source (PNG bytes, resized first if requested) into a
    /// single-image ICO container.
    fn encode_icon(&self, params: &IconParams) -> Result<(), BackendError>;
}
