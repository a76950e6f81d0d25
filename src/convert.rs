//! Single-file conversion pipeline.
//!
//! ```text
//! request ──► input exists? ──► mkdir -p parent ──┬─ ico ──► encode_icon (PNG frame → ICO)
//!                                                  └─ else ─► FormatPolicy ──► encode
//! ```
//!
//! The output file is overwritten without confirmation. Nothing is cleaned up
//! when an encode fails half-way; the backend owns the file it was writing.

use crate::format::{Quality, TargetFormat, UnsupportedFormat};
use crate::imaging::{
    BackendError, EncodeParams, EncoderConfig, IconParams, ImageBackend, ResizeBox, configure,
};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("{0}")]
    UnsupportedFormat(#[from] UnsupportedFormat),
    #[error("{0}")]
    Codec(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to convert one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: TargetFormat,
    pub quality: Quality,
    pub optimize: bool,
    pub progressive: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ConversionRequest {
    /// A request with the default knobs: quality 80, optimize on, baseline, no resize.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, format: TargetFormat) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            format,
            quality: Quality::default(),
            optimize: true,
            progressive: false,
            width: None,
            height: None,
        }
    }
}

/// A successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub output: PathBuf,
    /// The format that was requested (may differ from the bytes written, see `bmp`).
    pub format: TargetFormat,
    /// The container actually written.
    pub written_format: &'static str,
}

impl fmt::Display for Converted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted to {}: {}",
            self.format.display_name(),
            self.output.display()
        )
    }
}

fn ensure_parent_dir(output: &Path) -> Result<(), ConvertError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Convert one file.
pub fn convert(
    backend: &impl ImageBackend,
    request: &ConversionRequest,
) -> Result<Converted, ConvertError> {
    if !request.input.exists() {
        return Err(ConvertError::InputNotFound(request.input.clone()));
    }
    ensure_parent_dir(&request.output)?;

    let resize = ResizeBox::from_request(request.width, request.height);
    let encoder = configure(
        request.format,
        request.quality,
        request.optimize,
        request.progressive,
    );
    debug!(
        input = %request.input.display(),
        output = %request.output.display(),
        format = %request.format,
        ?encoder,
        "converting"
    );

    match encoder {
        EncoderConfig::Icon => backend.encode_icon(&IconParams {
            source: request.input.clone(),
            output: request.output.clone(),
            resize,
        })?,
        _ => backend.encode(&EncodeParams {
            source: request.input.clone(),
            output: request.output.clone(),
            resize,
            encoder: encoder.clone(),
        })?,
    }

    Ok(Converted {
        output: request.output.clone(),
        format: request.format,
        written_format: encoder.written_format(),
    })
}
