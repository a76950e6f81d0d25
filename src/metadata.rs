//! Image metadata: header probe + filesystem stats.
//!
//! [`ImageMetadata`] is what the decision layer ([`analysis`](crate::analysis),
//! [`predict`](crate::predict), [`web`](crate::web)) consumes. [`ImageInfo`]
//! extends it with the display-only details of `get_image_info`.
//!
//! `has_alpha` is defined as "exactly four channels". A grey+alpha image
//! (two channels) therefore reports `has_alpha = false`.

use crate::imaging::{BackendError, ImageBackend, ImageHeader};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Image file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Backend(#[from] BackendError),
}

/// Read-only facts about one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub has_alpha: bool,
    pub file_size_bytes: u64,
}

impl ImageMetadata {
    pub fn from_header(header: &ImageHeader, file_size_bytes: u64) -> Self {
        Self {
            format: header.format.clone(),
            width: header.width,
            height: header.height,
            channels: header.channels,
            has_alpha: header.channels == 4,
            file_size_bytes,
        }
    }

    /// Unrounded size in KiB.
    pub fn file_size_kb(&self) -> f64 {
        self.file_size_bytes as f64 / 1024.0
    }
}

/// Everything `get_image_info` reports.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub metadata: ImageMetadata,
    pub color_space: String,
    /// `None` when the filesystem does not record a birth time.
    pub created: Option<DateTime<Local>>,
    pub modified: Option<DateTime<Local>>,
}

fn ensure_exists(path: &Path) -> Result<(), MetadataError> {
    if path.exists() {
        Ok(())
    } else {
        Err(MetadataError::NotFound(path.to_path_buf()))
    }
}

/// Probe an image and combine the header with its file size.
pub fn read_metadata(
    backend: &impl ImageBackend,
    path: &Path,
) -> Result<ImageMetadata, MetadataError> {
    ensure_exists(path)?;
    let header = backend.probe(path)?;
    let size = std::fs::metadata(path)?.len();
    Ok(ImageMetadata::from_header(&header, size))
}

/// Probe an image and collect display details (colour space, timestamps).
pub fn read_info(backend: &impl ImageBackend, path: &Path) -> Result<ImageInfo, MetadataError> {
    ensure_exists(path)?;
    let header = backend.probe(path)?;
    let stats = std::fs::metadata(path)?;

    Ok(ImageInfo {
        path: path.to_path_buf(),
        metadata: ImageMetadata::from_header(&header, stats.len()),
        color_space: header.color_space,
        created: stats.created().ok().map(DateTime::<Local>::from),
        modified: stats.modified().ok().map(DateTime::<Local>::from),
    })
}
