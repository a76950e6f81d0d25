//! Parameter types for backend operations.
//!
//! These structs describe *what* to write, not *how*. The
//! [`convert`](crate::convert) pipeline fills them in and the
//! [`backend`](super::backend) does the pixel work, so a mock backend can
//! stand in during tests without touching the decision logic.
//!
//! - [`ResizeBox`]: optional fit=contain bounding box (either side may be absent).
//! - [`EncodeParams`]: source, output, optional resize and a policy-derived [`EncoderConfig`].
//! - [`IconParams`]: source, output and optional resize for the ICO container path.
//!
//! Requested sides are capped at [`MAX_DIMENSION`] and resize results at
//! [`MAX_PIXELS`], so a single oversized request fails on its own instead of
//! exhausting memory for the whole process.

use super::calculations::contain_dimensions;
use super::encoder::EncoderConfig;
use std::path::PathBuf;

/// Largest side a caller may request.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest resize result, in pixels (a side derived from the aspect ratio can
/// exceed [`MAX_DIMENSION`]).
pub const MAX_PIXELS: u64 = 100_000_000;

/// Requested output box. At least one side is set when a resize happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeBox {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeBox {
    /// `None` when neither side is requested.
    pub fn from_request(width: Option<u32>, height: Option<u32>) -> Option<Self> {
        if width.is_none() && height.is_none() {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Final pixel dimensions for a source of `source` size.
    pub fn target_for(&self, source: (u32, u32)) -> (u32, u32) {
        contain_dimensions(source, self.width, self.height)
    }

    /// [`target_for`](Self::target_for), or `None` past [`MAX_PIXELS`].
    pub fn bounded_target_for(&self, source: (u32, u32)) -> Option<(u32, u32)> {
        let (w, h) = self.target_for(source);
        (u64::from(w) * u64::from(h) <= MAX_PIXELS).then_some((w, h))
    }
}

/// A regular (non-ICO) encode.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub resize: Option<ResizeBox>,
    pub encoder: EncoderConfig,
}

/// Single-image ICO container write.
#[derive(Debug, Clone, PartialEq)]
pub struct IconParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub resize: Option<ResizeBox>,
}
