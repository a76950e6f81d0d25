//! Format policy: target format + knobs → encoder configuration.
//!
//! [`configure`] is the single place where per-format settings are decided.
//! It is pure and total over [`TargetFormat`]; backends only read the result.
//!
//! | Format | optimize = true | optimize = false |
//! |---|---|---|
//! | png | level 9, adaptive filtering, palette | level 6, plain |
//! | jpg / jpeg | quality, progressive flag, trellis + optimised scans + deringing | quality, progressive flag |
//! | webp | quality, effort 6, smart subsampling | quality, effort 4 |
//! | avif | quality, effort 9, 4:2:0 | quality, effort 4, 4:2:0 |
//! | tiff | LZW (lossless), quality | uncompressed, quality |
//! | bmp | PNG with default settings | PNG with default settings |
//! | ico | two-phase ICO container path | same |
//!
//! BMP output is not available from the codec layer, so a `bmp` request is
//! written as PNG. Callers see the `bmp` name in paths and summaries but the
//! file content is PNG.

use crate::format::{Quality, TargetFormat};

/// Chroma subsampling mode for AVIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaSubsampling {
    Yuv420,
}

impl ChromaSubsampling {
    pub fn as_str(self) -> &'static str {
        match self {
            ChromaSubsampling::Yuv420 => "4:2:0",
        }
    }
}

/// TIFF compression scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// LZW, lossless.
    Lzw,
    None,
}

/// Encoder settings for one output file.
#[derive(Debug, Clone, PartialEq)]
pub enum EncoderConfig {
    Png {
        compression_level: u8,
        adaptive_filtering: bool,
        palette: bool,
    },
    Jpeg {
        quality: Quality,
        progressive: bool,
        trellis_quantisation: bool,
        optimise_scans: bool,
        overshoot_deringing: bool,
    },
    WebP {
        quality: Quality,
        effort: u8,
        smart_subsample: bool,
    },
    Avif {
        quality: Quality,
        effort: u8,
        chroma_subsampling: ChromaSubsampling,
    },
    Tiff {
        compression: TiffCompression,
        quality: Quality,
    },
    /// ICO goes through the container path instead of a direct encode.
    Icon,
}

impl EncoderConfig {
    /// Name of the container actually written.
    pub fn written_format(&self) -> &'static str {
        match self {
            EncoderConfig::Png { .. } => "png",
            EncoderConfig::Jpeg { .. } => "jpeg",
            EncoderConfig::WebP { .. } => "webp",
            EncoderConfig::Avif { .. } => "avif",
            EncoderConfig::Tiff { .. } => "tiff",
            EncoderConfig::Icon => "ico",
        }
    }

    fn default_png() -> Self {
        EncoderConfig::Png {
            compression_level: 6,
            adaptive_filtering: false,
            palette: false,
        }
    }
}

/// Derive the encoder configuration for a target format.
pub fn configure(
    format: TargetFormat,
    quality: Quality,
    optimize: bool,
    progressive: bool,
) -> EncoderConfig {
    match format {
        TargetFormat::Png => EncoderConfig::Png {
            compression_level: if optimize { 9 } else { 6 },
            adaptive_filtering: optimize,
            palette: optimize,
        },
        TargetFormat::Jpg | TargetFormat::Jpeg => EncoderConfig::Jpeg {
            quality,
            progressive,
            trellis_quantisation: optimize,
            optimise_scans: optimize,
            overshoot_deringing: optimize,
        },
        TargetFormat::Webp => EncoderConfig::WebP {
            quality,
            effort: if optimize { 6 } else { 4 },
            smart_subsample: optimize,
        },
        TargetFormat::Avif => EncoderConfig::Avif {
            quality,
            effort: if optimize { 9 } else { 4 },
            chroma_subsampling: ChromaSubsampling::Yuv420,
        },
        TargetFormat::Tiff => EncoderConfig::Tiff {
            compression: if optimize {
                TiffCompression::Lzw
            } else {
                TiffCompression::None
            },
            quality,
        },
        TargetFormat::Bmp => EncoderConfig::default_png(),
        TargetFormat::Ico => EncoderConfig::Icon,
    }
}
