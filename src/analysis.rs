//! Metadata-driven optimisation advice.
//!
//! [`analyze`] turns [`ImageMetadata`] into an ordered list of
//! [`Recommendation`]s. Rules accumulate: every applicable rule fires and the
//! list keeps firing order.
//!
//! ```text
//! 1. alpha            → PNG (high), WebP (medium)
//! 2. else large photo → JPEG q85 (high), WebP q80 (high), AVIF q75 (medium)
//!    (w > 800 or h > 600)
//! 3. else small image → PNG (high), WebP (medium)
//! 4. size > 1000 KB   → compression (high)
//! 5. size > 500 KB and (w > 1920 or h > 1080)
//!                     → resize (medium) to min(1920, w) × min(1080, h)
//! ```
//!
//! Rules 1–3 are mutually exclusive; 4 and 5 are overlays. Rule 5 caps each
//! axis separately and does not keep the aspect ratio.
//!
//! [`quality_preset`] is the companion lookup: encoder settings per format for
//! a [`UseCase`].
//!
//! | use case | jpeg | webp | avif | png |
//! |---|---|---|---|---|
//! | web | q85, progressive | q80, effort 6 | q75, effort 6 | level 9, optimize |
//! | print | q95, baseline | q90, effort 6 | q85, effort 9 | level 6, optimize |
//! | thumbnail | q75, baseline | q70, effort 4 | q65, effort 4 | level 9, optimize |
//!
//! Formats outside the table (`jpg`, `tiff`, `bmp`, `ico`) get q80.

use crate::format::{Quality, TargetFormat};
use clap::ValueEnum;
use crate::imaging::calculations::cap_dimensions;
use crate::metadata::ImageMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

const PHOTO_MIN_WIDTH: u32 = 800;
const PHOTO_MIN_HEIGHT: u32 = 600;
const COMPRESSION_THRESHOLD_KB: f64 = 1000.0;
const RESIZE_THRESHOLD_KB: f64 = 500.0;
const RESIZE_CAP: (u32, u32) = (1920, 1080);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Format,
    Compression,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "high",
            Priority::Medium => "medium",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TargetFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_height: Option<u32>,
    pub reason: String,
}

impl Recommendation {
    fn for_format(format: TargetFormat, priority: Priority, quality: Option<u32>, reason: &str) -> Self {
        Self {
            kind: RecommendationKind::Format,
            priority,
            format: Some(format),
            suggested_quality: quality.map(|q| Quality::new(q).value()),
            suggested_width: None,
            suggested_height: None,
            reason: reason.to_string(),
        }
    }
}

/// Produce recommendations for one image, in rule order.
pub fn analyze(meta: &ImageMetadata) -> Vec<Recommendation> {
    use Priority::{High, Medium};
    use TargetFormat::{Avif, Jpeg, Png, Webp};

    let mut recs = Vec::new();

    if meta.has_alpha {
        recs.push(Recommendation::for_format(
            Png,
            High,
            None,
            "Image has an alpha channel; PNG keeps transparency losslessly",
        ));
        recs.push(Recommendation::for_format(
            Webp,
            Medium,
            None,
            "WebP supports transparency with better compression",
        ));
    } else if meta.width > PHOTO_MIN_WIDTH || meta.height > PHOTO_MIN_HEIGHT {
        recs.push(Recommendation::for_format(
            Jpeg,
            High,
            Some(85),
            "Large photo; JPEG compresses it well",
        ));
        recs.push(Recommendation::for_format(
            Webp,
            High,
            Some(80),
            "WebP keeps quality with a smaller file",
        ));
        recs.push(Recommendation::for_format(
            Avif,
            Medium,
            Some(75),
            "AVIF gives the best compression (needs browser support)",
        ));
    } else {
        recs.push(Recommendation::for_format(
            Png,
            High,
            None,
            "Small graphic; PNG lossless compression suits it",
        ));
        recs.push(Recommendation::for_format(
            Webp,
            Medium,
            None,
            "WebP also compresses small images well",
        ));
    }

    let size_kb = meta.file_size_kb();

    if size_kb > COMPRESSION_THRESHOLD_KB {
        recs.push(Recommendation {
            kind: RecommendationKind::Compression,
            priority: High,
            format: None,
            suggested_quality: None,
            suggested_width: None,
            suggested_height: None,
            reason: "File is large; enable advanced compression (optimize mode)".to_string(),
        });
    }

    if size_kb > RESIZE_THRESHOLD_KB
        && (meta.width > RESIZE_CAP.0 || meta.height > RESIZE_CAP.1)
    {
        let (w, h) = cap_dimensions((meta.width, meta.height), RESIZE_CAP);
        recs.push(Recommendation {
            kind: RecommendationKind::Resize,
            priority: Medium,
            format: None,
            suggested_quality: None,
            suggested_width: Some(w),
            suggested_height: Some(h),
            reason: format!(
                "Current size {}x{} may be too large; resize to {}x{}",
                meta.width, meta.height, w, h
            ),
        });
    }

    recs
}

/// Where the converted image ends up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
    #[default]
    Web,
    Print,
    Thumbnail,
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UseCase::Web => "web",
            UseCase::Print => "print",
            UseCase::Thumbnail => "thumbnail",
        })
    }
}

/// Suggested encoder settings for one format and use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum QualityPreset {
    Jpeg { quality: Quality, progressive: bool },
    Webp { quality: Quality, effort: u8 },
    Avif { quality: Quality, effort: u8 },
    Png { compression_level: u8, optimize: bool },
    /// Any format without a dedicated row.
    Other { quality: Quality },
}

impl QualityPreset {
    /// Quality for lossy formats; `None` for PNG.
    pub fn quality(&self) -> Option<Quality> {
        match *self {
            QualityPreset::Jpeg { quality, .. }
            | QualityPreset::Webp { quality, .. }
            | QualityPreset::Avif { quality, .. }
            | QualityPreset::Other { quality } => Some(quality),
            QualityPreset::Png { .. } => None,
        }
    }
}

pub fn quality_preset(format: TargetFormat, use_case: UseCase) -> QualityPreset {
    use UseCase::{Print, Thumbnail, Web};
    let q = Quality::new;

    match (format, use_case) {
        (TargetFormat::Jpeg, Web) => QualityPreset::Jpeg { quality: q(85), progressive: true },
        (TargetFormat::Jpeg, Print) => QualityPreset::Jpeg { quality: q(95), progressive: false },
        (TargetFormat::Jpeg, Thumbnail) => QualityPreset::Jpeg { quality: q(75), progressive: false },
        (TargetFormat::Webp, Web) => QualityPreset::Webp { quality: q(80), effort: 6 },
        (TargetFormat::Webp, Print) => QualityPreset::Webp { quality: q(90), effort: 6 },
        (TargetFormat::Webp, Thumbnail) => QualityPreset::Webp { quality: q(70), effort: 4 },
        (TargetFormat::Avif, Web) => QualityPreset::Avif { quality: q(75), effort: 6 },
        (TargetFormat::Avif, Print) => QualityPreset::Avif { quality: q(85), effort: 9 },
        (TargetFormat::Avif, Thumbnail) => QualityPreset::Avif { quality: q(65), effort: 4 },
        (TargetFormat::Png, Print) => QualityPreset::Png { compression_level: 6, optimize: true },
        (TargetFormat::Png, Web | Thumbnail) => {
            QualityPreset::Png { compression_level: 9, optimize: true }
        }
        _ => QualityPreset::Other { quality: Quality::default() },
    }
}
