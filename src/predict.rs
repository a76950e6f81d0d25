//! Post-conversion size prediction.
//!
//! A static ratio table keyed by format and quality bucket. This is an
//! approximation for planning, not a simulation of the encoder: real output
//! sizes depend on content and can differ a lot.
//!
//! | format | q > 90 | 70 < q ≤ 90 | q ≤ 70 |
//! |---|---|---|---|
//! | png | 0.8 | 0.8 | 0.8 |
//! | jpeg | 0.7 | 0.4 | 0.25 |
//! | webp | 0.6 | 0.3 | 0.2 |
//! | avif | 0.5 | 0.25 | 0.15 |
//! | tiff | 1.2 | 1.2 | 1.2 |
//! | bmp | 3.0 | 3.0 | 3.0 |
//! | ico | 0.5 | 0.5 | 0.5 |
//! | anything else | 1.0 | 1.0 | 1.0 |
//!
//! `jpg` has no row of its own and falls through to the last line.

use crate::format::{Quality, TargetFormat};
use serde::Serialize;

const FALLBACK_RATIO: f64 = 1.0;

/// One of the three quality ranges used by the ratio table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBucket {
    /// q > 90
    High,
    /// 70 < q ≤ 90
    Medium,
    /// q ≤ 70
    Low,
}

impl QualityBucket {
    pub fn of(quality: Quality) -> Self {
        match quality.value() {
            q if q > 90 => QualityBucket::High,
            q if q > 70 => QualityBucket::Medium,
            _ => QualityBucket::Low,
        }
    }
}

/// Size ratio (predicted / original) for a format and quality.
pub fn compression_ratio(format: TargetFormat, quality: Quality) -> f64 {
    let bucket = QualityBucket::of(quality);
    let by_bucket = |high, medium, low| match bucket {
        QualityBucket::High => high,
        QualityBucket::Medium => medium,
        QualityBucket::Low => low,
    };

    match format {
        TargetFormat::Png => 0.8,
        TargetFormat::Jpeg => by_bucket(0.7, 0.4, 0.25),
        TargetFormat::Webp => by_bucket(0.6, 0.3, 0.2),
        TargetFormat::Avif => by_bucket(0.5, 0.25, 0.15),
        TargetFormat::Tiff => 1.2,
        TargetFormat::Bmp => 3.0,
        TargetFormat::Ico => 0.5,
        TargetFormat::Jpg => FALLBACK_RATIO,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizePrediction {
    pub original_size_kb: f64,
    pub predicted_size_kb: f64,
    pub ratio: f64,
    /// `round((1 - ratio) * 100)`; negative when the file is expected to grow.
    pub compression_ratio_percent: i64,
    pub savings_kb: f64,
}

/// Round half up to two decimals.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0 + 0.5).floor() / 100.0
}

/// Predict the converted size of a file of `original_size_bytes`.
pub fn predict(original_size_bytes: u64, format: TargetFormat, quality: Quality) -> SizePrediction {
    let ratio = compression_ratio(format, quality);
    let original_kb = original_size_bytes as f64 / 1024.0;
    let predicted_kb = round2(original_kb * ratio);

    SizePrediction {
        original_size_kb: round2(original_kb),
        predicted_size_kb: predicted_kb,
        ratio,
        compression_ratio_percent: ((1.0 - ratio) * 100.0 + 0.5).floor() as i64,
        savings_kb: round2(original_kb - predicted_kb),
    }
}
