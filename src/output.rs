//! Text rendering for every operation.
//!
//! # Output Format
//!
//! ## Batch
//!
//! ```text
//! Batch conversion complete
//! Total: 3 files
//! Succeeded: 2 files
//! Failed: 1 files
//!
//! Successful conversions:
//! ✓ photos/a.png -> out/a.webp
//! ✓ photos/b.png -> out/b.webp
//!
//! Failed conversions:
//! ✗ photos/c.png: Processing failed: ...
//! ```
//!
//! ## Analysis
//!
//! ```text
//! Image analysis:
//!
//! Current format: png
//! Dimensions: 1200x900
//! Channels: 4 (has alpha)
//! File size: 312.4 KB
//!
//! Recommendations:
//! 1. Recommended format: PNG
//!    Reason: Image has an alpha channel; PNG keeps transparency losslessly
//!    Priority: high
//! ```
//!
//! # Architecture
//!
//! Each operation has a `format_*` function (returns `Vec<String>`) for
//! testability; callers join the lines with `\n`. Format functions are pure:
//! no I/O, no side effects.

use crate::analysis::{QualityPreset, Recommendation, RecommendationKind, UseCase};
use crate::batch::BatchReport;
use crate::convert::Converted;
use crate::format::TargetFormat;
use crate::metadata::{ImageInfo, ImageMetadata};
use crate::predict::{SizePrediction, round2};
use crate::web::WebOutcome;
use chrono::{DateTime, Local};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Return indentation string: 3 spaces, aligned under a `1. ` list marker.
fn indent() -> &'static str {
    "   "
}

/// Kilobytes rounded half up to two decimals, without padding (`312.4 KB`).
fn kb(bytes: u64) -> String {
    format!("{} KB", round2(bytes as f64 / 1024.0))
}

fn timestamp(t: Option<&DateTime<Local>>) -> String {
    t.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn format_conversion(converted: &Converted) -> Vec<String> {
    vec![converted.to_string()]
}

pub fn format_batch_report(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![
        "Batch conversion complete".to_string(),
        format!("Total: {} files", report.total()),
        format!("Succeeded: {} files", report.successes.len()),
        format!("Failed: {} files", report.failures.len()),
        String::new(),
        "Successful conversions:".to_string(),
    ];
    lines.extend(
        report
            .successes
            .iter()
            .map(|o| format!("✓ {} -> {}", o.input.display(), o.output.display())),
    );

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failed conversions:".to_string());
        lines.extend(
            report
                .failures
                .iter()
                .map(|o| format!("✗ {}: {}", o.input.display(), o.message)),
        );
    }
    lines
}

/// Zero matches is not an error for the caller.
pub fn format_no_matches(expression: &str) -> Vec<String> {
    vec![format!("No files found matching: {expression}")]
}

pub fn format_image_info(info: &ImageInfo) -> Vec<String> {
    let meta = &info.metadata;
    vec![
        "Image info:".to_string(),
        format!("Path: {}", info.path.display()),
        format!("Format: {}", meta.format),
        format!("Width: {}", meta.width),
        format!("Height: {}", meta.height),
        format!("Channels: {}", meta.channels),
        format!("Color space: {}", info.color_space),
        format!("File size: {}", kb(meta.file_size_bytes)),
        format!("Created: {}", timestamp(info.created.as_ref())),
        format!("Modified: {}", timestamp(info.modified.as_ref())),
    ]
}

fn recommendation_lines(index: usize, rec: &Recommendation) -> Vec<String> {
    let head = match (rec.kind, rec.format) {
        (RecommendationKind::Format, Some(format)) => {
            let quality = rec
                .suggested_quality
                .map(|q| format!(" (quality: {q})"))
                .unwrap_or_default();
            vec![
                format!("{index}. Recommended format: {}{quality}", format.display_name()),
                format!("{}Reason: {}", indent(), rec.reason),
            ]
        }
        _ => vec![format!("{index}. {}", rec.reason)],
    };

    let mut lines = head;
    lines.push(format!("{}Priority: {}", indent(), rec.priority));
    lines.push(String::new());
    lines
}

pub fn format_analysis(meta: &ImageMetadata, recommendations: &[Recommendation]) -> Vec<String> {
    let alpha = if meta.has_alpha { " (has alpha)" } else { "" };
    let mut lines = vec![
        "Image analysis:".to_string(),
        String::new(),
        format!("Current format: {}", meta.format),
        format!("Dimensions: {}x{}", meta.width, meta.height),
        format!("Channels: {}{alpha}", meta.channels),
        format!("File size: {}", kb(meta.file_size_bytes)),
        String::new(),
    ];

    if !recommendations.is_empty() {
        lines.push("Recommendations:".to_string());
        for (i, rec) in recommendations.iter().enumerate() {
            lines.extend(recommendation_lines(i + 1, rec));
        }
    }
    lines
}

pub fn format_quality_preset(
    format: TargetFormat,
    use_case: UseCase,
    preset: &QualityPreset,
) -> Vec<String> {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let mut lines = vec![format!(
        "Quality preset for {} ({use_case}):",
        format.display_name()
    )];
    match *preset {
        QualityPreset::Jpeg {
            quality,
            progressive,
        } => {
            lines.push(format!("Quality: {quality}"));
            lines.push(format!("Progressive: {}", yes_no(progressive)));
        }
        QualityPreset::Webp { quality, effort } | QualityPreset::Avif { quality, effort } => {
            lines.push(format!("Quality: {quality}"));
            lines.push(format!("Effort: {effort}"));
        }
        QualityPreset::Png {
            compression_level,
            optimize,
        } => {
            lines.push(format!("Compression level: {compression_level}"));
            lines.push(format!("Optimize: {}", yes_no(optimize)));
        }
        QualityPreset::Other { quality } => lines.push(format!("Quality: {quality}")),
    }
    lines
}

pub fn format_prediction(prediction: &SizePrediction) -> Vec<String> {
    vec![
        "File size prediction:".to_string(),
        String::new(),
        format!("Original size: {} KB", prediction.original_size_kb),
        format!("Predicted size: {} KB", prediction.predicted_size_kb),
        format!("Compression: {}%", prediction.compression_ratio_percent),
        format!("Savings: {} KB", prediction.savings_kb),
    ]
}

pub fn format_web_outcome(outcome: &WebOutcome) -> Vec<String> {
    let plan = &outcome.plan;
    let quality = plan
        .quality
        .map(|q| q.to_string())
        .unwrap_or_else(|| "default".to_string());
    vec![
        "Web optimization complete".to_string(),
        String::new(),
        format!("Original format: {}", outcome.original_format),
        format!("Chosen format: {}", plan.format.display_name()),
        format!("Quality: {quality}"),
        format!("Original size: {}x{}", plan.original.0, plan.original.1),
        format!("Optimized size: {}x{}", plan.target.0, plan.target.1),
        format!("Output file: {}", outcome.output.display()),
    ]
}
