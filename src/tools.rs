//! Named operations behind a plain-text boundary.
//!
//! [`call_tool`] takes an operation name and a JSON object of camelCase
//! arguments, runs it and returns a [`ToolResponse`]. Errors never cross this
//! boundary as values: they are rendered as text starting with
//! [`ERROR_MARKER`] and flagged with `is_error`.
//!
//! Missing optional arguments are filled from [`ConverterConfig`], whose stock
//! values are the documented defaults. Requested dimensions must lie in
//! `1..=`[`MAX_DIMENSION`].
//!
//! | Operation | Arguments |
//! |---|---|
//! | `convert_image` | inputPath, outputPath, format, quality?, optimize?, progressive?, width?, height? |
//! | `batch_convert_images` | inputDir, outputDir, format, pattern?, quality?, optimize?, progressive?, width?, height?, recursive? |
//! | `get_image_info` | imagePath |
//! | `analyze_image` | imagePath |
//! | `predict_file_size` | imagePath, targetFormat, quality? |
//! | `optimize_for_web` | inputPath, outputPath, maxWidth?, maxHeight? |

use crate::analysis::analyze;
use crate::batch::{BatchError, BatchRequest, batch_convert};
use crate::config::ConverterConfig;
use crate::convert::{ConversionRequest, ConvertError, convert};
use crate::format::{Quality, TargetFormat, UnsupportedFormat};
use crate::imaging::{ImageBackend, MAX_DIMENSION};
use crate::metadata::{MetadataError, read_info, read_metadata};
use crate::output;
use crate::predict::predict;
use crate::web::{WebError, WebRequest, optimize_for_web};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

pub const ERROR_MARKER: &str = "Error: ";

/// Name and one-line description of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub name: &'static str,
    pub description: &'static str,
}

pub const OPERATIONS: &[Operation] = &[
    Operation {
        name: "convert_image",
        description: "Convert one image to png, jpg, jpeg, ico, webp, avif, tiff or bmp",
    },
    Operation {
        name: "batch_convert_images",
        description: "Convert every matching image in a directory",
    },
    Operation {
        name: "get_image_info",
        description: "Show format, dimensions, channels, colour space, size and timestamps",
    },
    Operation {
        name: "analyze_image",
        description: "Recommend formats, compression and resizing for an image",
    },
    Operation {
        name: "predict_file_size",
        description: "Estimate the file size after conversion",
    },
    Operation {
        name: "optimize_for_web",
        description: "Pick a web format and bound the dimensions, then convert",
    },
];

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    UnsupportedFormat(#[from] UnsupportedFormat),
    #[error("{0}")]
    Convert(#[from] ConvertError),
    #[error("{0}")]
    Batch(#[from] BatchError),
    #[error("{0}")]
    Metadata(#[from] MetadataError),
    #[error("{0}")]
    Web(#[from] WebError),
}

/// Text result of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub text: String,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResponse {
    fn ok(lines: Vec<String>) -> Self {
        Self {
            text: lines.join("\n"),
            is_error: false,
        }
    }

    fn error(err: &ToolError) -> Self {
        Self {
            text: format!("{ERROR_MARKER}{err}"),
            is_error: true,
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Clone, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct ConvertArgs {
    /// Source image
    #[arg(long)]
    pub input_path: PathBuf,
    /// Destination file (parent directories are created)
    #[arg(long)]
    pub output_path: PathBuf,
    /// Target format
    #[arg(long)]
    pub format: String,
    /// Quality 1-100
    #[arg(long)]
    pub quality: Option<i64>,
    #[arg(long)]
    pub optimize: Option<bool>,
    #[arg(long)]
    pub progressive: Option<bool>,
    /// Bounding box width (fit=contain)
    #[arg(long)]
    pub width: Option<i64>,
    /// Bounding box height (fit=contain)
    #[arg(long)]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct BatchArgs {
    #[arg(long)]
    pub input_dir: PathBuf,
    #[arg(long)]
    pub output_dir: PathBuf,
    #[arg(long)]
    pub format: String,
    /// Wildcard matched against file names (`*`, `?`)
    #[arg(long)]
    pub pattern: Option<String>,
    #[arg(long)]
    pub quality: Option<i64>,
    #[arg(long)]
    pub optimize: Option<bool>,
    #[arg(long)]
    pub progressive: Option<bool>,
    #[arg(long)]
    pub width: Option<i64>,
    #[arg(long)]
    pub height: Option<i64>,
    /// Descend into subdirectories
    #[arg(long)]
    pub recursive: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct ImageArgs {
    #[arg(long)]
    pub image_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct PredictArgs {
    #[arg(long)]
    pub image_path: PathBuf,
    #[arg(long)]
    pub target_format: String,
    #[arg(long)]
    pub quality: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct WebArgs {
    #[arg(long)]
    pub input_path: PathBuf,
    #[arg(long)]
    pub output_path: PathBuf,
    #[arg(long)]
    pub max_width: Option<i64>,
    #[arg(long)]
    pub max_height: Option<i64>,
}

/// A parsed request, ready to run.
#[derive(Debug, Clone)]
pub enum ToolCall {
    ConvertImage(ConvertArgs),
    BatchConvertImages(BatchArgs),
    GetImageInfo(ImageArgs),
    AnalyzeImage(ImageArgs),
    PredictFileSize(PredictArgs),
    OptimizeForWeb(WebArgs),
}

fn decode<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, ToolError> {
    let args = match args {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

impl ToolCall {
    pub fn parse(name: &str, args: serde_json::Value) -> Result<Self, ToolError> {
        Ok(match name {
            "convert_image" => ToolCall::ConvertImage(decode(args)?),
            "batch_convert_images" => ToolCall::BatchConvertImages(decode(args)?),
            "get_image_info" => ToolCall::GetImageInfo(decode(args)?),
            "analyze_image" => ToolCall::AnalyzeImage(decode(args)?),
            "predict_file_size" => ToolCall::PredictFileSize(decode(args)?),
            "optimize_for_web" => ToolCall::OptimizeForWeb(decode(args)?),
            other => return Err(ToolError::UnknownOperation(other.to_string())),
        })
    }
}

fn quality_or(value: Option<i64>, default: Quality) -> Result<Quality, ToolError> {
    match value {
        None => Ok(default),
        Some(q) => Quality::checked(q).ok_or_else(|| {
            ToolError::InvalidArguments(format!("quality must be between 1 and 100, got {q}"))
        }),
    }
}

fn dimension(name: &str, value: Option<i64>) -> Result<Option<u32>, ToolError> {
    let Some(v) = value else {
        return Ok(None);
    };
    if v <= 0 {
        return Err(ToolError::InvalidArguments(format!(
            "{name} must be a positive integer, got {v}"
        )));
    }
    u32::try_from(v)
        .ok()
        .filter(|&px| px <= MAX_DIMENSION)
        .map(Some)
        .ok_or_else(|| {
            ToolError::InvalidArguments(format!("{name} must be at most {MAX_DIMENSION}, got {v}"))
        })
}

fn dimension_or(name: &str, value: Option<i64>, default: u32) -> Result<u32, ToolError> {
    Ok(dimension(name, value)?.unwrap_or(default))
}

// ============================================================================
// Execution
// ============================================================================

/// Run a parsed call, returning the output lines.
pub fn execute(
    backend: &impl ImageBackend,
    config: &ConverterConfig,
    call: &ToolCall,
) -> Result<Vec<String>, ToolError> {
    match call {
        ToolCall::ConvertImage(args) => {
            let request = ConversionRequest {
                input: args.input_path.clone(),
                output: args.output_path.clone(),
                format: args.format.parse()?,
                quality: quality_or(args.quality, config.quality())?,
                optimize: args.optimize.unwrap_or(config.conversion.optimize),
                progressive: args.progressive.unwrap_or(config.conversion.progressive),
                width: dimension("width", args.width)?,
                height: dimension("height", args.height)?,
            };
            Ok(output::format_conversion(&convert(backend, &request)?))
        }
        ToolCall::BatchConvertImages(args) => {
            let request = BatchRequest {
                input_dir: args.input_dir.clone(),
                output_dir: args.output_dir.clone(),
                format: args.format.parse()?,
                pattern: args
                    .pattern
                    .clone()
                    .unwrap_or_else(|| config.batch.pattern.clone()),
                quality: quality_or(args.quality, config.quality())?,
                optimize: args.optimize.unwrap_or(config.conversion.optimize),
                progressive: args.progressive.unwrap_or(config.conversion.progressive),
                width: dimension("width", args.width)?,
                height: dimension("height", args.height)?,
                recursive: args.recursive.unwrap_or(config.batch.recursive),
                max_processes: config.processing.max_processes,
            };
            match batch_convert(backend, &request) {
                Ok(report) => Ok(output::format_batch_report(&report)),
                Err(BatchError::NoMatchingFiles(expr)) => Ok(output::format_no_matches(&expr)),
                Err(e) => Err(e.into()),
            }
        }
        ToolCall::GetImageInfo(args) => {
            let info = read_info(backend, &args.image_path)?;
            Ok(output::format_image_info(&info))
        }
        ToolCall::AnalyzeImage(args) => {
            let meta = read_metadata(backend, &args.image_path)?;
            Ok(output::format_analysis(&meta, &analyze(&meta)))
        }
        ToolCall::PredictFileSize(args) => {
            let format: TargetFormat = args.target_format.parse()?;
            let quality = quality_or(args.quality, config.quality())?;
            let meta = read_metadata(backend, &args.image_path)?;
            Ok(output::format_prediction(&predict(
                meta.file_size_bytes,
                format,
                quality,
            )))
        }
        ToolCall::OptimizeForWeb(args) => {
            let request = WebRequest {
                input: args.input_path.clone(),
                output: args.output_path.clone(),
                max_width: dimension_or("maxWidth", args.max_width, config.web.max_width)?,
                max_height: dimension_or("maxHeight", args.max_height, config.web.max_height)?,
            };
            Ok(output::format_web_outcome(&optimize_for_web(backend, &request)?))
        }
    }
}

/// Render the result of [`execute`] as a response.
pub fn respond(result: Result<Vec<String>, ToolError>) -> ToolResponse {
    match result {
        Ok(lines) => ToolResponse::ok(lines),
        Err(e) => {
            debug!(error = %e, "operation failed");
            ToolResponse::error(&e)
        }
    }
}

/// Parse, run and render one named operation.
pub fn call_tool(
    backend: &impl ImageBackend,
    config: &ConverterConfig,
    name: &str,
    args: serde_json::Value,
) -> ToolResponse {
    respond(ToolCall::parse(name, args).and_then(|call| execute(backend, config, &call)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp, header};
    use crate::imaging::EncoderConfig;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn stock() -> ConverterConfig {
        ConverterConfig::default()
    }

    #[test]
    fn operations_are_listed_once() {
        let names: Vec<_> = OPERATIONS.iter().map(|op| op.name).collect();
        assert_eq!(
            names,
            vec![
                "convert_image",
                "batch_convert_images",
                "get_image_info",
                "analyze_image",
                "predict_file_size",
                "optimize_for_web",
            ]
        );
    }

    #[test]
    fn unknown_operation() {
        let response = call_tool(&MockBackend::new(), &stock(), "resize_image", json!({}));
        assert!(response.is_error);
        assert_eq!(response.text, "Error: Unknown operation: resize_image");
    }

    #[test]
    fn missing_required_argument() {
        let response = call_tool(&MockBackend::new(), &stock(), "get_image_info", json!({}));
        assert!(response.is_error);
        assert!(response.text.starts_with("Error: Invalid arguments:"));
        assert!(response.text.contains("imagePath"));
    }

    #[test]
    fn unsupported_format_is_rejected_before_io() {
        let backend = MockBackend::new();
        let response = call_tool(
            &backend,
            &stock(),
            "convert_image",
            json!({"inputPath": "/in/a.png", "outputPath": "/out/a.gif", "format": "gif"}),
        );
        assert_eq!(response.text, "Error: Unsupported format: gif");
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn quality_out_of_range_is_rejected() {
        for q in [0, 101, -5] {
            let response = call_tool(
                &MockBackend::new(),
                &stock(),
                "predict_file_size",
                json!({"imagePath": "/a.png", "targetFormat": "webp", "quality": q}),
            );
            assert!(response.is_error, "quality {q}");
            assert!(response.text.contains("quality must be between 1 and 100"));
        }
    }

    #[test]
    fn zero_width_is_rejected() {
        let response = call_tool(
            &MockBackend::new(),
            &stock(),
            "convert_image",
            json!({"inputPath": "/a.png", "outputPath": "/b.png", "format": "png", "width": 0}),
        );
        assert!(response.text.contains("width must be a positive integer"));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let backend = MockBackend::new();
        for (key, value) in [("width", 4_294_967_295_i64), ("height", i64::from(MAX_DIMENSION) + 1)] {
            let mut args = json!({"inputPath": "/a.png", "outputPath": "/b.png", "format": "png"});
            args[key] = json!(value);
            let response = call_tool(&backend, &stock(), "convert_image", args);
            assert!(response.is_error);
            assert_eq!(
                response.text,
                format!("Error: Invalid arguments: {key} must be at most {MAX_DIMENSION}, got {value}")
            );
        }
        assert!(backend.get_operations().is_empty());

        let response = call_tool(
            &backend,
            &stock(),
            "optimize_for_web",
            json!({"inputPath": "/a.png", "outputPath": "/b.png", "maxWidth": 100_000}),
        );
        assert!(response.text.contains("maxWidth must be at most"));
    }

    #[test]
    fn largest_dimension_is_accepted() {
        assert_eq!(
            dimension("width", Some(i64::from(MAX_DIMENSION))).unwrap(),
            Some(MAX_DIMENSION)
        );
        assert_eq!(dimension("width", None).unwrap(), None);
    }

    #[test]
    fn convert_fills_defaults_from_config() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("a.png");
        fs::write(&input, b"").unwrap();
        let output = tmp.path().join("a.jpg");

        let mut config = stock();
        config.conversion.quality = 65;
        config.conversion.progressive = true;

        let backend = MockBackend::new();
        let response = call_tool(
            &backend,
            &config,
            "convert_image",
            json!({"inputPath": input, "outputPath": output, "format": "JPG"}),
        );
        assert!(!response.is_error, "{}", response.text);
        assert_eq!(
            response.text,
            format!("Converted to JPG: {}", output.display())
        );
        match &backend.get_operations()[0] {
            RecordedOp::Encode { encoder, .. } => assert_eq!(
                *encoder,
                EncoderConfig::Jpeg {
                    quality: Quality::new(65),
                    progressive: true,
                    trellis_quantisation: true,
                    optimise_scans: true,
                    overshoot_deringing: true,
                }
            ),
            other => panic!("expected encode, got {other:?}"),
        }
    }

    #[test]
    fn missing_input_is_an_error_response() {
        let response = call_tool(
            &MockBackend::new(),
            &stock(),
            "convert_image",
            json!({"inputPath": "/nonexistent/a.png", "outputPath": "/tmp/b.png", "format": "png"}),
        );
        assert!(response.is_error);
        assert_eq!(
            response.text,
            "Error: Input file not found: /nonexistent/a.png"
        );
    }

    #[test]
    fn batch_without_matches_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let response = call_tool(
            &MockBackend::new(),
            &stock(),
            "batch_convert_images",
            json!({
                "inputDir": tmp.path(),
                "outputDir": tmp.path().join("out"),
                "format": "webp",
                "pattern": "*.png"
            }),
        );
        assert!(!response.is_error);
        assert!(response.text.starts_with("No files found matching:"));
        assert!(response.text.ends_with("*.png"));
    }

    #[test]
    fn batch_missing_dir_is_an_error() {
        let response = call_tool(
            &MockBackend::new(),
            &stock(),
            "batch_convert_images",
            json!({"inputDir": "/nonexistent", "outputDir": "/tmp/out", "format": "webp"}),
        );
        assert!(response.is_error);
        assert!(response.text.starts_with("Error: Input directory not found"));
    }

    #[test]
    fn predict_reads_real_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.png");
        fs::write(&path, vec![0u8; 1200 * 1024]).unwrap();

        let backend = MockBackend::with_fixed_header(header("png", 1200, 900, 3));
        let response = call_tool(
            &backend,
            &stock(),
            "predict_file_size",
            json!({"imagePath": path, "targetFormat": "webp"}),
        );
        assert_eq!(
            response.text,
            "File size prediction:\n\nOriginal size: 1200 KB\nPredicted size: 360 KB\nCompression: 70%\nSavings: 840 KB"
        );
    }

    #[test]
    fn analyze_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.png");
        fs::write(&path, vec![0u8; 4096]).unwrap();

        let backend = MockBackend::with_fixed_header(header("png", 1200, 900, 4));
        let first = call_tool(&backend, &stock(), "analyze_image", json!({"imagePath": path}));
        let second = call_tool(&backend, &stock(), "analyze_image", json!({"imagePath": path}));
        assert!(!first.is_error);
        assert_eq!(first, second);
    }

    #[test]
    fn web_uses_config_box() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("big.png");
        fs::write(&input, b"").unwrap();

        let mut config = stock();
        config.web.max_width = 1000;
        config.web.max_height = 1000;

        let backend = MockBackend::with_fixed_header(header("png", 3000, 2000, 3));
        let response = call_tool(
            &backend,
            &config,
            "optimize_for_web",
            json!({"inputPath": input, "outputPath": tmp.path().join("big.jpeg")}),
        );
        assert!(response.text.contains("Optimized size: 1000x667"), "{}", response.text);
    }

    #[test]
    fn response_serializes_with_camel_case_flag() {
        let response = ToolResponse {
            text: "ok".to_string(),
            is_error: false,
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"text":"ok","isError":false}"#
        );
    }
}
