//! Web optimisation: pick a delivery format and bound the dimensions.
//!
//! ```text
//! alpha                  → webp q80
//! else w ≤ 800 && h ≤ 600 → png (default quality)
//! else                   → jpeg q85 progressive
//! ```
//!
//! Dimensions stay unchanged when the image already fits the box; otherwise
//! they are scaled by `min(max_w / w, max_h / h)`. Only the axes that actually
//! change go into the resize request. The conversion always runs in optimize
//! mode. Quality and progressive mode come from the
//! [`UseCase::Web`](crate::analysis::UseCase) presets.

use crate::analysis::{QualityPreset, UseCase, quality_preset};
use crate::convert::{ConversionRequest, ConvertError, convert};
use crate::format::{Quality, TargetFormat};
use crate::imaging::ImageBackend;
use crate::imaging::calculations::scale_to_bounds;
use crate::metadata::{ImageMetadata, MetadataError, read_metadata};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

const SMALL_MAX: (u32, u32) = (800, 600);

#[derive(Error, Debug)]
pub enum WebError {
    #[error("{0}")]
    Metadata(#[from] MetadataError),
    #[error("{0}")]
    Convert(#[from] ConvertError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
}

impl WebRequest {
    /// A request bounded by 1920×1080.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            max_width: 1920,
            max_height: 1080,
        }
    }
}

/// The decision, before any pixel is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct WebPlan {
    pub format: TargetFormat,
    /// `None` for PNG, which has no quality knob.
    pub quality: Option<Quality>,
    pub progressive: bool,
    pub original: (u32, u32),
    pub target: (u32, u32),
}

impl WebPlan {
    /// Axes that differ from the original, as a resize request.
    pub fn resize_request(&self) -> (Option<u32>, Option<u32>) {
        let (ow, oh) = self.original;
        let (tw, th) = self.target;
        ((tw != ow).then_some(tw), (th != oh).then_some(th))
    }
}

/// Choose format, quality and dimensions for one image.
pub fn plan_for_web(meta: &ImageMetadata, max: (u32, u32)) -> WebPlan {
    let format = if meta.has_alpha {
        TargetFormat::Webp
    } else if meta.width <= SMALL_MAX.0 && meta.height <= SMALL_MAX.1 {
        TargetFormat::Png
    } else {
        TargetFormat::Jpeg
    };
    let preset = quality_preset(format, UseCase::Web);

    let original = (meta.width, meta.height);
    WebPlan {
        format,
        quality: preset.quality(),
        progressive: matches!(preset, QualityPreset::Jpeg { progressive: true, .. }),
        original,
        target: scale_to_bounds(original, max),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebOutcome {
    pub original_format: String,
    pub plan: WebPlan,
    pub output: PathBuf,
}

/// Probe, plan, then convert through the regular pipeline.
pub fn optimize_for_web(
    backend: &impl ImageBackend,
    request: &WebRequest,
) -> Result<WebOutcome, WebError> {
    let meta = read_metadata(backend, &request.input)?;
    let plan = plan_for_web(&meta, (request.max_width, request.max_height));
    let (width, height) = plan.resize_request();

    let conversion = ConversionRequest {
        quality: plan.quality.unwrap_or_default(),
        optimize: true,
        progressive: plan.progressive,
        width,
        height,
        ..ConversionRequest::new(&request.input, &request.output, plan.format)
    };
    convert(backend, &conversion)?;

    info!(
        input = %request.input.display(),
        format = %plan.format,
        width = plan.target.0,
        height = plan.target.1,
        "optimized for web"
    );

    Ok(WebOutcome {
        original_format: meta.format,
        plan,
        output: request.output.clone(),
    })
}
