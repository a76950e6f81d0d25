//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Two different "make it smaller" rules live side by side on purpose:
//! [`cap_dimensions`] clamps each axis on its own (analysis advice), while
//! [`scale_to_bounds`] keeps the aspect ratio (web optimisation).

/// Dimensions that fit entirely inside the requested box (fit=contain).
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `width` / `height` - Requested box; a missing side is derived from the aspect ratio
///
/// With both sides, the image is scaled by the smaller of the two ratios so
/// nothing is cropped. Enlargement is allowed. Each axis is at least 1px.
///
/// # Examples
/// ```
/// # use image_converter::imaging::calculations::contain_dimensions;
/// assert_eq!(contain_dimensions((400, 200), Some(100), Some(100)), (100, 50));
/// assert_eq!(contain_dimensions((400, 200), None, Some(50)), (100, 50));
/// ```
pub fn contain_dimensions(source: (u32, u32), width: Option<u32>, height: Option<u32>) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return (width.unwrap_or(src_w).max(1), height.unwrap_or(src_h).max(1));
    }

    let ratio = match (width, height) {
        (Some(w), Some(h)) => (w as f64 / src_w as f64).min(h as f64 / src_h as f64),
        (Some(w), None) => w as f64 / src_w as f64,
        (None, Some(h)) => h as f64 / src_h as f64,
        (None, None) => return source,
    };

    let scaled = |v: u32| ((v as f64 * ratio).round() as u32).max(1);
    // Keep the requested side exact when only one side was given.
    match (width, height) {
        (Some(w), None) => (w.max(1), scaled(src_h)),
        (None, Some(h)) => (scaled(src_w), h.max(1)),
        _ => (scaled(src_w), scaled(src_h)),
    }
}

/// Aspect-preserving downscale into `max` bounds.
///
/// Returns the original dimensions when they already fit. Otherwise both axes
/// are multiplied by `min(max_w / w, max_h / h)` and rounded, never below 1px.
pub fn scale_to_bounds(source: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (w, h) = source;
    let (max_w, max_h) = max;
    if w <= max_w && h <= max_h {
        return source;
    }
    let ratio = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let scaled = |v: u32| ((v as f64 * ratio).round() as u32).max(1);
    (scaled(w), scaled(h))
}

/// Per-axis cap: `(min(cap_w, w), min(cap_h, h))`. Does not keep the aspect ratio.
pub fn cap_dimensions(source: (u32, u32), cap: (u32, u32)) -> (u32, u32) {
    (source.0.min(cap.0), source.1.min(cap.1))
}
