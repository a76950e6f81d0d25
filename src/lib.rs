//! # Image Converter
//!
//! Converts raster images between formats and gives advice before you do.
//! Encoder settings come from a fixed policy table per target format; the
//! advisory operations (analysis, size prediction, web optimisation) work from
//! header metadata alone.
//!
//! # Architecture
//!
//! ```text
//! tools (named operations, text in/out)
//!   ├── batch    ──► convert ──► imaging::encoder (policy) ──► ImageBackend
//!   ├── web      ──► convert
//!   ├── analysis ◄── metadata ◄── ImageBackend::probe
//!   └── predict  ◄── metadata
//! ```
//!
//! Everything that touches pixels goes through the [`imaging::ImageBackend`]
//! trait. The decision layer (policy, analysis, prediction, web plan, batch
//! planning) is plain functions over plain data, so unit tests run it against
//! a recording mock without decoding a single image.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`format`] | Target formats and the quality scale |
//! | [`imaging`] | Encoder policy, fit=contain math, `ImageBackend` + `RustBackend` |
//! | [`metadata`] | Header probe + file stats → `ImageMetadata` / `ImageInfo` |
//! | [`convert`] | One conversion: validate, mkdir, resize, encode |
//! | [`batch`] | Directory enumeration with per-file failure isolation |
//! | [`analysis`] | Rule-based optimisation recommendations, quality presets |
//! | [`predict`] | Ratio-table size prediction |
//! | [`web`] | Format and bounding-box choice for web delivery |
//! | [`tools`] | The six named operations behind a text boundary |
//! | [`output`] | Text rendering of every result |
//! | [`config`] | `config.toml` defaults layer |
//!
//! # Design Decisions
//!
//! ## BMP Writes PNG
//!
//! A `bmp` request is encoded with default PNG settings and the file holds PNG
//! bytes under whatever name was asked for. Callers that relied on this keep
//! working; see [`imaging::encoder::configure`].
//!
//! ## Bounded Resizes
//!
//! Requested sides are capped at [`imaging::MAX_DIMENSION`] and resize
//! results at [`imaging::MAX_PIXELS`]. An oversized request fails for that
//! file only instead of aborting the process on allocation.
//!
//! ## Sequential Batches
//!
//! Batches convert one file at a time unless `[processing] max_processes` (or
//! `--jobs`) asks for more. The parallel path uses a local rayon pool so the
//! library never touches the global one.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod convert;
pub mod format;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod predict;
pub mod tools;
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
