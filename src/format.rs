//! Target formats and encoding quality.
//!
//! The set of formats is closed: every operation accepts exactly
//! `png`, `jpg`, `jpeg`, `ico`, `webp`, `avif`, `tiff` and `bmp`. Names are
//! parsed case-insensitively; anything else is an [`UnsupportedFormat`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported format: {0}")]
pub struct UnsupportedFormat(pub String);

/// A conversion target.
///
/// `Jpg` and `Jpeg` encode identically but are kept apart because the
/// requested name shows up in output file names and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Png,
    Jpg,
    Jpeg,
    Ico,
    Webp,
    Avif,
    Tiff,
    Bmp,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 8] = [
        TargetFormat::Png,
        TargetFormat::Jpg,
        TargetFormat::Jpeg,
        TargetFormat::Ico,
        TargetFormat::Webp,
        TargetFormat::Avif,
        TargetFormat::Tiff,
        TargetFormat::Bmp,
    ];

    /// Lowercase name, also used as the output file extension.
    pub fn name(self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Ico => "ico",
            TargetFormat::Webp => "webp",
            TargetFormat::Avif => "avif",
            TargetFormat::Tiff => "tiff",
            TargetFormat::Bmp => "bmp",
        }
    }

    pub fn display_name(self) -> String {
        self.name().to_uppercase()
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TargetFormat::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| UnsupportedFormat(s.to_string()))
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Clamp into `1..=100`.
    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN as u32, Self::MAX as u32) as u8)
    }

    /// Strict constructor for values coming from callers.
    pub fn checked(value: i64) -> Option<Self> {
        (Self::MIN as i64..=Self::MAX as i64)
            .contains(&value)
            .then(|| Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
