//! Directory batch conversion.
//!
//! Enumerates `input_dir/<pattern>` (or `input_dir/**/<pattern>` when
//! recursive), mirrors each match's relative directory under `output_dir`,
//! renames it to `<stem>.<format>` and converts it. A failing file is recorded
//! and the batch moves on; only directory-level problems abort.
//!
//! ```text
//! photos/a.png          →  out/a.webp
//! photos/trip/b.jpg     →  out/trip/b.webp     (recursive only)
//! ```
//!
//! ## Parallelism
//!
//! Files are converted one after another unless `max_processes > 1`. Then a
//! local rayon pool of `min(n, cores)` workers runs the conversions, provided
//! no two inputs land on the same output path (`a.png` and `a.jpg` both
//! becoming `a.webp`). Colliding plans run sequentially so the last writer is
//! deterministic. Either way the report keeps enumeration order.

use crate::convert::{ConversionRequest, convert};
use crate::format::{Quality, TargetFormat};
use crate::imaging::ImageBackend;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),
    /// Not a failure from the caller's point of view; rendered as plain text.
    #[error("No files found matching pattern: {0}")]
    NoMatchingFiles(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: TargetFormat,
    pub pattern: String,
    pub quality: Quality,
    pub optimize: bool,
    pub progressive: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub recursive: bool,
    /// `None` or `Some(1)` keeps the batch sequential.
    pub max_processes: Option<usize>,
}

impl BatchRequest {
    /// Defaults: every file with an extension, quality 80, optimize on, flat.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        format: TargetFormat,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            format,
            pattern: "*.*".to_string(),
            quality: Quality::default(),
            optimize: true,
            progressive: false,
            width: None,
            height: None,
            recursive: false,
            max_processes: None,
        }
    }

    /// Human-readable form of what was matched, e.g. `photos/**/*.png`.
    pub fn match_expression(&self) -> String {
        let dir = self.input_dir.display();
        if self.recursive {
            format!("{dir}/**/{}", self.pattern)
        } else {
            format!("{dir}/{}", self.pattern)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Result of converting one file in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: OutcomeStatus,
    /// Success summary or the error message.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub pattern: String,
    pub successes: Vec<ConversionOutcome>,
    pub failures: Vec<ConversionOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

/// Shell-style wildcard match against a file name: `*` matches any run of
/// characters (including none), `?` exactly one.
pub fn pattern_matches(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut n, mut p) = (0, 0);
    // Last `*` seen and the name position it currently absorbs up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                n += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    n = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

/// Matching files under `input_dir`, sorted by name within each directory.
///
/// Symlinks are followed, so a linked image counts as a file. Broken links and
/// link cycles are skipped.
fn enumerate(request: &BatchRequest) -> Vec<PathBuf> {
    let walker = WalkDir::new(&request.input_dir).min_depth(1).follow_links(true);
    let walker = if request.recursive {
        walker
    } else {
        walker.max_depth(1)
    };

    walker
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| pattern_matches(&e.file_name().to_string_lossy(), &request.pattern))
        .map(|e| e.into_path())
        .collect()
}

/// `output_dir/<relative dir>/<stem>.<format>`.
pub fn output_path_for(
    input: &Path,
    input_dir: &Path,
    output_dir: &Path,
    format: TargetFormat,
) -> PathBuf {
    let relative = input.strip_prefix(input_dir).unwrap_or(input);
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}.{format}");
    match relative.parent() {
        Some(dir) => output_dir.join(dir).join(name),
        None => output_dir.join(name),
    }
}

fn convert_one(backend: &impl ImageBackend, request: ConversionRequest) -> ConversionOutcome {
    debug!(input = %request.input.display(), "batch item");
    match convert(backend, &request) {
        Ok(converted) => ConversionOutcome {
            message: converted.to_string(),
            input: request.input,
            output: request.output,
            status: OutcomeStatus::Success,
        },
        Err(e) => {
            warn!(input = %request.input.display(), error = %e, "conversion failed");
            ConversionOutcome {
                message: e.to_string(),
                input: request.input,
                output: request.output,
                status: OutcomeStatus::Failure,
            }
        }
    }
}

fn has_output_collisions(plans: &[ConversionRequest]) -> bool {
    let mut seen = HashSet::new();
    plans.iter().any(|p| !seen.insert(&p.output))
}

fn worker_count(max_processes: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max_processes.map(|n| n.min(cores)).unwrap_or(1)
}

fn run_plans(
    backend: &impl ImageBackend,
    plans: Vec<ConversionRequest>,
    max_processes: Option<usize>,
) -> Vec<ConversionOutcome> {
    let workers = worker_count(max_processes);
    if workers > 1 {
        if has_output_collisions(&plans) {
            warn!("several inputs map to the same output; converting sequentially");
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => {
                    debug!(workers, "parallel batch");
                    return pool.install(|| {
                        plans
                            .into_par_iter()
                            .map(|plan| convert_one(backend, plan))
                            .collect()
                    });
                }
                Err(e) => warn!(error = %e, "thread pool unavailable; converting sequentially"),
            }
        }
    }
    plans
        .into_iter()
        .map(|plan| convert_one(backend, plan))
        .collect()
}

/// Convert every matching file under `request.input_dir`.
pub fn batch_convert(
    backend: &impl ImageBackend,
    request: &BatchRequest,
) -> Result<BatchReport, BatchError> {
    if !request.input_dir.is_dir() {
        return Err(BatchError::InputDirNotFound(request.input_dir.clone()));
    }
    std::fs::create_dir_all(&request.output_dir)?;

    let expression = request.match_expression();
    let inputs = enumerate(request);
    if inputs.is_empty() {
        return Err(BatchError::NoMatchingFiles(expression));
    }
    info!(files = inputs.len(), pattern = %expression, format = %request.format, "batch start");

    let plans: Vec<ConversionRequest> = inputs
        .into_iter()
        .map(|input| ConversionRequest {
            output: output_path_for(&input, &request.input_dir, &request.output_dir, request.format),
            input,
            format: request.format,
            quality: request.quality,
            optimize: request.optimize,
            progressive: request.progressive,
            width: request.width,
            height: request.height,
        })
        .collect();

    let (successes, failures): (Vec<_>, Vec<_>) = run_plans(backend, plans, request.max_processes)
        .into_iter()
        .partition(|o| o.status == OutcomeStatus::Success);

    info!(
        succeeded = successes.len(),
        failed = failures.len(),
        "batch finished"
    );
    Ok(BatchReport {
        pattern: expression,
        successes,
        failures,
    })
}
