//! Batch processing support.
//!
//! Items are processed one after another. A failing item is recorded and the
//! batch moves on; it never aborts the remaining items.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DisguiseError, Result};

/// An item that failed, with the reason.
#[derive(Debug)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: DisguiseError,
}

/// Result of one item, in processing order.
#[derive(Debug)]
pub enum BatchItem {
    Done { input: PathBuf, output: PathBuf },
    Failed(BatchFailure),
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    total: usize,
    items: Vec<BatchItem>,
}

impl BatchReport {
    /// Creates an empty report for `total` items.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            items: Vec::with_capacity(total),
        }
    }

    /// Records the result of processing `input`.
    pub fn record(&mut self, input: &Path, result: Result<PathBuf>) {
        let input = input.to_path_buf();
        self.items.push(match result {
            Ok(output) => BatchItem::Done { input, output },
            Err(error) => BatchItem::Failed(BatchFailure { input, error }),
        });
    }

    /// Every recorded item, in the order processed.
    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    /// Number of items that succeeded.
    pub fn processed(&self) -> usize {
        self.outputs().len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// True if every item succeeded.
    pub fn is_success(&self) -> bool {
        self.processed() == self.total
    }

    /// `(input, output)` pairs of successful items.
    pub fn outputs(&self) -> Vec<(&Path, &Path)> {
        self.items
            .iter()
            .filter_map(|item| match item {
                BatchItem::Done { input, output } => Some((input.as_path(), output.as_path())),
                BatchItem::Failed(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&BatchFailure> {
        self.items
            .iter()
            .filter_map(|item| match item {
                BatchItem::Failed(failure) => Some(failure),
                BatchItem::Done { .. } => None,
            })
            .collect()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} processed", self.processed(), self.total)
    }
}

/// Inputs resolved from command-line arguments.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResolvedInputs {
    /// Existing files, in argument order.
    pub paths: Vec<PathBuf>,
    /// Arguments that matched nothing, with the reason.
    pub skipped: Vec<String>,
}

/// Resolves arguments to input files.
///
/// An argument naming an existing path is taken literally, even if it
/// contains glob characters. Anything else is expanded as a glob pattern,
/// for shells that pass patterns through unexpanded.
pub fn resolve_inputs<S: AsRef<str>>(patterns: &[S]) -> ResolvedInputs {
    let mut resolved = ResolvedInputs::default();

    for pattern in patterns {
        let pattern = pattern.as_ref();

        if Path::new(pattern).exists() {
            resolved.paths.push(PathBuf::from(pattern));
            continue;
        }

        match glob::glob(pattern) {
            Ok(paths) => {
                let matches: Vec<PathBuf> = paths.filter_map(|p| p.ok()).collect();
                if matches.is_empty() {
                    resolved.skipped.push(format!("'{}' not found, skipping", pattern));
                } else {
                    resolved.paths.extend(matches);
                }
            }
            Err(e) => resolved
                .skipped
                .push(format!("'{}' is not a valid pattern: {}", pattern, e)),
        }
    }

    resolved
}
