//! Pick-copy options, outcome models and top-level error types.

use std::path::PathBuf;

use thiserror::Error;

/// Extension used when [`SpecPickOptions::extension`] is left at its default.
pub const C_EXTENSION_DEFAULT: &str = "cr2";

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Existing destination file conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumPickConflictStrategy {
    /// Replace destination file with source file.
    #[default]
    Overwrite,
    /// Keep destination file and skip current source file.
    Skip,
    /// Record an error and skip this file.
    Error,
}

/// Coarse classification of [`PickCopyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPickErrorKind {
    /// Directories or options are unusable.
    Configuration,
    /// Nothing usable was requested.
    Input,
    /// Background worker could not run.
    Worker,
}

/// Outcome of one deduplicated requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumPickOutcome {
    /// File was copied to this destination path.
    Copied(PathBuf),
    /// No eligible source file matched.
    NotFound,
    /// Matched but intentionally not copied (conflict skip, dry run, cancel).
    Skipped(String),
    /// Matched but the copy failed.
    CopyError(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for [`crate::pick_copy`].
#[derive(Debug, Clone)]
pub struct SpecPickOptions {
    /// Target extension, with or without leading dot. Matched case-insensitively.
    pub extension: String,
    /// Conflict behavior for destination files.
    pub rule_conflict: EnumPickConflictStrategy,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
}

impl Default for SpecPickOptions {
    fn default() -> Self {
        Self {
            extension: C_EXTENSION_DEFAULT.to_string(),
            rule_conflict: EnumPickConflictStrategy::default(),
            if_dry_run: false,
        }
    }
}

/// One per-name failure or skip with its reason text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPickError {
    /// Normalized requested name.
    pub name: String,
    /// User-facing reason text.
    pub exception: String,
}

/// Per-name record in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPickItem {
    /// Normalized requested name.
    pub name: String,
    /// What happened to it.
    pub outcome: EnumPickOutcome,
}

/// "Top-level call failed" errors (input validation / setup stage).
///
/// Nothing has been copied when one of these is returned.
#[derive(Debug, Error)]
pub enum PickCopyError {
    #[error("Invalid extension `{0}`: expected ASCII letters, digits, `_` or `-`")]
    InvalidExtension(String),

    #[error("Source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("Failed to read source directory {}: {message}", .path.display())]
    SourceUnreadable { path: PathBuf, message: String },

    #[error("Destination directory not found: {}", .0.display())]
    DestinationMissing(PathBuf),

    #[error("Destination is not a directory: {}", .0.display())]
    DestinationNotDirectory(PathBuf),

    #[error("Source and destination are the same directory: {}", .0.display())]
    SourceDestinationSame(PathBuf),

    #[error("No filenames provided")]
    NoRequestedNames,

    #[error("Failed to start copy worker: {0}")]
    WorkerSpawnFailed(String),

    #[error("Copy worker stopped without a report")]
    WorkerAborted,
}

impl PickCopyError {
    /// Classify this failure for the caller.
    pub fn kind(&self) -> EnumPickErrorKind {
        match self {
            Self::NoRequestedNames => EnumPickErrorKind::Input,
            Self::WorkerSpawnFailed(_) | Self::WorkerAborted => EnumPickErrorKind::Worker,
            _ => EnumPickErrorKind::Configuration,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
