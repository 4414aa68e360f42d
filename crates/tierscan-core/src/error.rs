//! Error types for the tierscan pipeline.
//!
//! Errors are split by blast radius. [`TierscanError`] and everything it wraps
//! are run-level: they abort the run and reach the caller. [`PipelineError`]
//! is item-level: it is caught at the worker boundary and recorded as a
//! failed `ClassificationResult`, never propagated.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level (run-level) error type.
#[derive(Error, Debug)]
pub enum TierscanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input directory could not be scanned
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Item-level error surfaced directly (single-item API only)
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Report artifacts could not be produced
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The run was cancelled before every item was dispatched
    #[error("Run cancelled after {completed} of {total} item(s)")]
    Cancelled { completed: usize, total: usize },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Fatal errors raised while scanning the input directory.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Input directory does not exist
    #[error("Input directory not found: {0}")]
    NotFound(PathBuf),

    /// Input path exists but is not a directory
    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Input directory cannot be listed
    #[error("Cannot read input directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-item processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File could not be read
    #[error("Cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// File has no content
    #[error("File is empty: {0}")]
    Empty(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Leading bytes match no known image format
    #[error("Unrecognized image format for {0} (invalid magic bytes)")]
    UnrecognizedFormat(PathBuf),

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The worker handling this item terminated without reporting
    #[error("Worker terminated before reporting a result for {0}")]
    WorkerLost(PathBuf),
}

/// Errors while serializing or persisting report artifacts.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact could not be written
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be rendered
    #[error("Cannot serialize {format} report: {message}")]
    Serialize {
        format: &'static str,
        message: String,
    },
}

/// Convenience type alias for tierscan results.
pub type Result<T> = std::result::Result<T, TierscanError>;

/// Convenience type alias for item-level results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
