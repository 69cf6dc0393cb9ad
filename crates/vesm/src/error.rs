//! Error types for the vesm CLI.

use std::path::PathBuf;

use thiserror::Error;
use vesm_atelier_setup::CompileError;

/// Errors that can occur while building
#[derive(Debug, Error)]
pub enum BuildError {
    /// A source file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file or directory could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A script failed to compile
    #[error("Error compiling {}: {source}", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },

    /// The config file is not valid JSON for the config schema
    #[error("Failed to parse {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid glob pattern
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Nothing matched the input patterns
    #[error("No files found matching the patterns: {}", .0.join(", "))]
    NoFiles(Vec<String>),

    /// Two inputs would be written to the same output file
    #[error(
        "{} and {} both compile to `{stem}`; rename one or use separate builds",
        first.display(),
        second.display()
    )]
    OutputCollision {
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Rayon thread pool setup failed
    #[error("Failed to configure thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Some files failed and `--continue-on-error` was set
    #[error("{0} file(s) failed")]
    Failed(usize),
}
