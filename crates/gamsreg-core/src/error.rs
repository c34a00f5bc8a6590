//! Error types and exit codes for registry operations.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes for the `gamsreg` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Registry (or manifest) written, or nothing to do
    Success = 0,
    /// Validation failed or the registry was restored after an error
    Failure = 1,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Argument and filesystem checks that run before anything is modified.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is not writable", .0.display())]
    NotWritable(PathBuf),

    #[error("File {} does not exist", .0.display())]
    MissingRegistry(PathBuf),

    #[error("{} does not exist or is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("{} does not exist", .0.display())]
    MissingManifest(PathBuf),

    #[error("Solver id {0} needs to consist of exactly 3 non-whitespace characters")]
    InvalidSolverId(String),

    #[error("At least one model type needs to be specified")]
    NoModelTypes,

    #[error("Dictionary type {0} should be a number")]
    InvalidDictType(String),

    #[error("Options definition file {} does not exist or is not a file", .0.display())]
    MissingOptionFile(PathBuf),

    #[error("Solver name must be a single non-empty word, got {0:?}")]
    InvalidSolverName(String),
}

/// Errors raised while rewriting the registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A header for the target solver could not be parsed.
    #[error("Expected {expected} in this line: {line}")]
    MalformedEntry {
        expected: &'static str,
        line: String,
    },

    /// A new entry was supplied but the file has no defaults section.
    #[error("No line starting with {sentinel} found; cannot add section for {key}")]
    MissingSentinel { key: String, sentinel: &'static str },

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        RegistryError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether the live file had to be restored because of this error.
    pub fn is_transformation_error(&self) -> bool {
        matches!(
            self,
            RegistryError::MalformedEntry { .. } | RegistryError::MissingSentinel { .. }
        )
    }
}

/// Errors reading a libtool archive.
#[derive(Debug, Error)]
pub enum LibtoolError {
    #[error("no libdir or dlname found in {}", .0.display())]
    MissingFields(PathBuf),

    #[error("{} does not exist or is not a file", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("path conversion of {path} failed: {message}")]
    PathConversion { path: String, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors rewriting a solver configuration manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{} does not exist or is not a file", .0.display())]
    DefinitionNotFound(PathBuf),

    #[error(transparent)]
    Libtool(#[from] LibtoolError),

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
