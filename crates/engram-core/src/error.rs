//! Error taxonomy for the Knowledge Engine
//!
//! Every user-facing failure carries a kind, an offending id/path, and a
//! remediation hint, and maps to one of the exit codes in the CLI surface:
//! 0 success, 1 user error, 2 not found, 3 validation error, 4 I/O error.

use std::path::PathBuf;

/// Top-level error type returned by every `engram-core` public operation.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    /// Something the caller asked for does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    /// A file or string failed to parse into the shape the engine expects.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// A parsed value is missing a required field or carries an unknown type.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// An explicit user operation (link/update/delete) would violate a rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Underlying I/O failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `cortex.json` or a `--json` payload failed to (de)serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Malformed CLI-level input (kept here so core operations can surface it
    /// uniformly even though argument parsing itself lives in `engram-cli`).
    #[error(transparent)]
    User(#[from] UserError),
    /// A long-running operation was cancelled via its cancellation signal.
    #[error("operation cancelled")]
    Cancelled,
}

impl EngramError {
    /// Process exit code this error should produce, per spec.md §6.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngramError::NotFound(_) => 2,
            EngramError::Format(_) | EngramError::Schema(_) => 3,
            EngramError::Validation(_) => 3,
            EngramError::Io { .. } => 4,
            EngramError::Json(_) => 3,
            EngramError::User(_) => 1,
            EngramError::Cancelled => 1,
        }
    }

    /// A short, actionable remediation hint for the CLI to print alongside
    /// the error, where one is known.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            EngramError::NotFound(NotFoundError::CortexNotFound) => {
                Some("Navigate to a cortex directory or run `engram init`.")
            }
            EngramError::NotFound(NotFoundError::NeuronaNotFound(_)) => {
                Some("Check the id with `engram query \"type:*\"` or `engram status`.")
            }
            EngramError::NotFound(NotFoundError::FileNotFound(_)) => {
                Some("Check the path and try again.")
            }
            EngramError::Validation(ValidationError::ConnectionTypeNotAllowed { .. }) => {
                Some("Use `relates_to`, which is always allowed between any two types.")
            }
            _ => None,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngramError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngramError>;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum NotFoundError {
    #[error("neurona not found: {0}")]
    NeuronaNotFound(String),
    #[error("cortex not found")]
    CortexNotFound,
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid neurona format in {}: {reason}", .path.display())]
    InvalidNeuronaFormat { path: PathBuf, reason: String },
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(String),
    #[error("invalid frontmatter: {0}")]
    InvalidFrontmatter(String),
    #[error("invalid URI: {0}")]
    InvalidUri(String),
    #[error("missing component: {0}")]
    MissingComponent(String),
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required field `{field}` in {}", .path.display())]
    MissingRequiredField { path: PathBuf, field: &'static str },
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error("invalid neurona type for this operation: {0}")]
    InvalidNeuronaType(String),
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("connection type {conn_type:?} not allowed from {from_type} to {to_type}")]
    ConnectionTypeNotAllowed {
        from_type: String,
        to_type: String,
        conn_type: String,
    },
    #[error("cardinality exceeded for {from} -> {to_type:?} (max {max})")]
    CardinalityExceeded {
        from: String,
        to_type: String,
        max: usize,
    },
    #[error("connection tokens are not allowed in the Markdown body of {0}")]
    ConnectionsInBodyNotAllowed(String),
    #[error("invalid state transition for {id}: {from} -> {to}")]
    InvalidStateTransition {
        id: String,
        from: String,
        to: String,
    },
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("missing command")]
    MissingCommand,
    #[error("missing arguments: {0}")]
    MissingArguments(String),
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("invalid flag value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },
}
