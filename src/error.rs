// src/error.rs

//! Error types for the package build pipeline
//!
//! Every failure the pipeline can report is one of a small number of kinds.
//! Callers that only need to branch on the category use [`Error::kind`];
//! the variants themselves carry the path, field or tool involved.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

/// Coarse error category, stable across payload changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A metadata file was unreadable or malformed
    Metadata,
    /// A required field could not be resolved
    Validation,
    /// Directory creation, copy or rename failed
    Filesystem,
    /// An external command failed to start or exited non-zero
    ExternalTool,
    /// The operation requires root
    Privilege,
    /// The build configuration is invalid
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Metadata => write!(f, "metadata"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Filesystem => write!(f, "filesystem"),
            ErrorKind::ExternalTool => write!(f, "external-tool"),
            ErrorKind::Privilege => write!(f, "privilege"),
            ErrorKind::Config => write!(f, "config"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Changelog or control file unreadable or unparseable
    #[error("{}: {field}: {message}", location(.path, .line))]
    Metadata {
        path: PathBuf,
        line: Option<usize>,
        field: String,
        message: String,
    },

    /// Required field missing after parsing and defaulting
    #[error("required field '{field}' could not be resolved: {message}")]
    Validation { field: String, message: String },

    /// Staging, archiving or artifact collection I/O failure
    #[error("{action} '{}': {source}", .path.display())]
    Filesystem {
        action: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit (or spawn failure) of an external command
    #[error("{tool} failed: {message}")]
    ExternalTool {
        tool: String,
        status: Option<i32>,
        message: String,
    },

    /// Elevated privilege required but not held
    #[error("{0} requires root privileges (try running with sudo)")]
    Privilege(String),

    /// Invalid build configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn location(path: &Path, line: &Option<usize>) -> String {
    match line {
        Some(n) => format!("{}:{}", path.display(), n),
        None => path.display().to_string(),
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Metadata { .. } => ErrorKind::Metadata,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Filesystem { .. } => ErrorKind::Filesystem,
            Error::ExternalTool { .. } => ErrorKind::ExternalTool,
            Error::Privilege(_) => ErrorKind::Privilege,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// The metadata field this error is about, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Metadata { field, .. } | Error::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub(crate) fn metadata(
        path: &Path,
        line: Option<usize>,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Error::Metadata {
            path: path.to_path_buf(),
            line,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn fs(action: &str, path: &Path, source: std::io::Error) -> Self {
        Error::Filesystem {
            action: action.to_string(),
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn tool_status(tool: &str, status: ExitStatus) -> Self {
        let message = match status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        Error::ExternalTool {
            tool: tool.to_string(),
            status: status.code(),
            message,
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
