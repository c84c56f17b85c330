use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a request before (or while) a child process runs.
///
/// A tool that runs and exits non-zero is not one of these; it is reported
/// through [`crate::toolchain::ToolReport`] instead.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file type '{}': expected one of {expected}", path.display())]
    UnsupportedKind { path: PathBuf, expected: String },

    /// A token the interpreter would reinterpret whatever the quoting.
    #[error("Argument cannot be passed safely through {interpreter}: {arg:?}")]
    UnsafeArgument {
        interpreter: &'static str,
        arg: String,
    },

    #[error("Failed to resolve path '{path}': {source}")]
    Resolve {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid arguments for '{tool}': {source}")]
    InvalidRequest {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ToolError>;
