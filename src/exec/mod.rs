//! Child process execution.
//!
//! [`Launcher`] is the single seam between request handling and the OS:
//! `execute(command, args, options)` spawns exactly one process, waits for it
//! and hands back an [`ExecutionResult`]. `execute_chained` does the same
//! after sourcing an environment script in that process. A non-zero exit is
//! a normal result, only a failure to start or observe the child is an error.

pub mod error;
pub mod launcher;
pub mod shell;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

pub use error::{Result, ToolError};
pub use launcher::{DryRunLauncher, ShellLauncher};
pub use shell::Interpreter;

/// Per-launch options layered over the inherited process state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Environment variables merged on top of the inherited environment.
    pub env: BTreeMap<String, String>,
}

/// Terminal outcome of one child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// `None` when the process ended without reporting a code (e.g. killed).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait Launcher: Send + Sync {
    /// Run `command` with `args`, each passed to the tool literally.
    async fn execute(
        &self,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult>;

    /// Source `script` and run `command` in the same interpreter process, so
    /// the variables the script sets are visible to the tool.
    async fn execute_chained(
        &self,
        script: &Path,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult>;
}
