use std::path::Path;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use super::paths::base_name;
use crate::exec::ExecutionResult;

/// What a request did, for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Build,
    Clean,
    Compile,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Build => "Build",
            Action::Clean => "Clean",
            Action::Compile => "Compile",
        }
    }
}

/// Uniform response for every request kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolReport {
    pub summary: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub is_error: bool,
}

impl ToolReport {
    pub fn new(action: Action, input: &Path, result: ExecutionResult) -> Self {
        let is_error = !result.success();
        let outcome = if is_error { "failed" } else { "succeeded" };
        Self {
            summary: format!("{} {}: {}", action.as_str(), outcome, base_name(input)),
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
            is_error,
        }
    }

    pub fn exit_code_line(&self) -> String {
        match self.exit_code {
            Some(code) => format!("Exit code: {code}"),
            None => "Exit code: none".to_string(),
        }
    }

    /// Status, exit code, stdout, stderr.
    pub fn segments(&self) -> [String; 4] {
        [
            self.summary.clone(),
            self.exit_code_line(),
            format!("STDOUT:\n{}", self.stdout),
            format!("STDERR:\n{}", self.stderr),
        ]
    }

    pub fn into_call_tool_result(self) -> CallToolResult {
        let content: Vec<Content> = self.segments().into_iter().map(Content::text).collect();
        if self.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}
