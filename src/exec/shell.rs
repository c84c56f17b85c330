//! Command interpreter selection and command-line composition.
//!
//! Every launch goes through the platform interpreter so `.bat` / `.cmd`
//! wrappers and shell scripts behave the same as native binaries. The
//! interpreter is also what makes the environment-initialization chain work:
//! variables set by the script only survive inside the same interpreter process.
//!
//! Argument vectors hold raw values. Each token is quoted here, at the point
//! it becomes part of an interpreter line, so the interpreter hands the tool
//! exactly the bytes that were validated. Tokens that cannot be quoted for the
//! target interpreter are rejected before anything is spawned.

use std::path::Path;

use super::{Result, ToolError};

/// The command interpreter used to run tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpreter {
    /// `cmd.exe /C`
    Cmd,
    /// `/bin/sh -c`
    Posix,
}

impl Interpreter {
    /// The interpreter for the current platform.
    pub fn native() -> Self {
        #[cfg(windows)]
        return Interpreter::Cmd;

        #[cfg(not(windows))]
        Interpreter::Posix
    }

    pub fn program(&self) -> &'static str {
        match self {
            Interpreter::Cmd => "cmd.exe",
            Interpreter::Posix => "/bin/sh",
        }
    }

    /// Flag that makes the interpreter run the following string and exit.
    pub fn command_flag(&self) -> &'static str {
        match self {
            Interpreter::Cmd => "/C",
            Interpreter::Posix => "-c",
        }
    }

    /// Quote one token so the interpreter passes it through literally.
    ///
    /// `cmd.exe` still expands `%VAR%` inside double quotes and has no escape
    /// for `"` there, so tokens containing either are rejected, as are line
    /// breaks. `sh` single quotes everything else literally.
    pub fn quote_arg(&self, arg: &str) -> Result<String> {
        let unsafe_char = |c: char| match self {
            Interpreter::Cmd => matches!(c, '"' | '%' | '\r' | '\n' | '\0'),
            Interpreter::Posix => c == '\0',
        };
        if arg.contains(unsafe_char) {
            return Err(ToolError::UnsafeArgument {
                interpreter: self.program(),
                arg: arg.to_string(),
            });
        }

        match self {
            Interpreter::Cmd => {
                // Trailing backslashes would escape the closing quote for the
                // tool's own argument parser; doubling them keeps them literal.
                let trailing = arg.len() - arg.trim_end_matches('\\').len();
                Ok(format!("\"{arg}{}\"", "\\".repeat(trailing)))
            }
            Interpreter::Posix => Ok(shell_words::quote(arg).into_owned()),
        }
    }

    /// `program arg arg ...` as one line for the interpreter, every token quoted.
    ///
    /// Surrounding quotes a user put around the program path are dropped first.
    pub fn command_line(&self, command: &str, args: &[String]) -> Result<String> {
        let mut line = self.quote_arg(command.trim().trim_matches('"'))?;
        for arg in args {
            line.push(' ');
            line.push_str(&self.quote_arg(arg)?);
        }
        Ok(line)
    }

    /// Composite instruction that sources `script` and then, only if that
    /// succeeded, runs `command` with `args`.
    pub fn chain_env_script(&self, script: &Path, command: &str, args: &[String]) -> Result<String> {
        let script = self.quote_arg(&script.to_string_lossy())?;
        let tool = self.command_line(command, args)?;
        Ok(match self {
            Interpreter::Cmd => format!("@echo off && call {script} && {tool}"),
            Interpreter::Posix => format!(". {script} && {tool}"),
        })
    }
}
