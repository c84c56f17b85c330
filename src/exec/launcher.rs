use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, trace};

use super::{ExecOptions, ExecutionResult, Interpreter, Launcher, Result, ToolError};

/// Runs tools through the platform command interpreter.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    interpreter: Interpreter,
}

impl ShellLauncher {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }

    /// The interpreter process for one composed line.
    fn command_for(&self, line: &str) -> Command {
        let mut cmd = Command::new(self.interpreter.program());
        match self.interpreter {
            Interpreter::Cmd => {
                // /S strips exactly the outer pair of quotes, leaving `line` intact.
                cmd.args(["/D", "/V:OFF", "/S", "/C"]);
                push_verbatim(&mut cmd, &format!("\"{line}\""));
            }
            Interpreter::Posix => {
                cmd.arg(self.interpreter.command_flag()).arg(line);
            }
        }
        cmd
    }

    async fn run_line(
        &self,
        program: &str,
        line: &str,
        options: &ExecOptions,
    ) -> Result<ExecutionResult> {
        let started = Instant::now();

        let mut cmd = self.command_for(line);
        if let Some(dir) = &options.cwd {
            cmd.current_dir(dir);
        }
        cmd.envs(&options.env)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        debug!(program, line, cwd = ?options.cwd, "spawning process");

        let mut child = cmd.spawn().map_err(|source| ToolError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (stdout, stderr, status) = tokio::join!(
            drain(stdout, "stdout"),
            drain(stderr, "stderr"),
            child.wait()
        );

        let io_err = |source| ToolError::Io {
            program: program.to_string(),
            source,
        };
        let status = status.map_err(io_err)?;
        let result = ExecutionResult {
            exit_code: status.code(),
            stdout: stdout.map_err(io_err)?,
            stderr: stderr.map_err(io_err)?,
        };

        info!(
            program,
            exit_code = ?result.exit_code,
            duration_ms = started.elapsed().as_millis() as u64,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "process finished"
        );

        Ok(result)
    }
}

impl Default for ShellLauncher {
    fn default() -> Self {
        Self::new(Interpreter::native())
    }
}

#[async_trait]
impl Launcher for ShellLauncher {
    async fn execute(
        &self,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult> {
        let line = self.interpreter.command_line(command, args)?;
        self.run_line(command, &line, options).await
    }

    async fn execute_chained(
        &self,
        script: &Path,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult> {
        let line = self.interpreter.chain_env_script(script, command, args)?;
        self.run_line(command, &line, options).await
    }
}

/// Prints what would run instead of running it.
#[derive(Debug, Clone)]
pub struct DryRunLauncher {
    interpreter: Interpreter,
}

impl DryRunLauncher {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }

    fn report(&self, line: String, options: &ExecOptions) -> ExecutionResult {
        let mut stdout = format!(
            "{} {} {line}",
            self.interpreter.program(),
            self.interpreter.command_flag()
        );
        if let Some(dir) = &options.cwd {
            stdout.push_str(&format!("\n(cwd: {})", dir.display()));
        }
        for (key, value) in &options.env {
            stdout.push_str(&format!("\n(env: {key}={value})"));
        }
        ExecutionResult {
            exit_code: Some(0),
            stdout,
            stderr: String::new(),
        }
    }
}

#[async_trait]
impl Launcher for DryRunLauncher {
    async fn execute(
        &self,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult> {
        let line = self.interpreter.command_line(command, args)?;
        Ok(self.report(line, options))
    }

    async fn execute_chained(
        &self,
        script: &Path,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult> {
        let line = self.interpreter.chain_env_script(script, command, args)?;
        Ok(self.report(line, options))
    }
}

fn push_verbatim(cmd: &mut Command, arg: &str) {
    #[cfg(windows)]
    cmd.raw_arg(arg);

    #[cfg(not(windows))]
    cmd.arg(arg);
}

/// Read a pipe to EOF as the child produces it.
async fn drain<R: AsyncRead + Unpin>(
    pipe: Option<R>,
    stream: &'static str,
) -> std::io::Result<String> {
    let Some(mut pipe) = pipe else {
        return Ok(String::new());
    };
    let mut collected = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        trace!(stream, bytes = n, "child output");
        collected.extend_from_slice(&chunk[..n]);
    }
    Ok(String::from_utf8_lossy(&collected).into_owned())
}
