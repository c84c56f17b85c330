//! Request handling: validate → build arguments → (optionally wrap) →
//! execute → format.
//!
//! [`Toolchain`] owns the defaults and the [`Launcher`]; each public method
//! handles one request kind end to end and returns a [`ToolReport`]. Input
//! problems are returned as [`ToolError`] before anything is spawned.

pub mod args;
pub mod paths;
pub mod report;
pub mod request;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::{ToolDefaults, non_blank};
use crate::exec::{ExecOptions, ExecutionResult, Launcher, Result, ToolError};
use args::{FpcOptions, MsBuildTarget};
use paths::ProjectKind;

pub use report::{Action, ToolReport};
pub use request::{
    CompileRequest, LazarusBuildRequest, LazarusCleanRequest, ProjectBuildRequest,
    ProjectCleanRequest,
};

/// The tools exposed over MCP and through `run`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ToolKind {
    /// Build a .dproj / .groupproj with MSBuild
    #[value(name = "delphi_build")]
    DelphiBuild,
    /// Clean a .dproj / .groupproj with MSBuild
    #[value(name = "delphi_clean")]
    DelphiClean,
    /// Compile a Pascal source with Free Pascal
    #[value(name = "fpc_compile")]
    FpcCompile,
    /// Build a Lazarus .lpi project with lazbuild
    #[value(name = "lazarus_build")]
    LazarusBuild,
    /// Rebuild a Lazarus .lpi project from scratch with lazbuild
    #[value(name = "lazarus_clean")]
    LazarusClean,
}

impl ToolKind {
    pub const fn variants() -> &'static [ToolKind] {
        &[
            ToolKind::DelphiBuild,
            ToolKind::DelphiClean,
            ToolKind::FpcCompile,
            ToolKind::LazarusBuild,
            ToolKind::LazarusClean,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::DelphiBuild => "delphi_build",
            ToolKind::DelphiClean => "delphi_clean",
            ToolKind::FpcCompile => "fpc_compile",
            ToolKind::LazarusBuild => "lazarus_build",
            ToolKind::LazarusClean => "lazarus_clean",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Toolchain {
    defaults: ToolDefaults,
    launcher: Arc<dyn Launcher>,
    options: ExecOptions,
}

impl Toolchain {
    pub fn new(defaults: ToolDefaults, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            defaults,
            launcher,
            options: ExecOptions::default(),
        }
    }

    /// Working directory / environment applied to every launch.
    pub fn with_exec_options(mut self, options: ExecOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn build(&self, req: ProjectBuildRequest) -> Result<ToolReport> {
        let project = paths::resolve_input(&req.project_path, ProjectKind::Delphi)?;
        let configuration = non_blank(req.configuration)
            .unwrap_or_else(|| self.defaults.build_configuration().to_string());
        let platform =
            non_blank(req.platform).unwrap_or_else(|| self.defaults.platform().to_string());
        let args = args::msbuild_args(
            &project,
            MsBuildTarget::Build,
            Some(configuration.as_str()),
            Some(platform.as_str()),
        );
        let tool =
            non_blank(req.tool_path).unwrap_or_else(|| self.defaults.msbuild().to_string());
        let script = self.env_script(req.env_init_script_path)?;

        info!(
            tool = %ToolKind::DelphiBuild,
            project = %project.display(),
            %configuration,
            %platform,
            "build requested"
        );
        let result = self.launch(&tool, &args, script.as_deref()).await?;
        Ok(finish(ToolKind::DelphiBuild, Action::Build, &project, result))
    }

    pub async fn clean(&self, req: ProjectCleanRequest) -> Result<ToolReport> {
        let project = paths::resolve_input(&req.project_path, ProjectKind::Delphi)?;
        let configuration = non_blank(req.configuration);
        let platform =
            non_blank(req.platform).unwrap_or_else(|| self.defaults.platform().to_string());
        let args = args::msbuild_args(
            &project,
            MsBuildTarget::Clean,
            configuration.as_deref(),
            Some(platform.as_str()),
        );
        let tool =
            non_blank(req.tool_path).unwrap_or_else(|| self.defaults.msbuild().to_string());
        let script = self.env_script(req.env_init_script_path)?;

        info!(
            tool = %ToolKind::DelphiClean,
            project = %project.display(),
            %platform,
            "clean requested"
        );
        let result = self.launch(&tool, &args, script.as_deref()).await?;
        Ok(finish(ToolKind::DelphiClean, Action::Clean, &project, result))
    }

    pub async fn compile(&self, req: CompileRequest) -> Result<ToolReport> {
        let source = paths::resolve_input(&req.source_path, ProjectKind::Pascal)?;
        let args = args::fpc_args(
            &source,
            FpcOptions {
                target_cpu: req.target_cpu.as_deref(),
                target_os: req.target_os.as_deref(),
                output_path: req.output_path.as_deref(),
                defines: &req.defines,
                unit_search_paths: &req.unit_search_paths,
                include_search_paths: &req.include_search_paths,
            },
        )?;
        let compiler =
            non_blank(req.compiler_path).unwrap_or_else(|| self.defaults.fpc().to_string());

        info!(tool = %ToolKind::FpcCompile, source = %source.display(), "compile requested");
        let result = self.launch(&compiler, &args, None).await?;
        Ok(finish(ToolKind::FpcCompile, Action::Compile, &source, result))
    }

    pub async fn lazarus_build(&self, req: LazarusBuildRequest) -> Result<ToolReport> {
        let project = paths::resolve_input(&req.project_path, ProjectKind::Lazarus)?;
        let args = args::lazbuild_args(
            &project,
            req.build_mode.as_deref(),
            req.target_cpu.as_deref(),
            req.target_os.as_deref(),
        );
        let tool =
            non_blank(req.tool_path).unwrap_or_else(|| self.defaults.lazbuild().to_string());

        info!(tool = %ToolKind::LazarusBuild, project = %project.display(), "build requested");
        let result = self.launch(&tool, &args, None).await?;
        Ok(finish(ToolKind::LazarusBuild, Action::Build, &project, result))
    }

    pub async fn lazarus_clean(&self, req: LazarusCleanRequest) -> Result<ToolReport> {
        let project = paths::resolve_input(&req.project_path, ProjectKind::Lazarus)?;
        let args = args::lazbuild_clean_args(&project);
        let tool =
            non_blank(req.tool_path).unwrap_or_else(|| self.defaults.lazbuild().to_string());

        info!(tool = %ToolKind::LazarusClean, project = %project.display(), "clean requested");
        let result = self.launch(&tool, &args, None).await?;
        Ok(finish(ToolKind::LazarusClean, Action::Clean, &project, result))
    }

    /// Dispatch untyped JSON arguments to the handler for `kind`.
    pub async fn invoke(&self, kind: ToolKind, arguments: serde_json::Value) -> Result<ToolReport> {
        match kind {
            ToolKind::DelphiBuild => self.build(parse_request(kind, arguments)?).await,
            ToolKind::DelphiClean => self.clean(parse_request(kind, arguments)?).await,
            ToolKind::FpcCompile => self.compile(parse_request(kind, arguments)?).await,
            ToolKind::LazarusBuild => self.lazarus_build(parse_request(kind, arguments)?).await,
            ToolKind::LazarusClean => self.lazarus_clean(parse_request(kind, arguments)?).await,
        }
    }

    /// Request value, else the configured default, made absolute.
    fn env_script(&self, requested: Option<String>) -> Result<Option<PathBuf>> {
        match non_blank(requested) {
            Some(raw) => paths::absolutize(&raw).map(Some),
            None => match &self.defaults.env_init_script {
                Some(path) => paths::absolutize(&path.to_string_lossy()).map(Some),
                None => Ok(None),
            },
        }
    }

    /// Run `tool`, chained after the environment script when one exists on disk.
    async fn launch(
        &self,
        tool: &str,
        args: &[String],
        env_script: Option<&Path>,
    ) -> Result<ExecutionResult> {
        match env_script {
            Some(script) if script.is_file() => {
                debug!(script = %script.display(), tool, "chaining environment script");
                self.launcher
                    .execute_chained(script, tool, args, &self.options)
                    .await
            }
            Some(script) => {
                warn!(
                    script = %script.display(),
                    "environment script not found, running tool directly"
                );
                self.launcher.execute(tool, args, &self.options).await
            }
            None => {
                debug!(tool, args = ?args, "running tool directly");
                self.launcher.execute(tool, args, &self.options).await
            }
        }
    }
}

fn parse_request<T: DeserializeOwned>(kind: ToolKind, arguments: serde_json::Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidRequest {
        tool: kind.name().to_string(),
        source,
    })
}

fn finish(kind: ToolKind, action: Action, input: &Path, result: ExecutionResult) -> ToolReport {
    let report = ToolReport::new(action, input, result);
    info!(
        tool = %kind,
        exit_code = ?report.exit_code,
        is_error = report.is_error,
        "{}",
        report.summary
    );
    report
}
