use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod exec;
mod mcp;
mod toolchain;
mod utils;

use cmd::{RunArgs, Settings, ToolsArgs};
use config::ToolDefaults;
use exec::ExecOptions;

/// buildshim-mcp - MCP server for Delphi, Free Pascal and Lazarus builds
///
/// Command layout:
///   buildshim-mcp serve
///   buildshim-mcp tools [--json]
///   buildshim-mcp run <tool> [--param k=v ...] [--param-file f.yaml] [--json] [--dry-run]
///
/// Global flags / env (flag > env > built-in default; a request field beats both):
///   -v / -vv           Increase verbosity (RUST_LOG overrides)
///   -q / --quiet       Errors only
///   --rsvars PATH      DELPHI_RSVARS_PATH   environment script sourced before each tool
///   --msbuild PATH     DELPHI_MSBUILD_PATH  (default: msbuild)
///   --configuration C  DELPHI_CONFIG        (default: Release, builds only)
///   --platform P       DELPHI_PLATFORM      (default: Win32)
///   --fpc PATH         FPC_PATH             (default: fpc)
///   --lazbuild PATH    LAZBUILD_PATH        (default: lazbuild)
///   --env KEY=VALUE    extra environment for spawned tools (repeatable)
///   --cwd DIR          working directory for spawned tools
///
/// Examples:
///   buildshim-mcp serve --rsvars "C:\Program Files (x86)\Embarcadero\Studio\23.0\bin\rsvars.bat"
///   buildshim-mcp run fpc_compile --param sourcePath=src/main.lpr --param defines=DEBUG,TRACE
///   buildshim-mcp run lazarus_build --param projectPath=app.lpi --dry-run --json
#[derive(Parser, Debug)]
#[command(
    name = "buildshim-mcp",
    version,
    author,
    about = "MCP server that drives MSBuild, Free Pascal and lazbuild",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Environment initialization script (e.g. rsvars.bat)
    #[arg(long = "rsvars", global = true, value_name = "PATH")]
    rsvars: Option<PathBuf>,

    /// MSBuild executable
    #[arg(long, global = true, value_name = "PATH")]
    msbuild: Option<String>,

    /// Default build configuration for MSBuild builds
    #[arg(long, global = true, value_name = "NAME")]
    configuration: Option<String>,

    /// Default MSBuild platform
    #[arg(long, global = true, value_name = "NAME")]
    platform: Option<String>,

    /// Free Pascal compiler executable
    #[arg(long, global = true, value_name = "PATH")]
    fpc: Option<String>,

    /// lazbuild executable
    #[arg(long, global = true, value_name = "PATH")]
    lazbuild: Option<String>,

    /// Extra environment for spawned tools (repeatable KEY=VALUE)
    #[arg(short = 'e', long = "env", global = true, value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Working directory for spawned tools
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve MCP over stdio
    Serve,

    /// List exposed tools and effective defaults
    Tools(ToolsArgs),

    /// Invoke one tool directly
    Run(RunArgs),
}

impl Cli {
    /// Flag values as a defaults layer; blank flags count as unset.
    fn default_overrides(&self) -> ToolDefaults {
        let flag = |v: &Option<String>| config::non_blank(v.clone());
        ToolDefaults {
            env_init_script: self
                .rsvars
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            msbuild_path: flag(&self.msbuild),
            configuration: flag(&self.configuration),
            platform: flag(&self.platform),
            fpc_path: flag(&self.fpc),
            lazbuild_path: flag(&self.lazbuild),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let mut exec_options = ExecOptions::default();
    for kv in &cli.env {
        match utils::parse_key_value(kv) {
            Ok((k, v)) => {
                exec_options.env.insert(k, v);
            }
            Err(e) => {
                eprintln!("Invalid --env: {e}");
                std::process::exit(2);
            }
        }
    }
    if let Some(dir) = &cli.cwd
        && !dir.is_dir()
    {
        eprintln!("Invalid --cwd '{}': not a directory", dir.display());
        std::process::exit(2);
    }
    exec_options.cwd = cli.cwd.clone();

    // Defaults: CLI flag > environment variable > built-in
    let settings = Settings {
        defaults: ToolDefaults::from_env().merge(cli.default_overrides()),
        exec_options,
    };
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Commands::Serve => cmd::execute_serve(&settings),
        Commands::Tools(args) => cmd::execute_tools(args, &settings),
        Commands::Run(args) => cmd::execute_run(args, &settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "buildshim-mcp",
            "tools",
            "--platform",
            "Win64",
            "--env",
            "BDS=C:\\Studio",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.env, vec!["BDS=C:\\Studio"]);
        let overrides = cli.default_overrides();
        assert_eq!(overrides.platform.as_deref(), Some("Win64"));
        assert!(overrides.msbuild_path.is_none());
    }

    #[test]
    fn blank_flags_do_not_override() {
        let cli = Cli::try_parse_from(["buildshim-mcp", "serve", "--msbuild", "  "]).unwrap();
        let merged = ToolDefaults {
            msbuild_path: Some("C:\\MSBuild.exe".into()),
            ..Default::default()
        }
        .merge(cli.default_overrides());
        assert_eq!(merged.msbuild(), "C:\\MSBuild.exe");
    }
}
