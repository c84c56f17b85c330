/*!
`run.rs`

Implements the `run` subcommand: invokes one tool in-process, exactly as an
MCP client call would, without starting the server.

Parameter injection:
  --param KEY=VALUE                 (repeatable; coerced by the tool's schema)
  --param-file params.(json|yaml)   (typed values; --param overrides entries)
  --dry-run                         (print the command line instead of spawning)

JSON Output:
{
  "status": "ok" | "failed",
  "tool": "fpc_compile",
  "elapsed_ms": 42,
  "arguments": { ... },
  "report": { "summary": "...", "exit_code": 0, "stdout": "...", "stderr": "...", "is_error": false }
}

JSON Error Output:
{ "status": "error", "error": "message" }

The process exits non-zero whenever the report is an error.
*/

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji};
use crate::cmd::shared::{
    Settings, build_arguments_from_schema, find_tool_case_insensitive, tool_definitions_json,
};
use crate::exec::{DryRunLauncher, Interpreter, Launcher, ShellLauncher};
use crate::toolchain::{ToolKind, ToolReport};
use crate::utils::parse_key_value;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tool to invoke
    #[arg(value_name = "TOOL", value_enum)]
    pub tool: ToolKind,

    /// Provide parameter (KEY=VALUE), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Load parameters from file (JSON or YAML). CLI --param overrides file entries
    #[arg(long = "param-file", value_name = "PATH")]
    pub param_file: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Print the command that would run instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute_run(args: RunArgs, settings: &Settings) -> Result<()> {
    let mut provided: HashMap<String, String> = HashMap::new();
    for kv in &args.params {
        match parse_key_value(kv) {
            Ok((k, v)) => {
                provided.insert(k, v);
            }
            Err(e) => return output_error(args.json, &format!("invalid --param: {e}")),
        }
    }

    let base = match args.param_file.as_deref().map(load_param_file).transpose() {
        Ok(map) => map.unwrap_or_default(),
        Err(e) => return output_error(args.json, &format!("{e:#}")),
    };

    let tools = tool_definitions_json();
    let Some(tool_obj) = find_tool_case_insensitive(&tools, args.tool.name()) else {
        return output_error(args.json, &format!("tool '{}' not found", args.tool));
    };
    let arguments = match build_arguments_from_schema(&tool_obj, &provided, base) {
        Ok(a) => a,
        Err(e) => return output_error(args.json, &e.to_string()),
    };
    debug!(tool = %args.tool, arguments = %serde_json::Value::Object(arguments.clone()), "invoking");

    let launcher: Arc<dyn Launcher> = if args.dry_run {
        Arc::new(DryRunLauncher::new(Interpreter::native()))
    } else {
        Arc::new(ShellLauncher::default())
    };
    let toolchain = settings.toolchain(launcher);

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let started = Instant::now();
    let outcome = rt.block_on(
        toolchain.invoke(args.tool, serde_json::Value::Object(arguments.clone())),
    );
    let elapsed_ms = started.elapsed().as_millis();

    let report = match outcome {
        Ok(report) => report,
        Err(e) => return output_error(args.json, &e.to_string()),
    };

    if args.json {
        let out = serde_json::json!({
            "status": if report.is_error { "failed" } else { "ok" },
            "tool": args.tool.name(),
            "elapsed_ms": elapsed_ms,
            "arguments": arguments,
            "report": report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.to_string())
        );
    } else {
        print_report(&report, elapsed_ms);
    }

    if report.is_error {
        anyhow::bail!("{}", report.summary);
    }
    Ok(())
}

fn print_report(report: &ToolReport, elapsed_ms: u128) {
    let style = StyleOptions::detect();
    let (tag, role) = if report.is_error {
        ("error", Role::Error)
    } else {
        ("success", Role::Success)
    };
    println!(
        "{}",
        box_header(
            format!("{} {}", emoji(tag, &style), report.summary),
            Some(format!("{} • {elapsed_ms} ms", report.exit_code_line())),
            &style,
        )
    );
    for (label, body) in [("STDOUT", &report.stdout), ("STDERR", &report.stderr)] {
        println!("{}", color(role, format!("{label}:"), &style));
        if body.is_empty() {
            println!("{}", color(Role::Dim, "(empty)", &style));
        } else {
            println!("{}", body.trim_end());
        }
    }
}

/// Read a JSON or YAML object of already-typed parameters.
fn load_param_file(path: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read param file: {path}"))?;
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let value: serde_json::Value = if is_yaml {
        let yaml_v: serde_yaml::Value =
            serde_yaml::from_str(&raw).context("failed to parse YAML param file")?;
        serde_json::to_value(yaml_v).context("failed to convert YAML to JSON")?
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON param file")?
    };

    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("param file root must be an object"),
    }
}

fn output_error(json: bool, msg: &str) -> Result<()> {
    if json {
        let err = serde_json::json!({"status":"error","error":msg});
        println!(
            "{}",
            serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
        );
    } else {
        let style = StyleOptions::detect();
        let title = format!("{} Run Error", emoji("error", &style));
        println!("{}", box_header(title, Some(msg), &style));
        println!(
            "{} {}",
            emoji("info", &style),
            color(
                Role::Dim,
                "Use `buildshim-mcp tools` to see each tool's parameters.",
                &style
            )
        );
    }
    anyhow::bail!(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        Run(RunArgs),
    }

    #[test]
    fn clap_parses_tool_names() {
        let cli = TestCli::try_parse_from([
            "t",
            "run",
            "lazarus_clean",
            "--param",
            "projectPath=app.lpi",
            "--dry-run",
        ])
        .unwrap();
        let TestSub::Run(args) = cli.cmd;
        assert_eq!(args.tool, ToolKind::LazarusClean);
        assert_eq!(args.params, vec!["projectPath=app.lpi"]);
        assert!(args.dry_run);

        assert!(TestCli::try_parse_from(["t", "run", "make"]).is_err());
    }

    #[test]
    fn yaml_param_file_keeps_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.yml");
        std::fs::write(
            &path,
            "sourcePath: main.lpr\ndefines:\n  - DEBUG\n  - TRACE\n",
        )
        .unwrap();

        let map = load_param_file(path.to_str().unwrap()).unwrap();
        assert_eq!(map["sourcePath"], "main.lpr");
        assert_eq!(map["defines"], serde_json::json!(["DEBUG", "TRACE"]));
    }

    #[test]
    fn json_param_file_must_be_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = load_param_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[cfg(unix)]
    #[test]
    fn dry_run_succeeds_without_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.pas");
        std::fs::write(&source, "program main; begin end.").unwrap();

        let args = RunArgs {
            tool: ToolKind::FpcCompile,
            params: vec![format!("sourcePath={}", source.display())],
            param_file: None,
            json: true,
            dry_run: true,
        };
        execute_run(args, &Settings::default()).unwrap();
    }

    #[test]
    fn missing_required_parameter_fails() {
        let args = RunArgs {
            tool: ToolKind::DelphiBuild,
            params: vec![],
            param_file: None,
            json: true,
            dry_run: true,
        };
        let err = execute_run(args, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("projectPath"));
    }
}
