/*!
`tools.rs`

Implements the `tools` subcommand: lists the tools the server exposes,
their parameters, and the defaults that apply when a request leaves a
field empty.

JSON Output Shape:
{
  "status": "ok",
  "count": 5,
  "tools": [
    { "name": "delphi_build", "description": "...", "inputSchema": { ... } }
  ],
  "defaults": {
    "envInitScriptPath": null,
    "msbuild": "msbuild",
    ...
  }
}
*/

use anyhow::Result;
use clap::Args;

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji, table};
use crate::cmd::shared::{Settings, schema_parameters, tool_definitions_json};
use crate::config::ToolDefaults;

/// CLI arguments for `buildshim-mcp tools`
#[derive(Args, Debug, Default)]
pub struct ToolsArgs {
    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_tools(args: ToolsArgs, settings: &Settings) -> Result<()> {
    let tools = tool_definitions_json();
    let items = tools.as_array().cloned().unwrap_or_default();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": "ok",
                "count": items.len(),
                "tools": items,
                "defaults": defaults_json(&settings.defaults),
            }))?
        );
        return Ok(());
    }

    let style = StyleOptions::detect();
    println!(
        "{}",
        box_header(
            format!("{} Tools ({})", emoji("tool", &style), items.len()),
            Some("* = required"),
            &style,
        )
    );

    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(|t| t.as_object())
        .map(|t| {
            let name = t
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("<unnamed>")
                .to_string();
            let params = schema_parameters(t)
                .into_iter()
                .map(|(p, required)| if required { format!("{p}*") } else { p })
                .collect::<Vec<_>>()
                .join(", ");
            let desc = t
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            vec![name, params, desc]
        })
        .collect();
    println!("{}", table(&["NAME", "PARAMS", "DESCRIPTION"], &rows, &style));

    println!("\n{}", color(Role::Accent, "Defaults:", &style));
    let d = &settings.defaults;
    let script = d
        .env_init_script
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let default_rows = vec![
        vec!["env init script".to_string(), script],
        vec!["msbuild".to_string(), d.msbuild().to_string()],
        vec!["configuration".to_string(), d.build_configuration().to_string()],
        vec!["platform".to_string(), d.platform().to_string()],
        vec!["fpc".to_string(), d.fpc().to_string()],
        vec!["lazbuild".to_string(), d.lazbuild().to_string()],
    ];
    println!("{}", table(&["SETTING", "VALUE"], &default_rows, &style));

    println!(
        "\n{} {}",
        emoji("info", &style),
        color(
            Role::Dim,
            "Use `buildshim-mcp run <tool> --param key=value` to invoke a tool directly",
            &style
        )
    );
    Ok(())
}

/// Effective defaults, keyed like the request fields they stand in for.
fn defaults_json(d: &ToolDefaults) -> serde_json::Value {
    serde_json::json!({
        "envInitScriptPath": d.env_init_script.as_ref().map(|p| p.display().to_string()),
        "msbuild": d.msbuild(),
        "configuration": d.build_configuration(),
        "platform": d.platform(),
        "fpc": d.fpc(),
        "lazbuild": d.lazbuild(),
    })
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
        Tools(ToolsArgs),
    }

    #[test]
    fn clap_parses_tools_json() {
        let cli = TestCli::try_parse_from(["t", "tools", "--json"]).unwrap();
        let TestSub::Tools(args) = cli.cmd;
        assert!(args.json);
    }

    #[test]
    fn defaults_fall_back_to_builtins() {
        let d = ToolDefaults {
            platform: Some("Win64".into()),
            ..Default::default()
        };
        let v = defaults_json(&d);
        assert_eq!(v["platform"], "Win64");
        assert_eq!(v["configuration"], "Release");
        assert_eq!(v["msbuild"], "msbuild");
        assert!(v["envInitScriptPath"].is_null());
    }
}
