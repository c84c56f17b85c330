/*!
shared.rs - helpers shared by the subcommands.

Focus:
  - Settings: resolved defaults + executor options, turned into a Toolchain
  - tool_definitions_json / find_tool_case_insensitive
  - build_arguments_from_schema + primitive coercion
*/

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::config::ToolDefaults;
use crate::exec::{ExecOptions, Launcher};
use crate::mcp::BuildServer;
use crate::toolchain::Toolchain;

/// Everything the global flags and environment decided, ready for a command.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub defaults: ToolDefaults,
    pub exec_options: ExecOptions,
}

impl Settings {
    pub fn toolchain(&self, launcher: Arc<dyn Launcher>) -> Toolchain {
        Toolchain::new(self.defaults.clone(), launcher).with_exec_options(self.exec_options.clone())
    }
}

/* ---- Tool Object Utilities ---- */

/// Exposed tool definitions as a JSON array of `{name, description, inputSchema}`.
pub fn tool_definitions_json() -> serde_json::Value {
    serde_json::to_value(BuildServer::definitions()).unwrap_or(serde_json::Value::Null)
}

/// Find a tool (case-insensitive name match) in a JSON array of tool objects.
pub fn find_tool_case_insensitive(
    tools: &serde_json::Value,
    name: &str,
) -> Option<serde_json::Map<String, serde_json::Value>> {
    tools.as_array()?.iter().find_map(|t| {
        let n = t.get("name").and_then(|v| v.as_str())?;
        if n.eq_ignore_ascii_case(name) {
            t.as_object().cloned()
        } else {
            None
        }
    })
}

/// `(name, required)` for each parameter in a tool's `inputSchema`, sorted by name.
pub fn schema_parameters(tool_obj: &serde_json::Map<String, serde_json::Value>) -> Vec<(String, bool)> {
    let schema = input_schema(tool_obj);
    let required = required_names(schema);
    schema
        .and_then(|s| s.get("properties"))
        .and_then(|v| v.as_object())
        .map(|props| {
            props
                .keys()
                .map(|k| (k.clone(), required.iter().any(|r| r == k)))
                .collect()
        })
        .unwrap_or_default()
}

/* ---- Argument Building / Schema Handling ---- */

/// Build the JSON arguments object for a tool call.
///
/// - `base` holds already-typed values (e.g. from a param file).
/// - `provided` holds raw strings from `--param`; each is coerced by the
///   property's declared type and overrides `base`.
/// - Keys not in the schema pass through as strings (deserialization rejects
///   them later if they matter).
/// - Errors if a required parameter ends up missing.
pub fn build_arguments_from_schema(
    tool_obj: &serde_json::Map<String, serde_json::Value>,
    provided: &HashMap<String, String>,
    base: serde_json::Map<String, serde_json::Value>,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let schema = input_schema(tool_obj);
    let props = schema
        .and_then(|s| s.get("properties"))
        .and_then(|v| v.as_object());

    let mut result = base;
    for (key, raw) in provided {
        let type_hint = props
            .and_then(|p| p.get(key))
            .map(declared_type)
            .unwrap_or("string");
        result.insert(key.clone(), coerce_value(raw, type_hint));
    }

    for name in required_names(schema) {
        if !result.contains_key(&name) {
            anyhow::bail!("missing required parameter: {}", name);
        }
    }
    Ok(result)
}

/// Attempt to coerce a raw string into a JSON value using a primitive type hint.
pub fn coerce_value(raw: &str, type_hint: &str) -> serde_json::Value {
    match type_hint {
        "integer" => raw
            .parse::<i64>()
            .map(|n| serde_json::Value::Number(n.into()))
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string())),
        "boolean" => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => serde_json::Value::Bool(true),
            "false" | "0" | "no" | "n" => serde_json::Value::Bool(false),
            _ => serde_json::Value::String(raw.to_string()),
        },
        // Comma separated; an empty string is an empty list.
        "array" => serde_json::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| serde_json::Value::String(s.to_string()))
                .collect(),
        ),
        _ => serde_json::Value::String(raw.to_string()),
    }
}

/// Accept both the wire name and the snake_case spelling.
fn input_schema(
    tool_obj: &serde_json::Map<String, serde_json::Value>,
) -> Option<&serde_json::Map<String, serde_json::Value>> {
    tool_obj
        .get("inputSchema")
        .or_else(|| tool_obj.get("input_schema"))
        .and_then(|v| v.as_object())
}

/// The property's type, ignoring `"null"` in nullable unions like `["string", "null"]`.
fn declared_type(prop: &serde_json::Value) -> &str {
    match prop.get("type") {
        Some(serde_json::Value::String(t)) => t.as_str(),
        Some(serde_json::Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null")
            .unwrap_or("string"),
        _ => "string",
    }
}

fn required_names(schema: Option<&serde_json::Map<String, serde_json::Value>>) -> Vec<String> {
    schema
        .and_then(|s| s.get("required"))
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|r| r.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/* ---- Tests ---- */
