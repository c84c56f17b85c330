//! Tool request payloads as they arrive over MCP (camelCase fields).

use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBuildRequest {
    /// Path to the .dproj or .groupproj file
    pub project_path: String,
    /// Build configuration (defaults to DELPHI_CONFIG or "Release")
    #[serde(default)]
    pub configuration: Option<String>,
    /// Target platform (defaults to DELPHI_PLATFORM or "Win32")
    #[serde(default)]
    pub platform: Option<String>,
    /// MSBuild executable (defaults to DELPHI_MSBUILD_PATH or "msbuild")
    #[serde(default)]
    pub tool_path: Option<String>,
    /// Environment script sourced before the build, e.g. rsvars.bat (defaults to DELPHI_RSVARS_PATH)
    #[serde(default)]
    pub env_init_script_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCleanRequest {
    /// Path to the .dproj or .groupproj file
    pub project_path: String,
    /// Build configuration to clean (only passed when given)
    #[serde(default)]
    pub configuration: Option<String>,
    /// Target platform (defaults to DELPHI_PLATFORM or "Win32")
    #[serde(default)]
    pub platform: Option<String>,
    /// MSBuild executable (defaults to DELPHI_MSBUILD_PATH or "msbuild")
    #[serde(default)]
    pub tool_path: Option<String>,
    /// Environment script sourced before the clean, e.g. rsvars.bat (defaults to DELPHI_RSVARS_PATH)
    #[serde(default)]
    pub env_init_script_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    /// Path to the .lpr, .pas or .pp source file
    pub source_path: String,
    /// Output executable path (-o)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Conditional defines, one -d flag each
    #[serde(default)]
    pub defines: Vec<String>,
    /// Unit search paths (-Fu)
    #[serde(default)]
    pub unit_search_paths: Vec<String>,
    /// Include search paths (-Fi)
    #[serde(default)]
    pub include_search_paths: Vec<String>,
    /// Target CPU, e.g. x86_64 (-P)
    #[serde(default)]
    pub target_cpu: Option<String>,
    /// Target OS, e.g. win64 (-T)
    #[serde(default)]
    pub target_os: Option<String>,
    /// Compiler executable (defaults to FPC_PATH or "fpc")
    #[serde(default)]
    pub compiler_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LazarusBuildRequest {
    /// Path to the .lpi project file
    pub project_path: String,
    /// Build mode defined in the project
    #[serde(default)]
    pub build_mode: Option<String>,
    /// Target CPU, e.g. x86_64
    #[serde(default)]
    pub target_cpu: Option<String>,
    /// Target OS, e.g. win64
    #[serde(default)]
    pub target_os: Option<String>,
    /// lazbuild executable (defaults to LAZBUILD_PATH or "lazbuild")
    #[serde(default)]
    pub tool_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LazarusCleanRequest {
    /// Path to the .lpi project file
    pub project_path: String,
    /// lazbuild executable (defaults to LAZBUILD_PATH or "lazbuild")
    #[serde(default)]
    pub tool_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_fields_with_optional_omitted() {
        let req: ProjectBuildRequest = serde_json::from_value(json!({
            "projectPath": "App.dproj",
            "envInitScriptPath": "rsvars.bat"
        }))
        .unwrap();
        assert_eq!(req.project_path, "App.dproj");
        assert_eq!(req.env_init_script_path.as_deref(), Some("rsvars.bat"));
        assert!(req.configuration.is_none());
    }

    #[test]
    fn compile_lists_default_to_empty() {
        let req: CompileRequest =
            serde_json::from_value(json!({ "sourcePath": "main.lpr", "defines": ["DEBUG"] }))
                .unwrap();
        assert_eq!(req.defines, vec!["DEBUG"]);
        assert!(req.unit_search_paths.is_empty());
    }

    #[test]
    fn missing_required_path_is_rejected() {
        let err = serde_json::from_value::<LazarusCleanRequest>(json!({ "toolPath": "lazbuild" }))
            .unwrap_err();
        assert!(err.to_string().contains("projectPath"));
    }
}
