//! MCP server surface.
//!
//! BuildServer exposes one MCP tool per [`ToolKind`]; each handler forwards
//! to the shared [`Toolchain`] and turns the outcome into a `CallToolResult`.
//! Input and launch errors become tool errors (is_error = true) so the client
//! sees them next to ordinary build failures.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    tool, tool_handler, tool_router,
};
use tracing::warn;

use crate::exec::ToolError;
use crate::toolchain::{
    CompileRequest, LazarusBuildRequest, LazarusCleanRequest, ProjectBuildRequest,
    ProjectCleanRequest, ToolKind, ToolReport, Toolchain,
};

const INSTRUCTIONS: &str = "Builds Delphi projects with MSBuild (delphi_build, delphi_clean), \
compiles Pascal sources with Free Pascal (fpc_compile) and builds Lazarus projects with lazbuild \
(lazarus_build, lazarus_clean). Paths may be relative to the server's working directory. \
Each call returns a status line, the exit code, and the tool's stdout and stderr.";

#[derive(Clone)]
pub struct BuildServer {
    toolchain: Arc<Toolchain>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BuildServer {
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            toolchain: Arc::new(toolchain),
            tool_router: Self::tool_router(),
        }
    }

    /// Tool definitions (name, description, input schema), sorted by name.
    pub fn definitions() -> Vec<Tool> {
        let mut tools = Self::tool_router().list_all();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    #[tool(
        description = "Build a Delphi project (.dproj) or project group (.groupproj) with MSBuild. \
        Optionally sources an environment script such as rsvars.bat first."
    )]
    pub async fn delphi_build(
        &self,
        Parameters(req): Parameters<ProjectBuildRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(ToolKind::DelphiBuild, self.toolchain.build(req).await))
    }

    #[tool(
        description = "Clean a Delphi project (.dproj) or project group (.groupproj) with MSBuild."
    )]
    pub async fn delphi_clean(
        &self,
        Parameters(req): Parameters<ProjectCleanRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(ToolKind::DelphiClean, self.toolchain.clean(req).await))
    }

    #[tool(description = "Compile a Pascal program or unit (.lpr, .pas, .pp) with Free Pascal.")]
    pub async fn fpc_compile(
        &self,
        Parameters(req): Parameters<CompileRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(ToolKind::FpcCompile, self.toolchain.compile(req).await))
    }

    #[tool(description = "Build a Lazarus project (.lpi) with lazbuild.")]
    pub async fn lazarus_build(
        &self,
        Parameters(req): Parameters<LazarusBuildRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(ToolKind::LazarusBuild, self.toolchain.lazarus_build(req).await))
    }

    #[tool(description = "Rebuild a Lazarus project (.lpi) from scratch with lazbuild --build-all.")]
    pub async fn lazarus_clean(
        &self,
        Parameters(req): Parameters<LazarusCleanRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(ToolKind::LazarusClean, self.toolchain.lazarus_clean(req).await))
    }
}

#[tool_handler]
impl ServerHandler for BuildServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

fn respond(kind: ToolKind, outcome: Result<ToolReport, ToolError>) -> CallToolResult {
    match outcome {
        Ok(report) => report.into_call_tool_result(),
        Err(e) => {
            warn!(tool = %kind, error = %e, "request rejected");
            CallToolResult::error(vec![Content::text(e.to_string())])
        }
    }
}
