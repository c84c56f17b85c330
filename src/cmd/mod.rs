/*!
Command dispatcher module.

Layout:
  src/cmd/
    mod.rs      (this file: declarations + re-exports)
    serve.rs    (execute_serve: MCP over stdio)
    tools.rs    (ToolsArgs + execute_tools)
    run.rs      (RunArgs  + execute_run)
    shared.rs   (Settings, schema-driven argument building)
    format.rs   (box / table / color helpers for human output)

Conventions:
  - Each subcommand module exposes exactly one public `execute_*` function
    that returns `anyhow::Result<()>` and takes the resolved `Settings`.
  - Human output uses `format`; `--json` output never does.
*/

pub mod format;
pub mod run;
pub mod serve;
pub mod shared;
pub mod tools;

pub use run::{RunArgs, execute_run};
pub use serve::execute_serve;
pub use shared::Settings;
pub use tools::{ToolsArgs, execute_tools};
