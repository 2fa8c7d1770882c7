//! CLI command implementations.
//!
//! Each command builds a serializable report, prints it in the requested
//! format and returns the process exit code.

pub mod case;
pub mod check;
pub mod contract;
pub mod outputs;
pub mod tools;

use crate::blueprint::BlueprintOutputs;
use crate::config::ContractConfig;
use iac_contract_core::{Framework, RawOutputs, parse_outputs};
use iac_contract_output::OutputFormat;
use iac_contract_tools::{get_tool, read_outputs_file};
use std::path::{Path, PathBuf};

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub root: PathBuf,
    pub config: ContractConfig,
    pub format: OutputFormat,
}

/// Where deployment outputs are read from.
#[derive(Debug, Clone)]
pub enum OutputSource {
    /// Saved `terraform output -json` / `az deployment ... show` output.
    File(PathBuf),
    /// Query the deployment through the framework's tooling.
    Live,
}

impl OutputSource {
    pub fn from_args(file: Option<PathBuf>, live: bool) -> Option<Self> {
        match (file, live) {
            (Some(path), false) => Some(OutputSource::File(path)),
            (None, true) => Some(OutputSource::Live),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            OutputSource::File(path) => path.display().to_string(),
            OutputSource::Live => "live deployment".to_string(),
        }
    }
}

/// Fetch raw outputs for `framework` from `source`.
pub fn load_raw_outputs(
    ctx: &Context,
    framework: Framework,
    source: &OutputSource,
) -> anyhow::Result<RawOutputs> {
    let raw = match source {
        OutputSource::File(path) => read_outputs_file(&resolve(&ctx.root, path))?,
        OutputSource::Live => {
            let tool = get_tool(framework)
                .ok_or_else(|| anyhow::anyhow!("no adapter registered for {framework}"))?;
            tool.deployment_outputs(&ctx.config.output_query(&ctx.root, framework))?
        }
    };
    tracing::info!(%framework, source = %source.describe(), count = raw.len(), "loaded outputs");
    Ok(raw)
}

/// Load and parse blueprint outputs for `framework`.
pub fn load_blueprint_outputs(
    ctx: &Context,
    framework: Framework,
    source: &OutputSource,
) -> anyhow::Result<BlueprintOutputs> {
    let raw = load_raw_outputs(ctx, framework, source)?;
    Ok(parse_outputs(&raw, framework)?)
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Print an error the way every command does, returning exit code 1.
pub fn report_error(err: &anyhow::Error) -> i32 {
    eprintln!("error: {err:#}");
    1
}
