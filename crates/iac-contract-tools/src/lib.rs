//! Unified interface over the external IaC tools the contract engine consumes.
//!
//! Each adapter wraps one framework's CLI tooling and provides:
//! - Availability detection (binaries on `PATH`)
//! - Project relevance detection
//! - Declared output names from the compiled/rendered configuration
//! - Deployment outputs, unwrapped to a flat name → value map
//!
//! The tools themselves are black boxes: only their JSON output is parsed.

pub mod adapters;
mod envelope;
mod process;
mod registry;
mod retry;

pub use adapters::{Bicep, Terraform, parse_arm_template_outputs, parse_terraform_docs};
pub use envelope::{read_outputs_file, unwrap_output_envelopes};
pub use registry::{all_tools, detect_tools, get_tool, register};
pub use retry::{RetryPolicy, retry_with_fixed_delay};

use iac_contract_core::{Framework, RawOutputs};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Static information about an adapter.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub framework: Framework,
    /// Binaries that must be on `PATH` for the adapter to work.
    pub binaries: &'static [&'static str],
    /// Command printing the tool version.
    pub version_cmd: &'static [&'static str],
    /// Conventional configuration directory, relative to the blueprint root.
    pub default_dir: &'static str,
    pub website: &'static str,
}

/// Where to fetch deployment outputs from.
#[derive(Debug, Clone)]
pub struct OutputQuery {
    /// IaC configuration directory.
    pub dir: PathBuf,
    /// Azure deployment name (Bicep only).
    pub deployment_name: Option<String>,
    pub subscription_id: Option<String>,
    pub retry: RetryPolicy,
}

impl OutputQuery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            deployment_name: None,
            subscription_id: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Errors from running or parsing an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} not found on PATH")]
    NotAvailable(String),

    #[error("failed to run {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("failed to parse {tool} output: {message}")]
    Parse { tool: String, message: String },

    #[error("missing input: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// An IaC framework's tooling.
pub trait IacTool: Send + Sync {
    /// Static adapter info.
    fn info(&self) -> &ToolInfo;

    /// Check that every required binary is on `PATH`.
    fn is_available(&self) -> bool {
        self.info()
            .binaries
            .iter()
            .all(|binary| which::which(binary).is_ok())
    }

    /// Version string of the primary tool, if it can be determined.
    fn version(&self) -> Option<String> {
        process::first_line_of(self.info().version_cmd)
    }

    /// Does `dir` look like this framework's configuration? Returns 0.0-1.0.
    fn detect(&self, dir: &Path) -> f32;

    /// Output names declared by the configuration in `dir`.
    fn declared_outputs(&self, dir: &Path) -> Result<Vec<String>, ToolError>;

    /// Outputs of an existing deployment, unwrapped to `{name: value}`.
    fn deployment_outputs(&self, query: &OutputQuery) -> Result<RawOutputs, ToolError>;
}
