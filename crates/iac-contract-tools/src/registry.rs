//! Tool registry for looking up adapters by framework.
//!
//! Built-in adapters are registered on first use. Additional adapters (for
//! example a stub in tests, or a wrapper pinning a tool version) can be added
//! with [`register()`]; later registrations take precedence for their framework.

use crate::adapters::{Bicep, Terraform};
use crate::IacTool;
use iac_contract_core::Framework;
use std::path::PathBuf;
use std::sync::{OnceLock, RwLock};

/// Global registry of tool adapters.
static TOOLS: RwLock<Vec<&'static dyn IacTool>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register an adapter.
pub fn register(tool: &'static dyn IacTool) {
    init_builtin();
    TOOLS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push(tool);
}

fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        static TERRAFORM: Terraform = Terraform;
        static BICEP: Bicep = Bicep;
        let mut tools = TOOLS
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tools.push(&TERRAFORM);
        tools.push(&BICEP);
    });
}

/// All registered adapters, built-ins first.
pub fn all_tools() -> Vec<&'static dyn IacTool> {
    init_builtin();
    TOOLS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// The adapter for `framework` (the most recently registered one wins).
pub fn get_tool(framework: Framework) -> Option<&'static dyn IacTool> {
    all_tools()
        .into_iter()
        .rev()
        .find(|tool| tool.info().framework == framework)
}

/// Adapters whose configuration is found, with the directory they looked in.
///
/// `dir_for` maps each framework to its configuration directory; a framework
/// is reported at most once.
pub fn detect_tools<F>(dir_for: F) -> Vec<(&'static dyn IacTool, PathBuf)>
where
    F: Fn(Framework) -> PathBuf,
{
    let mut found: Vec<(&'static dyn IacTool, PathBuf)> = Vec::new();
    for framework in Framework::ALL {
        let Some(tool) = get_tool(framework) else {
            continue;
        };
        let dir = dir_for(framework);
        if tool.detect(&dir) > 0.0 {
            found.push((tool, dir));
        }
    }
    found
}
