//! List the IaC tool adapters and their state.

use super::Context;
use iac_contract_output::{OutputFormatter, dim, status_mark};
use iac_contract_tools::{IacTool, all_tools};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ToolStatus {
    pub name: String,
    pub framework: String,
    /// Required binaries are all on PATH
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Configuration directory that was checked
    pub dir: String,
    /// Configuration found in `dir`
    pub detected: bool,
    pub binaries: Vec<String>,
    pub website: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ToolsReport {
    pub tools: Vec<ToolStatus>,
}

impl OutputFormatter for ToolsReport {
    fn format_text(&self) -> String {
        self.tools
            .iter()
            .map(|t| {
                format!(
                    "{} [{}] available={} detected={} version={}",
                    t.name,
                    t.framework,
                    t.available,
                    t.detected,
                    t.version.as_deref().unwrap_or("-")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        let mut lines = Vec::new();
        for t in &self.tools {
            let version = t.version.as_deref().unwrap_or("not installed");
            lines.push(format!(
                "{} {} {}",
                status_mark(t.available, colors),
                t.name,
                dim(version, colors)
            ));
            lines.push(format!("    binaries: {}", t.binaries.join(", ")));
            let found = if t.detected { "configuration found" } else { "no configuration" };
            lines.push(format!("    {}: {}", t.dir, dim(found, colors)));
        }
        lines.join("\n")
    }
}

pub fn tool_status(tool: &dyn IacTool, dir: &Path) -> ToolStatus {
    let info = tool.info();
    let available = tool.is_available();
    ToolStatus {
        name: info.name.to_string(),
        framework: info.framework.label().to_string(),
        available,
        version: if available { tool.version() } else { None },
        dir: dir.display().to_string(),
        detected: tool.detect(dir) > 0.0,
        binaries: info.binaries.iter().map(|b| b.to_string()).collect(),
        website: info.website.to_string(),
    }
}

pub fn cmd_tools(ctx: &Context) -> i32 {
    let report = ToolsReport {
        tools: all_tools()
            .into_iter()
            .map(|tool| {
                let dir = ctx.config.framework_dir(&ctx.root, tool.info().framework);
                tool_status(tool, &dir)
            })
            .collect(),
    };
    report.print(&ctx.format);
    0
}
