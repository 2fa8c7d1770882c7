//! Static output contract check.
//!
//! Compares the outputs each IaC configuration declares with the outputs
//! [`BlueprintOutputs`] requires, without deploying anything.

use super::Context;
use crate::blueprint::BlueprintOutputs;
use clap::ValueEnum;
use iac_contract_core::{ContractError, Framework, required_outputs, validate_framework_contract};
use iac_contract_output::{OutputFormatter, status_mark};
use iac_contract_tools::{ToolError, detect_tools, get_tool, parse_arm_template_outputs, parse_terraform_docs};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ContractTarget {
    Terraform,
    Bicep,
    /// Every framework whose configuration is present
    #[default]
    All,
}

impl ContractTarget {
    fn framework(self) -> Option<Framework> {
        match self {
            ContractTarget::Terraform => Some(Framework::Terraform),
            ContractTarget::Bicep => Some(Framework::Bicep),
            ContractTarget::All => None,
        }
    }
}

/// Contract outcome for one framework.
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct FrameworkContract {
    pub framework: String,
    pub ok: bool,
    pub declared: Vec<String>,
    /// Required names, in the framework's casing
    pub required: Vec<String>,
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ContractSummary {
    pub results: Vec<FrameworkContract>,
}

impl ContractSummary {
    pub fn ok(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.ok)
    }
}

impl FrameworkContract {
    fn detail(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => format!("all {} required outputs declared", self.required.len()),
        }
    }
}

impl OutputFormatter for ContractSummary {
    fn format_text(&self) -> String {
        self.results
            .iter()
            .map(|r| {
                let status = if r.ok { "ok" } else { "FAILED" };
                format!("{} {}: {}", status, r.framework, r.detail())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.results
            .iter()
            .map(|r| format!("{} {}: {}", status_mark(r.ok, colors), r.framework, r.detail()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Check `declared` (or the error that prevented reading it) against the blueprint.
pub fn build_framework_contract(
    framework: Framework,
    declared: Result<Vec<String>, ToolError>,
) -> FrameworkContract {
    let canonical = required_outputs::<BlueprintOutputs>();
    let required: Vec<String> = canonical
        .iter()
        .map(|name| framework.output_key(name))
        .collect();

    let declared = match declared {
        Ok(declared) => declared,
        Err(err) => {
            return FrameworkContract {
                framework: framework.label().to_string(),
                ok: false,
                declared: Vec::new(),
                required,
                missing: Vec::new(),
                error: Some(err.to_string()),
            };
        }
    };

    match validate_framework_contract(framework, &declared, &canonical) {
        Ok(_) => FrameworkContract {
            framework: framework.label().to_string(),
            ok: true,
            declared,
            required,
            missing: Vec::new(),
            error: None,
        },
        Err(err @ ContractError::ContractViolation { .. }) => FrameworkContract {
            framework: framework.label().to_string(),
            ok: false,
            declared,
            required,
            missing: err.missing().to_vec(),
            error: Some(err.to_string()),
        },
        Err(err) => FrameworkContract {
            framework: framework.label().to_string(),
            ok: false,
            declared,
            required,
            missing: Vec::new(),
            error: Some(err.to_string()),
        },
    }
}

/// Parse a saved declaration document: `terraform-docs json` output or a
/// compiled ARM template.
pub fn read_declared_file(framework: Framework, path: &Path) -> Result<Vec<String>, ToolError> {
    let content = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        tool: path.display().to_string(),
        source,
    })?;
    match framework {
        Framework::Terraform => parse_terraform_docs(&content),
        Framework::Bicep => parse_arm_template_outputs(&content),
    }
}

fn declared_from_tool(ctx: &Context, framework: Framework) -> Result<Vec<String>, ToolError> {
    let tool = get_tool(framework).ok_or_else(|| ToolError::NotAvailable(framework.to_string()))?;
    if !tool.is_available() {
        return Err(ToolError::NotAvailable(tool.info().binaries.join(", ")));
    }
    tool.declared_outputs(&ctx.config.framework_dir(&ctx.root, framework))
}

pub fn cmd_contract(ctx: &Context, target: ContractTarget, declared_file: Option<&Path>) -> i32 {
    let summary = match (target.framework(), declared_file) {
        (Some(framework), Some(path)) => ContractSummary {
            results: vec![build_framework_contract(
                framework,
                read_declared_file(framework, &super::resolve(&ctx.root, path)),
            )],
        },
        (None, Some(_)) => {
            eprintln!("error: --declared needs a single framework (terraform or bicep)");
            return 1;
        }
        (Some(framework), None) => ContractSummary {
            results: vec![build_framework_contract(
                framework,
                declared_from_tool(ctx, framework),
            )],
        },
        (None, None) => {
            let detected = detect_tools(|framework| ctx.config.framework_dir(&ctx.root, framework));
            if detected.is_empty() {
                eprintln!(
                    "error: no terraform or bicep configuration found under {}",
                    ctx.root.display()
                );
                return 1;
            }
            ContractSummary {
                results: detected
                    .into_iter()
                    .map(|(tool, _)| {
                        let framework = tool.info().framework;
                        build_framework_contract(framework, declared_from_tool(ctx, framework))
                    })
                    .collect(),
            }
        }
    };

    summary.print(&ctx.format);
    if summary.ok() { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(framework: Framework) -> Vec<String> {
        required_outputs::<BlueprintOutputs>()
            .iter()
            .map(|name| framework.output_key(name))
            .collect()
    }

    #[test]
    fn test_complete_declarations_pass() {
        for framework in Framework::ALL {
            let result = build_framework_contract(framework, Ok(declared(framework)));
            assert!(result.ok, "{framework}");
            assert!(result.missing.is_empty());
        }
    }

    #[test]
    fn test_bicep_missing_output() {
        let mut names = declared(Framework::Bicep);
        names.retain(|name| name != "acrNetworkPosture");
        let result = build_framework_contract(Framework::Bicep, Ok(names));
        assert!(!result.ok);
        assert_eq!(result.missing, vec!["acrNetworkPosture"]);

        let summary = ContractSummary { results: vec![result] };
        insta::assert_snapshot!(summary.format_text(), @r"
        FAILED bicep: missing 1 required output(s) in bicep: [acrNetworkPosture]
          ensure these outputs are declared in bicep/main.bicep
        ");
    }

    #[test]
    fn test_snake_case_names_do_not_satisfy_bicep() {
        let result = build_framework_contract(Framework::Bicep, Ok(declared(Framework::Terraform)));
        assert!(!result.ok);
        // single-word names are spelled the same in both conventions
        assert_eq!(result.missing.len(), 11);
        assert!(!result.missing.contains(&"assets".to_string()));
    }

    #[test]
    fn test_tool_error_fails() {
        let result = build_framework_contract(
            Framework::Terraform,
            Err(ToolError::NotAvailable("terraform-docs".to_string())),
        );
        assert!(!result.ok);
        assert_eq!(result.error.as_deref(), Some("terraform-docs not found on PATH"));
    }

    #[test]
    fn test_empty_summary_is_not_ok() {
        assert!(!ContractSummary { results: Vec::new() }.ok());
    }
}
