//! Terraform adapter.
//!
//! Declared outputs come from `terraform-docs json`, which reads `outputs.tf`
//! statically (no init, no plan, no credentials). Deployment outputs come
//! from `terraform output -json` in the configuration directory.
//! https://terraform-docs.io/

use crate::process::run;
use crate::{IacTool, OutputQuery, ToolError, ToolInfo, retry_with_fixed_delay, unwrap_output_envelopes};
use iac_contract_core::{Framework, RawOutputs};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Terraform + terraform-docs adapter.
pub struct Terraform;

const TERRAFORM_INFO: ToolInfo = ToolInfo {
    name: "terraform",
    framework: Framework::Terraform,
    binaries: &["terraform-docs", "terraform"],
    version_cmd: &["terraform", "version"],
    default_dir: "terraform",
    website: "https://www.terraform.io/",
};

impl Terraform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Terraform {
    fn default() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct TerraformDocs {
    #[serde(default)]
    outputs: Option<Vec<DocsOutput>>,
}

#[derive(Deserialize)]
struct DocsOutput {
    name: String,
}

/// Parse `terraform-docs json` output into output names, in document order.
pub fn parse_terraform_docs(json: &str) -> Result<Vec<String>, ToolError> {
    let docs: TerraformDocs = serde_json::from_str(json).map_err(|e| ToolError::Parse {
        tool: "terraform-docs".to_string(),
        message: e.to_string(),
    })?;
    Ok(docs
        .outputs
        .unwrap_or_default()
        .into_iter()
        .map(|output| output.name)
        .collect())
}

impl IacTool for Terraform {
    fn info(&self) -> &ToolInfo {
        &TERRAFORM_INFO
    }

    fn detect(&self, dir: &Path) -> f32 {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0.0;
        };
        let mut has_tf = false;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.file_name().and_then(|n| n.to_str()) == Some("outputs.tf") {
                return 1.0;
            }
            if path.extension().and_then(|e| e.to_str()) == Some("tf") {
                has_tf = true;
            }
        }
        if has_tf { 0.8 } else { 0.0 }
    }

    fn declared_outputs(&self, dir: &Path) -> Result<Vec<String>, ToolError> {
        if !dir.is_dir() {
            return Err(ToolError::MissingInput(dir.to_path_buf()));
        }
        let mut cmd = Command::new("terraform-docs");
        cmd.arg("json").arg(dir);
        let stdout = run("terraform-docs", &mut cmd)?;
        let names = parse_terraform_docs(&stdout)?;
        tracing::debug!(dir = %dir.display(), count = names.len(), "terraform declared outputs");
        Ok(names)
    }

    fn deployment_outputs(&self, query: &OutputQuery) -> Result<RawOutputs, ToolError> {
        if !query.dir.is_dir() {
            return Err(ToolError::MissingInput(query.dir.clone()));
        }
        let stdout = retry_with_fixed_delay(&query.retry, "terraform output", || {
            let mut cmd = Command::new("terraform");
            cmd.args(["output", "-json", "-no-color"]).current_dir(&query.dir);
            run("terraform", &mut cmd)
        })?;
        let document = parse_json("terraform", &stdout)?;
        unwrap_output_envelopes(document, "terraform")
    }
}

pub(super) fn parse_json(tool: &str, stdout: &str) -> Result<serde_json::Value, ToolError> {
    if stdout.trim().is_empty() {
        return Err(ToolError::Parse {
            tool: tool.to_string(),
            message: "no output document".to_string(),
        });
    }
    serde_json::from_str(stdout).map_err(|e| ToolError::Parse {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_rejects_empty_stdout() {
        let err = parse_json("az", "  \n").unwrap_err();
        assert_eq!(err.to_string(), "failed to parse az output: no output document");
        assert!(parse_json("terraform", "{}").unwrap().is_object());
    }

    #[test]
    fn test_parse_terraform_docs_order() {
        let json = r#"{
            "header": "",
            "inputs": [{"name": "location", "type": "string"}],
            "outputs": [
                {"name": "deployment_summary", "description": "Summary"},
                {"name": "security_identity", "description": null},
                {"name": "acr_network_posture", "description": "ACR"}
            ],
            "providers": []
        }"#;
        assert_eq!(
            parse_terraform_docs(json).unwrap(),
            vec!["deployment_summary", "security_identity", "acr_network_posture"]
        );
    }

    #[test]
    fn test_parse_terraform_docs_no_outputs() {
        assert!(parse_terraform_docs(r#"{"outputs": null}"#).unwrap().is_empty());
        assert!(parse_terraform_docs(r#"{"inputs": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_terraform_docs_invalid() {
        let err = parse_terraform_docs("Error: no such directory").unwrap_err();
        assert!(matches!(err, ToolError::Parse { .. }));
    }

    #[test]
    fn test_detect() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Terraform.detect(dir.path()), 0.0);
        std::fs::write(dir.path().join("main.tf"), "").unwrap();
        assert_eq!(Terraform.detect(dir.path()), 0.8);
        std::fs::write(dir.path().join("outputs.tf"), "").unwrap();
        assert_eq!(Terraform.detect(dir.path()), 1.0);
    }

    #[test]
    fn test_declared_outputs_missing_dir() {
        let err = Terraform
            .declared_outputs(Path::new("/nonexistent/terraform"))
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingInput(_)));
    }
}
