//! Bicep adapter.
//!
//! Declared outputs come from compiling `main.bicep` to an ARM template with
//! `az bicep build --stdout`; deployment outputs from `az deployment sub show`.
//! Output order in the compiled template is not guaranteed.
//! https://learn.microsoft.com/azure/azure-resource-manager/bicep/

use super::terraform::parse_json;
use crate::process::run;
use crate::{IacTool, OutputQuery, ToolError, ToolInfo, retry_with_fixed_delay, unwrap_output_envelopes};
use iac_contract_core::{Framework, RawOutputs};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::process::Command;

const MAIN_BICEP: &str = "main.bicep";

/// Azure CLI Bicep adapter.
pub struct Bicep;

const BICEP_INFO: ToolInfo = ToolInfo {
    name: "bicep",
    framework: Framework::Bicep,
    binaries: &["az"],
    version_cmd: &["az", "bicep", "version"],
    default_dir: "bicep",
    website: "https://learn.microsoft.com/azure/azure-resource-manager/bicep/",
};

impl Bicep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Bicep {
    fn default() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct ArmTemplate {
    #[serde(default)]
    outputs: Option<Map<String, Value>>,
}

/// Parse a compiled ARM template into its declared output names.
pub fn parse_arm_template_outputs(json: &str) -> Result<Vec<String>, ToolError> {
    let template: ArmTemplate = serde_json::from_str(json).map_err(|e| ToolError::Parse {
        tool: "az bicep build".to_string(),
        message: e.to_string(),
    })?;
    Ok(template
        .outputs
        .map(|outputs| outputs.keys().cloned().collect())
        .unwrap_or_default())
}

impl IacTool for Bicep {
    fn info(&self) -> &ToolInfo {
        &BICEP_INFO
    }

    fn detect(&self, dir: &Path) -> f32 {
        if dir.join(MAIN_BICEP).is_file() {
            1.0
        } else {
            0.0
        }
    }

    fn declared_outputs(&self, dir: &Path) -> Result<Vec<String>, ToolError> {
        let bicep_file = dir.join(MAIN_BICEP);
        if !bicep_file.is_file() {
            return Err(ToolError::MissingInput(bicep_file));
        }
        let mut cmd = Command::new("az");
        cmd.args(["bicep", "build", "--file"])
            .arg(&bicep_file)
            .arg("--stdout");
        let stdout = run("az", &mut cmd)?;
        let names = parse_arm_template_outputs(&stdout)?;
        tracing::debug!(file = %bicep_file.display(), count = names.len(), "bicep declared outputs");
        Ok(names)
    }

    fn deployment_outputs(&self, query: &OutputQuery) -> Result<RawOutputs, ToolError> {
        let Some(deployment_name) = query.deployment_name.as_deref() else {
            return Err(ToolError::InvalidQuery(
                "bicep deployment outputs need a deployment name".to_string(),
            ));
        };

        let stdout = retry_with_fixed_delay(&query.retry, "az deployment sub show", || {
            let mut cmd = Command::new("az");
            cmd.args(["deployment", "sub", "show", "--name", deployment_name])
                .args(["--query", "properties.outputs", "-o", "json"]);
            if let Some(subscription) = query.subscription_id.as_deref() {
                cmd.args(["--subscription", subscription]);
            }
            run("az", &mut cmd)
        })?;
        let document = parse_json("az", &stdout)?;
        unwrap_output_envelopes(document, "az")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arm_template_outputs() {
        let json = r#"{
            "$schema": "https://schema.management.azure.com/schemas/2018-05-01/subscriptionDeploymentTemplate.json#",
            "contentVersion": "1.0.0.0",
            "resources": {},
            "outputs": {
                "deploymentSummary": {"type": "object", "value": "[variables('summary')]"},
                "vmHost": {"type": "array", "value": "[module('vm').outputs]"}
            }
        }"#;
        let mut names = parse_arm_template_outputs(json).unwrap();
        names.sort();
        assert_eq!(names, vec!["deploymentSummary", "vmHost"]);
    }

    #[test]
    fn test_parse_arm_template_without_outputs() {
        assert!(parse_arm_template_outputs(r#"{"resources": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_detect() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Bicep.detect(dir.path()), 0.0);
        std::fs::write(dir.path().join("main.bicep"), "targetScope = 'subscription'").unwrap();
        assert_eq!(Bicep.detect(dir.path()), 1.0);
    }

    #[test]
    fn test_deployment_outputs_requires_name() {
        let query = OutputQuery::new("bicep");
        let err = Bicep.deployment_outputs(&query).unwrap_err();
        assert!(matches!(err, ToolError::InvalidQuery(_)));
    }

    #[test]
    fn test_declared_outputs_missing_main_bicep() {
        let dir = tempfile::tempdir().unwrap();
        let err = Bicep.declared_outputs(dir.path()).unwrap_err();
        assert!(matches!(err, ToolError::MissingInput(path) if path.ends_with("main.bicep")));
    }
}
