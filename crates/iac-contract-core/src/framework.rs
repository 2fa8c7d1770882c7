//! IaC frameworks and their naming conventions.

use iac_contract_casing::snake_to_camel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The IaC tool a set of outputs came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// `snake_case` output names, declared in `terraform/outputs.tf`.
    Terraform,
    /// `camelCase` output names, declared in `bicep/main.bicep`.
    Bicep,
}

impl Framework {
    pub const ALL: [Framework; 2] = [Framework::Terraform, Framework::Bicep];

    pub fn label(&self) -> &'static str {
        match self {
            Framework::Terraform => "terraform",
            Framework::Bicep => "bicep",
        }
    }

    /// File where this framework's outputs are declared.
    pub fn output_file_hint(&self) -> &'static str {
        match self {
            Framework::Terraform => "terraform/outputs.tf",
            Framework::Bicep => "bicep/main.bicep",
        }
    }

    /// Map a canonical output name to this framework's naming convention.
    pub fn output_key(&self, canonical: &str) -> String {
        match self {
            Framework::Terraform => canonical.to_string(),
            Framework::Bicep => snake_to_camel(canonical),
        }
    }

    /// Whether keys nested inside output values need renaming to `snake_case`.
    pub fn renames_nested_keys(&self) -> bool {
        matches!(self, Framework::Bicep)
    }
}

/// Declaration file hint for a framework label, if the label is known.
pub fn hint_for_label(label: &str) -> Option<&'static str> {
    label
        .parse::<Framework>()
        .ok()
        .map(|framework| framework.output_file_hint())
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown framework name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown framework '{0}' (expected terraform or bicep)")]
pub struct ParseFrameworkError(pub String);

impl FromStr for Framework {
    type Err = ParseFrameworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terraform" | "tf" => Ok(Framework::Terraform),
            "bicep" => Ok(Framework::Bicep),
            _ => Err(ParseFrameworkError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_key() {
        assert_eq!(
            Framework::Terraform.output_key("deployment_summary"),
            "deployment_summary"
        );
        assert_eq!(
            Framework::Bicep.output_key("deployment_summary"),
            "deploymentSummary"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("Terraform".parse::<Framework>(), Ok(Framework::Terraform));
        assert_eq!("tf".parse::<Framework>(), Ok(Framework::Terraform));
        assert_eq!("bicep".parse::<Framework>(), Ok(Framework::Bicep));
        assert!("pulumi".parse::<Framework>().is_err());
    }

    #[test]
    fn test_hint_for_label() {
        assert_eq!(hint_for_label("terraform"), Some("terraform/outputs.tf"));
        assert_eq!(hint_for_label("bicep"), Some("bicep/main.bicep"));
        assert_eq!(hint_for_label("pulumi"), None);
    }
}
