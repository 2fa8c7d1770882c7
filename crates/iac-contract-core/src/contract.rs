//! Static contract validation: required outputs vs. declared outputs.

use crate::error::ContractError;
use crate::framework::{Framework, hint_for_label};
use iac_contract_casing::snake_to_camel;
use serde::Serialize;
use std::collections::HashSet;

/// Result of a passing contract check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractReport {
    pub framework: String,
    pub declared: Vec<String>,
    pub required: Vec<String>,
}

/// Check that every required output name is declared.
///
/// Missing names are reported in `required` order. A single missing output
/// fails the whole check.
pub fn validate_contract<D, R>(
    declared: &[D],
    required: &[R],
    framework: &str,
) -> Result<ContractReport, ContractError>
where
    D: AsRef<str>,
    R: AsRef<str>,
{
    let declared: Vec<String> = declared.iter().map(|d| d.as_ref().to_string()).collect();
    let required: Vec<String> = required.iter().map(|r| r.as_ref().to_string()).collect();

    tracing::info!(framework, ?declared, "declared outputs");
    tracing::info!(framework, ?required, "required outputs");

    let declared_set: HashSet<&str> = declared.iter().map(String::as_str).collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !declared_set.contains(name.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() {
        tracing::error!(framework, ?missing, "required outputs not declared");
        return Err(ContractError::ContractViolation {
            framework: framework.to_string(),
            missing,
            hint: hint_for_label(framework),
        });
    }

    tracing::info!(
        framework,
        count = required.len(),
        "all required outputs are declared"
    );
    Ok(ContractReport {
        framework: framework.to_string(),
        declared,
        required,
    })
}

/// Validate against Terraform declarations (names compared as-is).
pub fn validate_terraform_contract<D, R>(
    declared: &[D],
    required: &[R],
) -> Result<ContractReport, ContractError>
where
    D: AsRef<str>,
    R: AsRef<str>,
{
    validate_contract(declared, required, Framework::Terraform.label())
}

/// Validate against Bicep declarations.
///
/// Required names are canonical `snake_case` and converted to `camelCase`
/// before comparison.
pub fn validate_bicep_contract<D, R>(
    declared: &[D],
    required: &[R],
) -> Result<ContractReport, ContractError>
where
    D: AsRef<str>,
    R: AsRef<str>,
{
    let camel: Vec<String> = required
        .iter()
        .map(|name| snake_to_camel(name.as_ref()))
        .collect();
    validate_contract(declared, &camel, Framework::Bicep.label())
}

/// Validate for either framework.
pub fn validate_framework_contract<D, R>(
    framework: Framework,
    declared: &[D],
    required: &[R],
) -> Result<ContractReport, ContractError>
where
    D: AsRef<str>,
    R: AsRef<str>,
{
    match framework {
        Framework::Terraform => validate_terraform_contract(declared, required),
        Framework::Bicep => validate_bicep_contract(declared, required),
    }
}
