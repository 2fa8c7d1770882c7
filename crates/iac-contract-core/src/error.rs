//! Contract engine errors.

use crate::shape::{OutputShape, ValueKind};
use thiserror::Error;

/// Failure of a contract check or of output population.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Outputs required by the schema are not declared in the IaC configuration.
    #[error(
        "missing {} required output(s) in {framework}: {}{}",
        .missing.len(),
        format_names(.missing),
        hint_line(.hint)
    )]
    ContractViolation {
        framework: String,
        missing: Vec<String>,
        hint: Option<&'static str>,
    },

    /// Outputs required by the schema are absent from the deployment results.
    #[error(
        "{} output(s) missing from {framework} deployment outputs: {}{}",
        .missing.len(),
        format_names(.missing),
        hint_line(.hint)
    )]
    MissingOutputs {
        framework: String,
        missing: Vec<String>,
        hint: Option<&'static str>,
    },

    /// An output value does not fit the schema field it maps to.
    #[error("output '{key}' has a type mismatch: expected {expected} but got {found}")]
    TypeMismatch {
        key: String,
        expected: OutputShape,
        found: ValueKind,
    },
}

impl ContractError {
    /// Output names reported as missing, if this is a missing-name error.
    pub fn missing(&self) -> &[String] {
        match self {
            ContractError::ContractViolation { missing, .. }
            | ContractError::MissingOutputs { missing, .. } => missing,
            ContractError::TypeMismatch { .. } => &[],
        }
    }
}

fn format_names(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}

fn hint_line(hint: &Option<&'static str>) -> String {
    match hint {
        Some(file) => format!("\n  ensure these outputs are declared in {file}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    #[test]
    fn test_contract_violation_message() {
        let err = ContractError::ContractViolation {
            framework: "terraform".into(),
            missing: vec!["assets".into(), "vm_host".into()],
            hint: Some("terraform/outputs.tf"),
        };
        insta::assert_snapshot!(err.to_string(), @r"
        missing 2 required output(s) in terraform: [assets, vm_host]
          ensure these outputs are declared in terraform/outputs.tf
        ");
    }

    #[test]
    fn test_missing_outputs_without_hint() {
        let err = ContractError::MissingOutputs {
            framework: "custom".into(),
            missing: vec!["y".into()],
            hint: None,
        };
        assert_eq!(
            err.to_string(),
            "1 output(s) missing from custom deployment outputs: [y]"
        );
        assert_eq!(err.missing(), ["y".to_string()]);
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = ContractError::TypeMismatch {
            key: "messaging".into(),
            expected: OutputShape::new(ShapeKind::Object),
            found: ValueKind::String,
        };
        assert_eq!(
            err.to_string(),
            "output 'messaging' has a type mismatch: expected object but got string"
        );
        assert!(err.missing().is_empty());
    }
}
