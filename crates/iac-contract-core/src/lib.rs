//! Output contract engine.
//!
//! Reconciles the outputs an IaC configuration declares (or a deployment
//! returns) with a typed output schema shared by Terraform and Bicep.
//!
//! # Architecture
//!
//! ```text
//! declared names ──┐
//!                  ├─> validate_contract ──> ContractReport / ContractViolation
//! required names ──┘        ^
//!                           │ required_outputs::<S>()
//! #[derive(OutputSchema)] S ┤
//!                           │
//! raw outputs ──────> populate_from_raw ──> S / MissingOutputs / TypeMismatch
//! ```
//!
//! # Example
//!
//! ```
//! use iac_contract_core::{OutputSchema, parse_bicep_outputs, required_outputs};
//! use serde_json::{Map, Value, json};
//!
//! #[derive(Default, OutputSchema)]
//! struct Outputs {
//!     #[output("deployment_summary")]
//!     deployment_summary: Map<String, Value>,
//! }
//!
//! assert_eq!(required_outputs::<Outputs>(), vec!["deployment_summary"]);
//!
//! let raw = json!({"deploymentSummary": {"resourceGroup": "rg-edge"}});
//! let outputs: Outputs = parse_bicep_outputs(raw.as_object().unwrap()).unwrap();
//! assert_eq!(outputs.deployment_summary["resource_group"], "rg-edge");
//! ```

extern crate self as iac_contract_core;

pub mod contract;
pub mod error;
pub mod framework;
pub mod populate;
pub mod schema;
pub mod shape;

pub use serde_json;

/// Deployment outputs keyed by output name in the producing tool's casing.
pub type RawOutputs = serde_json::Map<String, serde_json::Value>;

pub use contract::{
    ContractReport, validate_bicep_contract, validate_contract, validate_framework_contract,
    validate_terraform_contract,
};
pub use error::ContractError;
pub use framework::{Framework, ParseFrameworkError, hint_for_label};
pub use populate::{parse_bicep_outputs, parse_outputs, parse_terraform_outputs, populate_from_raw};
pub use schema::{OutputField, OutputSchema, required_outputs};
pub use shape::{OutputShape, OutputSlot, ShapeKind, ValueKind};

pub use iac_contract_derive::OutputSchema;
