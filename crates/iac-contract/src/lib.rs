//! Output contract checks for the full single-node-cluster blueprint.
//!
//! The blueprint ships as both Terraform and Bicep; this crate verifies
//! that both declare the outputs [`blueprint::BlueprintOutputs`] requires,
//! parses their deployment outputs into that structure, and runs offline
//! checks over the result.

pub mod blueprint;
pub mod checks;
pub mod commands;
pub mod config;
pub mod logging;

pub use blueprint::BlueprintOutputs;
pub use checks::{CheckResult, CheckStatus, Expectations, run_checks};
pub use config::{ConfigError, ContractConfig};
