//! Tool adapters, one per IaC framework.

mod bicep;
mod terraform;

pub use bicep::{Bicep, parse_arm_template_outputs};
pub use terraform::{Terraform, parse_terraform_docs};
