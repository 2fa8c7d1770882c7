//! Outputs of the full single-node-cluster blueprint.
//!
//! Both the Terraform and the Bicep flavour of the blueprint must declare
//! every output listed here: Terraform under the canonical `snake_case`
//! name, Bicep under its `camelCase` form.

use iac_contract_core::OutputSchema;
use serde::Serialize;
use serde_json::{Map, Value};

/// Typed deployment outputs of the full single-node-cluster blueprint.
///
/// Nested keys are always `snake_case`, whichever framework produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, schemars::JsonSchema, OutputSchema)]
pub struct BlueprintOutputs {
    #[output("deployment_summary")]
    pub deployment_summary: Map<String, Value>,
    #[output("security_identity")]
    pub security_identity: Map<String, Value>,
    #[output("observability")]
    pub observability: Map<String, Value>,
    /// `null` when no NAT gateway was deployed.
    #[output("nat_gateway")]
    pub nat_gateway: Value,
    #[output("nat_gateway_public_ips")]
    pub nat_gateway_public_ips: Value,
    #[output("data_storage")]
    pub data_storage: Map<String, Value>,
    #[output("container_registry")]
    pub container_registry: Map<String, Value>,
    #[output("messaging")]
    pub messaging: Map<String, Value>,
    /// Array of VM host objects.
    #[output("vm_host")]
    pub vm_host: Value,
    #[output("arc_connected_cluster")]
    pub arc_connected_cluster: Map<String, Value>,
    #[output("cluster_connection")]
    pub cluster_connection: Map<String, Value>,
    #[output("azure_iot_operations")]
    pub azure_iot_operations: Map<String, Value>,
    #[output("assets")]
    pub assets: Map<String, Value>,
    #[output("acr_network_posture")]
    pub acr_network_posture: Value,
}
