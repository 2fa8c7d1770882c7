//! Offline checks over parsed blueprint outputs.
//!
//! Each check looks at one output group and reports what is missing or
//! malformed. Nothing here talks to Azure; the checks only assert what the
//! deployment outputs themselves promise. Every check runs, whatever the
//! outcome of the others.

use crate::blueprint::BlueprintOutputs;
use crate::config::ContractConfig;
use serde::Serialize;
use serde_json::{Map, Value};

/// Event Hub namespace placeholder emitted when messaging is not deployed.
pub const NOT_DEPLOYED: &str = "Not deployed";

/// Values the deployment was requested with, compared against its outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expectations {
    pub resource_group: Option<String>,
    pub location: Option<String>,
    pub resource_prefix: Option<String>,
}

impl From<&ContractConfig> for Expectations {
    fn from(config: &ContractConfig) -> Self {
        Self {
            resource_group: config.resource_group.clone(),
            location: config.location.clone(),
            resource_prefix: config.resource_prefix.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "passed",
            CheckStatus::Failed => "failed",
            CheckStatus::Skipped => "skipped",
        }
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    /// Failures, and notes on passing or skipped checks.
    pub messages: Vec<String>,
}

type CheckFn = fn(&BlueprintOutputs, &Expectations, &mut Findings);

const CHECKS: &[(&str, CheckFn)] = &[
    ("deployment-summary", check_deployment_summary),
    ("security-identity", check_security_identity),
    ("observability", check_observability),
    ("networking", check_networking),
    ("data-storage", check_data_storage),
    ("container-registry", check_container_registry),
    ("messaging", check_messaging),
    ("vm-host", check_vm_host),
    ("arc-connected-cluster", check_arc_connected_cluster),
    ("cluster-connection", check_cluster_connection),
    ("azure-iot-operations", check_azure_iot_operations),
    ("assets", check_assets),
    ("acr-network-posture", check_acr_network_posture),
];

/// Names of all checks, in run order.
pub fn check_names() -> Vec<&'static str> {
    CHECKS.iter().map(|(name, _)| *name).collect()
}

/// Run every check against `outputs`.
pub fn run_checks(outputs: &BlueprintOutputs, expect: &Expectations) -> Vec<CheckResult> {
    CHECKS
        .iter()
        .map(|(name, check)| {
            let mut findings = Findings::default();
            check(outputs, expect, &mut findings);
            let result = findings.finish(name);
            match result.status {
                CheckStatus::Failed => {
                    tracing::warn!(check = name, problems = ?result.messages, "check failed")
                }
                status => tracing::debug!(check = name, status = status.as_str(), "check done"),
            }
            result
        })
        .collect()
}

#[derive(Default)]
struct Findings {
    messages: Vec<String>,
    failed: bool,
    skipped: bool,
}

impl Findings {
    fn fail(&mut self, message: impl Into<String>) {
        self.failed = true;
        self.messages.push(message.into());
    }

    fn note(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    fn skip(&mut self, reason: impl Into<String>) {
        self.skipped = true;
        self.messages.push(reason.into());
    }

    fn finish(self, name: &str) -> CheckResult {
        let status = if self.failed {
            CheckStatus::Failed
        } else if self.skipped {
            CheckStatus::Skipped
        } else {
            CheckStatus::Passed
        };
        CheckResult {
            name: name.to_string(),
            status,
            messages: self.messages,
        }
    }

    /// Fail unless `section[key]` holds a non-empty value.
    fn require<'a>(&mut self, section: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
        match section.get(key) {
            Some(value) if is_set(value) => Some(value),
            _ => {
                self.fail(format!("{key} should be set"));
                None
            }
        }
    }

    /// Fail unless `section[key]` is a non-empty string.
    fn require_str<'a>(&mut self, section: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        match self.require(section, key)? {
            Value::String(s) => Some(s.as_str()),
            other => {
                self.fail(format!("{key} should be a string, got {other}"));
                None
            }
        }
    }

    fn require_all(&mut self, section: &Map<String, Value>, keys: &[&str]) {
        for key in keys {
            self.require(section, key);
        }
    }

    fn require_contains(&mut self, section: &Map<String, Value>, key: &str, needle: &str) {
        if let Some(value) = self.require_str(section, key)
            && !value.contains(needle)
        {
            self.fail(format!("{key} '{value}' should contain '{needle}'"));
        }
    }

    fn expect_equal(&mut self, section: &Map<String, Value>, key: &str, expected: Option<&str>) {
        let Some(expected) = expected else {
            return;
        };
        if let Some(actual) = self.require_str(section, key)
            && actual != expected
        {
            self.fail(format!("{key} is '{actual}', expected '{expected}'"));
        }
    }
}

/// Non-null, and not an empty string, array or object.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

fn check_deployment_summary(outputs: &BlueprintOutputs, expect: &Expectations, f: &mut Findings) {
    let summary = &outputs.deployment_summary;
    if f.require_str(summary, "resource_group").is_some() {
        f.expect_equal(summary, "resource_group", expect.resource_group.as_deref());
    }
}

fn check_security_identity(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    let security = &outputs.security_identity;
    f.require_all(security, &["key_vault_name", "aio_identity"]);
    f.require_contains(security, "key_vault_uri", "https://");
}

fn check_observability(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    let observability = &outputs.observability;
    f.require_all(
        observability,
        &[
            "log_analytics_workspace_name",
            "azure_monitor_workspace_name",
            "grafana_name",
        ],
    );
    f.require_contains(observability, "grafana_endpoint", "https://");
}

fn check_networking(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    match &outputs.nat_gateway {
        Value::Null => f.note("nat_gateway not deployed"),
        Value::Object(gateway) => f.require_all(gateway, &["name", "id"]),
        other => f.fail(format!("nat_gateway should be an object or null, got {other}")),
    }
    match &outputs.nat_gateway_public_ips {
        Value::Null => {}
        Value::Array(ips) => f.note(format!("{} NAT gateway public IP(s)", ips.len())),
        _ => f.note("NAT gateway public IPs present"),
    }
}

fn check_data_storage(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    f.require(&outputs.data_storage, "storage_account_name");
}

fn check_container_registry(outputs: &BlueprintOutputs, expect: &Expectations, f: &mut Findings) {
    let registry = &outputs.container_registry;
    f.require(registry, "id");
    match expect.resource_prefix.as_deref() {
        Some(prefix) => f.require_contains(registry, "name", prefix),
        None => {
            f.require(registry, "name");
        }
    }
}

fn check_messaging(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    let messaging = &outputs.messaging;
    if messaging.get("eventhub_namespace_name").and_then(Value::as_str) == Some(NOT_DEPLOYED) {
        f.skip("messaging not deployed");
        return;
    }
    f.require_all(
        messaging,
        &["event_grid_topic_name", "eventhub_namespace_name", "eventhub_name"],
    );
    f.require_contains(messaging, "event_grid_topic_endpoint", "eventgrid.azure.net");
}

fn check_vm_host(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    let hosts = match &outputs.vm_host {
        Value::Null => return f.fail("vm_host should be set"),
        Value::Array(hosts) => hosts,
        other => return f.fail(format!("vm_host should be an array, got {other}")),
    };
    if hosts.is_empty() {
        return f.fail("at least one VM host should be deployed");
    }
    for (i, host) in hosts.iter().enumerate() {
        match host.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {}
            _ => f.fail(format!("vm_host[{i}] name should be set")),
        }
    }
}

fn check_arc_connected_cluster(outputs: &BlueprintOutputs, expect: &Expectations, f: &mut Findings) {
    let cluster = &outputs.arc_connected_cluster;
    f.require(cluster, "name");
    if f.require_str(cluster, "location").is_some() {
        f.expect_equal(cluster, "location", expect.location.as_deref());
    }
}

fn check_cluster_connection(outputs: &BlueprintOutputs, expect: &Expectations, f: &mut Findings) {
    let connection = &outputs.cluster_connection;
    f.require_all(connection, &["arc_cluster_resource_group", "arc_proxy_command"]);
    match expect.resource_prefix.as_deref() {
        Some(prefix) => f.require_contains(connection, "arc_cluster_name", prefix),
        None => {
            f.require(connection, "arc_cluster_name");
        }
    }
}

fn check_azure_iot_operations(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    f.require_all(
        &outputs.azure_iot_operations,
        &["instance_name", "custom_location_id", "namespace"],
    );
}

fn check_assets(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    for key in ["assets", "asset_endpoint_profiles"] {
        if outputs.assets.get(key).is_none_or(Value::is_null) {
            f.fail(format!("{key} should exist"));
        }
    }
}

fn check_acr_network_posture(outputs: &BlueprintOutputs, _: &Expectations, f: &mut Findings) {
    if outputs.acr_network_posture.is_null() {
        f.fail("acr_network_posture should be set");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iac_contract_core::parse_terraform_outputs;
    use iac_contract_tools::unwrap_output_envelopes;
    use serde_json::json;

    fn outputs() -> BlueprintOutputs {
        let document = serde_json::from_str(include_str!("../tests/fixtures/terraform-outputs.json"))
            .unwrap();
        let raw = unwrap_output_envelopes(document, "terraform").unwrap();
        parse_terraform_outputs(&raw).unwrap()
    }

    fn expectations() -> Expectations {
        Expectations {
            resource_group: Some("rg-edge-dev".to_string()),
            location: Some("westus3".to_string()),
            resource_prefix: Some("edge".to_string()),
        }
    }

    fn result<'a>(results: &'a [CheckResult], name: &str) -> &'a CheckResult {
        results.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_all_checks_pass_on_fixture() {
        let results = run_checks(&outputs(), &expectations());
        assert_eq!(results.len(), check_names().len());
        for r in &results {
            assert_eq!(r.status, CheckStatus::Passed, "{}: {:?}", r.name, r.messages);
        }
        assert_eq!(
            result(&results, "networking").messages,
            vec!["nat_gateway not deployed"]
        );
    }

    #[test]
    fn test_no_expectations_skips_comparisons() {
        let mut outputs = outputs();
        outputs.deployment_summary["resource_group"] = json!("rg-other");
        let results = run_checks(&outputs, &Expectations::default());
        assert!(results.iter().all(|r| r.status == CheckStatus::Passed));
    }

    #[test]
    fn test_failures_do_not_stop_other_checks() {
        let mut outputs = outputs();
        outputs.security_identity["key_vault_uri"] = json!("http://kv-edge-dev.vault.azure.net/");
        outputs.security_identity.remove("aio_identity");
        outputs.arc_connected_cluster["location"] = json!("eastus");
        outputs.vm_host = json!([{"name": "vm-0"}, {"private_ip": "10.0.1.5"}]);

        let results = run_checks(&outputs, &expectations());
        let security = result(&results, "security-identity");
        assert_eq!(security.status, CheckStatus::Failed);
        assert_eq!(
            security.messages,
            vec![
                "aio_identity should be set",
                "key_vault_uri 'http://kv-edge-dev.vault.azure.net/' should contain 'https://'",
            ]
        );
        assert_eq!(
            result(&results, "arc-connected-cluster").messages,
            vec!["location is 'eastus', expected 'westus3'"]
        );
        assert_eq!(
            result(&results, "vm-host").messages,
            vec!["vm_host[1] name should be set"]
        );
        assert_eq!(result(&results, "observability").status, CheckStatus::Passed);
    }

    #[test]
    fn test_messaging_not_deployed_is_skipped() {
        let mut outputs = outputs();
        outputs.messaging = json!({
            "event_grid_topic_name": "Not deployed",
            "event_grid_topic_endpoint": "Not deployed",
            "eventhub_namespace_name": "Not deployed",
            "eventhub_name": "Not deployed",
        })
        .as_object()
        .unwrap()
        .clone();
        let results = run_checks(&outputs, &expectations());
        assert_eq!(result(&results, "messaging").status, CheckStatus::Skipped);
    }

    #[test]
    fn test_resource_prefix() {
        let mut outputs = outputs();
        outputs.container_registry["name"] = json!("acrcontoso");
        let results = run_checks(&outputs, &expectations());
        assert_eq!(
            result(&results, "container-registry").messages,
            vec!["name 'acrcontoso' should contain 'edge'"]
        );
    }

    #[test]
    fn test_nat_gateway_object() {
        let mut outputs = outputs();
        outputs.nat_gateway = json!({"name": "ng-edge-dev", "id": ""});
        outputs.nat_gateway_public_ips = json!(["20.1.2.3"]);
        let results = run_checks(&outputs, &expectations());
        let networking = result(&results, "networking");
        assert_eq!(networking.status, CheckStatus::Failed);
        assert_eq!(
            networking.messages,
            vec!["id should be set", "1 NAT gateway public IP(s)"]
        );
    }

    #[test]
    fn test_missing_vm_hosts_and_posture() {
        let mut outputs = outputs();
        outputs.vm_host = json!([]);
        outputs.acr_network_posture = Value::Null;
        outputs.assets.insert("assets".to_string(), Value::Null);
        let results = run_checks(&outputs, &expectations());
        assert_eq!(
            result(&results, "vm-host").messages,
            vec!["at least one VM host should be deployed"]
        );
        assert_eq!(result(&results, "acr-network-posture").status, CheckStatus::Failed);
        assert_eq!(
            result(&results, "assets").messages,
            vec!["assets should exist"]
        );
    }
}
