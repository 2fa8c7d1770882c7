//! Naming convention translation.
//!
//! Terraform outputs use `snake_case` names while Bicep outputs use `camelCase`.
//! The canonical convention across both is `snake_case`; these helpers convert
//! in both directions and rename keys throughout nested output values.
//!
//! ```
//! use iac_contract_casing::{camel_to_snake, snake_to_camel};
//!
//! assert_eq!(snake_to_camel("deployment_summary"), "deploymentSummary");
//! assert_eq!(camel_to_snake("keyVaultName"), "key_vault_name");
//! ```

use serde_json::{Map, Value};

/// Convert a `snake_case` name to `camelCase`.
///
/// Empty segments (from leading, trailing or doubled underscores) are skipped.
/// Only the segment at position zero stays lowercase, so a leading underscore
/// capitalises the first word: `"_deployment_summary"` becomes `"DeploymentSummary"`.
pub fn snake_to_camel(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() == 1 {
        return name.to_lowercase();
    }

    let mut result = String::with_capacity(name.len());
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            result.push_str(&part.to_lowercase());
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    result
}

/// Convert a `camelCase` name to `snake_case`.
///
/// Every uppercase letter after the first character gets its own `_`, so runs
/// of capitals are split letter by letter: `"ACRName"` becomes `"a_c_r_name"`.
pub fn camel_to_snake(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.char_indices() {
        if i > 0 && c.is_ascii_uppercase() {
            result.push('_');
        }
        result.push(c);
    }
    result.to_lowercase()
}

/// Rebuild `value` with `rename` applied to every object key at every depth.
///
/// Arrays keep their order and length; scalars (including null) are cloned
/// as-is. The input is never mutated.
pub fn rename_keys<F>(value: &Value, rename: F) -> Value
where
    F: Fn(&str) -> String,
{
    rename_keys_with(value, &rename)
}

fn rename_keys_with(value: &Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => {
            let mut renamed = Map::with_capacity(map.len());
            for (key, val) in map {
                renamed.insert(rename(key), rename_keys_with(val, rename));
            }
            Value::Object(renamed)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| rename_keys_with(item, rename))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}

/// Rename every nested key from `camelCase` to `snake_case`.
pub fn keys_to_snake(value: &Value) -> Value {
    rename_keys(value, camel_to_snake)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_to_camel_known_outputs() {
        assert_eq!(snake_to_camel("deployment_summary"), "deploymentSummary");
        assert_eq!(snake_to_camel("acr_network_posture"), "acrNetworkPosture");
        assert_eq!(snake_to_camel("azure_iot_operations"), "azureIotOperations");
        assert_eq!(snake_to_camel("nat_gateway_public_ips"), "natGatewayPublicIps");
    }

    #[test]
    fn test_snake_to_camel_single_segment() {
        assert_eq!(snake_to_camel("assets"), "assets");
        assert_eq!(snake_to_camel("Messaging"), "messaging");
    }

    #[test]
    fn test_snake_to_camel_empty_and_doubled() {
        assert_eq!(snake_to_camel(""), "");
        assert_eq!(snake_to_camel("vm__host"), "vmHost");
        assert_eq!(snake_to_camel("vm_host_"), "vmHost");
    }

    #[test]
    fn test_snake_to_camel_leading_underscore_capitalises() {
        assert_eq!(snake_to_camel("_deployment_summary"), "DeploymentSummary");
        assert_eq!(snake_to_camel("__vm_host"), "VmHost");
    }

    #[test]
    fn test_snake_to_camel_lowercases_segment_tails() {
        assert_eq!(snake_to_camel("ACR_NETWORK"), "acrNetwork");
    }

    #[test]
    fn test_camel_to_snake_known_keys() {
        assert_eq!(camel_to_snake("keyVaultName"), "key_vault_name");
        assert_eq!(camel_to_snake("aioIdentity"), "aio_identity");
        assert_eq!(camel_to_snake("resourceGroup"), "resource_group");
    }

    #[test]
    fn test_camel_to_snake_edges() {
        assert_eq!(camel_to_snake(""), "");
        assert_eq!(camel_to_snake("name"), "name");
        assert_eq!(camel_to_snake("Name"), "name");
        assert_eq!(camel_to_snake("already_snake"), "already_snake");
    }

    #[test]
    fn test_camel_to_snake_splits_every_capital() {
        assert_eq!(camel_to_snake("ACRName"), "a_c_r_name");
        assert_eq!(camel_to_snake("natGatewayIPs"), "nat_gateway_i_ps");
    }

    #[test]
    fn test_round_trip_for_canonical_names() {
        for name in [
            "deployment_summary",
            "security_identity",
            "observability",
            "nat_gateway_public_ips",
            "arc_connected_cluster",
            "acr_network_posture",
            "a_b_c",
        ] {
            assert_eq!(camel_to_snake(&snake_to_camel(name)), name);
        }
    }

    #[test]
    fn test_rename_keys_nested_object() {
        let input = json!({"resourceGroup": {"keyVaultName": "x"}});
        let output = keys_to_snake(&input);
        assert_eq!(output, json!({"resource_group": {"key_vault_name": "x"}}));
    }

    #[test]
    fn test_rename_keys_array_of_objects() {
        let input = json!([
            {"assetName": "a", "endpointProfile": null},
            {"assetName": "b", "datasetCount": 3},
            "plainString",
        ]);
        let output = keys_to_snake(&input);
        assert_eq!(
            output,
            json!([
                {"asset_name": "a", "endpoint_profile": null},
                {"asset_name": "b", "dataset_count": 3},
                "plainString",
            ])
        );
    }

    #[test]
    fn test_rename_keys_leaves_input_untouched() {
        let input = json!({"keyVaultUri": "https://kv.vault.azure.net/"});
        let _ = keys_to_snake(&input);
        assert_eq!(input, json!({"keyVaultUri": "https://kv.vault.azure.net/"}));
    }

    #[test]
    fn test_rename_keys_scalars() {
        assert_eq!(keys_to_snake(&Value::Null), Value::Null);
        assert_eq!(keys_to_snake(&json!(42)), json!(42));
        assert_eq!(keys_to_snake(&json!("keyVault")), json!("keyVault"));
    }

    #[test]
    fn test_rename_keys_custom_fn() {
        let input = json!({"a": {"b": [ {"c": 1} ]}});
        let output = rename_keys(&input, |k| k.to_uppercase());
        assert_eq!(output, json!({"A": {"B": [ {"C": 1} ]}}));
    }
}
