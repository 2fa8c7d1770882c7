//! Deployment output envelopes.
//!
//! Both `terraform output -json` and `az deployment sub show` wrap each
//! output as `{"type": ..., "value": <actual value>, ...}`. The contract
//! engine wants the bare `{name: value}` map.

use crate::ToolError;
use iac_contract_core::RawOutputs;
use serde_json::Value;
use std::path::Path;

const ENVELOPE_KEYS: &[&str] = &["type", "value", "sensitive"];

/// Unwrap `{name: {"value": v, ...}}` into `{name: v}`.
///
/// Entries without a `value` key are dropped. Anything but an object, `null`
/// included, is a parse error.
pub fn unwrap_output_envelopes(document: Value, tool: &str) -> Result<RawOutputs, ToolError> {
    let entries = match document {
        Value::Object(entries) => entries,
        other => {
            return Err(ToolError::Parse {
                tool: tool.to_string(),
                message: format!("expected an object of outputs, got {other}"),
            });
        }
    };

    let mut outputs = RawOutputs::new();
    for (name, entry) in entries {
        match entry {
            Value::Object(mut envelope) => match envelope.remove("value") {
                Some(value) => {
                    outputs.insert(name, value);
                }
                None => tracing::debug!(output = %name, "{tool} output has no value, skipping"),
            },
            _ => tracing::debug!(output = %name, "{tool} output is not an envelope, skipping"),
        }
    }
    Ok(outputs)
}

fn is_envelope(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key("value") && map.keys().all(|k| ENVELOPE_KEYS.contains(&k.as_str()))
        }
        _ => false,
    }
}

/// Read saved deployment outputs from a JSON file.
///
/// Accepts a flat `{name: value}` map or the tools' envelope format; each
/// entry that looks like an envelope is unwrapped.
pub fn read_outputs_file(path: &Path) -> Result<RawOutputs, ToolError> {
    if !path.is_file() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let tool = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        tool: tool.clone(),
        source,
    })?;
    let document: Value = serde_json::from_str(&content).map_err(|e| ToolError::Parse {
        tool: tool.clone(),
        message: e.to_string(),
    })?;

    let Value::Object(entries) = document else {
        return Err(ToolError::Parse {
            tool,
            message: "expected a JSON object of outputs".to_string(),
        });
    };

    let mut outputs = RawOutputs::new();
    for (name, entry) in entries {
        let value = if is_envelope(&entry) {
            match entry {
                Value::Object(mut envelope) => envelope.remove("value").unwrap_or(Value::Null),
                other => other,
            }
        } else {
            entry
        };
        outputs.insert(name, value);
    }
    Ok(outputs)
}
