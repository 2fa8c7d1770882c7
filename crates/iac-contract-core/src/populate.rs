//! Populating typed output structs from raw deployment outputs.

use crate::error::ContractError;
use crate::framework::{Framework, hint_for_label};
use crate::schema::OutputSchema;
use crate::shape::ValueKind;
use crate::RawOutputs;
use iac_contract_casing::keys_to_snake;

/// Fill every tagged field of `target` from `raw`.
///
/// Each canonical name is passed through `key_transform` to get the lookup
/// key. When `transform_nested` is set, keys inside found values are renamed
/// to `snake_case` before assignment.
///
/// All fields are attempted before missing keys are reported, and every
/// missing key is named in the error. A value whose shape the field cannot
/// hold stops population immediately with [`ContractError::TypeMismatch`].
/// Presence of the key is what counts: a null value is fine for a nullable
/// field.
pub fn populate_from_raw<S, F>(
    raw: &RawOutputs,
    target: &mut S,
    key_transform: F,
    transform_nested: bool,
    framework: &str,
) -> Result<(), ContractError>
where
    S: OutputSchema,
    F: Fn(&str) -> String,
{
    let mut missing = Vec::new();

    for field in S::fields() {
        let lookup_key = key_transform(field.name);
        let Some(value) = raw.get(&lookup_key) else {
            missing.push(lookup_key);
            continue;
        };

        let value = if transform_nested {
            keys_to_snake(value)
        } else {
            value.clone()
        };

        if let Err(rejected) = target.assign(field, value) {
            return Err(ContractError::TypeMismatch {
                key: lookup_key,
                expected: field.shape,
                found: ValueKind::of(&rejected),
            });
        }
        tracing::debug!(framework, output = %lookup_key, field = field.ident, "populated output");
    }

    if !missing.is_empty() {
        return Err(ContractError::MissingOutputs {
            framework: framework.to_string(),
            missing,
            hint: hint_for_label(framework),
        });
    }

    Ok(())
}

/// Populate a fresh `S` from outputs produced by `framework`.
///
/// Terraform outputs are looked up by canonical name; Bicep outputs by the
/// `camelCase` form, with nested keys converted back to `snake_case`.
pub fn parse_outputs<S>(raw: &RawOutputs, framework: Framework) -> Result<S, ContractError>
where
    S: OutputSchema + Default,
{
    let mut outputs = S::default();
    populate_from_raw(
        raw,
        &mut outputs,
        |name| framework.output_key(name),
        framework.renames_nested_keys(),
        framework.label(),
    )?;
    Ok(outputs)
}

/// [`parse_outputs`] for Terraform.
pub fn parse_terraform_outputs<S>(raw: &RawOutputs) -> Result<S, ContractError>
where
    S: OutputSchema + Default,
{
    parse_outputs(raw, Framework::Terraform)
}

/// [`parse_outputs`] for Bicep.
pub fn parse_bicep_outputs<S>(raw: &RawOutputs) -> Result<S, ContractError>
where
    S: OutputSchema + Default,
{
    parse_outputs(raw, Framework::Bicep)
}
