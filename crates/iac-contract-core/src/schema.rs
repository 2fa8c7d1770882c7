//! Output schema descriptors.

use crate::shape::OutputShape;
use serde::Serialize;
use serde_json::Value;

/// One tagged field of an output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputField {
    /// Rust field identifier.
    pub ident: &'static str,
    /// Canonical (`snake_case`) output name.
    pub name: &'static str,
    pub shape: OutputShape,
}

/// A struct whose fields are populated from deployment outputs.
///
/// Usually derived with `#[derive(OutputSchema)]` and `#[output("name")]`
/// field attributes. Fields without an attribute do not appear in
/// [`fields`](OutputSchema::fields) and are never touched by the engine.
pub trait OutputSchema {
    /// Tagged fields in declaration order.
    fn fields() -> &'static [OutputField];

    /// Store `value` into `field`, or hand it back if the field's type
    /// cannot hold it.
    fn assign(&mut self, field: &OutputField, value: Value) -> Result<(), Value>;
}

/// Canonical output names required by a schema, in declaration order.
///
/// Not deduplicated: a schema tagging two fields with the same name yields it twice.
pub fn required_outputs<S: OutputSchema>() -> Vec<&'static str> {
    S::fields().iter().map(|field| field.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputSchema;
    use serde_json::{Map, Value};

    #[derive(Default, OutputSchema)]
    struct Sample {
        #[output("deployment_summary")]
        deployment_summary: Map<String, Value>,
        scratch: String,
        #[output("vm_host")]
        vm_host: Value,
        #[output("vm_host")]
        vm_host_again: Value,
    }

    #[test]
    fn test_required_outputs_in_declaration_order() {
        assert_eq!(
            required_outputs::<Sample>(),
            vec!["deployment_summary", "vm_host", "vm_host"]
        );
    }

    #[test]
    fn test_untagged_fields_are_not_listed() {
        assert!(Sample::fields().iter().all(|f| f.ident != "scratch"));
        let sample = Sample::default();
        assert!(sample.scratch.is_empty());
    }

    #[test]
    fn test_field_table_carries_shapes() {
        let fields = Sample::fields();
        assert_eq!(fields[0].ident, "deployment_summary");
        assert_eq!(fields[0].shape.to_string(), "object");
        assert_eq!(fields[1].shape.to_string(), "any");
        assert_eq!(fields[2].ident, "vm_host_again");
    }
}
