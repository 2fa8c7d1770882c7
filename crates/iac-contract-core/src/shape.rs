//! Value kinds and declared field shapes.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Runtime kind of an output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a schema field requires of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Anything, including null.
    Any,
    Bool,
    Number,
    /// A number representable as the field's integer type.
    Integer,
    String,
    Array,
    Object,
}

/// Declared shape of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputShape {
    pub kind: ShapeKind,
    pub nullable: bool,
}

impl OutputShape {
    pub const fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    pub const fn any() -> Self {
        Self {
            kind: ShapeKind::Any,
            nullable: true,
        }
    }

    pub const fn or_null(self) -> Self {
        Self {
            kind: self.kind,
            nullable: true,
        }
    }

    /// Whether a value of this kind could be stored in the field.
    ///
    /// Integer fields may still reject a number that does not fit.
    pub fn admits(&self, kind: ValueKind) -> bool {
        if kind == ValueKind::Null {
            return self.nullable;
        }
        match self.kind {
            ShapeKind::Any => true,
            ShapeKind::Bool => kind == ValueKind::Bool,
            ShapeKind::Number | ShapeKind::Integer => kind == ValueKind::Number,
            ShapeKind::String => kind == ValueKind::String,
            ShapeKind::Array => kind == ValueKind::Array,
            ShapeKind::Object => kind == ValueKind::Object,
        }
    }
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ShapeKind::Any => return f.write_str("any"),
            ShapeKind::Bool => "bool",
            ShapeKind::Number => "number",
            ShapeKind::Integer => "integer",
            ShapeKind::String => "string",
            ShapeKind::Array => "array",
            ShapeKind::Object => "object",
        };
        if self.nullable {
            write!(f, "{kind} or null")
        } else {
            f.write_str(kind)
        }
    }
}

/// A field type that can hold an output value.
///
/// `from_output` hands the value back unchanged when its shape does not fit,
/// so the caller can report what it actually received.
pub trait OutputSlot: Sized {
    const SHAPE: OutputShape;

    fn from_output(value: Value) -> Result<Self, Value>;
}

impl OutputSlot for Value {
    const SHAPE: OutputShape = OutputShape::any();

    fn from_output(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl OutputSlot for Map<String, Value> {
    const SHAPE: OutputShape = OutputShape::new(ShapeKind::Object);

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(other),
        }
    }
}

impl OutputSlot for Vec<Value> {
    const SHAPE: OutputShape = OutputShape::new(ShapeKind::Array);

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::Array(items) => Ok(items),
            other => Err(other),
        }
    }
}

impl OutputSlot for String {
    const SHAPE: OutputShape = OutputShape::new(ShapeKind::String);

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl OutputSlot for bool {
    const SHAPE: OutputShape = OutputShape::new(ShapeKind::Bool);

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl OutputSlot for f64 {
    const SHAPE: OutputShape = OutputShape::new(ShapeKind::Number);

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) => Ok(f),
                None => Err(Value::Number(n)),
            },
            other => Err(other),
        }
    }
}

impl OutputSlot for i64 {
    const SHAPE: OutputShape = OutputShape::new(ShapeKind::Integer);

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(i),
                None => Err(Value::Number(n)),
            },
            other => Err(other),
        }
    }
}

impl OutputSlot for u64 {
    const SHAPE: OutputShape = OutputShape::new(ShapeKind::Integer);

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(u) => Ok(u),
                None => Err(Value::Number(n)),
            },
            other => Err(other),
        }
    }
}

impl<T: OutputSlot> OutputSlot for Option<T> {
    const SHAPE: OutputShape = T::SHAPE.or_null();

    fn from_output(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_output(other).map(Some),
        }
    }
}
