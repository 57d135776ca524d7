//! Field value types
//!
//! Supported kinds:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;

/// Declared kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
}

impl ValueKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
        }
    }

    /// Whether `min`/`max` compare numerically on this kind
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A field's value, borrowed from the record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Absent optional value
    Unset,
    /// Present, but not of the declared kind; holds the type actually found
    Mistyped(&'static str),
}

impl<'a> FieldValue<'a> {
    /// Whether the value is its type's zero value (empty, 0, false, unset)
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Int(i) => *i == 0,
            FieldValue::Float(f) => *f == 0.0,
            FieldValue::Bool(b) => !b,
            FieldValue::Unset => true,
            FieldValue::Mistyped(_) => false,
        }
    }

    /// String representation used by the text rules
    pub fn as_text(&self) -> Cow<'a, str> {
        match *self {
            FieldValue::Str(s) => Cow::Borrowed(s),
            FieldValue::Int(i) => Cow::Owned(i.to_string()),
            FieldValue::Float(f) => Cow::Owned(f.to_string()),
            FieldValue::Bool(b) => Cow::Borrowed(if b { "true" } else { "false" }),
            FieldValue::Unset | FieldValue::Mistyped(_) => Cow::Borrowed(""),
        }
    }
}

/// One field of one record, as seen by the validator
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor<'a> {
    pub name: &'a str,
    /// Annotation as declared
    pub raw_rules: &'a str,
    pub rules: &'a RuleSet,
    pub kind: ValueKind,
    pub value: FieldValue<'a>,
}

impl FieldDescriptor<'_> {
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}
