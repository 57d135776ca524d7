//! Schema loader for JSON schema files
//!
//! A schema file describes a JSON record type:
//!
//! ```json
//! {
//!   "name": "user",
//!   "disposable_domains": ["throwaway.io"],
//!   "fields": [
//!     { "name": "email", "type": "string", "rules": "email,nonDisposable" },
//!     { "name": "age", "type": "int", "rules": "optional,min=18" }
//!   ]
//! }
//! ```
//!
//! Records are read by field name. A missing key or a JSON null reads as
//! unset; a value of a different JSON type reads as mistyped and is rejected
//! by the validator.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::builder::Schema;
use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldValue, ValueKind};

/// On-disk schema file
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaFile {
    pub name: String,
    /// Extra domains to treat as disposable
    #[serde(default)]
    pub disposable_domains: Vec<String>,
    pub fields: Vec<FieldEntry>,
}

/// One field declaration in a schema file
#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default)]
    pub rules: String,
}

/// A schema over JSON records plus the file's provider settings
#[derive(Debug)]
pub struct LoadedSchema {
    pub schema: Schema<Value>,
    pub disposable_domains: Vec<String>,
}

/// Loads JSON record schemas from disk or memory.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads and builds the schema stored at `path`.
    pub fn load_file(path: &Path) -> SchemaResult<LoadedSchema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        Self::load_str(&content, &path.display().to_string())
    }

    /// Builds a schema from JSON text; `origin` names the source in errors.
    pub fn load_str(content: &str, origin: &str) -> SchemaResult<LoadedSchema> {
        let file: SchemaFile = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(origin, format!("Invalid JSON: {}", e)))?;

        Self::build(file)
    }

    /// Builds a schema from an already decoded file.
    pub fn build(file: SchemaFile) -> SchemaResult<LoadedSchema> {
        let mut builder = Schema::<Value>::builder(file.name);

        for entry in file.fields {
            let key = entry.name.clone();
            let kind = entry.kind;
            builder = builder.field(entry.name, kind, entry.rules, move |doc| read_json(doc, &key, kind));
        }

        Ok(LoadedSchema {
            schema: builder.build()?,
            disposable_domains: file.disposable_domains,
        })
    }
}

/// Reads a top-level member of a JSON object as a field value.
fn read_json<'a>(doc: &'a Value, key: &str, kind: ValueKind) -> FieldValue<'a> {
    let value = match doc.get(key) {
        None | Some(Value::Null) => return FieldValue::Unset,
        Some(value) => value,
    };

    let read = match kind {
        ValueKind::String => value.as_str().map(FieldValue::Str),
        ValueKind::Int => value.as_i64().map(FieldValue::Int),
        ValueKind::Float => value.as_f64().map(FieldValue::Float),
        ValueKind::Bool => value.as_bool().map(FieldValue::Bool),
    };
    read.unwrap_or_else(|| FieldValue::Mistyped(json_type(value)))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(n) if n.is_u64() => "out-of-range int",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
