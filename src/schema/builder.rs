//! Schema construction
//!
//! Annotations are parsed and checked against the field kind exactly once,
//! in [`SchemaBuilder::build`].

use std::collections::HashSet;
use std::fmt;

use crate::rules::{parse_rules, RuleKind, RuleSet};

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDescriptor, FieldValue, ValueKind};

type Accessor<T> = Box<dyn for<'a> Fn(&'a T) -> FieldValue<'a> + Send + Sync>;

struct FieldSpec<T> {
    name: String,
    raw_rules: String,
    rules: RuleSet,
    kind: ValueKind,
    accessor: Accessor<T>,
}

/// Immutable description of a record type.
///
/// Holds only annotated fields, in declaration order.
pub struct Schema<T> {
    name: String,
    fields: Vec<FieldSpec<T>>,
}

impl<T: 'static> Schema<T> {
    /// Starts a schema for the named record type
    pub fn builder(name: impl Into<String>) -> SchemaBuilder<T> {
        SchemaBuilder {
            name: name.into(),
            pending: Vec::new(),
        }
    }
}

impl<T> Schema<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of annotated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Parsed rules of a field, if the field is annotated
    pub fn rules_for(&self, field: &str) -> Option<&RuleSet> {
        self.fields.iter().find(|f| f.name == field).map(|f| &f.rules)
    }

    /// Produces one descriptor per annotated field of `record`
    pub fn describe<'a>(&'a self, record: &'a T) -> impl Iterator<Item = FieldDescriptor<'a>> + 'a {
        self.fields.iter().map(move |spec| FieldDescriptor {
            name: &spec.name,
            raw_rules: &spec.raw_rules,
            rules: &spec.rules,
            kind: spec.kind,
            value: (spec.accessor)(record),
        })
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self
            .fields
            .iter()
            .map(|spec| (spec.name.as_str(), spec.kind, spec.raw_rules.as_str()))
            .collect();
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &fields)
            .finish()
    }
}

struct PendingField<T> {
    name: String,
    kind: ValueKind,
    raw_rules: String,
    accessor: Accessor<T>,
}

/// Declarative builder for [`Schema`]
pub struct SchemaBuilder<T> {
    name: String,
    pending: Vec<PendingField<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Registers a field with an explicit kind and accessor
    pub fn field<F>(mut self, name: impl Into<String>, kind: ValueKind, rules: impl Into<String>, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> FieldValue<'a> + Send + Sync + 'static,
    {
        self.pending.push(PendingField {
            name: name.into(),
            kind,
            raw_rules: rules.into(),
            accessor: Box::new(accessor),
        });
        self
    }

    pub fn string<F>(self, name: impl Into<String>, rules: impl Into<String>, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a str + Send + Sync + 'static,
    {
        self.field(name, ValueKind::String, rules, move |record| FieldValue::Str(accessor(record)))
    }

    /// String field that may be absent; `None` reads as unset
    pub fn optional_string<F>(self, name: impl Into<String>, rules: impl Into<String>, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a str> + Send + Sync + 'static,
    {
        self.field(name, ValueKind::String, rules, move |record| {
            accessor(record).map_or(FieldValue::Unset, FieldValue::Str)
        })
    }

    pub fn int<F>(self, name: impl Into<String>, rules: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        self.field(name, ValueKind::Int, rules, move |record| FieldValue::Int(accessor(record)))
    }

    pub fn optional_int<F>(self, name: impl Into<String>, rules: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<i64> + Send + Sync + 'static,
    {
        self.field(name, ValueKind::Int, rules, move |record| {
            accessor(record).map_or(FieldValue::Unset, FieldValue::Int)
        })
    }

    pub fn float<F>(self, name: impl Into<String>, rules: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> f64 + Send + Sync + 'static,
    {
        self.field(name, ValueKind::Float, rules, move |record| FieldValue::Float(accessor(record)))
    }

    pub fn bool<F>(self, name: impl Into<String>, rules: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.field(name, ValueKind::Bool, rules, move |record| FieldValue::Bool(accessor(record)))
    }

    /// Parses every annotation and checks it against the field kind.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if:
    /// - An annotation does not parse (unknown rule, missing argument, ...)
    /// - A rule cannot apply to the field's kind
    /// - Two fields share a name
    pub fn build(self) -> SchemaResult<Schema<T>> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(self.pending.len());

        for pending in self.pending {
            if !seen.insert(pending.name.clone()) {
                return Err(SchemaError::DuplicateField(pending.name));
            }

            let rules = parse_rules(&pending.raw_rules).map_err(|source| SchemaError::Rule {
                field: pending.name.clone(),
                source,
            })?;

            // Unannotated fields are never visited
            if rules.is_empty() {
                continue;
            }

            check_kind(&pending.name, pending.kind, &rules)?;

            fields.push(FieldSpec {
                name: pending.name,
                raw_rules: pending.raw_rules,
                rules,
                kind: pending.kind,
                accessor: pending.accessor,
            });
        }

        Ok(Schema {
            name: self.name,
            fields,
        })
    }
}

/// Rejects rules whose semantics are undefined for the field kind.
fn check_kind(field: &str, kind: ValueKind, rules: &RuleSet) -> SchemaResult<()> {
    for rule in rules {
        let compatible = match rule.kind {
            RuleKind::Required | RuleKind::Optional => true,
            RuleKind::Min | RuleKind::Max => kind != ValueKind::Bool,
            RuleKind::Email
            | RuleKind::Domain
            | RuleKind::RequiredDomain
            | RuleKind::NonDisposable
            | RuleKind::NonNumericStart => kind == ValueKind::String,
        };

        if !compatible {
            return Err(SchemaError::IncompatibleKind {
                field: field.to_string(),
                rule: rule.kind,
                kind,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        name: String,
        nickname: Option<String>,
        age: i64,
        score: f64,
        active: bool,
        notes: String,
    }

    fn sample() -> Account {
        Account {
            name: "Alice".into(),
            nickname: None,
            age: 30,
            score: 9.5,
            active: true,
            notes: String::new(),
        }
    }

    #[test]
    fn test_unannotated_fields_are_dropped() {
        let schema = Schema::<Account>::builder("account")
            .string("Name", "required", |a| a.name.as_str())
            .string("Notes", "", |a| a.notes.as_str())
            .build()
            .unwrap();

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["Name"]);
        assert!(schema.rules_for("Notes").is_none());
    }

    #[test]
    fn test_describe_reads_typed_values_in_order() {
        let schema = Schema::<Account>::builder("account")
            .string("Name", "required", |a| a.name.as_str())
            .optional_string("Nickname", "optional,min=2", |a| a.nickname.as_deref())
            .int("Age", "min=18", |a| a.age)
            .float("Score", "max=10", |a| a.score)
            .bool("Active", "required", |a| a.active)
            .build()
            .unwrap();

        let account = sample();
        let values: Vec<_> = schema.describe(&account).map(|d| (d.name, d.value)).collect();
        assert_eq!(
            values,
            vec![
                ("Name", FieldValue::Str("Alice")),
                ("Nickname", FieldValue::Unset),
                ("Age", FieldValue::Int(30)),
                ("Score", FieldValue::Float(9.5)),
                ("Active", FieldValue::Bool(true)),
            ]
        );
    }

    #[test]
    fn test_unknown_rule_fails_build() {
        let err = Schema::<Account>::builder("account")
            .string("Name", "min=2,max64", |a| a.name.as_str())
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "FG_UNKNOWN_RULE");
        assert!(err.to_string().contains("Name"));
    }

    #[test]
    fn test_min_on_bool_fails_build() {
        let err = Schema::<Account>::builder("account")
            .bool("Active", "min=1", |a| a.active)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::IncompatibleKind {
                rule: RuleKind::Min,
                kind: ValueKind::Bool,
                ..
            }
        ));
    }

    #[test]
    fn test_email_on_int_fails_build() {
        let err = Schema::<Account>::builder("account")
            .int("Age", "email", |a| a.age)
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "FG_INCOMPATIBLE_KIND");
    }

    #[test]
    fn test_duplicate_field_fails_build() {
        let err = Schema::<Account>::builder("account")
            .string("Name", "required", |a| a.name.as_str())
            .string("Name", "min=1", |a| a.notes.as_str())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(name) if name == "Name"));
    }

    #[test]
    fn test_malformed_argument_value_does_not_fail_build() {
        let schema = Schema::<Account>::builder("account")
            .string("Notes", "optional,min=abc", |a| a.notes.as_str())
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Schema<Account>>();
    }
}
