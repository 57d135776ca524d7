//! Record schemas for fieldguard
//!
//! A schema is the explicit description of a record type: for each field a
//! name, a value kind, a typed accessor and a pre-parsed rule set. It is
//! built once per record type and shared read-only between validations.
//!
//! # Design Principles
//!
//! - Annotations are parsed once, at build time
//! - Unknown rules and kind mismatches fail the build, not a validation
//! - Fields without rules are not part of the schema
//! - Describing a record never mutates it
//!
//! # Usage
//!
//! ```
//! use fieldguard::schema::Schema;
//!
//! struct User {
//!     name: String,
//!     age: i64,
//! }
//!
//! let schema = Schema::<User>::builder("user")
//!     .string("Name", "required,min=2,max=64", |u| u.name.as_str())
//!     .int("Age", "min=18", |u| u.age)
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.len(), 2);
//! ```

mod builder;
mod errors;
mod loader;
mod types;

pub use builder::{Schema, SchemaBuilder};
pub use errors::{SchemaError, SchemaResult};
pub use loader::{FieldEntry, LoadedSchema, SchemaFile, SchemaLoader};
pub use types::{FieldDescriptor, FieldValue, ValueKind};
