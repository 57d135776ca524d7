//! Validation engine for fieldguard
//!
//! Drives the per-field, per-rule loop over a record and aggregates every
//! violation into a [`ValidationReport`](crate::report::ValidationReport).
//!
//! # Principles
//!
//! 1. The record, schema and config are never mutated
//! 2. No process-wide mutable state; providers are injected
//! 3. Data violations are reported, never raised
//! 4. Configuration and provider errors abort the call
//! 5. The same record and config always yield the same report
//!
//! # Usage
//!
//! ```
//! use fieldguard::engine::{ValidationConfig, Validator};
//! use fieldguard::schema::Schema;
//!
//! struct User {
//!     email: String,
//! }
//!
//! let schema = Schema::<User>::builder("user")
//!     .string("Email", "required,email,nonDisposable", |u| u.email.as_str())
//!     .build()
//!     .unwrap();
//!
//! let user = User { email: "testing@example.com".into() };
//! let report = Validator::new()
//!     .validate(&schema, &user, &ValidationConfig::default())
//!     .unwrap();
//! assert_eq!(report.to_string(), "Email contains a disposable domain");
//! ```

mod config;
mod errors;
mod evaluators;
mod validator;

pub use config::ValidationConfig;
pub use errors::{ErrorKind, ValidationError, ValidationResult};
pub use validator::{Validator, ValidatorBuilder};
