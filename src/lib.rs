//! fieldguard - declarative, rule-annotated record validation
//!
//! Fields carry comma-separated rule annotations (`required,min=2,email`).
//! A [`engine::Validator`] evaluates them against a record and returns a
//! [`report::ValidationReport`] listing every violation.

pub mod cli;
pub mod engine;
pub mod providers;
pub mod report;
pub mod rules;
pub mod schema;

pub use engine::{ValidationConfig, ValidationError, Validator};
pub use report::{ValidationReport, Violation};
pub use schema::Schema;
