//! Rule grammar for fieldguard
//!
//! A field carries an annotation such as `required,min=2,max=64,nonNumericStart`.
//! The grammar turns it into an ordered [`RuleSet`].
//!
//! # Grammar
//!
//! - Rules are separated by `,` and execute left to right
//! - `name=argument` splits on the first `=`
//! - An empty annotation yields an empty rule set (field is never visited)
//! - Rule names form a closed set; anything else is a configuration error
//!
//! Argument values are kept as written. Their interpretation (numeric bounds,
//! domain names) belongs to the evaluator of each rule.

mod errors;
mod grammar;

pub use errors::{RuleError, RuleResult};
pub use grammar::{parse_rules, RuleKind, RuleSet, RuleSpec, Strictness};
