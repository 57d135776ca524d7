//! Per-call validation options

use serde::{Deserialize, Serialize};

/// Options for one validation call.
///
/// Passed by reference and never modified by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Skip every `nonDisposable` rule
    pub disable_disposable_check: bool,
    /// Ask the email checker not to run catch-all detection
    pub disable_catch_all_check: bool,
    /// Skip zero-valued fields as if they were marked `optional`.
    /// Fields marked `required` are still checked.
    pub treat_empty_as_optional: bool,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_disposable_check(mut self) -> Self {
        self.disable_disposable_check = true;
        self
    }

    pub fn without_catch_all_check(mut self) -> Self {
        self.disable_catch_all_check = true;
        self
    }

    pub fn empty_as_optional(mut self) -> Self {
        self.treat_empty_as_optional = true;
        self
    }
}
