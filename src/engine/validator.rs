//! Validation orchestrator
//!
//! For each annotated field, in schema order:
//! 1. Reject the record if the value is not of the declared kind
//! 2. Skip the field if it is zero-valued and optional
//! 3. Run its rules left to right; a failed hard rule ends the field,
//!    a failed soft rule is recorded and evaluation continues
//! 4. Abort the call on a configuration or provider error

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::providers::{
    DisposableBlockList, DisposableDomainClassifier, DomainExistenceChecker, EmailSyntaxChecker,
    PatternDomainChecker, RegexEmailChecker,
};
use crate::report::{ValidationReport, Violation};
use crate::rules::{RuleKind, Strictness};
use crate::schema::{FieldDescriptor, FieldValue, Schema};

use super::config::ValidationConfig;
use super::errors::{ValidationError, ValidationResult};
use super::evaluators::{evaluate, EvalContext, Outcome};

/// Provider instances shared by every call of one validator
#[derive(Clone)]
pub(crate) struct Providers {
    pub email: Arc<dyn EmailSyntaxChecker>,
    pub domain: Arc<dyn DomainExistenceChecker>,
    pub disposable: Arc<dyn DisposableDomainClassifier>,
}

impl Default for Providers {
    fn default() -> Self {
        Self {
            email: Arc::new(RegexEmailChecker::new()),
            domain: Arc::new(PatternDomainChecker::new()),
            disposable: Arc::new(DisposableBlockList::default()),
        }
    }
}

/// Validates records against their schema.
///
/// Holds no per-call state: one validator can serve any number of
/// concurrent calls, with any schema and config.
#[derive(Clone, Default)]
pub struct Validator {
    providers: Providers,
}

impl Validator {
    /// Validator with the default, network-free providers
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Validates `record` against `schema`.
    ///
    /// # Returns
    ///
    /// * `Ok(report)` - Every violation found; empty when the record is valid
    /// * `Err(ValidationError)` - A rule argument is malformed, a value is
    ///   not of its declared kind, or a provider could not answer
    pub fn validate<T>(
        &self,
        schema: &Schema<T>,
        record: &T,
        config: &ValidationConfig,
    ) -> ValidationResult<ValidationReport> {
        let mut report = ValidationReport::new();

        for field in schema.describe(record) {
            if let FieldValue::Mistyped(found) = field.value {
                debug!(schema = schema.name(), field = field.name, found, "mistyped value");
                return Err(ValidationError::TypeMismatch {
                    field: field.name.to_string(),
                    expected: field.kind,
                    found,
                });
            }
            if skips(&field, config) {
                debug!(schema = schema.name(), field = field.name, "empty optional field skipped");
                continue;
            }
            self.validate_field(&field, config, &mut report)?;
        }

        debug!(
            schema = schema.name(),
            fields = schema.len(),
            violations = report.len(),
            "record validated"
        );
        Ok(report)
    }

    fn validate_field(
        &self,
        field: &FieldDescriptor<'_>,
        config: &ValidationConfig,
        report: &mut ValidationReport,
    ) -> ValidationResult<()> {
        let ctx = EvalContext {
            field,
            config,
            providers: &self.providers,
        };
        let numeric = field.kind.is_numeric();

        for rule in field.rules {
            let outcome = evaluate(rule, &ctx)?;
            trace!(field = field.name, rule = %rule, passed = outcome == Outcome::Pass, "rule evaluated");

            if let Outcome::Fail(message) = outcome {
                report.push(Violation::new(field.name, rule.kind, message));
                if rule.kind.strictness(numeric) == Strictness::Hard {
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Zero-valued fields are skipped when marked `optional`, or when the config
/// treats empty as optional and the field is not `required`.
fn skips(field: &FieldDescriptor<'_>, config: &ValidationConfig) -> bool {
    if !field.is_zero() {
        return false;
    }
    field.rules.contains(RuleKind::Optional)
        || (config.treat_empty_as_optional && !field.rules.contains(RuleKind::Required))
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

/// Injects providers into a [`Validator`]; unset providers use the defaults
#[derive(Default)]
pub struct ValidatorBuilder {
    email: Option<Arc<dyn EmailSyntaxChecker>>,
    domain: Option<Arc<dyn DomainExistenceChecker>>,
    disposable: Option<Arc<dyn DisposableDomainClassifier>>,
}

impl ValidatorBuilder {
    pub fn email_checker(mut self, checker: impl EmailSyntaxChecker + 'static) -> Self {
        self.email = Some(Arc::new(checker));
        self
    }

    pub fn domain_checker(mut self, checker: impl DomainExistenceChecker + 'static) -> Self {
        self.domain = Some(Arc::new(checker));
        self
    }

    pub fn disposable_classifier(mut self, classifier: impl DisposableDomainClassifier + 'static) -> Self {
        self.disposable = Some(Arc::new(classifier));
        self
    }

    /// Uses a classifier that is also held elsewhere (e.g. to register
    /// domains later)
    pub fn shared_disposable_classifier(mut self, classifier: Arc<dyn DisposableDomainClassifier>) -> Self {
        self.disposable = Some(classifier);
        self
    }

    pub fn build(self) -> Validator {
        let defaults = Providers::default();
        Validator {
            providers: Providers {
                email: self.email.unwrap_or(defaults.email),
                domain: self.domain.unwrap_or(defaults.domain),
                disposable: self.disposable.unwrap_or(defaults.disposable),
            },
        }
    }
}
