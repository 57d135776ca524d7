//! Rule evaluators
//!
//! One function per rule kind, each a function of the field, the rule's
//! argument and the call context. A failed check is `Ok(Outcome::Fail)`;
//! `Err` is reserved for configuration and provider errors.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::providers::{EmailSyntax, ProviderError, VerifyOptions};
use crate::rules::{RuleKind, RuleSpec};
use crate::schema::{FieldDescriptor, FieldValue, ValueKind};

use super::config::ValidationConfig;
use super::errors::{ValidationError, ValidationResult};
use super::validator::Providers;

fn non_numeric_start_regex() -> &'static Regex {
    static NON_NUMERIC_START: OnceLock<Regex> = OnceLock::new();
    NON_NUMERIC_START
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9\-._ ]*$").expect("nonNumericStart pattern is valid"))
}

/// Result of one rule on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Pass,
    Fail(String),
}

/// Everything an evaluator may consult
pub(crate) struct EvalContext<'a> {
    pub field: &'a FieldDescriptor<'a>,
    pub config: &'a ValidationConfig,
    pub providers: &'a Providers,
}

impl EvalContext<'_> {
    fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            catch_all: !self.config.disable_catch_all_check,
        }
    }

    fn verify_email(&self, rule: RuleKind, address: &str) -> ValidationResult<EmailSyntax> {
        self.providers
            .email
            .verify(address, &self.verify_options())
            .map_err(|source| provider_error(self.field, rule, source))
    }
}

/// Runs one rule against the context's field
pub(crate) fn evaluate(rule: &RuleSpec, ctx: &EvalContext<'_>) -> ValidationResult<Outcome> {
    match rule.kind {
        RuleKind::Optional => Ok(Outcome::Pass),
        RuleKind::Required => required(ctx),
        RuleKind::Min => bound(rule, ctx, Bound::Lower),
        RuleKind::Max => bound(rule, ctx, Bound::Upper),
        RuleKind::NonNumericStart => non_numeric_start(ctx),
        RuleKind::Email => email(ctx),
        RuleKind::RequiredDomain => required_domain(rule, ctx),
        RuleKind::NonDisposable => non_disposable(ctx),
        RuleKind::Domain => domain(ctx),
    }
}

fn required(ctx: &EvalContext<'_>) -> ValidationResult<Outcome> {
    if ctx.field.value.as_text().is_empty() {
        return Ok(Outcome::Fail(format!("{} is a required field", ctx.field.name)));
    }
    Ok(Outcome::Pass)
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

impl Bound {
    fn holds<T: PartialOrd>(self, value: T, limit: T) -> bool {
        match self {
            Bound::Lower => value >= limit,
            Bound::Upper => value <= limit,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Bound::Lower => "at least",
            Bound::Upper => "at most",
        }
    }
}

/// `min`/`max`: numeric range on int and float fields, code-point length
/// on string fields. The semantics follow the declared kind, never the value.
fn bound(rule: &RuleSpec, ctx: &EvalContext<'_>, side: Bound) -> ValidationResult<Outcome> {
    let field = ctx.field;

    let (holds, limit, unit) = match field.kind {
        ValueKind::Int => {
            let limit: i64 = parse_argument(field, rule, "expected an integer")?;
            match field.value {
                FieldValue::Int(value) => (side.holds(value, limit), limit.to_string(), ""),
                FieldValue::Unset => return Ok(Outcome::Pass),
                _ => return Err(incompatible(field, rule)),
            }
        }
        ValueKind::Float => {
            let limit: f64 = parse_argument(field, rule, "expected a number")?;
            if !limit.is_finite() {
                return Err(invalid_argument(field, rule, "expected a finite number"));
            }
            match field.value {
                FieldValue::Float(value) => (side.holds(value, limit), limit.to_string(), ""),
                FieldValue::Int(value) => (side.holds(value as f64, limit), limit.to_string(), ""),
                FieldValue::Unset => return Ok(Outcome::Pass),
                _ => return Err(incompatible(field, rule)),
            }
        }
        ValueKind::String => {
            let limit: usize = parse_argument(field, rule, "expected a non-negative integer")?;
            let length = field.value.as_text().chars().count();
            (side.holds(length, limit), limit.to_string(), " characters")
        }
        ValueKind::Bool => return Err(incompatible(field, rule)),
    };

    if holds {
        return Ok(Outcome::Pass);
    }
    Ok(Outcome::Fail(format!(
        "{} must be {} {}{}",
        field.name,
        side.phrase(),
        limit,
        unit
    )))
}

fn non_numeric_start(ctx: &EvalContext<'_>) -> ValidationResult<Outcome> {
    if non_numeric_start_regex().is_match(&ctx.field.value.as_text()) {
        return Ok(Outcome::Pass);
    }
    Ok(Outcome::Fail(format!("{} must start with a letter", ctx.field.name)))
}

fn invalid_email(ctx: &EvalContext<'_>) -> Outcome {
    Outcome::Fail(format!("{} must be a valid email address", ctx.field.name))
}

fn email(ctx: &EvalContext<'_>) -> ValidationResult<Outcome> {
    let syntax = ctx.verify_email(RuleKind::Email, &ctx.field.value.as_text())?;
    if syntax.valid {
        Ok(Outcome::Pass)
    } else {
        Ok(invalid_email(ctx))
    }
}

fn required_domain(rule: &RuleSpec, ctx: &EvalContext<'_>) -> ValidationResult<Outcome> {
    let syntax = ctx.verify_email(RuleKind::RequiredDomain, &ctx.field.value.as_text())?;
    if !syntax.valid {
        return Ok(invalid_email(ctx));
    }

    let required = rule.argument();
    if !syntax.domain.eq_ignore_ascii_case(required) {
        return Ok(Outcome::Fail(format!(
            "{} must be a part of the '{}' domain",
            ctx.field.name, required
        )));
    }
    Ok(Outcome::Pass)
}

/// Checks the email's domain when the field is also an `email` field,
/// otherwise the raw value. An invalid address passes here; `email`
/// reports it.
fn non_disposable(ctx: &EvalContext<'_>) -> ValidationResult<Outcome> {
    if ctx.config.disable_disposable_check {
        return Ok(Outcome::Pass);
    }

    let text = ctx.field.value.as_text();
    let domain = if ctx.field.rules.contains(RuleKind::Email) {
        let syntax = ctx.verify_email(RuleKind::NonDisposable, &text)?;
        if !syntax.valid {
            return Ok(Outcome::Pass);
        }
        syntax.domain
    } else {
        text.into_owned()
    };

    if ctx.providers.disposable.is_disposable(&domain) {
        return Ok(Outcome::Fail(format!(
            "{} contains a disposable domain",
            ctx.field.name
        )));
    }
    Ok(Outcome::Pass)
}

fn domain(ctx: &EvalContext<'_>) -> ValidationResult<Outcome> {
    let exists = ctx
        .providers
        .domain
        .exists(&ctx.field.value.as_text())
        .map_err(|source| provider_error(ctx.field, RuleKind::Domain, source))?;

    if exists {
        return Ok(Outcome::Pass);
    }
    Ok(Outcome::Fail(format!("{} is an invalid domain", ctx.field.name)))
}

fn parse_argument<T: FromStr>(field: &FieldDescriptor<'_>, rule: &RuleSpec, expected: &str) -> ValidationResult<T> {
    rule.argument()
        .parse()
        .map_err(|_| invalid_argument(field, rule, expected))
}

fn invalid_argument(field: &FieldDescriptor<'_>, rule: &RuleSpec, reason: &str) -> ValidationError {
    ValidationError::InvalidArgument {
        field: field.name.to_string(),
        rule: rule.kind,
        argument: rule.argument().to_string(),
        reason: reason.to_string(),
    }
}

fn incompatible(field: &FieldDescriptor<'_>, rule: &RuleSpec) -> ValidationError {
    ValidationError::IncompatibleKind {
        field: field.name.to_string(),
        rule: rule.kind,
        kind: field.kind,
    }
}

fn provider_error(field: &FieldDescriptor<'_>, rule: RuleKind, source: ProviderError) -> ValidationError {
    warn!(field = field.name, rule = rule.name(), error = %source, "provider unavailable");
    ValidationError::ProviderUnavailable {
        field: field.name.to_string(),
        rule,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{parse_rules, RuleSet};

    fn run(kind: ValueKind, value: FieldValue<'_>, annotation: &str) -> ValidationResult<Vec<Outcome>> {
        run_with(kind, value, annotation, &ValidationConfig::default())
    }

    fn run_with(
        kind: ValueKind,
        value: FieldValue<'_>,
        annotation: &str,
        config: &ValidationConfig,
    ) -> ValidationResult<Vec<Outcome>> {
        let rules: RuleSet = parse_rules(annotation).unwrap();
        let field = FieldDescriptor {
            name: "Field",
            raw_rules: annotation,
            rules: &rules,
            kind,
            value,
        };
        let providers = Providers::default();
        let ctx = EvalContext {
            field: &field,
            config,
            providers: &providers,
        };
        rules.iter().map(|rule| evaluate(rule, &ctx)).collect()
    }

    fn fail(message: &str) -> Outcome {
        Outcome::Fail(message.to_string())
    }

    #[test]
    fn test_required() {
        assert_eq!(run(ValueKind::String, FieldValue::Str(""), "required").unwrap(), vec![fail("Field is a required field")]);
        assert_eq!(run(ValueKind::String, FieldValue::Unset, "required").unwrap(), vec![fail("Field is a required field")]);
        assert_eq!(run(ValueKind::String, FieldValue::Str("x"), "required").unwrap(), vec![Outcome::Pass]);
        assert_eq!(run(ValueKind::Int, FieldValue::Int(0), "required").unwrap(), vec![Outcome::Pass]);
    }

    #[test]
    fn test_length_bounds_count_code_points() {
        let outcomes = run(ValueKind::String, FieldValue::Str("héllo"), "min=5,max=5").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass, Outcome::Pass]);

        let outcomes = run(ValueKind::String, FieldValue::Str("a"), "min=2").unwrap();
        assert_eq!(outcomes, vec![fail("Field must be at least 2 characters")]);

        let outcomes = run(ValueKind::String, FieldValue::Str("abcde"), "max=4").unwrap();
        assert_eq!(outcomes, vec![fail("Field must be at most 4 characters")]);
    }

    #[test]
    fn test_numeric_bounds() {
        assert_eq!(run(ValueKind::Int, FieldValue::Int(12), "min=18").unwrap(), vec![fail("Field must be at least 18")]);
        assert_eq!(run(ValueKind::Int, FieldValue::Int(19), "min=18").unwrap(), vec![Outcome::Pass]);
        assert_eq!(run(ValueKind::Int, FieldValue::Int(100), "max=99").unwrap(), vec![fail("Field must be at most 99")]);
        assert_eq!(run(ValueKind::Float, FieldValue::Float(2.5), "min=2.5,max=3").unwrap(), vec![Outcome::Pass, Outcome::Pass]);
        assert_eq!(run(ValueKind::Float, FieldValue::Float(3.5), "max=3").unwrap(), vec![fail("Field must be at most 3")]);
    }

    #[test]
    fn test_numeric_bound_on_unset_passes() {
        assert_eq!(run(ValueKind::Int, FieldValue::Unset, "min=18").unwrap(), vec![Outcome::Pass]);
    }

    #[test]
    fn test_unparsable_argument_is_configuration_error() {
        let err = run(ValueKind::String, FieldValue::Str("abc"), "min=abc").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArgument { rule: RuleKind::Min, .. }));

        let err = run(ValueKind::Int, FieldValue::Int(3), "max=2.5").unwrap_err();
        assert_eq!(err.code(), "FG_INVALID_ARGUMENT");

        let err = run(ValueKind::String, FieldValue::Str("abc"), "max=-1").unwrap_err();
        assert_eq!(err.code(), "FG_INVALID_ARGUMENT");

        let err = run(ValueKind::Float, FieldValue::Float(1.0), "max=NaN").unwrap_err();
        assert_eq!(err.code(), "FG_INVALID_ARGUMENT");
    }

    #[test]
    fn test_bound_on_bool_is_configuration_error() {
        let err = run(ValueKind::Bool, FieldValue::Bool(true), "min=1").unwrap_err();
        assert_eq!(err.code(), "FG_INCOMPATIBLE_KIND");
    }

    #[test]
    fn test_non_numeric_start() {
        assert_eq!(run(ValueKind::String, FieldValue::Str("apple"), "nonNumericStart").unwrap(), vec![Outcome::Pass]);
        assert_eq!(run(ValueKind::String, FieldValue::Str("Mr. Smith-Jones_2"), "nonNumericStart").unwrap(), vec![Outcome::Pass]);
        assert_eq!(
            run(ValueKind::String, FieldValue::Str("4pple"), "nonNumericStart").unwrap(),
            vec![fail("Field must start with a letter")]
        );
        assert_eq!(
            run(ValueKind::String, FieldValue::Str("apple!"), "nonNumericStart").unwrap(),
            vec![fail("Field must start with a letter")]
        );
    }

    #[test]
    fn test_email() {
        assert_eq!(run(ValueKind::String, FieldValue::Str("apple@gmail.com"), "email").unwrap(), vec![Outcome::Pass]);
        assert_eq!(
            run(ValueKind::String, FieldValue::Str("not-an-address"), "email").unwrap(),
            vec![fail("Field must be a valid email address")]
        );
    }

    #[test]
    fn test_required_domain() {
        let outcomes = run(ValueKind::String, FieldValue::Str("staff@chcfl.org"), "req_domain=chcfl.org").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass]);

        let outcomes = run(ValueKind::String, FieldValue::Str("staff@gmail.com"), "req_domain=chcfl.org").unwrap();
        assert_eq!(outcomes, vec![fail("Field must be a part of the 'chcfl.org' domain")]);

        let outcomes = run(ValueKind::String, FieldValue::Str("staff"), "req_domain=chcfl.org").unwrap();
        assert_eq!(outcomes, vec![fail("Field must be a valid email address")]);
    }

    #[test]
    fn test_required_domain_ignores_case() {
        let outcomes = run(ValueKind::String, FieldValue::Str("Staff@CHCFL.org"), "req_domain=CHCFL.org").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass]);

        let outcomes = run(ValueKind::String, FieldValue::Str("staff@chcfl.org"), "req_domain=Chcfl.Org").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass]);
    }

    #[test]
    fn test_non_disposable_uses_email_domain() {
        let outcomes = run(ValueKind::String, FieldValue::Str("testing@example.com"), "email,nonDisposable").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass, fail("Field contains a disposable domain")]);

        let outcomes = run(ValueKind::String, FieldValue::Str("staff@chcfl.org"), "email,nonDisposable").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass, Outcome::Pass]);
    }

    #[test]
    fn test_non_disposable_leaves_bad_address_to_email() {
        let outcomes = run(ValueKind::String, FieldValue::Str("not-an-address"), "nonDisposable,email").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass, fail("Field must be a valid email address")]);
    }

    #[test]
    fn test_non_disposable_uses_raw_value() {
        let outcomes = run(ValueKind::String, FieldValue::Str("example.com"), "nonDisposable").unwrap();
        assert_eq!(outcomes, vec![fail("Field contains a disposable domain")]);

        let outcomes = run(ValueKind::String, FieldValue::Str("chcfl.org"), "nonDisposable").unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass]);
    }

    #[test]
    fn test_non_disposable_disabled() {
        let config = ValidationConfig::new().without_disposable_check();
        let outcomes = run_with(ValueKind::String, FieldValue::Str("example.com"), "nonDisposable", &config).unwrap();
        assert_eq!(outcomes, vec![Outcome::Pass]);
    }

    #[test]
    fn test_domain_pattern_strategy() {
        assert_eq!(run(ValueKind::String, FieldValue::Str("google.com"), "domain").unwrap(), vec![Outcome::Pass]);
        assert_eq!(
            run(ValueKind::String, FieldValue::Str("apple"), "domain").unwrap(),
            vec![fail("Field is an invalid domain")]
        );
    }

    #[test]
    fn test_optional_is_a_marker() {
        assert_eq!(run(ValueKind::String, FieldValue::Str(""), "optional").unwrap(), vec![Outcome::Pass]);
    }
}
