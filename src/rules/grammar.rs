//! Annotation parsing and re-serialization

use std::fmt;
use std::str::FromStr;

use super::errors::{RuleError, RuleResult};

/// The closed set of recognized rule kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    Optional,
    Min,
    Max,
    Email,
    Domain,
    RequiredDomain,
    NonDisposable,
    NonNumericStart,
}

/// Failure policy of a rule within one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Failure skips the remaining rules on the field
    Hard,
    /// Failure is recorded and evaluation continues
    Soft,
}

impl RuleKind {
    /// Every recognized kind
    pub const ALL: [RuleKind; 9] = [
        RuleKind::Required,
        RuleKind::Optional,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Email,
        RuleKind::Domain,
        RuleKind::RequiredDomain,
        RuleKind::NonDisposable,
        RuleKind::NonNumericStart,
    ];

    /// Returns the annotation name of this rule
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Optional => "optional",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Email => "email",
            RuleKind::Domain => "domain",
            RuleKind::RequiredDomain => "req_domain",
            RuleKind::NonDisposable => "nonDisposable",
            RuleKind::NonNumericStart => "nonNumericStart",
        }
    }

    /// Whether the rule is written as `name=argument`
    pub fn takes_argument(&self) -> bool {
        matches!(self, RuleKind::Min | RuleKind::Max | RuleKind::RequiredDomain)
    }

    /// Failure policy of the rule.
    ///
    /// `min` guards later rules only when it bounds a length; as a numeric
    /// range check it is independent of the rest of the field.
    pub fn strictness(&self, numeric: bool) -> Strictness {
        match self {
            RuleKind::Required | RuleKind::Email | RuleKind::NonNumericStart => Strictness::Hard,
            RuleKind::Min if !numeric => Strictness::Hard,
            _ => Strictness::Soft,
        }
    }
}

impl FromStr for RuleKind {
    type Err = RuleError;

    fn from_str(s: &str) -> RuleResult<Self> {
        RuleKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| RuleError::UnknownRule(s.to_string()))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed rule: a kind and its argument as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub kind: RuleKind,
    pub argument: Option<String>,
}

impl RuleSpec {
    /// Rule without an argument
    pub fn new(kind: RuleKind) -> Self {
        Self { kind, argument: None }
    }

    /// Rule with an argument
    pub fn with_argument(kind: RuleKind, argument: impl Into<String>) -> Self {
        Self {
            kind,
            argument: Some(argument.into()),
        }
    }

    /// Argument as written, empty when absent
    pub fn argument(&self) -> &str {
        self.argument.as_deref().unwrap_or("")
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{}={}", self.kind, arg),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Ordered list of rules attached to one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RuleSpec>,
}

impl RuleSet {
    pub fn new(rules: Vec<RuleSpec>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleSpec> {
        self.rules.iter()
    }

    /// Whether any rule of the given kind is present
    pub fn contains(&self, kind: RuleKind) -> bool {
        self.rules.iter().any(|r| r.kind == kind)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleSpec;
    type IntoIter = std::slice::Iter<'a, RuleSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> RuleResult<Self> {
        parse_rules(s)
    }
}

/// Parses an annotation string into an ordered rule set.
///
/// # Errors
///
/// Returns `RuleError` for unknown names, empty segments, and rules whose
/// argument presence does not match their kind. Argument values are not
/// interpreted here.
pub fn parse_rules(annotation: &str) -> RuleResult<RuleSet> {
    if annotation.trim().is_empty() {
        return Ok(RuleSet::default());
    }

    let mut rules = Vec::new();
    for (position, segment) in annotation.split(',').enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(RuleError::EmptyRule(position));
        }

        let (name, argument) = match segment.split_once('=') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (segment, None),
        };

        let kind: RuleKind = name.parse()?;
        let spec = match (kind.takes_argument(), argument) {
            (true, Some(arg)) => RuleSpec::with_argument(kind, arg),
            (true, None) => return Err(RuleError::MissingArgument(kind.name())),
            (false, None) => RuleSpec::new(kind),
            (false, Some(arg)) => {
                return Err(RuleError::UnexpectedArgument {
                    rule: kind.name(),
                    argument: arg.to_string(),
                })
            }
        };
        rules.push(spec);
    }

    Ok(RuleSet::new(rules))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let set = parse_rules("required,min=2,max=64,nonNumericStart").unwrap();
        let kinds: Vec<_> = set.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RuleKind::Required, RuleKind::Min, RuleKind::Max, RuleKind::NonNumericStart]
        );
        assert_eq!(set.iter().nth(1).unwrap().argument(), "2");
    }

    #[test]
    fn test_empty_annotation_is_empty_set() {
        assert!(parse_rules("").unwrap().is_empty());
        assert!(parse_rules("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let err = parse_rules("min=2,max64").unwrap_err();
        assert_eq!(err, RuleError::UnknownRule("max64".into()));
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert_eq!(parse_rules("required,,email").unwrap_err(), RuleError::EmptyRule(1));
        assert_eq!(parse_rules("email,").unwrap_err(), RuleError::EmptyRule(1));
    }

    #[test]
    fn test_argument_presence_checked() {
        assert_eq!(parse_rules("min").unwrap_err(), RuleError::MissingArgument("min"));
        assert!(matches!(
            parse_rules("email=yes").unwrap_err(),
            RuleError::UnexpectedArgument { rule: "email", .. }
        ));
    }

    #[test]
    fn test_argument_value_not_interpreted() {
        let set = parse_rules("optional,min=abc").unwrap();
        assert_eq!(set.iter().nth(1).unwrap().argument(), "abc");
    }

    #[test]
    fn test_argument_splits_on_first_equals() {
        let set = parse_rules("req_domain=a=b.com").unwrap();
        assert_eq!(set.iter().next().unwrap().argument(), "a=b.com");
    }

    #[test]
    fn test_round_trip() {
        for annotation in [
            "required,min=2,max=64,nonNumericStart",
            "email,req_domain=chcfl.org,nonDisposable",
            "optional,domain",
            "",
        ] {
            let set = parse_rules(annotation).unwrap();
            assert_eq!(set.to_string(), annotation);
            assert_eq!(parse_rules(&set.to_string()).unwrap(), set);
        }
    }

    #[test]
    fn test_round_trip_normalizes_whitespace() {
        let set = parse_rules(" required , min = 3 ").unwrap();
        assert_eq!(set.to_string(), "required,min=3");
    }

    #[test]
    fn test_strictness() {
        assert_eq!(RuleKind::Required.strictness(false), Strictness::Hard);
        assert_eq!(RuleKind::Min.strictness(false), Strictness::Hard);
        assert_eq!(RuleKind::Min.strictness(true), Strictness::Soft);
        assert_eq!(RuleKind::Max.strictness(false), Strictness::Soft);
        assert_eq!(RuleKind::NonDisposable.strictness(false), Strictness::Soft);
        assert_eq!(RuleKind::Domain.strictness(false), Strictness::Soft);
    }

    #[test]
    fn test_every_kind_parses_from_its_name() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.name().parse::<RuleKind>().unwrap(), kind);
        }
    }
}
