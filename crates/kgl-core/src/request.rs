//! # Request Validators
//!
//! Field checks enforced at the HTTP boundary, before anything reaches a
//! record schema.
//!
//! A [`RequestValidator`] is an ordered list of [`FieldChain`]s. Every rule
//! of every chain runs; each failing rule contributes its own
//! [`FieldError`]. A field that fails two rules (e.g. `tonnage: "heavy"` is
//! neither numeric nor an integer ≥ 100) is reported twice.
//!
//! Values are read as text first: absent and `null` become the empty
//! string, numbers their decimal form, booleans `"true"`/`"false"`.

use serde_json::{Map, Value};

use crate::error::FieldError;
use crate::format::{self, CharClass};

/// A single predicate over a field's text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// Non-empty and every character in the class.
    Matches(CharClass),
    /// At least this many characters.
    MinLength(usize),
    /// Decimal number literal.
    Numeric,
    /// Integer literal not below `min`.
    Int {
        /// Inclusive lower bound.
        min: i64,
    },
    /// Non-empty text.
    NotEmpty,
    /// ISO-8601 date or date-time.
    Iso8601,
    /// Exactly one of the listed values.
    OneOf(&'static [&'static str]),
    /// Mobile phone number (see [`format::is_mobile_phone`]).
    MobilePhone,
}

impl Check {
    /// Whether `text` satisfies this check.
    pub fn passes(&self, text: &str) -> bool {
        match *self {
            Self::Matches(class) => class.matches(text),
            Self::MinLength(min) => format::char_len(text) >= min,
            Self::Numeric => format::is_numeric(text),
            Self::Int { min } => {
                format::parse_int_literal(text).is_some_and(|n| n >= min as f64)
            }
            Self::NotEmpty => !text.is_empty(),
            Self::Iso8601 => format::parse_iso8601(text).is_some(),
            Self::OneOf(allowed) => allowed.contains(&text),
            Self::MobilePhone => format::is_mobile_phone(text),
        }
    }
}

/// A check paired with the message reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    /// Predicate applied to the field's text.
    pub check: Check,
    /// Reported as `msg` when the check fails.
    pub message: &'static str,
}

impl Rule {
    /// Pair `check` with its failure message.
    pub const fn new(check: Check, message: &'static str) -> Self {
        Self { check, message }
    }
}

/// All rules for one body field, in evaluation order.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    /// Body field the rules read.
    pub path: &'static str,
    /// Rules, all evaluated.
    pub rules: &'static [Rule],
}

/// The request-level rule set of one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RequestValidator {
    /// Short name used in logs and by the CLI.
    pub name: &'static str,
    /// One chain per inspected field.
    pub chains: &'static [FieldChain],
}

impl RequestValidator {
    /// Run every rule and collect every failure, in declaration order.
    pub fn validate(&self, body: &Map<String, Value>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for chain in self.chains {
            let raw = body.get(chain.path);
            let text = as_text(raw);
            for rule in chain.rules {
                if !rule.check.passes(&text) {
                    errors.push(FieldError::body(chain.path, rule.message, raw));
                }
            }
        }
        errors
    }

    /// Names of the fields this validator inspects.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.chains.iter().map(|c| c.path)
    }
}

/// Read a JSON value as the text the rules operate on.
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| as_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Whole floats print without a fractional part (`150.0` → `"150"`).
pub(crate) fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static TONNAGE: RequestValidator = RequestValidator {
        name: "tonnage",
        chains: &[FieldChain {
            path: "tonnage",
            rules: &[
                Rule::new(Check::Numeric, "Tonnage must be a number"),
                Rule::new(Check::Int { min: 100 }, "Tonnage must be at least 100"),
            ],
        }],
    };

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn every_failing_rule_is_reported() {
        let errors = TONNAGE.validate(&body(json!({"tonnage": "heavy"})));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].msg, "Tonnage must be a number");
        assert_eq!(errors[1].msg, "Tonnage must be at least 100");
        assert_eq!(errors[0].value, Some(json!("heavy")));
    }

    #[test]
    fn numeric_but_below_minimum_reports_once() {
        let errors = TONNAGE.validate(&body(json!({"tonnage": 50})));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Tonnage must be at least 100");
    }

    #[test]
    fn numeric_strings_are_accepted() {
        assert!(TONNAGE.validate(&body(json!({"tonnage": "150"}))).is_empty());
        assert!(TONNAGE.validate(&body(json!({"tonnage": 150.0}))).is_empty());
    }

    #[test]
    fn absent_field_fails_every_rule_without_value() {
        let errors = TONNAGE.validate(&Map::new());
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.value.is_none()));
    }

    #[test]
    fn fractional_number_is_not_an_int() {
        let errors = TONNAGE.validate(&body(json!({"tonnage": 150.5})));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn text_coercion() {
        assert_eq!(as_text(None), "");
        assert_eq!(as_text(Some(&json!(null))), "");
        assert_eq!(as_text(Some(&json!(true))), "true");
        assert_eq!(as_text(Some(&json!(12))), "12");
        assert_eq!(as_text(Some(&json!(12.0))), "12");
        assert_eq!(as_text(Some(&json!(1.25))), "1.25");
        assert_eq!(as_text(Some(&json!([1, "a"]))), "1,a");
        assert_eq!(as_text(Some(&json!({"a": 1}))), "[object Object]");
    }

    #[test]
    fn one_of_is_exact() {
        let check = Check::OneOf(&["Maganjo", "Matugga"]);
        assert!(check.passes("Maganjo"));
        assert!(!check.passes("maganjo"));
        assert!(!check.passes("OtherPlace"));
    }
}
