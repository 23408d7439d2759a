// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Form field descriptors and the field validator.
//!
//! A [`FieldDescriptor`] is immutable schema data. The mutable part of a
//! field (its current value and validity) lives in [`FieldState`], owned by
//! the mounted form. [`validate`] is a pure function from a raw value and a
//! rule to a normalized value plus a verdict; an invalid value is a normal
//! outcome, never an error.

use std::borrow::Cow;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Input widget kind. Determines how the value is edited and typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Value is supplied by the route, never typed by the user.
    Fixed,
    Input,
    Select,
    Checkbox,
    Number,
}

impl FieldKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Input => "input",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Number => "number",
        }
    }

    /// Whether the user may edit a field of this kind.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

/// Raw value of a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Empty text is the only empty value; booleans and numbers always carry data.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Bool(flag) => Cow::Owned(flag.to_string()),
            Self::Number(number) => Cow::Owned(number.to_string()),
        }
    }

    /// Convert into the JSON value sent in a payload.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Bool(flag) => serde_json::Value::Bool(*flag),
            // Whole numbers serialize as JSON integers.
            Self::Number(number) if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
                serde_json::Value::from(*number as i64)
            }
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Tri-state validity. `Unknown` until the first validation pass so a
/// freshly mounted form shows no error styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validity {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl Validity {
    pub fn from_bool(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A predicate registered under a name so schema files can refer to it.
#[derive(Clone, Copy)]
pub struct NamedValidator {
    pub name: &'static str,
    pub check: fn(&FieldValue) -> bool,
}

impl NamedValidator {
    const BUILTIN: [NamedValidator; 3] = [
        NamedValidator {
            name: "is_valid_jwt",
            check: is_valid_jwt,
        },
        NamedValidator {
            name: "is_valid_url",
            check: is_valid_url,
        },
        NamedValidator {
            name: "is_true",
            check: is_true,
        },
    ];

    /// Look up a built-in predicate by name.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::BUILTIN.iter().find(|v| v.name == name).copied()
    }
}

impl fmt::Debug for NamedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedValidator").field(&self.name).finish()
    }
}

/// Validation rule attached to a field.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Text must be non-empty; a checkbox must be checked.
    NonEmpty,
    Slug,
    Email,
    Pattern(Regex),
    /// Text length in characters, inclusive.
    Length { min: usize, max: usize },
    /// Numeric value, inclusive. Numeric text is normalized to a number.
    Range { min: f64, max: f64 },
    OneOf(Vec<String>),
    Custom(NamedValidator),
}

impl FieldRule {
    fn check(&self, value: FieldValue) -> Validation {
        if let (Self::Range { min, max }, FieldValue::Text(text)) = (self, &value) {
            let parsed = text.trim().parse::<f64>().ok().filter(|n| n.is_finite());
            return match parsed {
                Some(number) => Validation {
                    valid: (*min..=*max).contains(&number),
                    value: FieldValue::Number(number),
                },
                None => Validation {
                    value,
                    valid: false,
                },
            };
        }

        let valid = match (self, &value) {
            (Self::NonEmpty, FieldValue::Bool(flag)) => *flag,
            (Self::NonEmpty, other) => !other.as_text().trim().is_empty(),
            (Self::Slug, other) => is_valid_slug(&other.as_text()),
            (Self::Email, other) => is_valid_email(&other.as_text()),
            (Self::Pattern(regex), other) => regex.is_match(&other.as_text()),
            (Self::Length { min, max }, FieldValue::Text(text)) => {
                (*min..=*max).contains(&text.chars().count())
            }
            (Self::Length { .. }, _) => false,
            (Self::Range { min, max }, FieldValue::Number(number)) => {
                (*min..=*max).contains(number)
            }
            (Self::Range { .. }, _) => false,
            (Self::OneOf(options), other) => {
                let text = other.as_text();
                options.iter().any(|option| *option == text)
            }
            (Self::Custom(validator), other) => (validator.check)(other),
        };
        Validation { value, valid }
    }
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub value: FieldValue,
    pub valid: bool,
}

/// Validate `raw` against `rule`.
///
/// Ungated fields (`gated == false`) and fields without a rule are always
/// valid and keep their value unchanged.
pub fn validate(raw: FieldValue, rule: Option<&FieldRule>, gated: bool) -> Validation {
    match rule {
        Some(rule) if gated => rule.check(raw),
        _ => Validation {
            value: raw,
            valid: true,
        },
    }
}

/// Immutable description of one form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub key: String,
    pub label: String,
    pub default: FieldValue,
    pub validate: bool,
    pub nullify: bool,
    pub clear: bool,
    pub rule: Option<FieldRule>,
    /// Path parameter holding the value of a FIXED field.
    pub param: Option<String>,
    /// Allowed values of a SELECT field.
    pub options: Vec<String>,
}

impl FieldDescriptor {
    /// A plain, ungated text input.
    pub fn input(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            kind: FieldKind::Input,
            label: key.clone(),
            key,
            default: FieldValue::default(),
            validate: false,
            nullify: false,
            clear: false,
            rule: None,
            param: None,
            options: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rule = Some(rule);
        self.validate = true;
        self
    }

    pub fn nullify(mut self) -> Self {
        self.nullify = true;
        self
    }

    pub fn clear(mut self) -> Self {
        self.clear = true;
        self
    }

    pub fn fixed_from(mut self, param: impl Into<String>) -> Self {
        self.kind = FieldKind::Fixed;
        self.param = Some(param.into());
        self
    }

    /// Validate a value under this field's rule and gating flag.
    ///
    /// An empty nullify field is omitted from the payload, so it is valid
    /// whatever its rule says.
    pub fn check(&self, raw: FieldValue) -> Validation {
        if self.nullify && raw.is_empty() {
            return Validation {
                value: raw,
                valid: true,
            };
        }
        validate(raw, self.rule.as_ref(), self.validate)
    }
}

/// Mutable per-field state of a mounted form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub value: FieldValue,
    pub valid: Validity,
}

impl FieldState {
    pub fn new(value: FieldValue) -> Self {
        Self {
            value,
            valid: Validity::Unknown,
        }
    }
}

pub fn is_valid_slug(text: &str) -> bool {
    !text.is_empty()
        && text.len() <= 64
        && !text.starts_with('-')
        && !text.ends_with('-')
        && !text.contains("--")
        && text
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn is_valid_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !text.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

fn is_valid_jwt(value: &FieldValue) -> bool {
    let text = value.as_text();
    let parts: Vec<&str> = text.split('.').collect();
    parts.len() == 3
        && parts.iter().all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

/// An absolute `http` or `https` URL with a host.
pub fn is_http_url(text: &str) -> bool {
    Url::parse(text).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn is_valid_url(value: &FieldValue) -> bool {
    is_http_url(&value.as_text())
}

fn is_true(value: &FieldValue) -> bool {
    matches!(value, FieldValue::Bool(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungated_field_always_valid() {
        let rule = FieldRule::NonEmpty;
        for raw in [
            FieldValue::text(""),
            FieldValue::text("   "),
            FieldValue::Bool(false),
            FieldValue::Number(-1.0),
        ] {
            let result = validate(raw.clone(), Some(&rule), false);
            assert!(result.valid);
            assert_eq!(result.value, raw);
        }
    }

    #[test]
    fn test_missing_rule_always_valid() {
        let result = validate(FieldValue::text(""), None, true);
        assert!(result.valid);
    }

    #[test]
    fn test_non_empty() {
        assert!(!validate(FieldValue::text(""), Some(&FieldRule::NonEmpty), true).valid);
        assert!(!validate(FieldValue::text("  "), Some(&FieldRule::NonEmpty), true).valid);
        assert!(validate(FieldValue::text("x"), Some(&FieldRule::NonEmpty), true).valid);
        assert!(!validate(FieldValue::Bool(false), Some(&FieldRule::NonEmpty), true).valid);
    }

    #[test]
    fn test_slug() {
        assert!(is_valid_slug("my-project-1"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("double--dash"));
        assert!(!is_valid_slug("Upper"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("user@bencher.dev"));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@bencher.dev"));
        assert!(!is_valid_email("user@bencher"));
        assert!(!is_valid_email("user@@bencher.dev"));
        assert!(!is_valid_email("us er@bencher.dev"));
    }

    #[test]
    fn test_pattern() {
        let rule = FieldRule::Pattern(Regex::new(r"^\d+\s*(GB|MB)$").unwrap());
        assert!(validate(FieldValue::text("16 GB"), Some(&rule), true).valid);
        assert!(!validate(FieldValue::text("lots"), Some(&rule), true).valid);
    }

    #[test]
    fn test_length() {
        let rule = FieldRule::Length { min: 1, max: 4 };
        assert!(validate(FieldValue::text("abcd"), Some(&rule), true).valid);
        assert!(!validate(FieldValue::text("abcde"), Some(&rule), true).valid);
        assert!(!validate(FieldValue::text(""), Some(&rule), true).valid);
    }

    #[test]
    fn test_range_normalizes_numeric_text() {
        let rule = FieldRule::Range {
            min: 0.0,
            max: 100.0,
        };
        let result = validate(FieldValue::text(" 42 "), Some(&rule), true);
        assert!(result.valid);
        assert_eq!(result.value, FieldValue::Number(42.0));

        let result = validate(FieldValue::text("101"), Some(&rule), true);
        assert!(!result.valid);
        assert_eq!(result.value, FieldValue::Number(101.0));

        let result = validate(FieldValue::text("NaN"), Some(&rule), true);
        assert!(!result.valid);
        assert_eq!(result.value, FieldValue::text("NaN"));
    }

    #[test]
    fn test_one_of() {
        let rule = FieldRule::OneOf(vec!["public".to_string(), "private".to_string()]);
        assert!(validate(FieldValue::text("public"), Some(&rule), true).valid);
        assert!(!validate(FieldValue::text("secret"), Some(&rule), true).valid);
    }

    #[test]
    fn test_custom_validators() {
        let jwt = FieldRule::Custom(NamedValidator::lookup("is_valid_jwt").unwrap());
        assert!(validate(FieldValue::text("aaa.bbb.ccc"), Some(&jwt), true).valid);
        assert!(!validate(FieldValue::text("aaa.bbb"), Some(&jwt), true).valid);

        let url = FieldRule::Custom(NamedValidator::lookup("is_valid_url").unwrap());
        assert!(validate(FieldValue::text("https://bencher.dev"), Some(&url), true).valid);
        assert!(!validate(FieldValue::text("ftp://bencher.dev"), Some(&url), true).valid);
        assert!(!validate(FieldValue::text("not a url"), Some(&url), true).valid);
        assert!(!validate(FieldValue::text("http://[::1"), Some(&url), true).valid);
        assert!(!validate(FieldValue::text("https://a:b:c:d"), Some(&url), true).valid);

        assert!(NamedValidator::lookup("does_not_exist").is_none());
    }

    #[test]
    fn test_field_value_json() {
        assert_eq!(FieldValue::text("a").to_json(), serde_json::json!("a"));
        assert_eq!(FieldValue::Bool(true).to_json(), serde_json::json!(true));
        assert_eq!(FieldValue::Number(1.5).to_json(), serde_json::json!(1.5));
        assert_eq!(FieldValue::Number(60.0).to_json(), serde_json::json!(60));
        assert_eq!(FieldValue::Number(-3.0).to_json(), serde_json::json!(-3));
        let ttl: u64 = serde_json::from_value(FieldValue::Number(60.0).to_json()).unwrap();
        assert_eq!(ttl, 60);
        assert!(FieldValue::text("").is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }

    #[test]
    fn test_empty_nullify_field_skips_rule() {
        let field = FieldDescriptor::input("url")
            .with_rule(FieldRule::Custom(
                NamedValidator::lookup("is_valid_url").unwrap(),
            ))
            .nullify();
        assert!(field.check(FieldValue::text("")).valid);
        assert!(!field.check(FieldValue::text("not a url")).valid);
        assert!(field.check(FieldValue::text("https://bencher.dev")).valid);

        let required = FieldDescriptor::input("name").with_rule(FieldRule::NonEmpty);
        assert!(!required.check(FieldValue::text("")).valid);
    }

    #[test]
    fn test_initial_state_unknown() {
        let state = FieldState::new(FieldValue::default());
        assert_eq!(state.valid, Validity::Unknown);
        assert_ne!(state.valid, Validity::Invalid);
    }
}
