// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Newtype wrappers for validated inputs.
//!
//! Resource names, URL templates, and path parameters validate their
//! invariants at creation time so the renderers never see malformed schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, ConsoleResult, HardValidationError};

/// Maximum length of a resource name.
const MAX_RESOURCE_NAME_LEN: usize = 64;

/// Validated resource identifier, e.g. `testbeds`.
/// Must be non-empty, lowercase alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a new ResourceName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, HardValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "resource",
                value: name,
                reason: "Resource name cannot be empty".to_string(),
            });
        }

        if name.len() > MAX_RESOURCE_NAME_LEN {
            return Err(HardValidationError::InvalidFieldValue {
                field: "resource",
                value: name.clone(),
                reason: format!(
                    "Resource name too long: {} chars (max {})",
                    name.len(),
                    MAX_RESOURCE_NAME_LEN
                ),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "resource",
                value: name,
                reason: "Resource name must contain only lowercase alphanumeric characters, hyphens, and underscores".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ResourceName {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

/// The screen modes a resource can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    List,
    Add,
    View,
}

impl Operation {
    /// All operations in navigation order.
    pub const ALL: [Operation; 3] = [Self::List, Self::Add, Self::View];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add => "add",
            Self::View => "view",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Named route parameters extracted from the current location,
/// e.g. `project_slug` and `testbed_slug`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a `key=value` pair as given on the command line.
    pub fn parse_pair(pair: &str) -> Result<(String, String), HardValidationError> {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(HardValidationError::InvalidFieldValue {
                field: "path_param",
                value: pair.to_string(),
                reason: "Expected KEY=VALUE".to_string(),
            }),
        }
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A string template with `{param}` placeholders, e.g.
/// `/v0/projects/{project_slug}/testbeds`.
///
/// Rendering is pure: it never performs I/O and fails only when a
/// placeholder has no value in the supplied [`PathParams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    /// Parse a template, rejecting unbalanced or empty placeholders.
    pub fn new(raw: impl Into<String>) -> Result<Self, HardValidationError> {
        let raw = raw.into();
        let invalid = |reason: &str| HardValidationError::InvalidFieldValue {
            field: "url",
            value: raw.clone(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut rest = raw.as_str();
        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(invalid("Unmatched '}'"));
            }
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("Unclosed '{'"))?;
            let name = &after[..close];
            if name.is_empty()
                || !name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(invalid("Placeholder names must be non-empty [A-Za-z0-9_]"));
            }
            segments.push(Segment::Param(name.to_string()));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { raw, segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of every placeholder, in order of appearance.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fill the placeholders from `params`.
    pub fn render(&self, params: &PathParams) -> ConsoleResult<String> {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(name) => {
                    let value =
                        params
                            .get(name)
                            .ok_or_else(|| ConsoleError::MissingPathParam {
                                param: name.clone(),
                                template: self.raw.clone(),
                            })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Render and prefix with the API base URL.
    pub fn render_url(&self, base: &str, params: &PathParams) -> ConsoleResult<String> {
        let path = self.render(params)?;
        Ok(format!("{}{}", base.trim_end_matches('/'), path))
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl TryFrom<String> for UrlTemplate {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UrlTemplate> for String {
    fn from(template: UrlTemplate) -> Self {
        template.raw
    }
}
