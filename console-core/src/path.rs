// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Navigation path resolver.
//!
//! Pure string functions computing where a button or row leads. They are
//! total: any input, including an empty pathname, produces a root-relative
//! path.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::HardValidationError;

/// Default datum key identifying an entity in a path.
pub const DEFAULT_VIEW_KEY: &str = "slug";

/// Segment appended by [`add_path`].
pub const ADD_SEGMENT: &str = "add";

/// Declarative navigation target stored in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTarget {
    /// Stay on the current path.
    Current,
    Parent,
    Add,
    /// Append the datum's value under this key.
    View(String),
}

impl PathTarget {
    pub fn view() -> Self {
        Self::View(DEFAULT_VIEW_KEY.to_string())
    }

    /// Whether the target needs a datum to resolve.
    pub fn needs_datum(&self) -> bool {
        matches!(self, Self::View(_))
    }
}

/// Parses `current`, `parent`, `add`, `view`, or `view:<key>`.
impl FromStr for PathTarget {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "current" => Ok(Self::Current),
            "parent" => Ok(Self::Parent),
            "add" => Ok(Self::Add),
            "view" => Ok(Self::view()),
            other => match other.strip_prefix("view:") {
                Some(key) if !key.trim().is_empty() => Ok(Self::View(key.trim().to_string())),
                _ => Err(HardValidationError::InvalidFieldValue {
                    field: "path",
                    value: s.to_string(),
                    reason: "Expected one of: current, parent, add, view, view:<key>".to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for PathTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Parent => write!(f, "parent"),
            Self::Add => write!(f, "add"),
            Self::View(key) => write!(f, "view:{key}"),
        }
    }
}

fn segments(pathname: &str) -> impl Iterator<Item = &str> {
    pathname.split('/').filter(|segment| !segment.is_empty())
}

fn join<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Canonical form of a pathname: leading slash, no trailing or doubled slashes.
pub fn normalize(pathname: &str) -> String {
    join(segments(pathname))
}

/// Strip the last path segment.
pub fn parent_path(pathname: &str) -> String {
    let parts: Vec<&str> = segments(pathname).collect();
    let keep = parts.len().saturating_sub(1);
    join(parts.into_iter().take(keep))
}

/// Append the `add` segment to a list path.
pub fn add_path(pathname: &str) -> String {
    join(segments(pathname).chain(std::iter::once(ADD_SEGMENT)))
}

/// Append the datum's identifying value under `key`.
///
/// A datum without a usable value under `key` yields the normalized
/// pathname unchanged.
pub fn view_path(pathname: &str, datum: &Value, key: &str) -> String {
    match datum_segment(datum, key) {
        Some(segment) => {
            let base = normalize(pathname);
            if base == "/" {
                format!("/{segment}")
            } else {
                format!("{base}/{segment}")
            }
        }
        None => normalize(pathname),
    }
}

fn datum_segment(datum: &Value, key: &str) -> Option<String> {
    match datum.get(key)? {
        Value::String(text) if !text.is_empty() && !text.contains('/') => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Resolve a schema navigation target against the current pathname.
/// Targets that need a datum fall back to the current path without one.
pub fn resolve(target: &PathTarget, pathname: &str, datum: Option<&Value>) -> String {
    match (target, datum) {
        (PathTarget::Current, _) => normalize(pathname),
        (PathTarget::Parent, _) => parent_path(pathname),
        (PathTarget::Add, _) => add_path(pathname),
        (PathTarget::View(key), Some(datum)) => view_path(pathname, datum, key),
        (PathTarget::View(_), None) => normalize(pathname),
    }
}
