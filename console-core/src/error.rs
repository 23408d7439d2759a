// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Custom error types for the console engine.
//!
//! Every failure is an explicit enum variant. Screen-level failures are
//! recoverable and end up as local screen state; schema and config failures
//! are hard validation errors raised once at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Operation;

/// Top-level error type for the console engine.
#[derive(Debug, Error)]
pub enum ConsoleError {
    // =========================================================================
    // Schema lookups
    // =========================================================================
    #[error("Operation {operation} is not offered for resource {resource}")]
    ConfigurationAbsent {
        resource: String,
        operation: Operation,
    },

    #[error("Missing path parameter '{param}' for template {template}")]
    MissingPathParam { param: String, template: String },

    // =========================================================================
    // Screen Errors - Recoverable, converted into screen state
    // =========================================================================
    #[error("Field '{key}' is invalid")]
    ValidationFailed { key: String },

    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Failed to submit to {url}: {reason}")]
    SubmitFailed { url: String, reason: String },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ConsoleError {
    /// Whether a screen can recover from this error by retrying or editing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed { .. }
                | Self::FetchFailed { .. }
                | Self::SubmitFailed { .. }
                | Self::MalformedResponse { .. }
        )
    }
}

/// Hard validation errors stop the console from starting.
/// Raised while loading the resource schema or the console configuration.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Missing required field: {field} in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Duplicate resource: {name}")]
    DuplicateResource { name: String },

    #[error("Duplicate field key '{key}' in {context}")]
    DuplicateFieldKey { key: String, context: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unknown validator '{name}' in {context}")]
    UnknownValidator { name: String, context: String },

    #[error("Schema validation failed: {message}")]
    SchemaValidation { message: String },
}

/// Result type alias using ConsoleError.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
