// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Errors raised by the command line itself, before the engine is involved.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unknown resource '{0}', run `bencher-console resources` to list them")]
    UnknownResource(String),

    #[error("Invalid field assignment '{0}', expected key=value")]
    InvalidAssignment(String),

    #[error("Form for '{resource}' has no editable field '{key}'")]
    UnknownField { resource: String, key: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
