// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! CLI command modules.

pub mod add;
pub mod dashboard;
pub mod list;
pub mod perf;
pub mod resources;
pub mod validate;
pub mod view;

use std::sync::Arc;

use bencher_console_core::config::TOKEN_ENV;
use bencher_console_core::{
    ConfigLoader, Console, ConsoleConfig, ConsoleError, PathParams, SchemaLoader, SchemaTable,
};

use crate::client::HttpClient;
use crate::error::CliError;

/// Global options every command needs to reach the API.
pub struct Options<'a> {
    pub config: &'a str,
    pub api_url: Option<&'a str>,
}

/// Load configuration, falling back to defaults when the file is absent.
pub fn load_config(options: &Options<'_>) -> Result<ConsoleConfig, Box<dyn std::error::Error>> {
    let config = match ConfigLoader::load_file(options.config) {
        Ok(config) => config,
        Err(ConsoleError::ConfigNotFound { path }) => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            ConsoleConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    Ok(match options.api_url {
        Some(url) => config.with_api_url(url)?,
        None => config,
    })
}

/// Load the schema the configuration points at, or the built-in one.
pub fn load_schema(config: &ConsoleConfig) -> Result<SchemaTable, Box<dyn std::error::Error>> {
    let schema = match &config.schema {
        Some(path) => SchemaLoader::load_file(path)?,
        None => SchemaTable::builtin()?,
    };
    Ok(schema)
}

/// Build a console talking to the configured API.
pub fn open(options: &Options<'_>) -> Result<Console<HttpClient>, Box<dyn std::error::Error>> {
    let config = load_config(options)?;
    let schema = Arc::new(load_schema(&config)?);
    let client = HttpClient::new(&config, std::env::var(TOKEN_ENV).ok())?;
    Ok(Console::new(schema, config, client)?)
}

/// Parse repeated `key=value` route parameters.
pub fn parse_params(pairs: &[String]) -> Result<PathParams, Box<dyn std::error::Error>> {
    let mut params = PathParams::new();
    for pair in pairs {
        let (key, value) = PathParams::parse_pair(pair)?;
        params.insert(key, value);
    }
    Ok(params)
}

/// Fail early with a helpful message for unknown resources.
pub fn require_resource(schema: &SchemaTable, resource: &str) -> Result<(), CliError> {
    match schema.resource(resource) {
        Some(_) => Ok(()),
        None => Err(CliError::UnknownResource(resource.to_string())),
    }
}

/// Pad or cut `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}
