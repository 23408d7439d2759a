// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `bencher-console dashboard` command - Browse a resource interactively.

use super::{open, parse_params, require_resource, Options};
use crate::tui;

pub async fn execute(
    options: &Options<'_>,
    resource: &str,
    params: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let console = open(options)?;
    require_resource(console.schema(), resource)?;
    let params = parse_params(params)?;

    tracing::info!(resource = %resource, "Starting dashboard");
    tui::run_dashboard(&console, resource, params).await
}
