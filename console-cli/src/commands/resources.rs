// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `bencher-console resources` command - List configured resources.

use super::{fit, load_config, load_schema, Options};

pub async fn execute(options: &Options<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(options)?;
    let schema = load_schema(&config)?;

    if schema.is_empty() {
        println!("No resources defined in schema.");
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                           CONFIGURED RESOURCES                               ║");
    println!("╠═══════════════╦══════════════════╦═══════════════════════════════════════════╣");
    println!("║ Resource      ║ Operations       ║ Console Path                              ║");
    println!("╠═══════════════╬══════════════════╬═══════════════════════════════════════════╣");

    for resource in schema.resources() {
        let operations: Vec<&str> = resource.operations().iter().map(|op| op.name()).collect();
        println!(
            "║ {} ║ {} ║ {} ║",
            fit(resource.name.as_str(), 13),
            fit(&operations.join(","), 16),
            fit(resource.console_path.as_str(), 41),
        );
    }

    println!("╚═══════════════╩══════════════════╩═══════════════════════════════════════════╝");
    println!();
    println!("Total: {} resource(s)", schema.len());
    println!("API: {}", config.api.url);

    Ok(())
}
