// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `bencher-console validate` command - Validate a resource schema file.

use bencher_console_core::{OperationConfig, SchemaLoader};

pub async fn execute(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file, "Validating schema");

    match SchemaLoader::load_file(file) {
        Ok(schema) => {
            println!("✓ Schema is valid");
            println!();
            println!("Resources ({}):", schema.len());
            for resource in schema.resources() {
                println!("  - {} ({})", resource.name, resource.console_path);
                for operation in resource.operations() {
                    let Some(config) = resource.get(operation) else {
                        continue;
                    };
                    let detail = match config {
                        OperationConfig::List(list) => {
                            format!("{} column(s)", list.table.row.items.len() + 1)
                        }
                        OperationConfig::Add(add) => format!("{} field(s)", add.form.fields.len()),
                        OperationConfig::View(view) => format!("{} card(s)", view.deck.cards.len()),
                    };
                    println!("      {:<5} {} [{}]", operation.name(), config.url(), detail);
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Schema validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
