// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `bencher-console view` command - Render one entity's VIEW screen.

use bencher_console_core::{Operation, OperationConfig, ScreenState};

use super::{open, parse_params, require_resource, Options};

pub async fn execute(
    options: &Options<'_>,
    resource: &str,
    slug: &str,
    params: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let console = open(options)?;
    require_resource(console.schema(), resource)?;
    let mut params = parse_params(params)?;

    if let OperationConfig::View(view) = console.schema().require(resource, Operation::View)? {
        params.insert(view.param.clone(), slug);
    }

    let screen = console.view(resource, &params).await?;
    match screen.state() {
        ScreenState::Ready(deck) => {
            println!("{}", deck.title.as_deref().unwrap_or(slug));
            println!();

            let width = deck
                .cards
                .iter()
                .map(|card| card.field.chars().count())
                .max()
                .unwrap_or(0);
            for card in &deck.cards {
                println!(
                    "  {:<width$}  {}",
                    card.field,
                    card.value.as_deref().unwrap_or("-"),
                    width = width
                );
            }
            println!();
            println!("Back: {}", deck.back);
            Ok(())
        }
        ScreenState::Failed(message) => {
            eprintln!("✗ Failed to load {} '{}':", resource, slug);
            eprintln!("  {}", message);
            std::process::exit(1);
        }
        ScreenState::Loading => Ok(()),
    }
}
