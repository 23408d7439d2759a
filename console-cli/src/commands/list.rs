// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `bencher-console list` command - Render a resource's LIST screen.

use bencher_console_core::table::Table;
use bencher_console_core::{Operation, OperationConfig, ScreenState};

use super::{fit, open, parse_params, require_resource, Options};

const MAX_COLUMN: usize = 32;

pub async fn execute(
    options: &Options<'_>,
    resource: &str,
    params: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let console = open(options)?;
    require_resource(console.schema(), resource)?;
    let params = parse_params(params)?;

    let key_heading = match console.schema().require(resource, Operation::List)? {
        OperationConfig::List(list) => list.table.row.key.clone(),
        _ => String::new(),
    };

    let screen = console.list(resource, &params).await?;
    match screen.state() {
        ScreenState::Ready(table) => {
            print_table(table, &key_heading);
            Ok(())
        }
        ScreenState::Failed(message) => {
            eprintln!("✗ Failed to load {}:", resource);
            eprintln!("  {}", message);
            std::process::exit(1);
        }
        ScreenState::Loading => Ok(()),
    }
}

fn print_table(table: &Table, key_heading: &str) {
    if table.is_empty() {
        println!("No {} found.", table.title.to_lowercase());
        return;
    }

    let mut headings = vec![key_heading.to_string()];
    headings.extend(table.columns.iter().map(|c| c.clone().unwrap_or_default()));

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut line = vec![row.key.clone()];
            line.extend(row.cells.iter().map(|cell| cell.clone().unwrap_or_default()));
            line
        })
        .collect();

    let widths: Vec<usize> = (0..headings.len())
        .map(|column| {
            cells
                .iter()
                .map(|line| line[column].chars().count())
                .chain(std::iter::once(headings[column].chars().count()))
                .max()
                .unwrap_or(0)
                .clamp(1, MAX_COLUMN)
        })
        .collect();

    let rule = |left: &str, mid: &str, right: &str| {
        let bars: Vec<String> = widths.iter().map(|w| "═".repeat(w + 2)).collect();
        format!("{}{}{}", left, bars.join(mid), right)
    };
    let line = |values: &[String]| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!(" {} ", fit(value, *width)))
            .collect();
        format!("║{}║", padded.join("║"))
    };

    let inner = widths.iter().map(|w| w + 3).sum::<usize>() - 1;
    println!("{}", rule("╔", "═", "╗"));
    println!("║{}║", fit(&format!(" {}", table.title.to_uppercase()), inner));
    println!("{}", rule("╠", "╦", "╣"));
    println!("{}", line(&headings));
    println!("{}", rule("╠", "╬", "╣"));
    for values in &cells {
        println!("{}", line(values));
    }
    println!("{}", rule("╚", "╩", "╝"));
    println!();
    println!("Total: {} {}", table.rows.len(), table.title.to_lowercase());

    for button in &table.buttons {
        if let Some(path) = &button.path {
            println!("  {:?}: {}", button.kind, path);
        }
    }
}
