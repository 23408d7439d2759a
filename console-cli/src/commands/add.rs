// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `bencher-console add` command - Fill in and submit an ADD form.

use bencher_console_core::{ConsoleError, FieldKind, Validity};

use super::{open, parse_params, require_resource, Options};
use crate::error::CliError;

pub async fn execute(
    options: &Options<'_>,
    resource: &str,
    params: &[String],
    assignments: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let console = open(options)?;
    require_resource(console.schema(), resource)?;
    let params = parse_params(params)?;

    let mut form = console.mount_form(resource, &params)?;
    for assignment in assignments {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| CliError::InvalidAssignment(assignment.clone()))?;
        if form.input_text(key.trim(), value).is_none() {
            return Err(CliError::UnknownField {
                resource: resource.to_string(),
                key: key.trim().to_string(),
            }
            .into());
        }
    }

    match console.submit(&mut form, resource, &params).await {
        Ok(next) => {
            println!("✓ Submitted {}", resource);
            println!("  Next: {}", next);
            Ok(())
        }
        Err(ConsoleError::ValidationFailed { key }) => {
            eprintln!("✗ Form is not valid, first invalid field: {}", key);
            eprintln!();
            for (field, state) in form.fields() {
                let mark = match state.valid {
                    Validity::Valid => "✓",
                    Validity::Invalid => "✗",
                    Validity::Unknown => " ",
                };
                let fixed = if field.kind == FieldKind::Fixed {
                    " (fixed)"
                } else {
                    ""
                };
                eprintln!("  {} {}{} = {}", mark, field.label, fixed, state.value);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
