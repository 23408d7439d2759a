// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! List screen renderer.
//!
//! Projects fetched entity JSON through a LIST configuration into display
//! rows. Rows are recomputed on every fetch and never mutated.

use serde::Serialize;
use serde_json::Value;

use crate::path;
use crate::schema::{ButtonKind, ItemKind, ListConfig, RowItem};

/// A header button with its resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderButton {
    pub kind: ButtonKind,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Primary label taken from `row.key`.
    pub key: String,
    /// One cell per declared item; placeholders are `None`.
    pub cells: Vec<Option<String>>,
    /// Where selecting the row leads.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub title: String,
    pub buttons: Vec<HeaderButton>,
    /// Column headings; placeholder columns have none.
    pub columns: Vec<Option<String>>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Display text for a JSON value. `null` and missing values have none.
pub fn display(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn cell(item: &RowItem, datum: &Value) -> Option<String> {
    match (item.kind, item.key.as_deref()) {
        (Some(ItemKind::Text), Some(key)) => display(datum.get(key)),
        _ => None,
    }
}

/// Header buttons of a list screen with their targets resolved.
pub fn header_buttons(config: &ListConfig, pathname: &str) -> Vec<HeaderButton> {
    config
        .header
        .buttons
        .iter()
        .map(|button| HeaderButton {
            kind: button.kind,
            path: button
                .path
                .as_ref()
                .map(|target| path::resolve(target, pathname, None)),
        })
        .collect()
}

/// Render a list screen.
///
/// `data` is whatever the fetch produced. Anything but an array (including
/// `null` while loading) renders zero rows.
pub fn render_table(config: &ListConfig, data: &Value, pathname: &str) -> Table {
    let row = &config.table.row;

    let rows = match data.as_array() {
        Some(entities) => entities
            .iter()
            .map(|datum| TableRow {
                key: display(datum.get(&row.key)).unwrap_or_default(),
                cells: row.items.iter().map(|item| cell(item, datum)).collect(),
                path: path::resolve(&row.path, pathname, Some(datum)),
            })
            .collect(),
        None => {
            tracing::debug!(pathname = %pathname, "List data is not an array, rendering no rows");
            Vec::new()
        }
    };

    Table {
        title: config.header.title.clone(),
        buttons: header_buttons(config, pathname),
        columns: row.items.iter().map(|item| item.key.clone()).collect(),
        rows,
    }
}
