// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Bencher Console Core Library
//!
//! Declarative resource-configuration and rendering engine for the Bencher
//! console. A YAML schema describes, per resource, which LIST, ADD, and VIEW
//! screens exist; this crate validates that schema, resolves console paths,
//! renders list rows and detail decks from API JSON, and validates and
//! submits add forms through an [`ApiClient`].

pub mod api;
pub mod config;
pub mod console;
pub mod deck;
pub mod error;
pub mod field;
pub mod form;
pub mod loader;
pub mod path;
pub mod perf;
pub mod schema;
pub mod screen;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use api::ApiClient;
pub use config::{ConfigLoader, ConsoleConfig};
pub use console::Console;
pub use deck::{render_deck, Deck};
pub use error::{ConsoleError, ConsoleResult, HardValidationError};
pub use field::{FieldDescriptor, FieldKind, FieldRule, FieldState, FieldValue, Validity};
pub use form::FormState;
pub use loader::SchemaLoader;
pub use path::PathTarget;
pub use perf::{latency_points, perf_lines, PerfKind};
pub use schema::{OperationConfig, ResourceConfig, SchemaTable};
pub use screen::{FetchTicket, Screen, ScreenState};
pub use table::{render_table, Table};
pub use types::{Operation, PathParams, ResourceName, UrlTemplate};
