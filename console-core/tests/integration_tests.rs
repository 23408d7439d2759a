// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! End-to-end integration tests for the console engine.
//!
//! These tests load schemas and configuration from disk and drive whole
//! screens through a recording API client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bencher_console_core::{
    ApiClient, ConfigLoader, Console, ConsoleConfig, ConsoleError, ConsoleResult, FieldValue,
    Operation, PathParams, SchemaLoader, SchemaTable, ScreenState, Validity,
};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Serves canned GET bodies and records POST bodies.
#[derive(Default)]
struct RecordingClient {
    bodies: HashMap<String, Value>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl RecordingClient {
    fn serve(mut self, url: &str, body: Value) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }
}

impl ApiClient for RecordingClient {
    async fn get(&self, url: &str) -> ConsoleResult<Value> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| ConsoleError::FetchFailed {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            })
    }

    async fn post(&self, url: &str, body: &Value) -> ConsoleResult<Value> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        Ok(json!({"uuid": "0000", "slug": "created"}))
    }
}

const WIDGETS_SCHEMA: &str = r#"
resources:
  - name: widgets
    console_path: /console/projects/{project_slug}/widgets
    list:
      header:
        title: Widgets
        buttons:
          - kind: add
          - kind: refresh
      table:
        url: /v0/projects/{project_slug}/widgets
        row:
          key: name
          items:
            - kind: text
              key: color
            - {}
          path: view
    add:
      header:
        title: Add Widget
      form:
        url: /v0/projects/{project_slug}/widgets
        fields:
          - kind: fixed
            key: project
            label: Project
            param: project_slug
          - kind: input
            key: name
            label: Name
            validate: true
            rule: non_empty
          - kind: select
            key: color
            label: Color
            validate: true
            options: [red, green]
          - kind: input
            key: notes
            label: Notes
            nullify: true
    view:
      param: widget_slug
      header:
        key: name
      deck:
        url: /v0/projects/{project_slug}/widgets/{widget_slug}
        cards:
          - field: Widget Name
            key: name
          - field: Widget Color
            key: color
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write file");
    path
}

/// Test schema and config loading from disk
#[test]
fn test_config_points_at_schema_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(&temp_dir, "widgets.yaml", WIDGETS_SCHEMA);
    let config_path = write_file(
        &temp_dir,
        "console.yaml",
        "api:\n  url: http://localhost:61016\nschema: widgets.yaml\n",
    );

    let config = ConfigLoader::load_file(&config_path).expect("Config should load");
    let schema_path = config.schema.clone().expect("Schema path should be set");
    assert_eq!(schema_path, temp_dir.path().join("widgets.yaml"));

    let schema = SchemaLoader::load_file(&schema_path).expect("Schema should load");
    assert_eq!(schema.len(), 1);
    assert_eq!(
        schema.operations("widgets"),
        vec![Operation::List, Operation::Add, Operation::View]
    );
}

/// Test missing files are reported, not defaulted
#[test]
fn test_missing_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.yaml");

    assert!(matches!(
        ConfigLoader::load_file(&missing),
        Err(ConsoleError::ConfigNotFound { .. })
    ));
    assert!(matches!(
        SchemaLoader::load_file(&missing),
        Err(ConsoleError::ConfigNotFound { .. })
    ));
}

/// Test invalid schemas never load
#[test]
fn test_invalid_schema_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bad = WIDGETS_SCHEMA.replace(
        "/v0/projects/{project_slug}/widgets/{widget_slug}",
        "/v0/widgets/{gadget}",
    );
    let path = write_file(&temp_dir, "bad.yaml", &bad);

    let err = SchemaLoader::load_file(&path).unwrap_err();
    assert!(matches!(err, ConsoleError::HardValidation(_)));
    assert!(!err.is_recoverable());
}

/// Test every built-in resource renders its list pathname
#[test]
fn test_builtin_schema_pathnames() {
    let schema = SchemaTable::builtin().expect("Builtin schema should load");
    let params = PathParams::new()
        .with("project_slug", "p1")
        .with("user_slug", "muriel");

    for resource in schema.resources() {
        let pathname = resource.pathname(&params).expect("Pathname should render");
        assert!(pathname.starts_with("/console/"), "{pathname}");
    }
}

/// Test a full list -> add -> view flow
#[tokio::test]
async fn test_widget_flow() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_file(&temp_dir, "widgets.yaml", WIDGETS_SCHEMA);
    let schema = Arc::new(SchemaLoader::load_file(&path).expect("Schema should load"));

    let client = RecordingClient::default()
        .serve(
            "http://localhost:8000/v0/projects/p1/widgets",
            json!([
                {"name": "Sprocket", "slug": "sprocket", "color": "red"},
                {"name": "Gear", "slug": "gear", "color": null},
            ]),
        )
        .serve(
            "http://localhost:8000/v0/projects/p1/widgets/gear",
            json!({"name": "Gear", "slug": "gear", "color": "green"}),
        );
    let console =
        Console::new(schema, ConsoleConfig::default(), client).expect("Console should start");
    let params = PathParams::new().with("project_slug", "p1");

    // List
    let screen = console.list("widgets", &params).await.expect("List should mount");
    let ScreenState::Ready(table) = screen.state() else {
        panic!("List should be ready");
    };
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells, vec![Some("red".to_string()), None]);
    assert_eq!(table.rows[1].cells, vec![None, None]);
    assert_eq!(table.rows[1].path, "/console/projects/p1/widgets/gear");
    assert_eq!(
        table.buttons[0].path.as_deref(),
        Some("/console/projects/p1/widgets/add")
    );

    // Add: select options gate submission
    let mut form = console.mount_form("widgets", &params).expect("Form should mount");
    form.input("name", FieldValue::text("Cog"));
    assert_eq!(form.input("color", FieldValue::text("blue")), Some(Validity::Invalid));
    let err = console.submit(&mut form, "widgets", &params).await.unwrap_err();
    assert!(matches!(err, ConsoleError::ValidationFailed { ref key } if key == "color"));
    assert!(console.client().posts.lock().unwrap().is_empty());

    form.input("color", FieldValue::text("green"));
    let next = console
        .submit(&mut form, "widgets", &params)
        .await
        .expect("Submit should succeed");
    assert_eq!(next, "/console/projects/p1/widgets");
    {
        let posts = console.client().posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].1,
            json!({"project": "p1", "name": "Cog", "color": "green"})
        );
    }

    // View
    let params = params.with("widget_slug", "gear");
    let screen = console.view("widgets", &params).await.expect("View should mount");
    let ScreenState::Ready(deck) = screen.state() else {
        panic!("View should be ready");
    };
    assert_eq!(deck.title.as_deref(), Some("Gear"));
    assert_eq!(deck.cards[1].value.as_deref(), Some("green"));
    assert_eq!(deck.back, "/console/projects/p1/widgets");
}
