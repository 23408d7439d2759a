// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Console controller.
//!
//! Wires the schema, configuration, and an [`ApiClient`] together. Every
//! screen operation looks its configuration up in the schema, builds URLs
//! from the route parameters, and turns fetch failures into screen state.
//! Only lookups that cannot succeed (absent configuration, missing route
//! parameters) are returned as errors.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ConsoleConfig;
use crate::deck::{render_deck, Deck};
use crate::error::{ConsoleError, ConsoleResult, HardValidationError};
use crate::form::FormState;
use crate::path;
use crate::schema::{
    AddConfig, ListConfig, OperationConfig, ResourceConfig, SchemaTable, ViewConfig,
};
use crate::screen::Screen;
use crate::table::{render_table, Table};
use crate::types::{Operation, PathParams};

pub struct Console<C> {
    schema: Arc<SchemaTable>,
    config: ConsoleConfig,
    client: C,
}

impl<C: ApiClient> Console<C> {
    /// Every resource must live under the configured console root.
    pub fn new(schema: Arc<SchemaTable>, config: ConsoleConfig, client: C) -> ConsoleResult<Self> {
        let root = config.console_root.as_str();
        for resource in schema.resources() {
            let console_path = resource.console_path.as_str();
            let inside = root == "/"
                || console_path == root
                || console_path
                    .strip_prefix(root)
                    .is_some_and(|rest| rest.starts_with('/'));
            if !inside {
                return Err(HardValidationError::SchemaValidation {
                    message: format!(
                        "Resource '{}' path {} is outside console root {}",
                        resource.name, console_path, root
                    ),
                }
                .into());
            }
        }

        tracing::info!(
            resources = schema.len(),
            api_url = %config.api.url,
            "Console ready"
        );
        Ok(Self {
            schema,
            config,
            client,
        })
    }

    pub fn schema(&self) -> &SchemaTable {
        &self.schema
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn resource(&self, resource: &str, operation: Operation) -> ConsoleResult<&ResourceConfig> {
        self.schema
            .resource(resource)
            .ok_or_else(|| ConsoleError::ConfigurationAbsent {
                resource: resource.to_string(),
                operation,
            })
    }

    fn list_config(&self, resource: &str) -> ConsoleResult<&ListConfig> {
        match self.schema.require(resource, Operation::List)? {
            OperationConfig::List(config) => Ok(config),
            _ => Err(absent(resource, Operation::List)),
        }
    }

    fn add_config(&self, resource: &str) -> ConsoleResult<&AddConfig> {
        match self.schema.require(resource, Operation::Add)? {
            OperationConfig::Add(config) => Ok(config),
            _ => Err(absent(resource, Operation::Add)),
        }
    }

    fn view_config(&self, resource: &str) -> ConsoleResult<&ViewConfig> {
        match self.schema.require(resource, Operation::View)? {
            OperationConfig::View(config) => Ok(config),
            _ => Err(absent(resource, Operation::View)),
        }
    }

    /// Console pathname of a screen.
    ///
    /// LIST screens sit at the resource's console path, ADD screens one
    /// `add` segment below it, and VIEW screens one slug below it, the slug
    /// coming from the view's route parameter.
    pub fn pathname(
        &self,
        resource: &str,
        operation: Operation,
        params: &PathParams,
    ) -> ConsoleResult<String> {
        let config = self.resource(resource, operation)?;
        let list = config.pathname(params)?;
        match operation {
            Operation::List => Ok(path::normalize(&list)),
            Operation::Add => Ok(path::add_path(&list)),
            Operation::View => {
                let view = self.view_config(resource)?;
                let slug = params
                    .get(&view.param)
                    .ok_or_else(|| ConsoleError::MissingPathParam {
                        param: view.param.clone(),
                        template: config.console_path.to_string(),
                    })?;
                Ok(format!("{}/{}", path::normalize(&list).trim_end_matches('/'), slug))
            }
        }
    }

    /// Mount a LIST screen and run its fetch.
    pub async fn list(&self, resource: &str, params: &PathParams) -> ConsoleResult<Screen<Table>> {
        let mut screen = Screen::new();
        self.refresh_list(&mut screen, resource, params).await?;
        Ok(screen)
    }

    /// Re-run the fetch of a mounted LIST screen.
    pub async fn refresh_list(
        &self,
        screen: &mut Screen<Table>,
        resource: &str,
        params: &PathParams,
    ) -> ConsoleResult<()> {
        let config = self.list_config(resource)?;
        let url = config.table.url.render_url(&self.config.api.url, params)?;
        let pathname = self.pathname(resource, Operation::List, params)?;

        let ticket = screen.begin();
        tracing::debug!(resource = %resource, url = %url, "Fetching list");
        let result = self
            .client
            .get(&url)
            .await
            .map(|data| render_table(config, &data, &pathname));
        screen.complete(ticket, result);
        Ok(())
    }

    /// Mount a VIEW screen and run its fetch.
    pub async fn view(&self, resource: &str, params: &PathParams) -> ConsoleResult<Screen<Deck>> {
        let config = self.view_config(resource)?;
        let url = config.deck.url.render_url(&self.config.api.url, params)?;
        let pathname = self.pathname(resource, Operation::View, params)?;

        let mut screen = Screen::new();
        let ticket = screen.begin();
        tracing::debug!(resource = %resource, url = %url, "Fetching entity");
        let result = self
            .client
            .get(&url)
            .await
            .map(|entity| render_deck(config, &entity, &pathname));
        screen.complete(ticket, result);
        Ok(screen)
    }

    /// Mount an ADD screen.
    pub fn mount_form(&self, resource: &str, params: &PathParams) -> ConsoleResult<FormState<'_>> {
        let config = self.add_config(resource)?;
        Ok(FormState::mount(&config.form, params))
    }

    /// Submit a mounted ADD form. Returns where to navigate next.
    pub async fn submit(
        &self,
        form: &mut FormState<'_>,
        resource: &str,
        params: &PathParams,
    ) -> ConsoleResult<String> {
        let pathname = self.pathname(resource, Operation::Add, params)?;
        form.submit(&self.client, &self.config.api.url, params, &pathname)
            .await
    }
}

fn absent(resource: &str, operation: Operation) -> ConsoleError {
    ConsoleError::ConfigurationAbsent {
        resource: resource.to_string(),
        operation,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::mock::MockClient;
    use crate::field::{FieldValue, Validity};
    use crate::screen::ScreenState;

    fn make_console(client: MockClient) -> Console<MockClient> {
        let schema = Arc::new(SchemaTable::builtin().unwrap());
        Console::new(schema, ConsoleConfig::default(), client).unwrap()
    }

    fn project() -> PathParams {
        PathParams::new().with("project_slug", "p1")
    }

    #[test]
    fn test_pathnames() {
        let console = make_console(MockClient::default());
        assert_eq!(
            console.pathname("testbeds", Operation::List, &project()).unwrap(),
            "/console/projects/p1/testbeds"
        );
        assert_eq!(
            console.pathname("testbeds", Operation::Add, &project()).unwrap(),
            "/console/projects/p1/testbeds/add"
        );
        let params = project().with("testbed_slug", "t1");
        assert_eq!(
            console.pathname("testbeds", Operation::View, &params).unwrap(),
            "/console/projects/p1/testbeds/t1"
        );
        assert!(matches!(
            console.pathname("testbeds", Operation::View, &project()),
            Err(ConsoleError::MissingPathParam { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_renders_rows() {
        let client = MockClient::default().with_response(
            "http://localhost:8000/v0/projects/p1/testbeds",
            json!([{"name": "Linux Box", "slug": "linux-box"}]),
        );
        let console = make_console(client);

        let screen = console.list("testbeds", &project()).await.unwrap();
        match screen.state() {
            ScreenState::Ready(table) => {
                assert_eq!(table.rows.len(), 1);
                assert_eq!(table.rows[0].path, "/console/projects/p1/testbeds/linux-box");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_screen_state() {
        let console = make_console(MockClient::default());
        let screen = console.list("testbeds", &project()).await.unwrap();
        assert!(matches!(screen.state(), ScreenState::Failed(_)));
    }

    #[tokio::test]
    async fn test_absent_operation_is_an_error() {
        let console = make_console(MockClient::default());
        let err = console.mount_form("reports", &project()).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::ConfigurationAbsent {
                operation: Operation::Add,
                ..
            }
        ));
        assert!(console.view("reports", &project()).await.is_err());
        assert_eq!(console.client().gets.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_view_renders_deck() {
        let client = MockClient::default().with_response(
            "http://localhost:8000/v0/projects/p1/testbeds/t1",
            json!({"name": "Linux Box", "slug": "t1"}),
        );
        let console = make_console(client);
        let params = project().with("testbed_slug", "t1");

        let screen = console.view("testbeds", &params).await.unwrap();
        match screen.state() {
            ScreenState::Ready(deck) => {
                assert_eq!(deck.title.as_deref(), Some("Linux Box"));
                assert_eq!(deck.back, "/console/projects/p1/testbeds");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_through_console() {
        let console = make_console(MockClient::default());
        let mut form = console.mount_form("testbeds", &project()).unwrap();
        form.input("name", FieldValue::text("Linux Box"));

        let next = console.submit(&mut form, "testbeds", &project()).await.unwrap();
        assert_eq!(next, "/console/projects/p1/testbeds");

        let posts = console.client().posts.lock().unwrap();
        assert_eq!(posts[0].0, "http://localhost:8000/v0/testbeds");
        assert_eq!(posts[0].1, json!({"project": "p1", "name": "Linux Box"}));
    }

    #[tokio::test]
    async fn test_token_submit_names_user() {
        let console = make_console(MockClient::default());
        let params = PathParams::new().with("user_slug", "muriel");
        let mut form = console.mount_form("tokens", &params).unwrap();
        form.input_text("name", "ci");
        form.input_text("ttl", "60");

        let next = console.submit(&mut form, "tokens", &params).await.unwrap();
        assert_eq!(next, "/console/users/muriel/tokens");

        let posts = console.client().posts.lock().unwrap();
        assert_eq!(posts[0].0, "http://localhost:8000/v0/users/muriel/tokens");
        assert_eq!(posts[0].1, json!({"user": "muriel", "name": "ci", "ttl": 60}));
        let ttl: u64 = serde_json::from_value(posts[0].1["ttl"].clone()).unwrap();
        assert_eq!(ttl, 60);
    }

    #[tokio::test]
    async fn test_project_optional_fields_checked_when_filled() {
        let console = make_console(MockClient::default());
        let params = PathParams::new();
        let mut form = console.mount_form("projects", &params).unwrap();
        form.input("name", FieldValue::text("Bencher"));
        assert_eq!(
            form.input("slug", FieldValue::text("Bad Slug!!")),
            Some(Validity::Invalid)
        );
        assert_eq!(form.input("slug", FieldValue::text("")), Some(Validity::Valid));
        assert_eq!(
            form.input("url", FieldValue::text("not a url")),
            Some(Validity::Invalid)
        );

        let err = console.submit(&mut form, "projects", &params).await.unwrap_err();
        assert!(matches!(err, ConsoleError::ValidationFailed { ref key } if key == "url"));
        assert_eq!(console.client().post_count(), 0);

        form.input("url", FieldValue::text("https://bencher.dev"));
        console.submit(&mut form, "projects", &params).await.unwrap();
        let posts = console.client().posts.lock().unwrap();
        assert_eq!(
            posts[0].1,
            json!({"name": "Bencher", "url": "https://bencher.dev", "public": false})
        );
    }

    #[test]
    fn test_console_root_enforced() {
        let schema = Arc::new(SchemaTable::builtin().unwrap());
        let config = ConsoleConfig {
            console_root: "/admin".to_string(),
            ..ConsoleConfig::default()
        };
        assert!(Console::new(schema, config, MockClient::default()).is_err());
    }
}
