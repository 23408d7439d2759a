// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Resource configuration schema.
//!
//! One [`ResourceConfig`] per resource describes which screens exist and what
//! they need: URL templates, columns, form fields, cards, and navigation
//! targets. The [`SchemaTable`] is built once at startup and never mutated;
//! renderers borrow from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, ConsoleResult, HardValidationError};
use crate::field::FieldDescriptor;
use crate::path::PathTarget;
use crate::types::{Operation, PathParams, ResourceName, UrlTemplate};

/// Header button kinds. Buttons are metadata; the front end wires the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    Add,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    pub kind: ButtonKind,
    /// Navigation target. `None` for buttons that act in place.
    pub path: Option<PathTarget>,
}

/// Column kinds. A column without a kind is a reserved placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowItem {
    pub kind: Option<ItemKind>,
    pub key: Option<String>,
}

impl RowItem {
    pub fn text(key: impl Into<String>) -> Self {
        Self {
            kind: Some(ItemKind::Text),
            key: Some(key.into()),
        }
    }

    pub fn placeholder() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowConfig {
    /// Datum key used as the row's primary label.
    pub key: String,
    pub items: Vec<RowItem>,
    pub path: PathTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub url: UrlTemplate,
    pub row: RowConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListHeader {
    pub title: String,
    pub buttons: Vec<ButtonConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub header: ListHeader,
    pub table: TableConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddHeader {
    pub title: String,
    pub path: PathTarget,
}

#[derive(Debug, Clone)]
pub struct FormConfig {
    pub url: UrlTemplate,
    pub fields: Vec<FieldDescriptor>,
    /// Where to go after a successful submit.
    pub path: PathTarget,
}

#[derive(Debug, Clone)]
pub struct AddConfig {
    pub header: AddHeader,
    pub form: FormConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHeader {
    /// Entity key whose value becomes the screen title.
    pub key: String,
    pub path: PathTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardConfig {
    /// Human label of the card.
    pub field: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckConfig {
    pub url: UrlTemplate,
    pub cards: Vec<CardConfig>,
    pub buttons: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Path parameter carrying the viewed entity's slug, e.g. `testbed_slug`.
    pub param: String,
    pub header: ViewHeader,
    pub deck: DeckConfig,
}

/// Borrowed configuration of one (resource, operation) pair.
#[derive(Debug, Clone, Copy)]
pub enum OperationConfig<'a> {
    List(&'a ListConfig),
    Add(&'a AddConfig),
    View(&'a ViewConfig),
}

impl OperationConfig<'_> {
    pub fn operation(&self) -> Operation {
        match self {
            Self::List(_) => Operation::List,
            Self::Add(_) => Operation::Add,
            Self::View(_) => Operation::View,
        }
    }

    /// Screen title. View screens take theirs from the fetched entity.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::List(list) => Some(&list.header.title),
            Self::Add(add) => Some(&add.header.title),
            Self::View(_) => None,
        }
    }

    /// Template of the URL this screen talks to.
    pub fn url(&self) -> &UrlTemplate {
        match self {
            Self::List(list) => &list.table.url,
            Self::Add(add) => &add.form.url,
            Self::View(view) => &view.deck.url,
        }
    }
}

/// Everything the console knows about one resource.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    pub name: ResourceName,
    /// Console route of the resource's list screen.
    pub console_path: UrlTemplate,
    pub list: Option<ListConfig>,
    pub add: Option<AddConfig>,
    pub view: Option<ViewConfig>,
}

impl ResourceConfig {
    pub fn get(&self, operation: Operation) -> Option<OperationConfig<'_>> {
        match operation {
            Operation::List => self.list.as_ref().map(OperationConfig::List),
            Operation::Add => self.add.as_ref().map(OperationConfig::Add),
            Operation::View => self.view.as_ref().map(OperationConfig::View),
        }
    }

    /// Operations offered for this resource, in navigation order.
    pub fn operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|operation| self.get(*operation).is_some())
            .collect()
    }

    /// Console pathname of the list screen for these parameters.
    pub fn pathname(&self, params: &PathParams) -> ConsoleResult<String> {
        self.console_path.render(params)
    }
}

/// Read-only lookup table from resource to its configuration.
#[derive(Debug, Clone)]
pub struct SchemaTable {
    resources: Vec<ResourceConfig>,
    index: HashMap<ResourceName, usize>,
}

impl SchemaTable {
    /// Build a table, rejecting duplicate resources.
    pub fn new(resources: Vec<ResourceConfig>) -> Result<Self, HardValidationError> {
        let mut index = HashMap::with_capacity(resources.len());
        for (position, resource) in resources.iter().enumerate() {
            if index.insert(resource.name.clone(), position).is_some() {
                return Err(HardValidationError::DuplicateResource {
                    name: resource.name.to_string(),
                });
            }
        }
        Ok(Self { resources, index })
    }

    /// The schema shipped with the console.
    pub fn builtin() -> ConsoleResult<Self> {
        crate::loader::SchemaLoader::load_string(crate::loader::BUILTIN_SCHEMA)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        let name = ResourceName::new(name).ok()?;
        self.index.get(&name).map(|&position| &self.resources[position])
    }

    /// Look up the configuration of one screen.
    /// `None` means the operation is not offered for this resource.
    pub fn get(&self, resource: &str, operation: Operation) -> Option<OperationConfig<'_>> {
        self.resource(resource)?.get(operation)
    }

    /// Like [`SchemaTable::get`], but absence is a [`ConsoleError::ConfigurationAbsent`].
    pub fn require(
        &self,
        resource: &str,
        operation: Operation,
    ) -> ConsoleResult<OperationConfig<'_>> {
        self.get(resource, operation)
            .ok_or_else(|| ConsoleError::ConfigurationAbsent {
                resource: resource.to_string(),
                operation,
            })
    }

    /// Operations offered for `resource`; empty for unknown resources.
    pub fn operations(&self, resource: &str) -> Vec<Operation> {
        self.resource(resource)
            .map(ResourceConfig::operations)
            .unwrap_or_default()
    }

    /// Resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_resource(name: &str, with_add: bool) -> ResourceConfig {
        let list = ListConfig {
            header: ListHeader {
                title: "Things".to_string(),
                buttons: vec![ButtonConfig {
                    kind: ButtonKind::Refresh,
                    path: None,
                }],
            },
            table: TableConfig {
                url: UrlTemplate::new(format!("/v0/{name}")).unwrap(),
                row: RowConfig {
                    key: "name".to_string(),
                    items: vec![RowItem::text("slug"), RowItem::placeholder()],
                    path: PathTarget::view(),
                },
            },
        };
        let add = with_add.then(|| AddConfig {
            header: AddHeader {
                title: "Add Thing".to_string(),
                path: PathTarget::Parent,
            },
            form: FormConfig {
                url: UrlTemplate::new(format!("/v0/{name}")).unwrap(),
                fields: vec![FieldDescriptor::input("name")],
                path: PathTarget::Parent,
            },
        });
        ResourceConfig {
            name: ResourceName::new(name).unwrap(),
            console_path: UrlTemplate::new(format!("/console/{name}")).unwrap(),
            list: Some(list),
            add,
            view: None,
        }
    }

    #[test]
    fn test_lookup_present_operation() {
        let table = SchemaTable::new(vec![make_resource("things", true)]).unwrap();
        let config = table.get("things", Operation::List).unwrap();
        assert_eq!(config.operation(), Operation::List);
        assert_eq!(config.title(), Some("Things"));
        assert_eq!(config.url().as_str(), "/v0/things");
    }

    #[test]
    fn test_absent_operation_is_none() {
        let table = SchemaTable::new(vec![make_resource("things", false)]).unwrap();
        assert!(table.get("things", Operation::Add).is_none());
        assert!(table.get("things", Operation::View).is_none());
        assert!(table.get("others", Operation::List).is_none());
        assert!(table.get("Not A Name", Operation::List).is_none());
        assert_eq!(table.operations("things"), vec![Operation::List]);
        assert!(table.operations("others").is_empty());
    }

    #[test]
    fn test_require_reports_configuration_absent() {
        let table = SchemaTable::new(vec![make_resource("things", false)]).unwrap();
        let err = table.require("things", Operation::Add).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::ConfigurationAbsent {
                operation: Operation::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_resources_rejected() {
        let result = SchemaTable::new(vec![
            make_resource("things", true),
            make_resource("things", false),
        ]);
        assert!(matches!(
            result,
            Err(HardValidationError::DuplicateResource { .. })
        ));
    }

    #[test]
    fn test_declaration_order_kept() {
        let table = SchemaTable::new(vec![
            make_resource("zebras", false),
            make_resource("apples", true),
        ])
        .unwrap();
        let names: Vec<&str> = table.resources().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zebras", "apples"]);
        assert_eq!(table.operations("apples"), vec![Operation::List, Operation::Add]);
    }
}
