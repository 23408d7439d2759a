// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! YAML schema loader with strict validation.
//!
//! Resource schemas are validated once at boot. Any inconsistency (unknown
//! placeholder, duplicate key, navigation to an operation the resource does
//! not offer) is a HardValidationError and the console refuses to start.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ConsoleError, ConsoleResult, HardValidationError};
use crate::field::{FieldDescriptor, FieldKind, FieldRule, FieldValue, NamedValidator};
use crate::path::PathTarget;
use crate::schema::{
    AddConfig, AddHeader, ButtonConfig, ButtonKind, CardConfig, DeckConfig, FormConfig, ItemKind,
    ListConfig, ListHeader, ResourceConfig, RowConfig, RowItem, SchemaTable, TableConfig,
    ViewConfig, ViewHeader,
};
use crate::types::{ResourceName, UrlTemplate};

/// Schema shipped with the console.
pub const BUILTIN_SCHEMA: &str = include_str!("../schema/console.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    resources: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawResource {
    name: String,
    console_path: String,
    list: Option<RawList>,
    add: Option<RawAdd>,
    view: Option<RawView>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawList {
    header: RawListHeader,
    table: RawTable,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawListHeader {
    title: String,
    #[serde(default)]
    buttons: Vec<RawButton>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawButton {
    kind: ButtonKind,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    url: String,
    row: RawRow,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRow {
    key: String,
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default = "default_row_path")]
    path: String,
}

fn default_row_path() -> String {
    "view".to_string()
}

fn default_back_path() -> String {
    "parent".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawItem {
    kind: Option<ItemKind>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAdd {
    header: RawAddHeader,
    form: RawForm,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAddHeader {
    title: String,
    #[serde(default = "default_back_path")]
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawForm {
    url: String,
    fields: Vec<RawField>,
    #[serde(default = "default_back_path")]
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    kind: FieldKind,
    key: String,
    label: Option<String>,
    value: Option<FieldValue>,
    #[serde(default)]
    validate: bool,
    #[serde(default)]
    nullify: bool,
    #[serde(default)]
    clear: bool,
    rule: Option<RawRuleDef>,
    param: Option<String>,
    #[serde(default)]
    options: Vec<String>,
}

/// A rule is either a bare name (`slug`) or a table (`{kind: range, min: 1, max: 10}`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRuleDef {
    Name(String),
    Full(RawRule),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    kind: String,
    pattern: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    #[serde(default)]
    options: Vec<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawView {
    param: String,
    header: RawViewHeader,
    deck: RawDeck,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawViewHeader {
    key: String,
    #[serde(default = "default_back_path")]
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeck {
    url: String,
    cards: Vec<RawCard>,
    #[serde(default)]
    buttons: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCard {
    field: String,
    key: String,
}

/// Schema loader with strict validation.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load and validate a schema from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> ConsoleResult<SchemaTable> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConsoleError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConsoleError::Io {
            context: "reading schema file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate a schema from a YAML string.
    pub fn load_string(content: &str) -> ConsoleResult<SchemaTable> {
        let raw: RawSchema =
            serde_yaml::from_str(content).map_err(|e| ConsoleError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        let table = Self::validate(raw)?;
        tracing::info!(resources = table.len(), "Resource schema loaded");
        Ok(table)
    }

    fn validate(raw: RawSchema) -> ConsoleResult<SchemaTable> {
        if raw.resources.is_empty() {
            return Err(HardValidationError::SchemaValidation {
                message: "At least one resource must be defined".to_string(),
            }
            .into());
        }

        let resources = raw
            .resources
            .into_iter()
            .map(Self::validate_resource)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SchemaTable::new(resources)?)
    }

    fn validate_resource(raw: RawResource) -> Result<ResourceConfig, HardValidationError> {
        let name = ResourceName::new(raw.name)?;
        let context = format!("resource '{}'", name);

        let console_path = UrlTemplate::new(raw.console_path)?;
        if !console_path.as_str().starts_with('/') {
            return Err(HardValidationError::InvalidFieldValue {
                field: "console_path",
                value: console_path.to_string(),
                reason: "Console paths must be absolute".to_string(),
            });
        }
        let route_params: HashSet<&str> = console_path.params().collect();

        if raw.list.is_none() && raw.add.is_none() && raw.view.is_none() {
            return Err(HardValidationError::SchemaValidation {
                message: format!("{} offers no operations", context),
            });
        }

        let has_add = raw.add.is_some();
        let has_view = raw.view.is_some();

        let list = raw
            .list
            .map(|list| Self::validate_list(list, &context, &route_params, has_add, has_view))
            .transpose()?;
        let add = raw
            .add
            .map(|add| Self::validate_add(add, &context, &route_params))
            .transpose()?;
        let view = raw
            .view
            .map(|view| Self::validate_view(view, &context, &route_params))
            .transpose()?;

        Ok(ResourceConfig {
            name,
            console_path,
            list,
            add,
            view,
        })
    }

    fn validate_list(
        raw: RawList,
        context: &str,
        route_params: &HashSet<&str>,
        has_add: bool,
        has_view: bool,
    ) -> Result<ListConfig, HardValidationError> {
        let context = format!("{} list", context);
        let title = non_empty(raw.header.title, "title", &context)?;

        let mut buttons = Vec::with_capacity(raw.header.buttons.len());
        for button in raw.header.buttons {
            let path = match (button.kind, button.path) {
                (ButtonKind::Add, path) => {
                    if !has_add {
                        return Err(HardValidationError::SchemaValidation {
                            message: format!(
                                "{} offers an add button without an add screen",
                                context
                            ),
                        });
                    }
                    Some(parse_target(path.as_deref().unwrap_or("add"))?)
                }
                (ButtonKind::Refresh, None) => None,
                (ButtonKind::Refresh, Some(path)) => {
                    return Err(HardValidationError::InvalidFieldValue {
                        field: "path",
                        value: path,
                        reason: format!("Refresh buttons do not navigate ({})", context),
                    });
                }
            };
            buttons.push(ButtonConfig {
                kind: button.kind,
                path,
            });
        }

        let url = UrlTemplate::new(raw.table.url)?;
        check_params(&url, route_params, &context)?;

        let row_key = non_empty(raw.table.row.key, "row.key", &context)?;
        let mut items = Vec::with_capacity(raw.table.row.items.len());
        for item in raw.table.row.items {
            items.push(match (item.kind, item.key) {
                (Some(ItemKind::Text), Some(key)) if !key.is_empty() => RowItem::text(key),
                (Some(ItemKind::Text), _) => {
                    return Err(HardValidationError::MissingRequiredField {
                        field: "key",
                        context: format!("{} text column", context),
                    });
                }
                (None, None) => RowItem::placeholder(),
                (None, Some(key)) => {
                    return Err(HardValidationError::InvalidFieldValue {
                        field: "items",
                        value: key,
                        reason: format!("Column key without a kind in {}", context),
                    });
                }
            });
        }

        let path = parse_target(&raw.table.row.path)?;
        if path.needs_datum() && !has_view {
            return Err(HardValidationError::SchemaValidation {
                message: format!("{} rows navigate to a view screen that is not offered", context),
            });
        }
        if path == PathTarget::Add && !has_add {
            return Err(HardValidationError::SchemaValidation {
                message: format!("{} rows navigate to an add screen that is not offered", context),
            });
        }

        Ok(ListConfig {
            header: ListHeader { title, buttons },
            table: TableConfig {
                url,
                row: RowConfig {
                    key: row_key,
                    items,
                    path,
                },
            },
        })
    }

    fn validate_add(
        raw: RawAdd,
        context: &str,
        route_params: &HashSet<&str>,
    ) -> Result<AddConfig, HardValidationError> {
        let context = format!("{} add", context);
        let title = non_empty(raw.header.title, "title", &context)?;
        let header_path = parse_target(&raw.header.path)?;

        let url = UrlTemplate::new(raw.form.url)?;
        check_params(&url, route_params, &context)?;

        if raw.form.fields.is_empty() {
            return Err(HardValidationError::SchemaValidation {
                message: format!("{} form has no fields", context),
            });
        }

        let mut seen_keys = HashSet::new();
        let mut fields = Vec::with_capacity(raw.form.fields.len());
        for raw_field in raw.form.fields {
            let field = Self::validate_field(raw_field, &context, route_params)?;
            if !seen_keys.insert(field.key.clone()) {
                return Err(HardValidationError::DuplicateFieldKey {
                    key: field.key,
                    context,
                });
            }
            fields.push(field);
        }

        let form_path = parse_target(&raw.form.path)?;
        if form_path.needs_datum() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "path",
                value: form_path.to_string(),
                reason: format!("Form navigation cannot depend on a datum ({})", context),
            });
        }

        Ok(AddConfig {
            header: AddHeader {
                title,
                path: header_path,
            },
            form: FormConfig {
                url,
                fields,
                path: form_path,
            },
        })
    }

    fn validate_field(
        raw: RawField,
        context: &str,
        route_params: &HashSet<&str>,
    ) -> Result<FieldDescriptor, HardValidationError> {
        let key = non_empty(raw.key, "key", context)?;
        let context = format!("{} field '{}'", context, key);

        let param = match (raw.kind, raw.param) {
            (FieldKind::Fixed, Some(param)) => {
                if !route_params.contains(param.as_str()) {
                    return Err(HardValidationError::InvalidFieldValue {
                        field: "param",
                        value: param,
                        reason: format!("Not a route parameter of {}", context),
                    });
                }
                Some(param)
            }
            (FieldKind::Fixed, None) => {
                return Err(HardValidationError::MissingRequiredField {
                    field: "param",
                    context,
                });
            }
            (_, Some(param)) => {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "param",
                    value: param,
                    reason: format!("Only fixed fields take a route parameter ({})", context),
                });
            }
            (_, None) => None,
        };

        if raw.kind == FieldKind::Select && raw.options.is_empty() {
            return Err(HardValidationError::MissingRequiredField {
                field: "options",
                context,
            });
        }

        let default = match (raw.kind, raw.value) {
            (FieldKind::Checkbox, None) => FieldValue::Bool(false),
            (FieldKind::Checkbox, Some(FieldValue::Bool(flag))) => FieldValue::Bool(flag),
            (FieldKind::Checkbox, Some(other)) => {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "value",
                    value: other.to_string(),
                    reason: format!("Checkbox default must be a boolean ({})", context),
                });
            }
            (FieldKind::Select, Some(value))
                if !value.is_empty() && !raw.options.iter().any(|o| *o == value.as_text()) =>
            {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "value",
                    value: value.to_string(),
                    reason: format!("Default is not one of the options ({})", context),
                });
            }
            (_, value) => value.unwrap_or_default(),
        };

        let explicit_rule = raw.rule.is_some();
        let rule = match raw.rule {
            Some(def) => Some(compile_rule(def, &context)?),
            // A select without an explicit rule only accepts its own options.
            None if raw.kind == FieldKind::Select => Some(FieldRule::OneOf(raw.options.clone())),
            None => None,
        };

        if explicit_rule && !raw.validate {
            return Err(HardValidationError::InvalidFieldValue {
                field: "rule",
                value: key,
                reason: format!("A rule only runs with 'validate: true' ({})", context),
            });
        }
        if raw.validate && rule.is_none() {
            tracing::warn!(context = %context, "Gated field has no rule and is always valid");
        }

        Ok(FieldDescriptor {
            kind: raw.kind,
            label: raw.label.unwrap_or_else(|| key.clone()),
            key,
            default,
            validate: raw.validate,
            nullify: raw.nullify,
            clear: raw.clear,
            rule,
            param,
            options: raw.options,
        })
    }

    fn validate_view(
        raw: RawView,
        context: &str,
        route_params: &HashSet<&str>,
    ) -> Result<ViewConfig, HardValidationError> {
        let context = format!("{} view", context);
        let param = non_empty(raw.param, "param", &context)?;
        if route_params.contains(param.as_str()) {
            return Err(HardValidationError::InvalidFieldValue {
                field: "param",
                value: param,
                reason: format!("Shadows a route parameter ({})", context),
            });
        }

        let url = UrlTemplate::new(raw.deck.url)?;
        if !url.params().any(|p| p == param) {
            return Err(HardValidationError::InvalidFieldValue {
                field: "url",
                value: url.to_string(),
                reason: format!("Deck url must use '{{{}}}' ({})", param, context),
            });
        }
        let mut allowed = route_params.clone();
        allowed.insert(param.as_str());
        check_params(&url, &allowed, &context)?;

        if raw.deck.cards.is_empty() {
            return Err(HardValidationError::SchemaValidation {
                message: format!("{} deck has no cards", context),
            });
        }
        let cards = raw
            .deck
            .cards
            .into_iter()
            .map(|card| {
                Ok(CardConfig {
                    field: non_empty(card.field, "field", &context)?,
                    key: non_empty(card.key, "key", &context)?,
                })
            })
            .collect::<Result<Vec<_>, HardValidationError>>()?;

        let header_key = non_empty(raw.header.key, "header.key", &context)?;
        let header_path = parse_target(&raw.header.path)?;

        Ok(ViewConfig {
            param,
            header: ViewHeader {
                key: header_key,
                path: header_path,
            },
            deck: DeckConfig {
                url,
                cards,
                buttons: raw.deck.buttons,
            },
        })
    }
}

fn non_empty(
    value: String,
    field: &'static str,
    context: &str,
) -> Result<String, HardValidationError> {
    if value.trim().is_empty() {
        return Err(HardValidationError::MissingRequiredField {
            field,
            context: context.to_string(),
        });
    }
    Ok(value)
}

fn parse_target(raw: &str) -> Result<PathTarget, HardValidationError> {
    raw.parse()
}

/// Every placeholder of `url` must be a known route parameter.
fn check_params(
    url: &UrlTemplate,
    allowed: &HashSet<&str>,
    context: &str,
) -> Result<(), HardValidationError> {
    match url.params().find(|param| !allowed.contains(param)) {
        Some(unknown) => Err(HardValidationError::InvalidFieldValue {
            field: "url",
            value: url.to_string(),
            reason: format!("Unknown parameter '{}' in {}", unknown, context),
        }),
        None => Ok(()),
    }
}

fn compile_rule(def: RawRuleDef, context: &str) -> Result<FieldRule, HardValidationError> {
    let raw = match def {
        RawRuleDef::Name(kind) => RawRule {
            kind,
            pattern: None,
            min: None,
            max: None,
            options: Vec::new(),
            name: None,
        },
        RawRuleDef::Full(raw) => raw,
    };

    let missing = |field: &'static str| HardValidationError::MissingRequiredField {
        field,
        context: format!("{} rule '{}'", context, raw.kind),
    };

    match raw.kind.as_str() {
        "non_empty" => Ok(FieldRule::NonEmpty),
        "slug" => Ok(FieldRule::Slug),
        "email" => Ok(FieldRule::Email),
        "pattern" => {
            let pattern = raw.pattern.clone().ok_or_else(|| missing("pattern"))?;
            Regex::new(&pattern)
                .map(FieldRule::Pattern)
                .map_err(|e| HardValidationError::InvalidPattern {
                    pattern,
                    reason: e.to_string(),
                })
        }
        "length" => {
            let max = raw.max.ok_or_else(|| missing("max"))?;
            let min = raw.min.unwrap_or(0.0);
            if min < 0.0 || min > max || min.fract() != 0.0 || max.fract() != 0.0 {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "length",
                    value: format!("{}..={}", min, max),
                    reason: format!("Expected whole numbers with min <= max ({})", context),
                });
            }
            Ok(FieldRule::Length {
                min: min as usize,
                max: max as usize,
            })
        }
        "range" => {
            let min = raw.min.ok_or_else(|| missing("min"))?;
            let max = raw.max.ok_or_else(|| missing("max"))?;
            if min > max {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "range",
                    value: format!("{}..={}", min, max),
                    reason: format!("min must not exceed max ({})", context),
                });
            }
            Ok(FieldRule::Range { min, max })
        }
        "one_of" => {
            if raw.options.is_empty() {
                return Err(missing("options"));
            }
            Ok(FieldRule::OneOf(raw.options.clone()))
        }
        "custom" => {
            let name = raw.name.clone().ok_or_else(|| missing("name"))?;
            NamedValidator::lookup(&name).map(FieldRule::Custom).ok_or(
                HardValidationError::UnknownValidator {
                    name,
                    context: context.to_string(),
                },
            )
        }
        other => Err(HardValidationError::UnknownValidator {
            name: other.to_string(),
            context: context.to_string(),
        }),
    }
}
