// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Add screen: form state and submission.
//!
//! A [`FormState`] is created when an ADD screen mounts and owns the mutable
//! value and validity of every field. Submission is gated on every field
//! validating; a rejected submit sends nothing and leaves values as typed.

use serde_json::{Map, Value};

use crate::api::ApiClient;
use crate::error::{ConsoleError, ConsoleResult};
use crate::field::{FieldDescriptor, FieldKind, FieldState, FieldValue, Validity};
use crate::path;
use crate::schema::FormConfig;
use crate::types::PathParams;

#[derive(Debug, Clone)]
pub struct FormState<'a> {
    config: &'a FormConfig,
    states: Vec<FieldState>,
}

impl<'a> FormState<'a> {
    /// Mount a form. FIXED fields take their value from the route parameter
    /// they name and are validated right away; every other field starts at
    /// its default with unknown validity.
    pub fn mount(config: &'a FormConfig, params: &PathParams) -> Self {
        let states = config
            .fields
            .iter()
            .map(|field| match (field.kind, field.param.as_deref()) {
                (FieldKind::Fixed, Some(param)) => {
                    let raw = params
                        .get(param)
                        .map(FieldValue::text)
                        .unwrap_or_else(|| field.default.clone());
                    let checked = field.check(raw);
                    FieldState {
                        value: checked.value,
                        valid: Validity::from_bool(checked.valid),
                    }
                }
                _ => FieldState::new(field.default.clone()),
            })
            .collect();

        Self { config, states }
    }

    pub fn config(&self) -> &'a FormConfig {
        self.config
    }

    /// Fields paired with their current state, in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a FieldDescriptor, &FieldState)> {
        let config: &'a FormConfig = self.config;
        config.fields.iter().zip(self.states.iter())
    }

    pub fn state(&self, key: &str) -> Option<&FieldState> {
        self.position(key).map(|index| &self.states[index])
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.config.fields.iter().position(|field| field.key == key)
    }

    /// Record user input for `key` and re-validate it.
    ///
    /// Returns the new validity, or `None` if no editable field has that key.
    pub fn input(&mut self, key: &str, raw: FieldValue) -> Option<Validity> {
        let index = self.position(key)?;
        let field = &self.config.fields[index];
        if !field.kind.is_editable() {
            tracing::debug!(key = %key, "Ignoring input for fixed field");
            return None;
        }

        let checked = field.check(raw);
        let valid = Validity::from_bool(checked.valid);
        self.states[index] = FieldState {
            value: checked.value,
            valid,
        };
        tracing::debug!(key = %key, valid = ?valid, "Field input validated");
        Some(valid)
    }

    /// Like [`FormState::input`], but typed text is coerced to the field's
    /// kind first: checkboxes take booleans and number fields take numbers.
    pub fn input_text(&mut self, key: &str, text: &str) -> Option<Validity> {
        let kind = self.config.fields[self.position(key)?].kind;
        self.input(key, coerce(kind, text))
    }

    /// Re-validate every field. Returns the key of the first invalid field.
    ///
    /// Only validity changes here; values are left exactly as entered.
    pub fn validate_all(&mut self) -> Option<&'a str> {
        let config: &'a FormConfig = self.config;
        let mut first_invalid = None;
        for (field, state) in config.fields.iter().zip(self.states.iter_mut()) {
            let valid = field.check(state.value.clone()).valid;
            state.valid = Validity::from_bool(valid);
            if !valid && first_invalid.is_none() {
                first_invalid = Some(field.key.as_str());
            }
        }
        first_invalid
    }

    /// Whether every field currently validates.
    pub fn is_valid(&self) -> bool {
        self.fields()
            .all(|(field, state)| field.check(state.value.clone()).valid)
    }

    /// Request body built from the current values.
    ///
    /// Keys of nullify fields whose value is empty are omitted entirely.
    pub fn payload(&self) -> Value {
        let mut body = Map::new();
        for (field, state) in self.fields() {
            if field.nullify && state.value.is_empty() {
                continue;
            }
            let value = field.check(state.value.clone()).value;
            body.insert(field.key.clone(), value.to_json());
        }
        Value::Object(body)
    }

    /// Validate, POST, and reset.
    ///
    /// On success the `clear` fields return to their defaults and the
    /// resolved post-submit navigation target is returned. On any failure
    /// the form keeps its values.
    pub async fn submit<C: ApiClient>(
        &mut self,
        client: &C,
        base_url: &str,
        params: &PathParams,
        pathname: &str,
    ) -> ConsoleResult<String> {
        if let Some(key) = self.validate_all() {
            tracing::debug!(key = %key, "Submit blocked by invalid field");
            return Err(ConsoleError::ValidationFailed {
                key: key.to_string(),
            });
        }

        let url = self.config.url.render_url(base_url, params)?;
        let body = self.payload();
        tracing::info!(
            url = %url,
            fields = body.as_object().map_or(0, Map::len),
            "Submitting form"
        );

        let response = match client.post(&url, &body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Form submit failed");
                return Err(e);
            }
        };

        self.reset_cleared();
        Ok(path::resolve(&self.config.path, pathname, Some(&response)))
    }

    fn reset_cleared(&mut self) {
        for (field, state) in self.config.fields.iter().zip(self.states.iter_mut()) {
            if field.clear && field.kind.is_editable() {
                *state = FieldState::new(field.default.clone());
            }
        }
    }
}

fn coerce(kind: FieldKind, text: &str) -> FieldValue {
    match kind {
        FieldKind::Checkbox => match text.trim() {
            "true" | "on" | "yes" | "1" => FieldValue::Bool(true),
            "false" | "off" | "no" | "0" | "" => FieldValue::Bool(false),
            _ => FieldValue::text(text),
        },
        FieldKind::Number => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::text(text)),
        _ => FieldValue::text(text),
    }
}
