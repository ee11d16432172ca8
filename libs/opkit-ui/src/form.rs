//! Form config, used to re-render submissions with errors attached.

use serde::{Deserialize, Serialize};

use crate::btn::BtnConfig;

/// Input control type of a form field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Password,
    Checkbox,
}

/// One form field with its current value and field-level errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: Option<String>,
    pub errors: Vec<String>,
}

impl FormField {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            value: None,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

/// Form config: action target, fields, submit control, summary errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    pub action: String,
    pub method: String,
    pub fields: Vec<FormField>,
    pub submit: Option<BtnConfig>,
    /// Whole-form error summary shown above the fields.
    pub error_summary: Vec<String>,
}

impl FormConfig {
    #[must_use]
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn add_field(&mut self, field: FormField) {
        self.fields.push(field);
    }

    #[must_use]
    pub fn submit(mut self, btn: BtnConfig) -> Self {
        self.submit = Some(btn);
        self
    }

    #[must_use]
    pub fn error_summary(mut self, errors: Vec<String>) -> Self {
        self.error_summary = errors;
        self
    }
}
