//! # Payload Access
//!
//! Typed readers over an untrusted JSON object. Each reader records its
//! problems into a shared [`FieldErrors`] so every field is checked before
//! the caller sees a result.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::{FieldErrors, NON_FIELD_ERRORS};
use crate::model::{Field, Price};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_STRING: &str = "Not a valid string.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_UUID: &str = "Must be a valid UUID.";
pub const INVALID_NUMBER: &str = "A valid number is required.";

/// How much of a record a write supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: required fields must be present
    Create,
    /// PUT: required fields must be present
    Replace,
    /// PATCH: every field is optional
    Partial,
}

impl WriteMode {
    pub fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

/// Bounds for a text field, in characters
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub min: usize,
    pub max: usize,
}

impl TextRule {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// A JSON object body together with the errors found while reading it
pub struct Payload<'a> {
    object: &'a Map<String, Value>,
    mode: WriteMode,
    errors: FieldErrors,
}

impl<'a> Payload<'a> {
    /// Wrap a request body. Anything other than an object is rejected.
    pub fn new(body: &'a Value, mode: WriteMode) -> Result<Self, FieldErrors> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                mode,
                errors: FieldErrors::new(),
            }),
            other => Err(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(other)
                ),
            )),
        }
    }

    pub fn field(&self, name: &str) -> Field<&'a Value> {
        match self.object.get(name) {
            None => Field::Missing,
            Some(Value::Null) => Field::Null,
            Some(value) => Field::Value(value),
        }
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Present value of a non-nullable field, recording required/null errors.
    fn present(&mut self, name: &str) -> Option<&'a Value> {
        match self.field(name) {
            Field::Missing => {
                if self.mode.requires_all() {
                    self.error(name, REQUIRED);
                }
                None
            }
            Field::Null => {
                self.error(name, NOT_NULL);
                None
            }
            Field::Value(value) => Some(value),
        }
    }

    /// Trimmed, non-blank text within `rule`.
    pub fn text(&mut self, name: &str, rule: TextRule) -> Option<String> {
        let value = self.present(name)?;
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.error(name, NOT_STRING);
                return None;
            }
        };

        let text = raw.trim().to_string();
        if text.is_empty() {
            self.error(name, NOT_BLANK);
            return None;
        }

        let length = text.chars().count();
        if length > rule.max {
            self.error(
                name,
                format!("Ensure this field has no more than {} characters.", rule.max),
            );
            return None;
        }
        if length < rule.min {
            self.error(
                name,
                format!("Ensure this field has at least {} characters.", rule.min),
            );
            return None;
        }

        Some(text)
    }

    /// Text that must also look like an email address.
    pub fn email(&mut self, name: &str, max: usize) -> Option<String> {
        let email = self.text(name, TextRule::new(1, max))?;
        if !email_pattern().is_match(&email) {
            self.error(name, INVALID_EMAIL);
            return None;
        }
        Some(email)
    }

    /// A decimal amount, given either as a JSON string or a JSON number.
    pub fn price(&mut self, name: &str) -> Option<Price> {
        let value = self.present(name)?;
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.error(name, INVALID_NUMBER);
                return None;
            }
        };

        match Price::parse(&raw) {
            Ok(price) => Some(price),
            Err(e) => {
                self.error(name, e.to_string());
                None
            }
        }
    }

    /// A nullable reference id. `null` and `""` both clear the reference.
    pub fn reference(&mut self, name: &str) -> Field<Uuid> {
        match self.field(name) {
            Field::Missing => Field::Missing,
            Field::Null => Field::Null,
            Field::Value(Value::String(s)) if s.trim().is_empty() => Field::Null,
            Field::Value(Value::String(s)) => match Uuid::parse_str(s.trim()) {
                Ok(id) => Field::Value(id),
                Err(_) => {
                    self.error(name, INVALID_UUID);
                    Field::Missing
                }
            },
            Field::Value(_) => {
                self.error(name, INVALID_UUID);
                Field::Missing
            }
        }
    }

    /// Consume the reader, yielding the errors it collected.
    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        )
        .expect("email pattern is a valid regex")
    })
}
