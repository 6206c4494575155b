//! # Person Validation

use serde_json::Value;

use super::errors::FieldErrors;
use super::payload::{Payload, TextRule, WriteMode, REQUIRED};
use crate::model::Person;

pub const NAME_RULE: TextRule = TextRule::new(1, 100);
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Validated person fields from a write payload. `None` means not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl PersonChanges {
    /// Overwrite the supplied fields on an existing person.
    pub fn apply(self, person: &mut Person) {
        if let Some(first_name) = self.first_name {
            person.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            person.last_name = last_name;
        }
        if let Some(email) = self.email {
            person.email = email;
        }
    }

    /// Build a new person. Every field must have been supplied.
    pub fn into_person(self) -> Result<Person, FieldErrors> {
        match (self.first_name, self.last_name, self.email) {
            (Some(first_name), Some(last_name), Some(email)) => {
                Ok(Person::new(first_name, last_name, email))
            }
            (first_name, last_name, email) => {
                let mut errors = FieldErrors::new();
                if first_name.is_none() {
                    errors.add("first_name", REQUIRED);
                }
                if last_name.is_none() {
                    errors.add("last_name", REQUIRED);
                }
                if email.is_none() {
                    errors.add("email", REQUIRED);
                }
                Err(errors)
            }
        }
    }
}

/// Validate a person payload. Unknown and read-only keys are ignored.
pub fn validate_person(body: &Value, mode: WriteMode) -> Result<PersonChanges, FieldErrors> {
    let mut payload = Payload::new(body, mode)?;

    let changes = PersonChanges {
        first_name: payload.text("first_name", NAME_RULE),
        last_name: payload.text("last_name", NAME_RULE),
        email: payload.email("email", EMAIL_MAX_LENGTH),
    };

    payload.finish().into_result()?;
    Ok(changes)
}
