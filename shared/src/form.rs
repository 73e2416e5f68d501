//! Form binder for the pet record.
//!
//! Holds the value being edited plus per-field validation feedback. Field
//! rules live on the backend; the binder only carries what the server
//! reported back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::capabilities::ValidationFailure;
use crate::model::{OwnerId, Pet, PetTypeId};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    BirthDate,
    Type,
}

impl FormField {
    /// Maps a backend parameter path such as `pet.birthDate` onto a field.
    #[must_use]
    pub fn from_parameter_name(name: &str) -> Option<Self> {
        let property = name.rsplit('.').next().unwrap_or(name);
        match property {
            "name" => Some(Self::Name),
            "birthDate" => Some(Self::BirthDate),
            "typeId" | "type" => Some(Self::Type),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PetForm {
    value: Pet,
    errors: BTreeMap<FormField, String>,
    /// Server messages that could not be attached to a field.
    form_errors: Vec<String>,
    dirty: bool,
}

impl PetForm {
    #[must_use]
    pub fn value(&self) -> &Pet {
        &self.value
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Resets to the empty record and drops all feedback.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Loads a fetched record, replacing everything.
    pub fn read(&mut self, pet: &Pet) {
        *self = Self {
            value: pet.clone(),
            ..Self::default()
        };
    }

    pub fn set_owner(&mut self, owner_id: OwnerId) {
        self.value.owner_id = Some(owner_id);
    }

    pub fn set_name(&mut self, name: String) {
        self.value.name = name;
        self.touch(FormField::Name);
    }

    pub fn set_birth_date(&mut self, birth_date: String) {
        self.value.birth_date = birth_date;
        self.touch(FormField::BirthDate);
    }

    pub fn set_type(&mut self, type_id: Option<PetTypeId>) {
        self.value.type_id = type_id;
        self.touch(FormField::Type);
    }

    fn touch(&mut self, field: FormField) {
        self.dirty = true;
        self.errors.remove(&field);
    }

    #[must_use]
    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        !self.errors.is_empty() || !self.form_errors.is_empty()
    }

    pub fn clear_validation(&mut self) {
        self.errors.clear();
        self.form_errors.clear();
    }

    /// Attaches server-side validation messages to their fields.
    pub fn apply_server_validation(&mut self, failures: &[ValidationFailure]) {
        for failure in failures {
            match FormField::from_parameter_name(&failure.parameter_name) {
                Some(field) => {
                    self.errors.insert(field, failure.message.clone());
                }
                None => self.form_errors.push(failure.message.clone()),
            }
        }
    }
}
