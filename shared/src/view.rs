use serde::{Deserialize, Serialize};

use crate::form::FormField;
use crate::model::{FormMode, Loading, Model, PetTypeId, SubmitState};

pub const FORM_TITLE: &str = "Pet";
pub const ADD_PET_LABEL: &str = "Add Pet";
pub const UPDATE_PET_LABEL: &str = "Update Pet";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextFieldView {
    pub label: String,
    pub value: String,
    pub invalid: bool,
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: PetTypeId,
    pub label: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectView {
    pub label: String,
    pub value: Option<PetTypeId>,
    pub options: Vec<SelectOption>,
    /// Changes whenever `options` is replaced; the shell must refresh the
    /// selector's rendered items when it sees a new value.
    pub content_revision: u64,
    pub invalid: bool,
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub title: String,
    pub mode: FormMode,
    /// `None` until the owner has loaded.
    pub owner_name: Option<String>,
    pub name: TextFieldView,
    pub birth_date: TextFieldView,
    pub pet_type: SelectView,
    pub submit_label: String,
    pub submit_enabled: bool,
    pub is_submitting: bool,
    /// The user has edited a field since the form was last cleared or loaded.
    pub dirty: bool,
    pub form_errors: Vec<String>,
    pub error: Option<String>,
    pub loading: Loading,
}

fn text_field(model: &Model, field: FormField, label: &str, value: &str) -> TextFieldView {
    let error_message = model.form.field_error(field).map(str::to_string);
    TextFieldView {
        label: label.into(),
        value: value.into(),
        invalid: error_message.is_some(),
        error_message,
    }
}

fn type_select(model: &Model) -> SelectView {
    let options = model
        .pet_types
        .iter()
        .flatten()
        .map(|t| SelectOption {
            value: t.id,
            label: t.name.clone(),
        })
        .collect();
    let error_message = model.form.field_error(FormField::Type).map(str::to_string);

    SelectView {
        label: "Type".into(),
        value: model.form.value().type_id,
        options,
        content_revision: model.pet_types_revision,
        invalid: error_message.is_some(),
        error_message,
    }
}

/// Projects the current model onto what the shell draws.
#[must_use]
pub fn project(model: &Model) -> ViewModel {
    let value = model.form.value();
    let submit_label = if model.pet.is_some() {
        UPDATE_PET_LABEL
    } else {
        ADD_PET_LABEL
    };

    ViewModel {
        title: FORM_TITLE.into(),
        mode: model.activation.as_ref().map(|a| a.mode).unwrap_or_default(),
        owner_name: model.owner.as_ref().map(crate::model::Owner::display_name),
        name: text_field(model, FormField::Name, "Name", &value.name),
        birth_date: text_field(model, FormField::BirthDate, "Birth Date", &value.birth_date),
        pet_type: type_select(model),
        submit_label: submit_label.into(),
        submit_enabled: model.can_submit(),
        is_submitting: model.submit == SubmitState::Submitting,
        dirty: model.form.is_dirty(),
        form_errors: model.form.form_errors().to_vec(),
        error: model.error.clone(),
        loading: model.loading,
    }
}
