use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};
use uuid::Uuid;

use crate::config::FormConfig;
use crate::form::PetForm;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(
            Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

typed_id!(OwnerId);
typed_id!(PetId);
typed_id!(PetTypeId);

/// Correlates the responses of one activation in the logs.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ActivationId(pub Uuid);

impl ActivationId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ActivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Records owned by the backend ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
}

impl Owner {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PetType {
    pub id: PetTypeId,
    pub name: String,
}

/// The editable pet record. `id` is absent until the backend has stored it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PetId>,
    #[serde(default)]
    pub name: String,
    /// ISO `YYYY-MM-DD`, kept as the text the input edits.
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub type_id: Option<PetTypeId>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
}

// --- View state ---

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Activation {
    pub id: ActivationId,
    pub mode: FormMode,
    pub owner_id: Option<OwnerId>,
    pub pet_id: Option<PetId>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Navigated,
    Failed,
}

impl SubmitState {
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::Submitting)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Loading {
    pub owner: bool,
    pub pet: bool,
    pub pet_types: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Model {
    pub config: FormConfig,
    pub activation: Option<Activation>,

    pub owner: Option<Owner>,
    pub pet: Option<Pet>,
    pub pet_types: Option<Vec<PetType>>,
    /// Bumped whenever `pet_types` changes; the selector re-renders its items on change.
    pub pet_types_revision: u64,

    pub form: PetForm,
    pub error: Option<String>,
    pub submit: SubmitState,
    pub loading: Loading,
}

impl Model {
    /// Drops everything the view created on activation. Configuration survives.
    pub fn reset_transient(&mut self) {
        let config = std::mem::take(&mut self.config);
        let revision = self.pet_types_revision;
        *self = Self {
            config,
            pet_types_revision: revision,
            ..Self::default()
        };
    }

    #[must_use]
    pub fn activation_id(&self) -> Option<ActivationId> {
        self.activation.as_ref().map(|a| a.id)
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.owner.is_some() && !self.submit.is_in_flight()
    }
}
