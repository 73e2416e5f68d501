use serde::{Deserialize, Serialize};

use crate::capabilities::EndpointResult;
use crate::config::FormConfig;
use crate::model::{ActivationId, Owner, OwnerId, Pet, PetId, PetType, PetTypeId};
use crate::routes::RouteLocation;

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Shell lifecycle
    Configured(Box<FormConfig>),
    Activated(RouteLocation),
    Deactivated,

    // Field edits
    NameChanged(String),
    BirthDateChanged(String),
    TypeSelected(Option<PetTypeId>),
    SubmitRequested,

    // Capability responses
    OwnerFetched {
        activation: ActivationId,
        id: OwnerId,
        result: Box<EndpointResult<Owner>>,
    },
    PetTypesFetched {
        activation: ActivationId,
        result: Box<EndpointResult<Vec<PetType>>>,
    },
    PetFetched {
        activation: ActivationId,
        id: PetId,
        result: Box<EndpointResult<Pet>>,
    },
    PetSaved {
        activation: ActivationId,
        result: Box<EndpointResult<PetId>>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configured(_) => "configured",
            Self::Activated(_) => "activated",
            Self::Deactivated => "deactivated",
            Self::NameChanged(_) => "name_changed",
            Self::BirthDateChanged(_) => "birth_date_changed",
            Self::TypeSelected(_) => "type_selected",
            Self::SubmitRequested => "submit_requested",
            Self::OwnerFetched { .. } => "owner_fetched",
            Self::PetTypesFetched { .. } => "pet_types_fetched",
            Self::PetFetched { .. } => "pet_fetched",
            Self::PetSaved { .. } => "pet_saved",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::NameChanged(_)
                | Self::BirthDateChanged(_)
                | Self::TypeSelected(_)
                | Self::SubmitRequested
        )
    }
}
