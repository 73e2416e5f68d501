// lib.rs - Pet form core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]

pub mod capabilities;
pub mod config;
pub mod event;
pub mod form;
pub mod model;
pub mod routes;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{ConfigError, FormConfig};
pub use event::Event;
pub use form::{FormField, PetForm};
pub use model::{Model, Owner, OwnerId, Pet, PetId, PetType, PetTypeId};
pub use routes::{RouteConfig, RouteError, RouteLocation};
pub use view::ViewModel;

pub const SAVE_SERVER_ERROR: &str = "Saving pet failed due to server error";
pub const SAVE_NETWORK_ERROR: &str = "Saving pet failed due to network error. Try again later.";
pub const PET_TYPES_ERROR: &str = "Error fetching pet types";
pub const OWNER_NOT_LOADED: &str = "Cannot save pet before the owner has loaded";

#[must_use]
pub fn owner_not_found(id: impl std::fmt::Display) -> String {
    format!("No owner found with id {id}")
}

#[must_use]
pub fn pet_not_found(id: impl std::fmt::Display) -> String {
    format!("No pet found with id {id}")
}

/// Parts of the model an update touched. Drives what gets recomputed before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Owner,
    Pet,
    PetTypes,
    Form,
    Error,
    Submit,
}

pub mod app {
    use tracing::{debug, error, info, warn};

    use super::*;
    use crate::capabilities::{EndpointErrorKind, EndpointResult};
    use crate::model::{Activation, ActivationId, FormMode, SubmitState};

    #[derive(Default)]
    pub struct App;

    impl App {
        /// Single exit point for every mutation: recompute derived state, then render.
        fn changed(model: &mut Model, caps: &Capabilities, changes: &[Change]) {
            if changes.contains(&Change::PetTypes) {
                model.pet_types_revision = model.pet_types_revision.wrapping_add(1);
            }
            caps.render.render();
        }

        /// Returns false when the response should be dropped.
        fn accept_response(model: &Model, activation: ActivationId, what: &str) -> bool {
            match model.activation_id() {
                None => {
                    debug!(%activation, what, "response after deactivation dropped");
                    false
                }
                Some(current) if current != activation => {
                    warn!(
                        %activation,
                        %current,
                        what,
                        "response from a previous activation applied"
                    );
                    true
                }
                Some(_) => true,
            }
        }

        fn activate(location: RouteLocation, model: &mut Model, caps: &Capabilities) {
            model.reset_transient();

            let routes = model.config.routes.clone();
            let mode = routes.mode_of(&location);
            let owner_id = routes.owner_id(&location);
            let pet_id = match mode {
                FormMode::Edit => Some(routes.pet_id(&location)),
                FormMode::Create => None,
            };

            let id = ActivationId::generate();
            model.activation = Some(Activation {
                id,
                mode,
                owner_id: owner_id.as_ref().ok().copied(),
                pet_id: pet_id.as_ref().and_then(|p| p.as_ref().ok().copied()),
            });
            info!(activation = %id, ?mode, route = ?location.name, "pet form activated");

            let mut changes = vec![Change::Owner, Change::Error];

            Self::fetch_owner(owner_id, &location, &routes, id, model, caps);
            Self::fetch_pet_types(id, model, caps);
            changes.push(Change::PetTypes);

            if let Some(pet_id) = pet_id {
                Self::fetch_pet(pet_id, &location, &routes, id, model, caps);
                changes.extend([Change::Pet, Change::Form]);
            }

            Self::changed(model, caps, &changes);
        }

        fn fetch_owner(
            owner_id: Result<OwnerId, RouteError>,
            location: &RouteLocation,
            routes: &RouteConfig,
            activation: ActivationId,
            model: &mut Model,
            caps: &Capabilities,
        ) {
            model.owner = None;
            match owner_id {
                Ok(id) => {
                    model.loading.owner = true;
                    let prefix = &model.config.endpoint_prefix;
                    caps.endpoint.find_owner(prefix, id, move |result| Event::OwnerFetched {
                        activation,
                        id,
                        result: Box::new(result),
                    });
                }
                Err(e) => {
                    warn!(%activation, error = %e, "owner id route parameter unusable");
                    let raw = location.param(&routes.owner_id_param).unwrap_or_default();
                    model.set_error(owner_not_found(raw));
                }
            }
        }

        fn fetch_pet_types(activation: ActivationId, model: &mut Model, caps: &Capabilities) {
            model.pet_types = None;
            model.loading.pet_types = true;
            let prefix = &model.config.endpoint_prefix;
            caps.endpoint.find_pet_types(prefix, move |result| Event::PetTypesFetched {
                activation,
                result: Box::new(result),
            });
        }

        fn fetch_pet(
            pet_id: Result<PetId, RouteError>,
            location: &RouteLocation,
            routes: &RouteConfig,
            activation: ActivationId,
            model: &mut Model,
            caps: &Capabilities,
        ) {
            model.owner = None;
            model.pet = None;
            model.form.clear();
            match pet_id {
                Ok(id) => {
                    model.loading.pet = true;
                    let prefix = &model.config.endpoint_prefix;
                    caps.endpoint.find_pet(prefix, id, move |result| Event::PetFetched {
                        activation,
                        id,
                        result: Box::new(result),
                    });
                }
                Err(e) => {
                    warn!(%activation, error = %e, "pet id route parameter unusable");
                    let raw = location.param(&routes.pet_id_param).unwrap_or_default();
                    model.set_error(pet_not_found(raw));
                }
            }
        }

        fn handle_owner(id: OwnerId, result: EndpointResult<Owner>, model: &mut Model) {
            model.loading.owner = false;
            match result {
                Ok(owner) => {
                    debug!(owner_id = %owner.id, "owner loaded");
                    model.form.set_owner(owner.id);
                    model.owner = Some(owner);
                }
                Err(e) => {
                    warn!(owner_id = %id, kind = ?e.kind(), error = %e, "owner lookup failed");
                    model.owner = None;
                    model.set_error(owner_not_found(id));
                }
            }
        }

        fn handle_pet_types(result: EndpointResult<Vec<PetType>>, model: &mut Model) {
            model.loading.pet_types = false;
            match result {
                Ok(types) => {
                    debug!(count = types.len(), "pet types loaded");
                    model.pet_types = Some(types);
                }
                Err(e) => {
                    warn!(kind = ?e.kind(), error = %e, "pet type lookup failed");
                    model.pet_types = None;
                    model.set_error(PET_TYPES_ERROR);
                }
            }
        }

        fn handle_pet(id: PetId, result: EndpointResult<Pet>, model: &mut Model) {
            model.loading.pet = false;
            match result {
                Ok(pet) => {
                    debug!(pet_id = %id, "pet loaded");
                    model.form.read(&pet);
                    model.pet = Some(pet);
                }
                Err(e) => {
                    warn!(pet_id = %id, kind = ?e.kind(), error = %e, "pet lookup failed");
                    model.pet = None;
                    model.set_error(pet_not_found(id));
                }
            }
        }

        fn submit(model: &mut Model, caps: &Capabilities) {
            let Some(activation) = model.activation_id() else {
                debug!("submit ignored, form not active");
                return;
            };
            if model.submit.is_in_flight() {
                debug!(%activation, "submit ignored, save already in flight");
                return;
            }

            model.clear_error();
            if model.owner.is_none() {
                warn!(%activation, "submit before owner loaded");
                model.set_error(OWNER_NOT_LOADED);
                Self::changed(model, caps, &[Change::Error]);
                return;
            }

            model.form.clear_validation();
            model.submit = SubmitState::Submitting;
            caps.endpoint.save_pet(
                &model.config.endpoint_prefix,
                model.form.value().clone(),
                move |result| Event::PetSaved {
                    activation,
                    result: Box::new(result),
                },
            );

            Self::changed(model, caps, &[Change::Error, Change::Form, Change::Submit]);
        }

        fn handle_saved(result: EndpointResult<PetId>, model: &mut Model, caps: &Capabilities) {
            match result {
                Ok(pet_id) => {
                    let target = model
                        .owner
                        .as_ref()
                        .map(|owner| model.config.routes.owner_details_url(owner.id));
                    match target {
                        Some(Ok(url)) => {
                            info!(%pet_id, %url, "pet saved");
                            model.submit = SubmitState::Navigated;
                            caps.navigate.go(url);
                        }
                        Some(Err(e)) => {
                            error!(%pet_id, error = %e, "pet saved but owner details url failed");
                            model.submit = SubmitState::Failed;
                            model.set_error(format!("Pet saved, but owner details are unavailable: {e}"));
                        }
                        None => {
                            error!(%pet_id, "pet saved without a loaded owner");
                            model.submit = SubmitState::Failed;
                            model.set_error(OWNER_NOT_LOADED);
                        }
                    }
                }
                Err(e) => {
                    error!(kind = ?e.kind(), error = %e, "saving pet failed");
                    model.submit = SubmitState::Failed;
                    if e.kind() == EndpointErrorKind::ServerError {
                        model.form.apply_server_validation(e.validation_failures());
                        model.set_error(SAVE_SERVER_ERROR);
                    } else {
                        model.set_error(SAVE_NETWORK_ERROR);
                    }
                }
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(event = event.name(), user = event.is_user_initiated(), "update");

            match event {
                Event::Configured(config) => match config.validate() {
                    Ok(()) => {
                        model.config = *config;
                        Self::changed(model, caps, &[]);
                    }
                    Err(e) => warn!(error = %e, "config rejected"),
                },

                Event::Activated(location) => Self::activate(location, model, caps),

                Event::Deactivated => {
                    if let Some(activation) = model.activation_id() {
                        info!(%activation, "pet form deactivated");
                    }
                    model.reset_transient();
                    Self::changed(model, caps, &[Change::Owner, Change::Pet, Change::PetTypes]);
                }

                Event::NameChanged(name) => {
                    model.form.set_name(name);
                    Self::changed(model, caps, &[Change::Form]);
                }

                Event::BirthDateChanged(birth_date) => {
                    model.form.set_birth_date(birth_date);
                    Self::changed(model, caps, &[Change::Form]);
                }

                Event::TypeSelected(type_id) => {
                    model.form.set_type(type_id);
                    Self::changed(model, caps, &[Change::Form]);
                }

                Event::SubmitRequested => Self::submit(model, caps),

                Event::OwnerFetched { activation, id, result } => {
                    if Self::accept_response(model, activation, "owner") {
                        Self::handle_owner(id, *result, model);
                        Self::changed(model, caps, &[Change::Owner, Change::Form, Change::Error]);
                    }
                }

                Event::PetTypesFetched { activation, result } => {
                    if Self::accept_response(model, activation, "pet_types") {
                        Self::handle_pet_types(*result, model);
                        Self::changed(model, caps, &[Change::PetTypes, Change::Error]);
                    }
                }

                Event::PetFetched { activation, id, result } => {
                    if Self::accept_response(model, activation, "pet") {
                        Self::handle_pet(id, *result, model);
                        Self::changed(model, caps, &[Change::Pet, Change::Form, Change::Error]);
                    }
                }

                Event::PetSaved { activation, result } => {
                    if Self::accept_response(model, activation, "save") {
                        Self::handle_saved(*result, model, caps);
                        Self::changed(model, caps, &[Change::Submit, Change::Form, Change::Error]);
                    }
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            view::project(model)
        }
    }
}
