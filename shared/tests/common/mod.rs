#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_core::Request;
use shared::capabilities::{
    EndpointOperation, EndpointOutput, EndpointRequest, EndpointResult, NavigateOperation,
};
use shared::{App, Effect, Event, Model, Owner, OwnerId, Pet, PetId, PetType, PetTypeId, RouteLocation};

pub type Tester = AppTester<App, Effect>;

#[derive(Default)]
pub struct Effects {
    pub endpoint: Vec<Request<EndpointRequest>>,
    pub navigate: Vec<Request<NavigateOperation>>,
    pub renders: usize,
}

impl Effects {
    pub fn from_effects(effects: Vec<Effect>) -> Self {
        let mut out = Self::default();
        out.absorb(effects);
        out
    }

    fn absorb(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Endpoint(request) => self.endpoint.push(request),
                Effect::Navigate(request) => self.navigate.push(request),
                Effect::Render(_) => self.renders += 1,
            }
        }
    }

    /// Removes the first endpoint request matching `pred`.
    pub fn take(&mut self, pred: impl Fn(&EndpointOperation) -> bool) -> Request<EndpointRequest> {
        let index = self
            .endpoint
            .iter()
            .position(|r| pred(&r.operation.operation))
            .expect("expected endpoint request was not issued");
        self.endpoint.remove(index)
    }

    pub fn navigated_to(&self) -> Vec<String> {
        self.navigate
            .iter()
            .map(|r| match &r.operation {
                NavigateOperation::Go { url } => url.clone(),
            })
            .collect()
    }
}

pub fn update(app: &Tester, event: Event, model: &mut Model) -> Effects {
    Effects::from_effects(app.update(event, model).effects)
}

/// Resolves a shell request and feeds the resulting events back into the app.
pub fn resolve(
    app: &Tester,
    model: &mut Model,
    request: &mut Request<EndpointRequest>,
    output: EndpointResult<EndpointOutput>,
) -> Effects {
    let resolved = app.resolve(request, output).expect("request should resolve");
    let mut out = Effects::default();
    for event in resolved.events {
        out.absorb(app.update(event, model).effects);
    }
    out
}

pub fn is_find_owner(op: &EndpointOperation) -> bool {
    matches!(op, EndpointOperation::FindOwner { .. })
}

pub fn is_find_pet_types(op: &EndpointOperation) -> bool {
    matches!(op, EndpointOperation::FindPetTypes)
}

pub fn is_find_pet(op: &EndpointOperation) -> bool {
    matches!(op, EndpointOperation::FindPet { .. })
}

pub fn is_save(op: &EndpointOperation) -> bool {
    matches!(op, EndpointOperation::SavePet { .. })
}

pub fn new_pet_route(owner_id: impl ToString) -> RouteLocation {
    RouteLocation::new("new-pet").with_param("ownerId", owner_id)
}

pub fn edit_pet_route(owner_id: impl ToString, pet_id: impl ToString) -> RouteLocation {
    RouteLocation::new("edit-pet")
        .with_param("ownerId", owner_id)
        .with_param("petId", pet_id)
}

pub fn george() -> Owner {
    Owner {
        id: OwnerId(1),
        first_name: "George".into(),
        last_name: "Franklin".into(),
    }
}

pub fn pet_types() -> Vec<PetType> {
    ["cat", "dog", "lizard"]
        .iter()
        .zip(1..)
        .map(|(name, id)| PetType {
            id: PetTypeId(id),
            name: (*name).to_string(),
        })
        .collect()
}

pub fn leo() -> Pet {
    Pet {
        id: Some(PetId(7)),
        name: "Leo".into(),
        birth_date: "2010-09-07".into(),
        type_id: Some(PetTypeId(1)),
        owner_id: Some(OwnerId(1)),
    }
}

/// Activates the create route and resolves owner and pet types successfully.
pub fn loaded_create_form(app: &Tester, model: &mut Model) {
    let mut effects = update(app, Event::Activated(new_pet_route(1)), model);
    let mut owner = effects.take(is_find_owner);
    let mut types = effects.take(is_find_pet_types);
    resolve(app, model, &mut owner, Ok(EndpointOutput::Owner(Some(george()))));
    resolve(app, model, &mut types, Ok(EndpointOutput::PetTypes(Some(pet_types()))));
}
