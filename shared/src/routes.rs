use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

use crate::model::{FormMode, OwnerId, PetId};

pub const OWNER_DETAILS_ROUTE: &str = "owner-details";
pub const NEW_PET_ROUTE: &str = "new-pet";
pub const EDIT_PET_ROUTE: &str = "edit-pet";
pub const OWNER_ID_PARAM: &str = "ownerId";
pub const PET_ID_PARAM: &str = "petId";

const ROUTE_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("missing route parameter `{0}`")]
    MissingParam(String),
    #[error("route parameter `{name}` is not an id: {value:?}")]
    InvalidParam { name: String, value: String },
    #[error("unknown route `{0}`")]
    UnknownRoute(String),
    #[error("route template `{template}` cannot be built: {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// Current location as reported by the shell router.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteLocation {
    pub name: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl RouteLocation {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            params: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    fn parse_param<T: std::str::FromStr>(&self, key: &str) -> Result<T, RouteError> {
        let raw = self
            .param(key)
            .ok_or_else(|| RouteError::MissingParam(key.to_string()))?;
        // Whole-string parse: a numeric prefix such as `7abc` is rejected, not read as 7.
        raw.trim().parse().map_err(|_| RouteError::InvalidParam {
            name: key.to_string(),
            value: raw.to_string(),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RouteConfig {
    pub edit_route: String,
    pub owner_details_route: String,
    pub owner_id_param: String,
    pub pet_id_param: String,
    /// Route name to path template; `:name` segments are substituted.
    pub templates: BTreeMap<String, String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        let templates = [
            (OWNER_DETAILS_ROUTE, "/owners/:ownerId"),
            (NEW_PET_ROUTE, "/owners/:ownerId/pets/new"),
            (EDIT_PET_ROUTE, "/owners/:ownerId/pets/:petId/edit"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect();

        Self {
            edit_route: EDIT_PET_ROUTE.into(),
            owner_details_route: OWNER_DETAILS_ROUTE.into(),
            owner_id_param: OWNER_ID_PARAM.into(),
            pet_id_param: PET_ID_PARAM.into(),
            templates,
        }
    }
}

impl RouteConfig {
    #[must_use]
    pub fn mode_of(&self, location: &RouteLocation) -> FormMode {
        if location.name.as_deref() == Some(self.edit_route.as_str()) {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn owner_id(&self, location: &RouteLocation) -> Result<OwnerId, RouteError> {
        location.parse_param(&self.owner_id_param)
    }

    pub fn pet_id(&self, location: &RouteLocation) -> Result<PetId, RouteError> {
        location.parse_param(&self.pet_id_param)
    }

    /// Builds the path of a named route. Every `:param` in the template must be supplied.
    pub fn url_for(&self, name: &str, params: &[(&str, String)]) -> Result<String, RouteError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;

        let segments = template
            .trim_start_matches('/')
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(key) => params
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v.as_str())
                    .ok_or_else(|| RouteError::MissingParam(key.to_string())),
                None => Ok(segment),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Only the path is returned.
        let mut url = Url::parse(ROUTE_BASE).map_err(|e| RouteError::InvalidTemplate {
            template: template.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| RouteError::InvalidTemplate {
                template: template.clone(),
                reason: "base cannot hold a path".into(),
            })?
            .clear()
            .extend(segments);
        Ok(url.path().to_string())
    }

    pub fn owner_details_url(&self, owner_id: OwnerId) -> Result<String, RouteError> {
        self.url_for(
            &self.owner_details_route,
            &[(self.owner_id_param.as_str(), owner_id.to_string())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn edit_route_selects_edit_mode() {
        let config = RouteConfig::default();
        assert_eq!(config.mode_of(&RouteLocation::new("edit-pet")), FormMode::Edit);
        assert_eq!(config.mode_of(&RouteLocation::new("new-pet")), FormMode::Create);
        assert_eq!(config.mode_of(&RouteLocation::default()), FormMode::Create);
    }

    #[test]
    fn owner_id_errors_name_the_parameter() {
        let config = RouteConfig::default();

        let missing = config.owner_id(&RouteLocation::new("new-pet"));
        assert_eq!(missing, Err(RouteError::MissingParam("ownerId".into())));

        let invalid = config.owner_id(&RouteLocation::new("new-pet").with_param("ownerId", "abc"));
        assert_eq!(
            invalid,
            Err(RouteError::InvalidParam {
                name: "ownerId".into(),
                value: "abc".into()
            })
        );
    }

    #[test]
    fn owner_details_url_uses_template() {
        let config = RouteConfig::default();
        assert_eq!(config.owner_details_url(OwnerId(3)).unwrap(), "/owners/3");
    }

    #[test]
    fn url_for_rejects_unknown_route_and_missing_param() {
        let config = RouteConfig::default();
        assert_eq!(
            config.url_for("vets", &[]),
            Err(RouteError::UnknownRoute("vets".into()))
        );
        assert_eq!(
            config.url_for("edit-pet", &[("ownerId", "1".into())]),
            Err(RouteError::MissingParam("petId".into()))
        );
    }

    #[test]
    fn url_for_encodes_params() {
        let config = RouteConfig::default();
        let url = config
            .url_for("owner-details", &[("ownerId", "a b/c".into())])
            .unwrap();
        assert_eq!(url, "/owners/a%20b%2Fc");

        let url = config.url_for("owner-details", &[("ownerId", "é".into())]).unwrap();
        assert_eq!(url, "/owners/%C3%A9");
    }

    #[test]
    fn trailing_garbage_is_not_an_id() {
        let config = RouteConfig::default();
        let location = RouteLocation::new("edit-pet").with_param("petId", "7abc");
        assert_eq!(
            config.pet_id(&location),
            Err(RouteError::InvalidParam {
                name: "petId".into(),
                value: "7abc".into(),
            })
        );
    }

    proptest! {
        #[test]
        fn any_id_parses_back(id in any::<i32>()) {
            let config = RouteConfig::default();
            let location = RouteLocation::new("edit-pet")
                .with_param("ownerId", id)
                .with_param("petId", id);
            prop_assert_eq!(config.owner_id(&location), Ok(OwnerId(id)));
            prop_assert_eq!(config.pet_id(&location), Ok(PetId(id)));
        }

        #[test]
        fn edit_url_contains_both_ids(owner in 0..i32::MAX, pet in 0..i32::MAX) {
            let config = RouteConfig::default();
            let url = config
                .url_for("edit-pet", &[("ownerId", owner.to_string()), ("petId", pet.to_string())])
                .unwrap();
            prop_assert_eq!(url, format!("/owners/{owner}/pets/{pet}/edit"));
        }
    }
}
