use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::routes::RouteConfig;

pub const DEFAULT_ENDPOINT_PREFIX: &str = "/connect";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Validation(String),
    #[error("config is not valid JSON: {0}")]
    Parse(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct FormConfig {
    pub routes: RouteConfig,
    /// Path prefix the shell uses for endpoint calls.
    pub endpoint_prefix: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            routes: RouteConfig::default(),
            endpoint_prefix: DEFAULT_ENDPOINT_PREFIX.into(),
        }
    }
}

impl FormConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let routes = &self.routes;
        if routes.owner_id_param.is_empty() || routes.pet_id_param.is_empty() {
            return Err(ConfigError::Validation("route parameter names must not be empty".into()));
        }
        if routes.edit_route.is_empty() {
            return Err(ConfigError::Validation("edit_route must not be empty".into()));
        }
        let Some(details) = routes.templates.get(&routes.owner_details_route) else {
            return Err(ConfigError::Validation(format!(
                "no template for owner details route `{}`",
                routes.owner_details_route
            )));
        };
        if !details
            .split('/')
            .any(|segment| segment.strip_prefix(':') == Some(routes.owner_id_param.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "owner details template `{details}` has no `:{}` segment",
                routes.owner_id_param
            )));
        }
        if !self.endpoint_prefix.starts_with('/') {
            return Err(ConfigError::Validation("endpoint_prefix must start with `/`".into()));
        }
        Ok(())
    }

    /// Parses and validates a JSON config; missing keys take their defaults.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        info!(prefix = %config.endpoint_prefix, "form config loaded");
        Ok(config)
    }
}
