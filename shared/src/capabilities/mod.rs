//! Shell-facing capabilities.
//!
//! `Endpoint` and `Navigate` are the view's data-access and navigation ports.
//! Render is Crux's built-in capability, re-exported as is.

mod endpoint;
mod navigate;

pub use self::endpoint::{
    Endpoint, EndpointCall, EndpointError, EndpointErrorKind, EndpointOperation, EndpointOutput,
    EndpointRequest, EndpointResult, ValidationFailure,
};
pub use self::navigate::{Navigate, NavigateOperation};
pub use crux_core::render::{Render, RenderOperation};

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "crate::App")]
pub struct Capabilities {
    pub endpoint: Endpoint<Event>,
    pub navigate: Navigate<Event>,
    pub render: Render<Event>,
}
