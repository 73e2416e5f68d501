//! Data-access port for the backend endpoints.
//!
//! The core asks the shell to run an [`EndpointRequest`] and receives a
//! `Result<EndpointOutput, EndpointError>`. Each request carries the configured
//! path prefix, so shells that talk to the backend's endpoint protocol can use
//! [`EndpointRequest::call`] and [`EndpointRequest::decode_response`] instead
//! of writing their own codec.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::model::{Owner, OwnerId, Pet, PetId, PetType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointErrorKind {
    NotFound,
    ServerError,
    TransportError,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub parameter_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EndpointError {
    #[error("record not found")]
    NotFound,

    #[error("endpoint returned no data")]
    Empty,

    /// The backend answered with a structured failure.
    #[error("server error: {message}")]
    Server {
        error_type: Option<String>,
        message: String,
        detail: Option<String>,
        validation: Vec<ValidationFailure>,
    },

    #[error("transport error: {0}")]
    Transport(String),
}

impl EndpointError {
    #[must_use]
    pub const fn kind(&self) -> EndpointErrorKind {
        match self {
            Self::NotFound => EndpointErrorKind::NotFound,
            Self::Empty => EndpointErrorKind::Empty,
            Self::Server { .. } => EndpointErrorKind::ServerError,
            Self::Transport(_) => EndpointErrorKind::TransportError,
        }
    }

    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            error_type: None,
            message: message.into(),
            detail: None,
            validation: Vec::new(),
        }
    }

    #[must_use]
    pub fn validation_failures(&self) -> &[ValidationFailure] {
        match self {
            Self::Server { validation, .. } => validation,
            _ => &[],
        }
    }

    fn unexpected(operation: &EndpointOperation) -> Self {
        Self::Transport(format!(
            "unexpected response to {}",
            operation.method_path()
        ))
    }
}

pub type EndpointResult<T> = Result<T, EndpointError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointOperation {
    FindOwner { id: OwnerId },
    FindPetTypes,
    FindPet { id: PetId },
    SavePet { pet: Pet },
}

/// Raw endpoint answer. `None` means the endpoint returned `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointOutput {
    Owner(Option<Owner>),
    PetTypes(Option<Vec<PetType>>),
    Pet(Option<Pet>),
    Saved(PetId),
}

/// An operation bound to the endpoint prefix it should be sent under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRequest {
    pub prefix: String,
    pub operation: EndpointOperation,
}

impl Operation for EndpointRequest {
    type Output = EndpointResult<EndpointOutput>;
}

impl EndpointOutput {
    fn into_owner(self) -> Option<EndpointResult<Owner>> {
        match self {
            Self::Owner(owner) => Some(owner.ok_or(EndpointError::NotFound)),
            _ => None,
        }
    }

    fn into_pet_types(self) -> Option<EndpointResult<Vec<PetType>>> {
        match self {
            Self::PetTypes(Some(types)) if !types.is_empty() => Some(Ok(types)),
            Self::PetTypes(_) => Some(Err(EndpointError::Empty)),
            _ => None,
        }
    }

    fn into_pet(self) -> Option<EndpointResult<Pet>> {
        match self {
            Self::Pet(pet) => Some(pet.ok_or(EndpointError::NotFound)),
            _ => None,
        }
    }

    fn into_saved(self) -> Option<EndpointResult<PetId>> {
        match self {
            Self::Saved(id) => Some(Ok(id)),
            _ => None,
        }
    }
}

// --- Wire codec ---

/// A call in the backend's endpoint protocol: `POST {prefix}/{Endpoint}/{method}`
/// with a JSON object of named parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointCall {
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerErrorBody {
    #[serde(rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    message: String,
    detail: Option<Value>,
    #[serde(default)]
    validation_error_data: Vec<ValidationFailure>,
}

impl EndpointOperation {
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::FindOwner { .. } => "OwnerEndpoint",
            Self::FindPetTypes | Self::FindPet { .. } | Self::SavePet { .. } => "PetEndpoint",
        }
    }

    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::FindOwner { .. } | Self::FindPet { .. } => "findById",
            Self::FindPetTypes => "findPetTypes",
            Self::SavePet { .. } => "save",
        }
    }

    #[must_use]
    pub fn method_path(&self) -> String {
        format!("{}/{}", self.endpoint(), self.method())
    }

    #[must_use]
    pub fn call(&self, prefix: &str) -> EndpointCall {
        let body = match self {
            Self::FindOwner { id } => json!({ "id": id }),
            Self::FindPet { id } => json!({ "id": id }),
            Self::FindPetTypes => json!({}),
            Self::SavePet { pet } => json!({ "pet": pet }),
        };
        EndpointCall {
            path: format!("{}/{}", prefix.trim_end_matches('/'), self.method_path()),
            body,
        }
    }

    /// Classifies an HTTP reply to this operation.
    ///
    /// Any non-2xx reply is a server error, with the structured body decoded
    /// when present. A 2xx reply that does not decode is a transport error.
    pub fn decode_response(&self, status: u16, body: &[u8]) -> EndpointResult<EndpointOutput> {
        if !(200..300).contains(&status) {
            return Err(Self::decode_server_error(status, body));
        }

        let malformed = |e: serde_json::Error| {
            EndpointError::Transport(format!("malformed {} response: {e}", self.method_path()))
        };
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            b"null".as_slice()
        } else {
            body
        };

        match self {
            Self::FindOwner { .. } => serde_json::from_slice(body)
                .map(EndpointOutput::Owner)
                .map_err(malformed),
            Self::FindPetTypes => serde_json::from_slice(body)
                .map(EndpointOutput::PetTypes)
                .map_err(malformed),
            Self::FindPet { .. } => serde_json::from_slice(body)
                .map(EndpointOutput::Pet)
                .map_err(malformed),
            Self::SavePet { .. } => serde_json::from_slice::<Option<PetId>>(body)
                .map_err(malformed)?
                .map(EndpointOutput::Saved)
                .ok_or_else(|| EndpointError::Transport("save returned no id".into())),
        }
    }

    fn decode_server_error(status: u16, body: &[u8]) -> EndpointError {
        match serde_json::from_slice::<ServerErrorBody>(body) {
            Ok(parsed) => EndpointError::Server {
                error_type: parsed.error_type,
                message: if parsed.message.is_empty() {
                    format!("endpoint responded with status {status}")
                } else {
                    parsed.message
                },
                detail: parsed.detail.map(|d| match d {
                    Value::String(s) => s,
                    other => other.to_string(),
                }),
                validation: parsed.validation_error_data,
            },
            Err(_) => {
                let text = String::from_utf8_lossy(body).trim().to_string();
                EndpointError::server(if text.is_empty() {
                    format!("endpoint responded with status {status}")
                } else {
                    text
                })
            }
        }
    }
}

impl EndpointRequest {
    pub fn new(prefix: impl Into<String>, operation: EndpointOperation) -> Self {
        Self {
            prefix: prefix.into(),
            operation,
        }
    }

    #[must_use]
    pub fn call(&self) -> EndpointCall {
        self.operation.call(&self.prefix)
    }

    pub fn decode_response(&self, status: u16, body: &[u8]) -> EndpointResult<EndpointOutput> {
        self.operation.decode_response(status, body)
    }
}

// --- Capability ---

pub struct Endpoint<Ev> {
    context: CapabilityContext<EndpointRequest, Ev>,
}

impl<Ev> Capability<Ev> for Endpoint<Ev> {
    type Operation = EndpointRequest;
    type MappedSelf<MappedEv> = Endpoint<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Endpoint::new(self.context.map_event(f))
    }
}

impl<Ev> Endpoint<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<EndpointRequest, Ev>) -> Self {
        Self { context }
    }

    pub fn find_owner<F>(&self, prefix: &str, id: OwnerId, make_event: F)
    where
        F: FnOnce(EndpointResult<Owner>) -> Ev + Send + 'static,
    {
        self.call(
            EndpointRequest::new(prefix, EndpointOperation::FindOwner { id }),
            EndpointOutput::into_owner,
            make_event,
        );
    }

    pub fn find_pet_types<F>(&self, prefix: &str, make_event: F)
    where
        F: FnOnce(EndpointResult<Vec<PetType>>) -> Ev + Send + 'static,
    {
        self.call(
            EndpointRequest::new(prefix, EndpointOperation::FindPetTypes),
            EndpointOutput::into_pet_types,
            make_event,
        );
    }

    pub fn find_pet<F>(&self, prefix: &str, id: PetId, make_event: F)
    where
        F: FnOnce(EndpointResult<Pet>) -> Ev + Send + 'static,
    {
        self.call(
            EndpointRequest::new(prefix, EndpointOperation::FindPet { id }),
            EndpointOutput::into_pet,
            make_event,
        );
    }

    pub fn save_pet<F>(&self, prefix: &str, pet: Pet, make_event: F)
    where
        F: FnOnce(EndpointResult<PetId>) -> Ev + Send + 'static,
    {
        self.call(
            EndpointRequest::new(prefix, EndpointOperation::SavePet { pet }),
            EndpointOutput::into_saved,
            make_event,
        );
    }

    fn call<T, F>(
        &self,
        request: EndpointRequest,
        convert: fn(EndpointOutput) -> Option<EndpointResult<T>>,
        make_event: F,
    ) where
        T: 'static,
        F: FnOnce(EndpointResult<T>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let unexpected = EndpointError::unexpected(&request.operation);
            let output = context.request_from_shell(request).await;
            let result = output.and_then(|o| convert(o).unwrap_or(Err(unexpected)));
            context.update_app(make_event(result));
        });
    }
}
