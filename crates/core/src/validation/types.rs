use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// SAML 1.1 protocol status code QNames.
pub mod status_codes {
    /// The request succeeded.
    pub const SUCCESS: &str = "samlp:Success";
    /// The request could not be performed due to an error on the part of the requester.
    pub const REQUESTER: &str = "samlp:Requester";
    /// The request could not be performed due to an error on the part of the responder.
    pub const RESPONDER: &str = "samlp:Responder";
    /// The protocol version of the request is not supported.
    pub const VERSION_MISMATCH: &str = "samlp:VersionMismatch";
    /// The responder declined to honor the request.
    pub const REQUEST_DENIED: &str = "samlp:RequestDenied";
}

/// A relying service known to the service registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub url: String,
}

/// A single-use ticket issued to a relying service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTicket {
    pub id: String,
    pub service_url: String,
    pub issued: DateTime<Utc>,
    /// Set once, when the ticket is consumed by a validation.
    pub consumed: Option<DateTime<Utc>>,
}

impl ServiceTicket {
    pub fn is_consumed(&self) -> bool {
        self.consumed.is_some()
    }
}

/// The authenticated session a service ticket was issued from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketGrantingTicket {
    pub id: String,
    pub user_id: String,
    pub issued: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// Attribute name to one or more values.
pub type AttributeSet = BTreeMap<String, Vec<String>>;

/// Why a collaborator rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// A required request parameter was absent.
    MissingParameter,
    /// The collaborator refused the request for its own reasons.
    Rejected,
}

/// Failure half of every collaborator result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Protocol status code, one of [`status_codes`] in practice.
    pub code: String,
    pub message: String,
    pub reason: FailureReason,
}

impl ValidationFailure {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            reason: FailureReason::Rejected,
        }
    }

    pub fn missing_parameter(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            reason: FailureReason::MissingParameter,
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for ValidationFailure {}

/// Result shape returned by the registries.
pub type ValidationResult<T> = Result<T, ValidationFailure>;

/// One inbound validation request, already extracted from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    /// The `TARGET` query parameter.
    pub service_url: Option<String>,
    /// The service ticket id from the payload.
    pub ticket: String,
    /// Client correlation id, echoed back as `InResponseTo`.
    pub request_id: Option<String>,
}

impl ValidationRequest {
    pub fn new(service_url: Option<String>, ticket: impl Into<String>) -> Self {
        Self {
            service_url,
            ticket: ticket.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
