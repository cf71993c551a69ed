use thiserror::Error;

use super::types::{FailureReason, ValidationFailure};
use crate::registry::AttributeError;
use crate::tracking::TrackingError;

/// Status message for a service rejected for missing parameters.
pub const MISSING_PARAMETERS_MESSAGE: &str = "Missing required parameter(s)";

/// Pipeline stage that can terminate a validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationStage {
    Service,
    Ticket,
    Invalidation,
    Identity,
}

impl ValidationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Ticket => "ticket",
            Self::Invalidation => "invalidation",
            Self::Identity => "identity",
        }
    }
}

/// Errors raised while validating a service ticket.
///
/// The first four variants end the request with a failure document. The
/// last two are recovered inside the validator and never change the outcome.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("failed to validate service: {0}")]
    ServiceValidation(ValidationFailure),

    #[error("failed to validate service ticket {ticket}: {failure}")]
    TicketNotRecognized {
        ticket: String,
        failure: ValidationFailure,
    },

    #[error("failed to invalidate service ticket {ticket}: {failure}")]
    TicketInvalidation {
        ticket: String,
        failure: ValidationFailure,
    },

    #[error("unable to get tgt for service ticket {ticket}: {failure}")]
    IdentityResolution {
        ticket: String,
        failure: ValidationFailure,
    },

    #[error("could not retrieve user attributes: {0}")]
    AttributeResolution(#[from] AttributeError),

    #[error("could not track service usage: {0}")]
    Tracking(#[from] TrackingError),
}

impl ValidationError {
    /// Stage that raised a terminal error. `None` for recovered errors.
    pub fn stage(&self) -> Option<ValidationStage> {
        match self {
            Self::ServiceValidation(_) => Some(ValidationStage::Service),
            Self::TicketNotRecognized { .. } => Some(ValidationStage::Ticket),
            Self::TicketInvalidation { .. } => Some(ValidationStage::Invalidation),
            Self::IdentityResolution { .. } => Some(ValidationStage::Identity),
            Self::AttributeResolution(_) | Self::Tracking(_) => None,
        }
    }

    /// Protocol status code for a terminal error.
    pub fn status_code(&self) -> Option<&str> {
        self.failure().map(|f| f.code.as_str())
    }

    /// Protocol status message for a terminal error.
    pub fn status_message(&self) -> Option<String> {
        match self {
            Self::ServiceValidation(failure) => Some(match failure.reason {
                FailureReason::MissingParameter => MISSING_PARAMETERS_MESSAGE.to_string(),
                FailureReason::Rejected => failure.message.clone(),
            }),
            Self::TicketNotRecognized { ticket, .. } => {
                Some(format!("Ticket {} was not recognized", ticket))
            }
            Self::TicketInvalidation { ticket, .. } => {
                Some(format!("Service ticket {} could not be invalidated", ticket))
            }
            Self::IdentityResolution { ticket, .. } => {
                Some(format!("TGT for {} could not be found", ticket))
            }
            Self::AttributeResolution(_) | Self::Tracking(_) => None,
        }
    }

    fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::ServiceValidation(failure) => Some(failure),
            Self::TicketNotRecognized { failure, .. }
            | Self::TicketInvalidation { failure, .. }
            | Self::IdentityResolution { failure, .. } => Some(failure),
            Self::AttributeResolution(_) | Self::Tracking(_) => None,
        }
    }
}
