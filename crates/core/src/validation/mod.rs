//! Validation results, domain records and the error taxonomy.

mod error;
mod types;

pub use error::{ValidationError, ValidationStage, MISSING_PARAMETERS_MESSAGE};
pub use types::{
    status_codes, AttributeSet, FailureReason, ServiceInfo, ServiceTicket, TicketGrantingTicket,
    ValidationFailure, ValidationRequest, ValidationResult,
};
