use async_trait::async_trait;
use thiserror::Error;

use crate::validation::{
    AttributeSet, ServiceInfo, ServiceTicket, TicketGrantingTicket, ValidationResult,
};

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("Attribute source unavailable: {0}")]
    Unavailable(String),
}

/// Decides whether a relying service may validate tickets.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Look up the service for `service_url`.
    ///
    /// A missing URL must be reported with
    /// [`FailureReason::MissingParameter`](crate::validation::FailureReason).
    async fn validate_service(&self, service_url: Option<&str>) -> ValidationResult<ServiceInfo>;
}

/// Owns service tickets and ticket-granting tickets.
///
/// Implementations must make [`invalidate_service_ticket`] an atomic
/// check-and-consume: of any number of concurrent calls for one ticket id,
/// at most one may succeed.
///
/// [`invalidate_service_ticket`]: TicketRegistry::invalidate_service_ticket
#[async_trait]
pub trait TicketRegistry: Send + Sync {
    /// Check that the ticket exists and is still usable.
    async fn validate_service_ticket(&self, ticket_id: &str) -> ValidationResult<ServiceTicket>;

    /// Mark the ticket consumed. Fails if it was already consumed.
    async fn invalidate_service_ticket(&self, ticket_id: &str)
        -> ValidationResult<ServiceTicket>;

    /// Find the ticket-granting ticket the service ticket was issued from.
    async fn ticket_granting_ticket(&self, ticket_id: &str)
        -> ValidationResult<TicketGrantingTicket>;
}

/// Supplies identity attributes for a user.
#[async_trait]
pub trait AttributeResolver: Send + Sync {
    async fn attributes_for(&self, user_id: &str) -> Result<AttributeSet, AttributeError>;

    /// Name of this resolver, for logs.
    fn name(&self) -> &'static str;
}
