//! Mock ticket registry for testing.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::registry::TicketRegistry;
use crate::validation::{
    status_codes, ServiceTicket, TicketGrantingTicket, ValidationFailure, ValidationResult,
};

/// A registry call, recorded for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketCall {
    Validate(String),
    Invalidate(String),
    TicketGrantingTicket(String),
}

/// Stage-specific failures injected into the mock.
#[derive(Debug, Clone, Default)]
struct InjectedFailures {
    validate: Option<ValidationFailure>,
    invalidate: Option<ValidationFailure>,
    ticket_granting_ticket: Option<ValidationFailure>,
}

/// Mock implementation of the TicketRegistry trait.
///
/// Tickets added with [`add_ticket`](Self::add_ticket) behave like real ones:
/// the first invalidation consumes them and later ones fail. Any stage can
/// also be forced to fail.
#[derive(Debug, Clone, Default)]
pub struct MockTicketRegistry {
    tickets: Arc<Mutex<HashMap<String, (ServiceTicket, TicketGrantingTicket)>>>,
    calls: Arc<RwLock<Vec<TicketCall>>>,
    failures: Arc<RwLock<InjectedFailures>>,
}

impl MockTicketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a valid, unconsumed ticket for `user_id`.
    pub async fn add_ticket(&self, ticket_id: &str, user_id: &str, service_url: &str) {
        let now = Utc::now();
        let ticket = ServiceTicket {
            id: ticket_id.to_string(),
            service_url: service_url.to_string(),
            issued: now,
            consumed: None,
        };
        let tgt = TicketGrantingTicket {
            id: format!("TGT-{}", ticket_id),
            user_id: user_id.to_string(),
            issued: now,
            expires: now + Duration::hours(8),
        };
        self.tickets
            .lock()
            .await
            .insert(ticket_id.to_string(), (ticket, tgt));
    }

    pub async fn fail_validate(&self, failure: ValidationFailure) {
        self.failures.write().await.validate = Some(failure);
    }

    pub async fn fail_invalidate(&self, failure: ValidationFailure) {
        self.failures.write().await.invalidate = Some(failure);
    }

    pub async fn fail_ticket_granting_ticket(&self, failure: ValidationFailure) {
        self.failures.write().await.ticket_granting_ticket = Some(failure);
    }

    /// All calls made so far, in order.
    pub async fn calls(&self) -> Vec<TicketCall> {
        self.calls.read().await.clone()
    }

    /// Whether the ticket has been consumed.
    pub async fn is_consumed(&self, ticket_id: &str) -> bool {
        self.tickets
            .lock()
            .await
            .get(ticket_id)
            .map(|(st, _)| st.is_consumed())
            .unwrap_or(false)
    }

    async fn record(&self, call: TicketCall) {
        self.calls.write().await.push(call);
    }

    fn not_found(ticket_id: &str) -> ValidationFailure {
        ValidationFailure::rejected(
            status_codes::REQUESTER,
            format!("mock: no ticket {}", ticket_id),
        )
    }
}

#[async_trait]
impl TicketRegistry for MockTicketRegistry {
    async fn validate_service_ticket(&self, ticket_id: &str) -> ValidationResult<ServiceTicket> {
        self.record(TicketCall::Validate(ticket_id.to_string())).await;
        if let Some(failure) = self.failures.read().await.validate.clone() {
            return Err(failure);
        }
        self.tickets
            .lock()
            .await
            .get(ticket_id)
            .map(|(st, _)| st.clone())
            .ok_or_else(|| Self::not_found(ticket_id))
    }

    async fn invalidate_service_ticket(
        &self,
        ticket_id: &str,
    ) -> ValidationResult<ServiceTicket> {
        self.record(TicketCall::Invalidate(ticket_id.to_string())).await;
        if let Some(failure) = self.failures.read().await.invalidate.clone() {
            return Err(failure);
        }

        let mut tickets = self.tickets.lock().await;
        let (st, _) = tickets
            .get_mut(ticket_id)
            .ok_or_else(|| Self::not_found(ticket_id))?;
        if st.is_consumed() {
            return Err(ValidationFailure::rejected(
                status_codes::REQUESTER,
                format!("mock: ticket {} already consumed", ticket_id),
            ));
        }
        st.consumed = Some(Utc::now());
        Ok(st.clone())
    }

    async fn ticket_granting_ticket(
        &self,
        ticket_id: &str,
    ) -> ValidationResult<TicketGrantingTicket> {
        self.record(TicketCall::TicketGrantingTicket(ticket_id.to_string()))
            .await;
        if let Some(failure) = self.failures.read().await.ticket_granting_ticket.clone() {
            return Err(failure);
        }
        self.tickets
            .lock()
            .await
            .get(ticket_id)
            .map(|(_, tgt)| tgt.clone())
            .ok_or_else(|| Self::not_found(ticket_id))
    }
}
