//! In-memory ticket registry.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::TicketRegistry;
use crate::validation::{
    status_codes, ServiceTicket, TicketGrantingTicket, ValidationFailure, ValidationResult,
};

#[derive(Debug, Clone)]
struct StoredServiceTicket {
    ticket: ServiceTicket,
    tgt_id: String,
}

#[derive(Default)]
struct Tickets {
    service_tickets: HashMap<String, StoredServiceTicket>,
    ticket_granting_tickets: HashMap<String, TicketGrantingTicket>,
}

/// Outcome of [`MemoryTicketRegistry::purge_expired`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgedTickets {
    pub service_tickets: usize,
    /// Ids of the ticket-granting tickets removed.
    pub sessions: Vec<String>,
}

impl PurgedTickets {
    pub fn total(&self) -> usize {
        self.service_tickets + self.sessions.len()
    }
}

/// Ticket registry holding all tickets in process memory.
///
/// A single lock guards both maps, so invalidation is an atomic
/// check-and-consume.
pub struct MemoryTicketRegistry {
    tickets: Mutex<Tickets>,
    service_ticket_ttl: Duration,
    ticket_granting_ticket_ttl: Duration,
}

impl MemoryTicketRegistry {
    pub fn new(service_ticket_ttl: Duration, ticket_granting_ticket_ttl: Duration) -> Self {
        Self {
            tickets: Mutex::new(Tickets::default()),
            service_ticket_ttl,
            ticket_granting_ticket_ttl,
        }
    }

    fn lock(&self) -> ValidationResult<std::sync::MutexGuard<'_, Tickets>> {
        self.tickets.lock().map_err(|_| {
            ValidationFailure::rejected(status_codes::RESPONDER, "ticket registry lock poisoned")
        })
    }

    /// Start a session for `user_id`.
    pub fn issue_ticket_granting_ticket(
        &self,
        user_id: &str,
    ) -> ValidationResult<TicketGrantingTicket> {
        let issued = Utc::now();
        let tgt = TicketGrantingTicket {
            id: format!("TGT-{}", uuid::Uuid::new_v4().simple()),
            user_id: user_id.to_string(),
            issued,
            expires: Self::deadline(issued, self.ticket_granting_ticket_ttl),
        };
        self.lock()?
            .ticket_granting_tickets
            .insert(tgt.id.clone(), tgt.clone());
        tracing::debug!(tgt = %tgt.id, user = %user_id, "issued ticket granting ticket");
        Ok(tgt)
    }

    /// Issue a service ticket for `service_url` from an existing session.
    pub fn issue_service_ticket(
        &self,
        tgt_id: &str,
        service_url: &str,
    ) -> ValidationResult<ServiceTicket> {
        let mut tickets = self.lock()?;
        if !tickets.ticket_granting_tickets.contains_key(tgt_id) {
            return Err(ValidationFailure::rejected(
                status_codes::REQUESTER,
                format!("ticket granting ticket {} not found", tgt_id),
            ));
        }

        let ticket = ServiceTicket {
            id: format!("ST-{}", uuid::Uuid::new_v4().simple()),
            service_url: service_url.to_string(),
            issued: Utc::now(),
            consumed: None,
        };
        tickets.service_tickets.insert(
            ticket.id.clone(),
            StoredServiceTicket {
                ticket: ticket.clone(),
                tgt_id: tgt_id.to_string(),
            },
        );
        tracing::debug!(ticket = %ticket.id, service = %service_url, "issued service ticket");
        Ok(ticket)
    }

    /// Store a prebuilt ticket pair, replacing any with the same ids.
    pub fn insert(&self, ticket: ServiceTicket, tgt: TicketGrantingTicket) -> ValidationResult<()> {
        let mut tickets = self.lock()?;
        tickets.service_tickets.insert(
            ticket.id.clone(),
            StoredServiceTicket {
                ticket,
                tgt_id: tgt.id.clone(),
            },
        );
        tickets.ticket_granting_tickets.insert(tgt.id.clone(), tgt);
        Ok(())
    }

    /// Drop expired service tickets and sessions.
    pub fn purge_expired(&self) -> ValidationResult<PurgedTickets> {
        let now = Utc::now();
        let mut tickets = self.lock()?;
        let before = tickets.service_tickets.len();

        let st_ttl = self.service_ticket_ttl;
        tickets
            .service_tickets
            .retain(|_, stored| !Self::expired(stored.ticket.issued, st_ttl, now));
        let service_tickets = before - tickets.service_tickets.len();

        let mut sessions = Vec::new();
        tickets.ticket_granting_tickets.retain(|id, tgt| {
            let keep = tgt.expires > now;
            if !keep {
                sessions.push(id.clone());
            }
            keep
        });

        Ok(PurgedTickets {
            service_tickets,
            sessions,
        })
    }

    fn deadline(issued: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
        issued
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn expired(issued: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
        Self::deadline(issued, ttl) <= now
    }

    fn not_recognized(ticket_id: &str) -> ValidationFailure {
        ValidationFailure::rejected(
            status_codes::REQUESTER,
            format!("service ticket {} not found", ticket_id),
        )
    }
}

#[async_trait]
impl TicketRegistry for MemoryTicketRegistry {
    async fn validate_service_ticket(&self, ticket_id: &str) -> ValidationResult<ServiceTicket> {
        let tickets = self.lock()?;
        let stored = tickets
            .service_tickets
            .get(ticket_id)
            .ok_or_else(|| Self::not_recognized(ticket_id))?;

        if Self::expired(stored.ticket.issued, self.service_ticket_ttl, Utc::now()) {
            return Err(ValidationFailure::rejected(
                status_codes::REQUESTER,
                format!("service ticket {} expired", ticket_id),
            ));
        }

        Ok(stored.ticket.clone())
    }

    async fn invalidate_service_ticket(
        &self,
        ticket_id: &str,
    ) -> ValidationResult<ServiceTicket> {
        let mut tickets = self.lock()?;
        let stored = tickets
            .service_tickets
            .get_mut(ticket_id)
            .ok_or_else(|| Self::not_recognized(ticket_id))?;

        if stored.ticket.is_consumed() {
            return Err(ValidationFailure::rejected(
                status_codes::REQUESTER,
                format!("service ticket {} already consumed", ticket_id),
            ));
        }

        stored.ticket.consumed = Some(Utc::now());
        Ok(stored.ticket.clone())
    }

    async fn ticket_granting_ticket(
        &self,
        ticket_id: &str,
    ) -> ValidationResult<TicketGrantingTicket> {
        let tickets = self.lock()?;
        let tgt = tickets
            .service_tickets
            .get(ticket_id)
            .and_then(|stored| tickets.ticket_granting_tickets.get(&stored.tgt_id))
            .ok_or_else(|| {
                ValidationFailure::rejected(
                    status_codes::RESPONDER,
                    format!("no ticket granting ticket bound to {}", ticket_id),
                )
            })?;

        if tgt.expires <= Utc::now() {
            return Err(ValidationFailure::rejected(
                status_codes::RESPONDER,
                format!("ticket granting ticket {} expired", tgt.id),
            ));
        }

        Ok(tgt.clone())
    }
}
