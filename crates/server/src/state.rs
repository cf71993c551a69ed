use std::sync::Arc;

use anyhow::{anyhow, Result};
use samlvalidate_core::{
    create_tracking_system, Config, MemoryServiceRegistry, MemoryTicketRegistry, PurgedTickets,
    SamlValidator, ServiceInfo, StaticAttributeResolver, TrackingWriter, UsageStore,
};

/// Shared application state
pub struct AppState {
    validator: SamlValidator,
    tickets: Arc<MemoryTicketRegistry>,
    usage: Arc<dyn UsageStore>,
}

impl AppState {
    pub fn new(
        validator: SamlValidator,
        tickets: Arc<MemoryTicketRegistry>,
        usage: Arc<dyn UsageStore>,
    ) -> Self {
        Self {
            validator,
            tickets,
            usage,
        }
    }

    /// Wire the in-memory collaborators described by `config`.
    ///
    /// The returned writer must be spawned; it drains usage records into
    /// `usage_store` until every clone of the state is dropped.
    pub fn from_config(config: &Config, usage_store: Arc<dyn UsageStore>) -> (Self, TrackingWriter) {
        let services = MemoryServiceRegistry::new(
            config.services.iter().map(ServiceInfo::from).collect(),
        );
        let tickets = Arc::new(MemoryTicketRegistry::new(
            config.tickets.service_ticket_ttl(),
            config.tickets.ticket_granting_ticket_ttl(),
        ));
        let attributes = StaticAttributeResolver::new(config.attributes.clone());
        let (tracking_handle, tracking_writer) =
            create_tracking_system(Arc::clone(&usage_store), config.tracking.buffer_size);

        let validator = SamlValidator::new(
            config.saml.validator_config(),
            Arc::new(services),
            tickets.clone(),
            Arc::new(attributes),
            Arc::new(tracking_handle),
        );

        (Self::new(validator, tickets, usage_store), tracking_writer)
    }

    pub fn validator(&self) -> &SamlValidator {
        &self.validator
    }

    pub fn tickets(&self) -> &Arc<MemoryTicketRegistry> {
        &self.tickets
    }

    /// Purger sharing this state's ticket registry and usage store.
    ///
    /// Holds no tracking handle, so it does not keep the tracking writer alive.
    pub fn purger(&self) -> ExpiryPurger {
        ExpiryPurger {
            tickets: Arc::clone(&self.tickets),
            usage: Arc::clone(&self.usage),
        }
    }
}

/// Outcome of one purge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub tickets: PurgedTickets,
    pub usage_records: usize,
}

/// Drops expired tickets and the usage records of the sessions that ended.
#[derive(Clone)]
pub struct ExpiryPurger {
    tickets: Arc<MemoryTicketRegistry>,
    usage: Arc<dyn UsageStore>,
}

impl ExpiryPurger {
    pub fn purge(&self) -> Result<PurgeSummary> {
        let tickets = self
            .tickets
            .purge_expired()
            .map_err(|e| anyhow!("ticket purge failed: {}", e))?;

        let mut usage_records = 0;
        for tgt_id in &tickets.sessions {
            usage_records += self.usage.purge_session(tgt_id)?;
        }

        Ok(PurgeSummary {
            tickets,
            usage_records,
        })
    }
}
