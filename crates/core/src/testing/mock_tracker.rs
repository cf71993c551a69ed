//! Mock usage tracker for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::tracking::{TrackingError, UsageTracker};
use crate::validation::{ServiceTicket, TicketGrantingTicket};

/// A recorded `track_usage` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedUsage {
    pub ticket_id: String,
    pub user_id: String,
    pub service_url: String,
}

/// Mock implementation of the UsageTracker trait.
#[derive(Debug, Clone, Default)]
pub struct MockTracker {
    tracked: Arc<RwLock<Vec<TrackedUsage>>>,
    failing: Arc<RwLock<bool>>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail after recording it.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn tracked(&self) -> Vec<TrackedUsage> {
        self.tracked.read().await.clone()
    }
}

#[async_trait]
impl UsageTracker for MockTracker {
    async fn track_usage(
        &self,
        ticket: &ServiceTicket,
        tgt: &TicketGrantingTicket,
        service_url: &str,
    ) -> Result<(), TrackingError> {
        self.tracked.write().await.push(TrackedUsage {
            ticket_id: ticket.id.clone(),
            user_id: tgt.user_id.clone(),
            service_url: service_url.to_string(),
        });
        if *self.failing.read().await {
            return Err(TrackingError::Store("mock failure".to_string()));
        }
        Ok(())
    }
}
