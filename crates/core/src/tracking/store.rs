use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrackingError;

/// A service ticket validated for a service on behalf of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub ticket_id: String,
    pub tgt_id: String,
    pub user_id: String,
    pub service_url: String,
    pub recorded_at: DateTime<Utc>,
}

/// Storage for usage records.
pub trait UsageStore: Send + Sync {
    fn insert(&self, record: &UsageRecord) -> Result<(), TrackingError>;

    /// All records bound to a ticket-granting ticket, oldest first.
    fn for_session(&self, tgt_id: &str) -> Result<Vec<UsageRecord>, TrackingError>;

    fn count(&self) -> Result<usize, TrackingError>;

    /// Forget every record bound to an ended session. Returns how many were dropped.
    fn purge_session(&self, tgt_id: &str) -> Result<usize, TrackingError>;
}

/// Usage store kept in process memory.
#[derive(Default)]
pub struct MemoryUsageStore {
    records: RwLock<Vec<UsageRecord>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UsageStore for MemoryUsageStore {
    fn insert(&self, record: &UsageRecord) -> Result<(), TrackingError> {
        self.records
            .write()
            .map_err(|e| TrackingError::Store(e.to_string()))?
            .push(record.clone());
        Ok(())
    }

    fn for_session(&self, tgt_id: &str) -> Result<Vec<UsageRecord>, TrackingError> {
        let records = self
            .records
            .read()
            .map_err(|e| TrackingError::Store(e.to_string()))?;
        Ok(records
            .iter()
            .filter(|r| r.tgt_id == tgt_id)
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize, TrackingError> {
        Ok(self
            .records
            .read()
            .map_err(|e| TrackingError::Store(e.to_string()))?
            .len())
    }

    fn purge_session(&self, tgt_id: &str) -> Result<usize, TrackingError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| TrackingError::Store(e.to_string()))?;
        let before = records.len();
        records.retain(|r| r.tgt_id != tgt_id);
        Ok(before - records.len())
    }
}
