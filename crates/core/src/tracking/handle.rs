use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;

use super::UsageRecord;
use crate::validation::{ServiceTicket, TicketGrantingTicket};

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Tracking channel full")]
    ChannelFull,

    #[error("Tracking channel closed")]
    ChannelClosed,

    #[error("Tracking store error: {0}")]
    Store(String),
}

/// Records which services a session's tickets were validated for.
///
/// Errors are reported to the caller but never gate a validation.
#[async_trait]
pub trait UsageTracker: Send + Sync {
    async fn track_usage(
        &self,
        ticket: &ServiceTicket,
        tgt: &TicketGrantingTicket,
        service_url: &str,
    ) -> Result<(), TrackingError>;
}

/// Handle for emitting usage records.
///
/// Cheaply cloneable. Records go through a bounded channel to the
/// [`TrackingWriter`](super::TrackingWriter); sending never waits.
#[derive(Clone)]
pub struct TrackingHandle {
    tx: mpsc::Sender<UsageRecord>,
}

impl TrackingHandle {
    pub fn new(tx: mpsc::Sender<UsageRecord>) -> Self {
        Self { tx }
    }

    /// Queue a record without blocking.
    pub fn try_emit(&self, record: UsageRecord) -> Result<(), TrackingError> {
        self.tx.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TrackingError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => TrackingError::ChannelClosed,
        })
    }
}

#[async_trait]
impl UsageTracker for TrackingHandle {
    async fn track_usage(
        &self,
        ticket: &ServiceTicket,
        tgt: &TicketGrantingTicket,
        service_url: &str,
    ) -> Result<(), TrackingError> {
        self.try_emit(UsageRecord {
            ticket_id: ticket.id.clone(),
            tgt_id: tgt.id.clone(),
            user_id: tgt.user_id.clone(),
            service_url: service_url.to_string(),
            recorded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket_pair() -> (ServiceTicket, TicketGrantingTicket) {
        let now = Utc::now();
        (
            ServiceTicket {
                id: "ST-1".to_string(),
                service_url: "https://app".to_string(),
                issued: now,
                consumed: Some(now),
            },
            TicketGrantingTicket {
                id: "TGT-1".to_string(),
                user_id: "jdoe".to_string(),
                issued: now,
                expires: now,
            },
        )
    }

    #[tokio::test]
    async fn test_track_usage_sends_record() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = TrackingHandle::new(tx);
        let (st, tgt) = ticket_pair();

        handle.track_usage(&st, &tgt, "https://app").await.unwrap();

        let record = rx.recv().await.expect("Should receive record");
        assert_eq!(record.ticket_id, "ST-1");
        assert_eq!(record.tgt_id, "TGT-1");
        assert_eq!(record.user_id, "jdoe");
        assert_eq!(record.service_url, "https://app");
    }

    #[tokio::test]
    async fn test_full_channel_does_not_block() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = TrackingHandle::new(tx);
        let (st, tgt) = ticket_pair();

        handle.track_usage(&st, &tgt, "https://app").await.unwrap();
        let result = handle.track_usage(&st, &tgt, "https://app").await;
        assert!(matches!(result, Err(TrackingError::ChannelFull)));
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = TrackingHandle::new(tx);
        let (st, tgt) = ticket_pair();

        let result = handle.track_usage(&st, &tgt, "https://app").await;
        assert!(matches!(result, Err(TrackingError::ChannelClosed)));
    }
}
