use std::sync::Arc;

use tokio::sync::mpsc;

use super::{TrackingHandle, UsageRecord, UsageStore};

/// Background task that receives usage records and writes them to storage
pub struct TrackingWriter {
    rx: mpsc::Receiver<UsageRecord>,
    store: Arc<dyn UsageStore>,
}

impl TrackingWriter {
    pub fn new(rx: mpsc::Receiver<UsageRecord>, store: Arc<dyn UsageStore>) -> Self {
        Self { rx, store }
    }

    /// Run the writer, consuming records until every handle is dropped.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        tracing::info!("Tracking writer started");

        while let Some(record) = self.rx.recv().await {
            tracing::debug!(
                ticket = %record.ticket_id,
                tgt = %record.tgt_id,
                service = %record.service_url,
                "recording service ticket usage"
            );
            if let Err(e) = self.store.insert(&record) {
                tracing::error!("Failed to write usage record: {}", e);
            }
        }

        tracing::info!("Tracking writer shutting down");
    }
}

/// Create a complete tracking system
///
/// Returns:
/// - `TrackingHandle` - pass to the validator as its `UsageTracker`
/// - `TrackingWriter` - spawn this with `tokio::spawn(writer.run())`
pub fn create_tracking_system(
    store: Arc<dyn UsageStore>,
    buffer_size: usize,
) -> (TrackingHandle, TrackingWriter) {
    let (tx, rx) = mpsc::channel(buffer_size);
    let handle = TrackingHandle::new(tx);
    let writer = TrackingWriter::new(rx, store);
    (handle, writer)
}
