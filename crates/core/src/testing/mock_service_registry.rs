//! Mock service registry for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::registry::ServiceRegistry;
use crate::validation::{status_codes, ServiceInfo, ValidationFailure, ValidationResult};

/// Mock implementation of the ServiceRegistry trait.
///
/// Accepts every non-empty service URL unless a failure is configured.
/// A missing URL is always reported as a missing parameter.
#[derive(Debug, Clone, Default)]
pub struct MockServiceRegistry {
    /// Service URLs passed to `validate_service`.
    calls: Arc<RwLock<Vec<Option<String>>>>,
    /// If set, every validation fails with this error.
    failure: Arc<RwLock<Option<ValidationFailure>>>,
}

impl MockServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent validation fail.
    pub async fn reject_with(&self, failure: ValidationFailure) {
        *self.failure.write().await = Some(failure);
    }

    /// Clear a configured failure.
    pub async fn accept_all(&self) {
        *self.failure.write().await = None;
    }

    /// All URLs validated so far.
    pub async fn calls(&self) -> Vec<Option<String>> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl ServiceRegistry for MockServiceRegistry {
    async fn validate_service(&self, service_url: Option<&str>) -> ValidationResult<ServiceInfo> {
        self.calls
            .write()
            .await
            .push(service_url.map(String::from));

        let url = match service_url {
            Some(url) if !url.is_empty() => url,
            _ => {
                return Err(ValidationFailure::missing_parameter(
                    status_codes::REQUESTER,
                    "TARGET not supplied",
                ))
            }
        };

        if let Some(failure) = self.failure.read().await.clone() {
            return Err(failure);
        }

        Ok(ServiceInfo {
            name: "mock-service".to_string(),
            url: url.to_string(),
        })
    }
}
