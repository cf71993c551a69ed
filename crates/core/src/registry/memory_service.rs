//! Service registry backed by a fixed list of services.

use async_trait::async_trait;

use super::ServiceRegistry;
use crate::validation::{status_codes, ServiceInfo, ValidationFailure, ValidationResult};

/// Registry that accepts any URL under a registered service URL.
pub struct MemoryServiceRegistry {
    services: Vec<ServiceInfo>,
}

impl MemoryServiceRegistry {
    pub fn new(services: Vec<ServiceInfo>) -> Self {
        Self { services }
    }

    /// Longest registered URL that covers `service_url`.
    fn find(&self, service_url: &str) -> Option<&ServiceInfo> {
        self.services
            .iter()
            .filter(|s| covers(&s.url, service_url))
            .max_by_key(|s| s.url.len())
    }
}

/// `registered` covers `url` when it is a prefix ending on a URL boundary, so
/// `https://host` never matches `https://host.other` or `https://host@other`.
fn covers(registered: &str, url: &str) -> bool {
    let Some(rest) = url.strip_prefix(registered) else {
        return false;
    };
    registered.ends_with('/')
        || rest.is_empty()
        || rest.starts_with(['/', '?', '#'])
}

#[async_trait]
impl ServiceRegistry for MemoryServiceRegistry {
    async fn validate_service(&self, service_url: Option<&str>) -> ValidationResult<ServiceInfo> {
        let service_url = match service_url.map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => {
                return Err(ValidationFailure::missing_parameter(
                    status_codes::REQUESTER,
                    "service url not supplied",
                ))
            }
        };

        self.find(service_url).cloned().ok_or_else(|| {
            ValidationFailure::rejected(
                status_codes::REQUEST_DENIED,
                format!("Service {} is not registered", service_url),
            )
        })
    }
}
