//! Testing utilities and mock implementations of the validator's collaborators.
//!
//! # Example
//!
//! ```rust,ignore
//! use samlvalidate_core::testing::{MockTicketRegistry, TestCollaborators};
//!
//! let mocks = TestCollaborators::new();
//! mocks.tickets.add_ticket("ST-1", "jdoe", "https://app.example.edu").await;
//!
//! let validator = mocks.validator(ValidatorConfig::default());
//! let doc = validator.validate(&request).await;
//! assert!(doc.is_success());
//! ```

mod mock_attribute_resolver;
mod mock_service_registry;
mod mock_ticket_registry;
mod mock_tracker;

use std::sync::Arc;

pub use mock_attribute_resolver::MockAttributeResolver;
pub use mock_service_registry::MockServiceRegistry;
pub use mock_ticket_registry::{MockTicketRegistry, TicketCall};
pub use mock_tracker::{MockTracker, TrackedUsage};

use crate::validator::{SamlValidator, ValidatorConfig};

/// One mock of each collaborator, kept accessible after building a validator.
#[derive(Debug, Clone, Default)]
pub struct TestCollaborators {
    pub services: MockServiceRegistry,
    pub tickets: MockTicketRegistry,
    pub attributes: MockAttributeResolver,
    pub tracker: MockTracker,
}

impl TestCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a validator wired to clones of these mocks.
    pub fn validator(&self, config: ValidatorConfig) -> SamlValidator {
        SamlValidator::new(
            config,
            Arc::new(self.services.clone()),
            Arc::new(self.tickets.clone()),
            Arc::new(self.attributes.clone()),
            Arc::new(self.tracker.clone()),
        )
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    /// A SOAP-wrapped SAML 1.1 validation request for `ticket`.
    pub fn saml_request(request_id: &str, ticket: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
  <SOAP-ENV:Header/>
  <SOAP-ENV:Body>
    <samlp:Request xmlns:samlp="urn:oasis:names:tc:SAML:1.0:protocol" MajorVersion="1" MinorVersion="1" RequestID="{}" IssueInstant="2024-01-15T10:30:00.000Z">
      <samlp:AssertionArtifact>{}</samlp:AssertionArtifact>
    </samlp:Request>
  </SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#,
            request_id, ticket
        )
    }
}
