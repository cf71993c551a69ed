//! The ticket validation pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::attributes::resolve_attributes_or_empty;
use super::config::{ValidatorConfig, UDC_IDENTIFIER_ATTRIBUTE};
use crate::metrics::{ATTRIBUTE_RESOLUTION_FAILURES, TRACKING_FAILURES, VALIDATIONS_TOTAL};
use crate::registry::{AttributeResolver, ServiceRegistry, TicketRegistry};
use crate::response::{FailureDocument, ResponseDocument, SuccessDocument};
use crate::tracking::UsageTracker;
use crate::validation::{status_codes, ValidationError, ValidationRequest};

/// Fresh identifier for a response or assertion.
fn new_id() -> String {
    format!("_{}", uuid::Uuid::new_v4().simple())
}

/// Validates service tickets against the injected collaborators.
///
/// Holds no per-request state; share one instance across all requests.
pub struct SamlValidator {
    config: ValidatorConfig,
    services: Arc<dyn ServiceRegistry>,
    tickets: Arc<dyn TicketRegistry>,
    attributes: Arc<dyn AttributeResolver>,
    tracker: Arc<dyn UsageTracker>,
}

impl SamlValidator {
    pub fn new(
        config: ValidatorConfig,
        services: Arc<dyn ServiceRegistry>,
        tickets: Arc<dyn TicketRegistry>,
        attributes: Arc<dyn AttributeResolver>,
        tracker: Arc<dyn UsageTracker>,
    ) -> Self {
        Self {
            config,
            services,
            tickets,
            attributes,
            tracker,
        }
    }

    /// Validate one request at the current time.
    pub async fn validate(&self, request: &ValidationRequest) -> ResponseDocument {
        self.validate_at(request, Utc::now()).await
    }

    /// Validate one request, stamping the document with `now`.
    ///
    /// Always returns exactly one document: a success if every terminal
    /// stage passed, otherwise a failure describing the first stage that
    /// did not.
    pub async fn validate_at(
        &self,
        request: &ValidationRequest,
        now: DateTime<Utc>,
    ) -> ResponseDocument {
        match self.run(request, now).await {
            Ok(document) => {
                VALIDATIONS_TOTAL
                    .with_label_values(&["success", "complete"])
                    .inc();
                tracing::info!(
                    ticket = %request.ticket,
                    user = %document.username,
                    service = %document.service_url,
                    "service ticket validated"
                );
                ResponseDocument::Success(document)
            }
            Err(err) => {
                let stage = err.stage().map(|s| s.as_str()).unwrap_or("unknown");
                VALIDATIONS_TOTAL
                    .with_label_values(&["failure", stage])
                    .inc();
                tracing::error!(ticket = %request.ticket, stage, "{}", err);
                tracing::debug!(error = ?err, "validation failure detail");
                ResponseDocument::Failure(self.failure_document(request, &err, now))
            }
        }
    }

    fn failure_document(
        &self,
        request: &ValidationRequest,
        err: &ValidationError,
        now: DateTime<Utc>,
    ) -> FailureDocument {
        FailureDocument {
            request_id: request.request_id.clone(),
            issued: now,
            response_id: new_id(),
            status_code: err
                .status_code()
                .unwrap_or(status_codes::RESPONDER)
                .to_string(),
            status_message: err.status_message().unwrap_or_default(),
        }
    }

    async fn run(
        &self,
        request: &ValidationRequest,
        now: DateTime<Utc>,
    ) -> Result<SuccessDocument, ValidationError> {
        let service_url = request.service_url.as_deref();
        let ticket_id = request.ticket.as_str();

        self.services
            .validate_service(service_url)
            .await
            .map_err(ValidationError::ServiceValidation)?;

        self.tickets
            .validate_service_ticket(ticket_id)
            .await
            .map_err(|failure| ValidationError::TicketNotRecognized {
                ticket: ticket_id.to_string(),
                failure,
            })?;

        let ticket = self
            .tickets
            .invalidate_service_ticket(ticket_id)
            .await
            .map_err(|failure| ValidationError::TicketInvalidation {
                ticket: ticket_id.to_string(),
                failure,
            })?;

        let tgt = self
            .tickets
            .ticket_granting_ticket(ticket_id)
            .await
            .map_err(|failure| ValidationError::IdentityResolution {
                ticket: ticket_id.to_string(),
                failure,
            })?;

        // The service registry rejects a missing URL, so this is always set here.
        let service_url = service_url.unwrap_or_default();

        if let Err(e) = self.tracker.track_usage(&ticket, &tgt, service_url).await {
            TRACKING_FAILURES.inc();
            tracing::warn!(ticket = %ticket_id, "{}", ValidationError::from(e));
        }

        let resolved = resolve_attributes_or_empty(self.attributes.as_ref(), &tgt.user_id).await;
        if let Some(err) = &resolved.recovered {
            ATTRIBUTE_RESOLUTION_FAILURES.inc();
            tracing::error!(user = %tgt.user_id, resolver = self.attributes.name(), "{}", err);
            tracing::debug!(error = ?err, "attribute resolution failure detail");
        } else {
            tracing::debug!(user = %tgt.user_id, attributes = ?resolved.value, "retrieved attributes");
        }

        let mut attributes = resolved.value;
        if self.config.udc_identifier {
            attributes.insert(
                UDC_IDENTIFIER_ATTRIBUTE.to_string(),
                vec![tgt.user_id.clone()],
            );
        }

        let expires = chrono::Duration::from_std(self.config.assertion_lifetime())
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Ok(SuccessDocument {
            request_id: request.request_id.clone(),
            response_id: new_id(),
            assertion_id: new_id(),
            issued: now,
            expires,
            issuer: self.config.issuer.clone(),
            username: tgt.user_id,
            service_url: service_url.to_string(),
            attributes,
        })
    }
}
