//! SAML 1.1 service ticket validation endpoint.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use samlvalidate_core::{parse_validation_payload, ValidationRequest, CONTENT_TYPE};

use crate::state::AppState;

/// Media types accepted for the request body.
const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["application/xml", "text/xml"];

/// Query parameters for `/samlValidate`
#[derive(Debug, Deserialize)]
pub struct SamlValidateParams {
    /// URL of the service the ticket was issued for.
    #[serde(rename = "TARGET")]
    pub target: Option<String>,
}

/// True if the request declares an XML body. Parameters such as `charset` are ignored.
fn is_xml_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|media_type| {
            let media_type = media_type.trim();
            ACCEPTED_CONTENT_TYPES
                .iter()
                .any(|accepted| media_type.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Validate the service ticket carried in a SAML request.
///
/// Every validation outcome, success or failure, is a 200 with a SOAP
/// document. Only transport problems produce other statuses.
pub async fn saml_validate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SamlValidateParams>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !is_xml_body(&headers) {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    let payload = match parse_validation_payload(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting unparseable validation request");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let mut request = ValidationRequest::new(params.target, payload.ticket);
    if let Some(id) = payload.id {
        request = request.with_request_id(id);
    }

    let document = state.validator().validate(&request).await;
    let rendered = document.render();
    tracing::debug!(
        ticket = %request.ticket,
        success = document.is_success(),
        body = %rendered,
        "validation response"
    );

    ([(header::CONTENT_TYPE, CONTENT_TYPE)], rendered).into_response()
}
