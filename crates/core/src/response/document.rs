//! SAML 1.1 response documents.
//!
//! Rendering is pure: every timestamp and identifier is supplied by the
//! caller, so the same document always renders to the same text.

use chrono::{DateTime, Utc};

use super::xml::{
    escape, timestamp, AUTH_METHOD_UNSPECIFIED, CAS_ATTRIBUTE_NS, CONFIRMATION_ARTIFACT,
    SAMLP_NS, SAML_NS, SOAP_ENV_NS, XSI_NS, XS_NS,
};
use crate::validation::{status_codes, AttributeSet};

/// Content type of every rendered document.
pub const CONTENT_TYPE: &str = "text/xml";

/// Failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDocument {
    pub request_id: Option<String>,
    pub issued: DateTime<Utc>,
    pub response_id: String,
    pub status_code: String,
    pub status_message: String,
}

/// Successful validation with the asserted identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessDocument {
    pub request_id: Option<String>,
    pub response_id: String,
    pub assertion_id: String,
    pub issued: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub issuer: String,
    pub username: String,
    pub service_url: String,
    pub attributes: AttributeSet,
}

/// The single document produced for a validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseDocument {
    Success(SuccessDocument),
    Failure(FailureDocument),
}

impl ResponseDocument {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Success(doc) => doc.request_id.as_deref(),
            Self::Failure(doc) => doc.request_id.as_deref(),
        }
    }

    pub fn response_id(&self) -> &str {
        match self {
            Self::Success(doc) => &doc.response_id,
            Self::Failure(doc) => &doc.response_id,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Success(doc) => doc.render(),
            Self::Failure(doc) => doc.render(),
        }
    }
}

fn in_response_to(request_id: Option<&str>) -> String {
    request_id
        .map(|id| format!(r#" InResponseTo="{}""#, escape(id)))
        .unwrap_or_default()
}

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="{SOAP_ENV_NS}"><SOAP-ENV:Header/><SOAP-ENV:Body>{body}</SOAP-ENV:Body></SOAP-ENV:Envelope>"#
    )
}

impl FailureDocument {
    pub fn render(&self) -> String {
        envelope(&format!(
            concat!(
                r#"<samlp:Response xmlns:samlp="{samlp}" IssueInstant="{issued}" MajorVersion="1" MinorVersion="1" ResponseID="{response_id}"{in_response_to}>"#,
                r#"<samlp:Status><samlp:StatusCode Value="{code}"/><samlp:StatusMessage>{message}</samlp:StatusMessage></samlp:Status>"#,
                r#"</samlp:Response>"#,
            ),
            samlp = SAMLP_NS,
            issued = timestamp(&self.issued),
            response_id = escape(&self.response_id),
            in_response_to = in_response_to(self.request_id.as_deref()),
            code = escape(&self.status_code),
            message = escape(&self.status_message),
        ))
    }
}

impl SuccessDocument {
    fn subject(&self) -> String {
        format!(
            concat!(
                r#"<saml:Subject><saml:NameIdentifier>{}</saml:NameIdentifier>"#,
                r#"<saml:SubjectConfirmation><saml:ConfirmationMethod>{}</saml:ConfirmationMethod></saml:SubjectConfirmation>"#,
                r#"</saml:Subject>"#,
            ),
            escape(&self.username),
            CONFIRMATION_ARTIFACT,
        )
    }

    fn attribute_elements(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, values)| {
                let values: String = values
                    .iter()
                    .map(|v| {
                        format!(
                            r#"<saml:AttributeValue xsi:type="xs:string">{}</saml:AttributeValue>"#,
                            escape(v)
                        )
                    })
                    .collect();
                format!(
                    r#"<saml:Attribute AttributeName="{}" AttributeNamespace="{}">{}</saml:Attribute>"#,
                    escape(name),
                    CAS_ATTRIBUTE_NS,
                    values
                )
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let issued = timestamp(&self.issued);
        let subject = self.subject();
        let service_url = escape(&self.service_url);

        envelope(&format!(
            concat!(
                r#"<samlp:Response xmlns:samlp="{samlp}" xmlns:saml="{saml}" xmlns:xs="{xs}" xmlns:xsi="{xsi}" IssueInstant="{issued}" MajorVersion="1" MinorVersion="1" Recipient="{service_url}" ResponseID="{response_id}"{in_response_to}>"#,
                r#"<samlp:Status><samlp:StatusCode Value="{success}"/></samlp:Status>"#,
                r#"<saml:Assertion AssertionID="{assertion_id}" IssueInstant="{issued}" Issuer="{issuer}" MajorVersion="1" MinorVersion="1">"#,
                r#"<saml:Conditions NotBefore="{issued}" NotOnOrAfter="{expires}"><saml:AudienceRestrictionCondition><saml:Audience>{service_url}</saml:Audience></saml:AudienceRestrictionCondition></saml:Conditions>"#,
                r#"<saml:AttributeStatement>{subject}{attributes}</saml:AttributeStatement>"#,
                r#"<saml:AuthenticationStatement AuthenticationInstant="{issued}" AuthenticationMethod="{auth_method}">{subject}</saml:AuthenticationStatement>"#,
                r#"</saml:Assertion></samlp:Response>"#,
            ),
            samlp = SAMLP_NS,
            saml = SAML_NS,
            xs = XS_NS,
            xsi = XSI_NS,
            issued = issued,
            service_url = service_url,
            response_id = escape(&self.response_id),
            in_response_to = in_response_to(self.request_id.as_deref()),
            success = status_codes::SUCCESS,
            assertion_id = escape(&self.assertion_id),
            issuer = escape(&self.issuer),
            expires = timestamp(&self.expires),
            subject = subject,
            attributes = self.attribute_elements(),
            auth_method = AUTH_METHOD_UNSPECIFIED,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn success() -> SuccessDocument {
        let mut attributes = AttributeSet::new();
        attributes.insert(
            "memberOf".to_string(),
            vec!["staff".to_string(), "r&d".to_string()],
        );
        attributes.insert("email".to_string(), vec!["jdoe@example.edu".to_string()]);

        SuccessDocument {
            request_id: Some("_req-1".to_string()),
            response_id: "resp123".to_string(),
            assertion_id: "assert456".to_string(),
            issued: issued(),
            expires: issued() + Duration::seconds(30),
            issuer: "cas.example.edu".to_string(),
            username: "jdoe".to_string(),
            service_url: "https://app.example.edu/?a=1&b=2".to_string(),
            attributes,
        }
    }

    fn failure() -> FailureDocument {
        FailureDocument {
            request_id: Some("_req-2".to_string()),
            issued: issued(),
            response_id: "resp789".to_string(),
            status_code: status_codes::REQUESTER.to_string(),
            status_message: "Ticket ST-<1> was not recognized".to_string(),
        }
    }

    #[test]
    fn test_success_document_fields() {
        let xml = success().render();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"ResponseID="resp123""#));
        assert!(xml.contains(r#"InResponseTo="_req-1""#));
        assert!(xml.contains(r#"AssertionID="assert456""#));
        assert!(xml.contains(r#"Issuer="cas.example.edu""#));
        assert!(xml.contains(r#"<samlp:StatusCode Value="samlp:Success"/>"#));
        assert!(xml.contains(r#"IssueInstant="2024-01-15T10:30:00.000Z""#));
        assert!(xml.contains(r#"NotOnOrAfter="2024-01-15T10:30:30.000Z""#));
        assert!(xml.contains("<saml:NameIdentifier>jdoe</saml:NameIdentifier>"));
        assert!(xml.contains(r#"Recipient="https://app.example.edu/?a=1&amp;b=2""#));
        assert!(xml.contains(
            "<saml:Audience>https://app.example.edu/?a=1&amp;b=2</saml:Audience>"
        ));
    }

    #[test]
    fn test_success_attributes_rendered_in_name_order() {
        let xml = success().render();

        let email = xml.find(r#"AttributeName="email""#).unwrap();
        let member = xml.find(r#"AttributeName="memberOf""#).unwrap();
        assert!(email < member);
        assert!(xml.contains(">staff</saml:AttributeValue>"));
        assert!(xml.contains(">r&amp;d</saml:AttributeValue>"));
    }

    #[test]
    fn test_success_without_attributes_or_request_id() {
        let mut doc = success();
        doc.attributes.clear();
        doc.request_id = None;
        let xml = doc.render();

        assert!(!xml.contains("<saml:Attribute "));
        assert!(!xml.contains("InResponseTo"));
        assert!(xml.contains("<saml:AttributeStatement><saml:Subject>"));
    }

    #[test]
    fn test_failure_document_fields() {
        let xml = failure().render();

        assert!(xml.contains(r#"ResponseID="resp789""#));
        assert!(xml.contains(r#"InResponseTo="_req-2""#));
        assert!(xml.contains(r#"<samlp:StatusCode Value="samlp:Requester"/>"#));
        assert!(xml.contains(
            "<samlp:StatusMessage>Ticket ST-&lt;1&gt; was not recognized</samlp:StatusMessage>"
        ));
        assert!(!xml.contains("Assertion"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(success().render(), success().render());
        assert_eq!(failure().render(), failure().render());
    }

    #[test]
    fn test_response_document_accessors() {
        let doc = ResponseDocument::Success(success());
        assert!(doc.is_success());
        assert_eq!(doc.response_id(), "resp123");
        assert_eq!(doc.request_id(), Some("_req-1"));

        let doc = ResponseDocument::Failure(failure());
        assert!(!doc.is_success());
        assert_eq!(doc.render(), failure().render());
    }
}
