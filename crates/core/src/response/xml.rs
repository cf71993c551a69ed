//! SAML 1.1 namespaces, URIs and text escaping.

use chrono::{DateTime, SecondsFormat, Utc};

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SAML 1.0 protocol namespace (shared by SAML 1.1).
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:1.0:protocol";

/// SAML 1.0 assertion namespace (shared by SAML 1.1).
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:1.0:assertion";

/// XML Schema namespace.
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace CAS attributes are released under.
pub const CAS_ATTRIBUTE_NS: &str = "http://www.ja-sig.org/products/cas/";

/// Subject confirmation method for artifact-based validation.
pub const CONFIRMATION_ARTIFACT: &str = "urn:oasis:names:tc:SAML:1.0:cm:artifact";

/// Authentication method recorded in the authentication statement.
pub const AUTH_METHOD_UNSPECIFIED: &str = "urn:oasis:names:tc:SAML:1.0:am:unspecified";

/// Escapes XML special characters for text and attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// ISO-8601 UTC timestamp with millisecond precision.
pub fn timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}
