//! SAML 1.1 validation request payload.
//!
//! Relying services POST a SOAP envelope wrapping a `samlp:Request`:
//!
//! ```xml
//! <SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
//!   <SOAP-ENV:Body>
//!     <samlp:Request xmlns:samlp="urn:oasis:names:tc:SAML:1.0:protocol"
//!         MajorVersion="1" MinorVersion="1" RequestID="_192.168.16.51.1024506224022">
//!       <samlp:AssertionArtifact>ST-1-abc</samlp:AssertionArtifact>
//!     </samlp:Request>
//!   </SOAP-ENV:Body>
//! </SOAP-ENV:Envelope>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Malformed XML at position {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("Request contains no AssertionArtifact")]
    MissingArtifact,
}

/// Fields extracted from a validation request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPayload {
    /// `RequestID` of the `Request` element.
    pub id: Option<String>,
    /// Text of the `AssertionArtifact` element: the service ticket id.
    pub ticket: String,
}

fn request_id(element: &BytesStart<'_>) -> Result<Option<String>, quick_xml::Error> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"RequestID" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse a validation request body. Namespace prefixes are ignored.
pub fn parse_validation_payload(body: &str) -> Result<ValidationPayload, RequestError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let malformed = |reader: &Reader<&[u8]>, e: quick_xml::Error| RequestError::Malformed {
        position: reader.buffer_position(),
        message: e.to_string(),
    };

    let mut id = None;
    let mut ticket: Option<String> = None;
    let mut in_artifact = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Request" => id = request_id(&e).map_err(|err| malformed(&reader, err))?,
                b"AssertionArtifact" => in_artifact = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"Request" => {
                id = request_id(&e).map_err(|err| malformed(&reader, err))?;
            }
            Ok(Event::Text(t)) if in_artifact => {
                let text = t.unescape().map_err(|err| malformed(&reader, err))?;
                ticket.get_or_insert_with(String::new).push_str(&text);
            }
            Ok(Event::CData(c)) if in_artifact => {
                let raw = c.into_inner();
                ticket
                    .get_or_insert_with(String::new)
                    .push_str(&String::from_utf8_lossy(&raw));
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"AssertionArtifact" => {
                in_artifact = false;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(&reader, e)),
        }
    }

    let ticket = ticket
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(RequestError::MissingArtifact)?;

    Ok(ValidationPayload { id, ticket })
}
