//! Response document builder.

mod document;
pub mod xml;

pub use document::{FailureDocument, ResponseDocument, SuccessDocument, CONTENT_TYPE};
