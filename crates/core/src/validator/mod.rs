//! Service ticket validation pipeline.

mod attributes;
mod config;
mod runner;

pub use attributes::{resolve_attributes_or_empty, BestEffort};
pub use config::{
    ValidatorConfig, DEFAULT_ASSERTION_LIFETIME, DEFAULT_ISSUER, UDC_IDENTIFIER_ATTRIBUTE,
};
pub use runner::SamlValidator;
