use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `SAMLVALIDATE_SERVER__PORT=9100`.
///
/// `__` separates nesting levels, so `SAMLVALIDATE_TICKETS__SERVICE_TICKET_TTL_MS`
/// sets `tickets.service_ticket_ttl_ms`.
pub const ENV_PREFIX: &str = "SAMLVALIDATE_";

/// Layered sources: the TOML file first, then `SAMLVALIDATE_*` variables on top.
fn sources(path: &Path) -> Figment {
    Figment::from(Toml::file(path)).merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from `path`, applying environment overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    sources(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Parse configuration from TOML text alone. Environment overrides are not applied.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
