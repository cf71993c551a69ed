use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use crate::validation::{AttributeSet, ServiceInfo};
use crate::validator::{ValidatorConfig, DEFAULT_ISSUER};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub saml: SamlConfig,
    #[serde(default)]
    pub tickets: TicketsConfig,
    /// Relying services allowed to validate tickets.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
    /// Static attributes released per user id.
    #[serde(default)]
    pub attributes: HashMap<String, AttributeSet>,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    9000
}

/// SAML validation behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SamlConfig {
    /// Assertion lifetime in milliseconds. Unset or 0 means 1000 ms.
    #[serde(default)]
    pub session_max_age_ms: Option<u64>,
    /// Always release `UDC_IDENTIFIER` set to the user id.
    #[serde(default)]
    pub udc_identifier: bool,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for SamlConfig {
    fn default() -> Self {
        Self {
            session_max_age_ms: None,
            udc_identifier: false,
            issuer: default_issuer(),
        }
    }
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

impl SamlConfig {
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            session_max_age: self.session_max_age_ms.map(Duration::from_millis),
            udc_identifier: self.udc_identifier,
            issuer: self.issuer.clone(),
        }
    }
}

/// Ticket lifetimes for the in-memory ticket registry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketsConfig {
    #[serde(default = "default_ticket_ttl_ms")]
    pub service_ticket_ttl_ms: u64,
    #[serde(default = "default_ticket_ttl_ms")]
    pub ticket_granting_ticket_ttl_ms: u64,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            service_ticket_ttl_ms: default_ticket_ttl_ms(),
            ticket_granting_ticket_ttl_ms: default_ticket_ttl_ms(),
        }
    }
}

fn default_ticket_ttl_ms() -> u64 {
    60 * 1000
}

/// Longest ticket lifetime accepted by `validate_config` (one year).
pub const MAX_TICKET_TTL_MS: u64 = 365 * 24 * 60 * 60 * 1000;

const MIN_PURGE_INTERVAL: Duration = Duration::from_secs(1);
const MAX_PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

impl TicketsConfig {
    pub fn service_ticket_ttl(&self) -> chrono::Duration {
        millis(self.service_ticket_ttl_ms)
    }

    pub fn ticket_granting_ticket_ttl(&self) -> chrono::Duration {
        millis(self.ticket_granting_ticket_ttl_ms)
    }

    /// Period of the expiry sweep: one service ticket lifetime, kept within 1 s and 5 min.
    pub fn purge_interval(&self) -> Duration {
        Duration::from_millis(self.service_ticket_ttl_ms)
            .clamp(MIN_PURGE_INTERVAL, MAX_PURGE_INTERVAL)
    }
}

fn millis(ms: u64) -> chrono::Duration {
    chrono::Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

/// A registered relying service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    /// URL prefix the service's `TARGET` must start with.
    pub url: String,
}

impl From<&ServiceConfig> for ServiceInfo {
    fn from(service: &ServiceConfig) -> Self {
        Self {
            name: service.name.clone(),
            url: service.url.clone(),
        }
    }
}

/// Usage tracking channel
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackingConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    1000
}
