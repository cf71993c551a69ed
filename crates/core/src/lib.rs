pub mod config;
pub mod metrics;
pub mod registry;
pub mod request;
pub mod response;
pub mod testing;
pub mod tracking;
pub mod validation;
pub mod validator;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SamlConfig,
    ServerConfig, ServiceConfig, TicketsConfig, TrackingConfig, MAX_TICKET_TTL_MS,
};
pub use registry::{
    AttributeError, AttributeResolver, MemoryServiceRegistry, MemoryTicketRegistry,
    PurgedTickets, ServiceRegistry, StaticAttributeResolver, TicketRegistry,
};
pub use request::{parse_validation_payload, RequestError, ValidationPayload};
pub use response::{ResponseDocument, CONTENT_TYPE};
pub use tracking::{
    create_tracking_system, MemoryUsageStore, TrackingError, TrackingHandle, TrackingWriter,
    UsageRecord, UsageStore, UsageTracker,
};
pub use validation::{
    status_codes, AttributeSet, ServiceInfo, ServiceTicket, TicketGrantingTicket,
    ValidationError, ValidationFailure, ValidationRequest, ValidationResult,
};
pub use validator::{SamlValidator, ValidatorConfig};
