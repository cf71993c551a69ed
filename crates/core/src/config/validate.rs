use super::{types::Config, ConfigError, MAX_TICKET_TTL_MS};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Ticket lifetimes are within 1 ms and one year
/// - Tracking buffer is not 0
/// - At least one service is registered, each with a `scheme://host` URL
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.tickets.service_ticket_ttl_ms == 0
        || config.tickets.ticket_granting_ticket_ttl_ms == 0
    {
        return Err(ConfigError::ValidationError(
            "ticket lifetimes must be greater than 0".to_string(),
        ));
    }

    if config.tickets.service_ticket_ttl_ms > MAX_TICKET_TTL_MS
        || config.tickets.ticket_granting_ticket_ttl_ms > MAX_TICKET_TTL_MS
    {
        return Err(ConfigError::ValidationError(format!(
            "ticket lifetimes cannot exceed {} ms",
            MAX_TICKET_TTL_MS
        )));
    }

    if config.tracking.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "tracking.buffer_size cannot be 0".to_string(),
        ));
    }

    if config.services.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one [[services]] entry is required".to_string(),
        ));
    }

    if let Some(service) = config.services.iter().find(|s| s.url.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "service '{}' has an empty url",
            service.name
        )));
    }

    if let Some(service) = config.services.iter().find(|s| !has_scheme_and_host(&s.url)) {
        return Err(ConfigError::ValidationError(format!(
            "service '{}' url '{}' must start with scheme://host",
            service.name, service.url
        )));
    }

    Ok(())
}

fn has_scheme_and_host(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !authority.is_empty()
        && !authority.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    fn valid_config() -> Config {
        let mut config: Config = toml::from_str("").unwrap();
        config.services.push(ServiceConfig {
            name: "app".to_string(),
            url: "https://app.example.edu/".to_string(),
        });
        config
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_ttl_fails() {
        let mut config = valid_config();
        config.tickets.service_ticket_ttl_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_buffer_fails() {
        let mut config = valid_config();
        config.tracking.buffer_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_requires_services() {
        let mut config = valid_config();
        config.services.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_service_url_fails() {
        let mut config = valid_config();
        config.services.push(ServiceConfig {
            name: "blank".to_string(),
            url: "  ".to_string(),
        });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn test_validate_service_url_needs_host() {
        for url in ["portal.example.edu", "https://", "https:///path", "://portal.example.edu/"] {
            let mut config = valid_config();
            config.services[0].url = url.to_string();
            assert!(validate_config(&config).is_err(), "accepted {}", url);
        }
    }

    #[test]
    fn test_validate_service_url_with_userinfo_fails() {
        let mut config = valid_config();
        config.services[0].url = "https://portal.example.edu@attacker.example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_service_url_shapes_accepted() {
        for url in [
            "https://portal.example.edu",
            "https://portal.example.edu:8443/cas/",
            "http://localhost/app?x=1",
        ] {
            let mut config = valid_config();
            config.services[0].url = url.to_string();
            assert!(validate_config(&config).is_ok(), "rejected {}", url);
        }
    }

    #[test]
    fn test_validate_ttl_above_one_year_fails() {
        let mut config = valid_config();
        config.tickets.ticket_granting_ticket_ttl_ms = u64::MAX;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));

        config.tickets.ticket_granting_ticket_ttl_ms = MAX_TICKET_TTL_MS;
        assert!(validate_config(&config).is_ok());
    }
}
