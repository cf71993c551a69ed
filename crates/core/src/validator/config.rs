use std::time::Duration;

/// Lifetime given to an assertion when no usable session max age is configured.
pub const DEFAULT_ASSERTION_LIFETIME: Duration = Duration::from_millis(1000);

/// Attribute forced to the user id when `udc_identifier` is enabled.
pub const UDC_IDENTIFIER_ATTRIBUTE: &str = "UDC_IDENTIFIER";

/// Default assertion issuer.
pub const DEFAULT_ISSUER: &str = "localhost";

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Assertion lifetime. `None` and zero both fall back to
    /// [`DEFAULT_ASSERTION_LIFETIME`].
    pub session_max_age: Option<Duration>,
    /// Force `UDC_IDENTIFIER` to the user id in every success document.
    pub udc_identifier: bool,
    pub issuer: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            session_max_age: None,
            udc_identifier: false,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Lifetime actually applied to assertions.
    pub fn assertion_lifetime(&self) -> Duration {
        match self.session_max_age {
            Some(age) if !age.is_zero() => age,
            _ => DEFAULT_ASSERTION_LIFETIME,
        }
    }
}
