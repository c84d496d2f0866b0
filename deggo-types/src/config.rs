//! Provider configuration and validation.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ProviderId;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

const TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 1_000..=120_000;
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Which provider platform to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Sandbox,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            _ => Err(format!(
                "environment must be 'production' or 'sandbox', got '{}'",
                s
            )),
        }
    }
}

/// Credentials and transport settings for one provider.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Partner account msisdn, also used as the default balance account
    pub api_key: String,
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
    /// Transaction PIN; required for sending money
    pub pin_code: Option<Zeroizing<String>>,
    pub environment: Environment,
    pub timeout_ms: u64,
    /// Accepted and validated; no retries are performed
    pub retry_attempts: u32,
    pub webhook_url: Option<String>,
    /// Overrides the environment's base URL
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(
        api_key: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client_id: client_id.into(),
            client_secret: Zeroizing::new(client_secret.into()),
            pin_code: None,
            environment: Environment::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            webhook_url: None,
            base_url: None,
        }
    }

    pub fn with_pin_code(mut self, pin_code: impl Into<String>) -> Self {
        self.pin_code = Some(Zeroizing::new(pin_code.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// True when everything needed to obtain a token is present.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("pin_code", &self.pin_code.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("timeout_ms", &self.timeout_ms)
            .field("retry_attempts", &self.retry_attempts)
            .field("webhook_url", &self.webhook_url)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for every provider Deggo should talk to.
#[derive(Debug, Clone, Default)]
pub struct DeggoConfig {
    pub providers: BTreeMap<ProviderId, ProviderConfig>,
}

impl DeggoConfig {
    pub fn with_provider(mut self, id: ProviderId, config: ProviderConfig) -> Self {
        self.providers.insert(id, config);
        self
    }

    /// Returns every configuration problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.providers.values().any(|p| !p.api_key.is_empty()) {
            errors.push("At least one payment provider must be configured with API key".to_string());
        }

        for (id, provider) in &self.providers {
            if provider.api_key.is_empty() {
                errors.push(format!("{} provider requires apiKey", id));
            }

            if !TIMEOUT_RANGE_MS.contains(&provider.timeout_ms) {
                errors.push(format!(
                    "{} timeout must be between 1000 and 120000 milliseconds",
                    id
                ));
            }

            if provider.retry_attempts > MAX_RETRY_ATTEMPTS {
                errors.push(format!("{} retryAttempts must be between 0 and 10", id));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orange() -> ProviderConfig {
        ProviderConfig::new("221771234567", "client-id", "client-secret")
    }

    #[test]
    fn test_defaults() {
        let config = orange();
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_attempts, 3);
        assert!(config.has_credentials());
    }

    #[test]
    fn test_empty_config_is_invalid() {
        let errors = DeggoConfig::default().validate();
        assert_eq!(
            errors,
            ["At least one payment provider must be configured with API key"]
        );
    }

    #[test]
    fn test_out_of_range_values_reported_together() {
        let mut provider = orange();
        provider.timeout_ms = 500;
        provider.retry_attempts = 11;
        let config = DeggoConfig::default().with_provider(ProviderId::Orange, provider);

        let errors = config.validate();

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("timeout"));
        assert!(errors[1].contains("retryAttempts"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = orange().with_pin_code("9876");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("client-secret"));
        assert!(!debug.contains("9876"));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }
}
