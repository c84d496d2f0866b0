//! Configuration loading from environment.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use deggo_types::{DeggoConfig, Environment, ProviderConfig, ProviderId};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,deggo_hex=debug,deggo_orange=debug";

/// Application configuration.
pub struct Config {
    pub deggo: DeggoConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from any key lookup.
    ///
    /// Orange Money is configured only when `ORANGE_API_KEY` is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut deggo = DeggoConfig::default();

        if let Some(api_key) = lookup("ORANGE_API_KEY").filter(|k| !k.is_empty()) {
            let mut orange = ProviderConfig::new(
                api_key,
                lookup("ORANGE_CLIENT_ID").unwrap_or_default(),
                lookup("ORANGE_CLIENT_SECRET").unwrap_or_default(),
            );

            if let Some(pin) = lookup("ORANGE_PIN_CODE").filter(|p| !p.is_empty()) {
                orange = orange.with_pin_code(pin);
            }
            if let Some(environment) = lookup("ORANGE_ENVIRONMENT") {
                orange.environment = parse_var("ORANGE_ENVIRONMENT", &environment)?;
            }
            if let Some(timeout) = lookup("ORANGE_TIMEOUT") {
                orange.timeout_ms = parse_var("ORANGE_TIMEOUT", &timeout)?;
            }
            if let Some(retries) = lookup("ORANGE_RETRY_ATTEMPTS") {
                orange.retry_attempts = parse_var("ORANGE_RETRY_ATTEMPTS", &retries)?;
            }
            orange.webhook_url = lookup("ORANGE_WEBHOOK_URL").filter(|u| !u.is_empty());
            orange.base_url = lookup("ORANGE_BASE_URL").filter(|u| !u.is_empty());

            deggo = deggo.with_provider(ProviderId::Orange, orange);
        }

        Ok(Self { deggo })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Invalid {}: '{}'", key, raw))
}
