//! Error types shared by every provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ProviderId;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The closed set of failures a caller can observe.
///
/// Provider-native error codes are translated into one of these before
/// they leave a provider client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // Configuration
    ProviderNotConfigured,
    InvalidConfig,

    // Authentication
    InvalidCredentials,
    ApiKeyInvalid,

    // Transaction
    InsufficientFunds,
    InvalidRecipient,
    InvalidAmount,
    TransactionLimitExceeded,
    DuplicateTransaction,

    // System
    NetworkError,
    MaintenanceMode,
    TransactionNotFound,
    AccountSuspended,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ProviderNotConfigured => "PROVIDER_NOT_CONFIGURED",
            ErrorKind::InvalidConfig => "INVALID_CONFIG",
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::ApiKeyInvalid => "API_KEY_INVALID",
            ErrorKind::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorKind::InvalidRecipient => "INVALID_RECIPIENT",
            ErrorKind::InvalidAmount => "INVALID_AMOUNT",
            ErrorKind::TransactionLimitExceeded => "TRANSACTION_LIMIT_EXCEEDED",
            ErrorKind::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::MaintenanceMode => "MAINTENANCE_MODE",
            ErrorKind::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            ErrorKind::AccountSuspended => "ACCOUNT_SUSPENDED",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Opaque diagnostic data captured from a provider response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(BTreeMap<String, serde_json::Value>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures a raw response body.
    ///
    /// JSON objects are kept field by field; anything else is stored under
    /// `body`.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => Self(map.into_iter().collect()),
            Ok(other) => Self::new().with("body", other),
            Err(_) => Self::new().with("body", body),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A structured failure from Deggo or one of its providers.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DeggoError {
    kind: ErrorKind,
    message: String,
    details: Option<Diagnostics>,
    provider: Option<ProviderId>,
    #[source]
    source: Option<BoxError>,
}

impl DeggoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            provider: None,
            source: None,
        }
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_details(mut self, details: Diagnostics) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn provider_not_configured(provider: ProviderId) -> Self {
        Self::new(
            ErrorKind::ProviderNotConfigured,
            format!("Provider {} is not configured", provider),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Diagnostics> {
        self.details.as_ref()
    }

    pub fn provider(&self) -> Option<ProviderId> {
        self.provider
    }
}
