//! Payment requests, responses and validation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::provider::ProviderId;

/// The receiving side of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Phone number in local or international format
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Recipient {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            name: None,
            account_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Request to move money to a recipient through a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Money,
    pub recipient: Recipient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Caller reference; generated by the provider client when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub provider: ProviderId,
}

/// Lifecycle state of a transaction as reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Outcome of a send or a status query.
///
/// A response is a snapshot: a later status is a new response, never an
/// update of this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub transaction_id: String,
    pub status: TransactionStatus,
    pub amount: Money,
    pub recipient: Recipient,
    pub fees: Money,
    pub provider: ProviderId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
}

/// Result of checking a payment request against provider rules.
///
/// Valid exactly when there are no errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ValidationErrors")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
}

/// Wire form of [`ValidationResult`]; validity is recomputed from the errors.
#[derive(Deserialize)]
struct ValidationErrors {
    #[serde(default)]
    errors: Vec<String>,
}

impl From<ValidationErrors> for ValidationResult {
    fn from(raw: ValidationErrors) -> Self {
        Self::from_errors(raw.errors)
    }
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Violations in the order they were checked.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
