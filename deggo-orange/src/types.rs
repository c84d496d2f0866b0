//! Orange Money (Sonatel) wire types and endpoints.

use chrono::{DateTime, Utc};
use deggo_types::{Currency, Environment};
use serde::{Deserialize, Serialize};

pub const PRODUCTION_BASE_URL: &str = "https://api.orange-sonatel.com";
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.orange-sonatel.com";

pub const AUTH_PATH: &str = "/oauth/v1/token";
pub const PUBLIC_KEY_PATH: &str = "/api/eWallet/v1/publickeys";
pub const CASHIN_PATH: &str = "/api/eWallet/v1/cashins";
pub const BALANCE_PATH: &str = "/api/eWallet/v1/account/customer/balance";
pub const HISTORY_PATH: &str = "/api/eWallet/v1/transactions";
pub const STATUS_PATH: &str = "/api/eWallet/v1/transactionstatus";

/// Base URL for the given platform.
pub fn base_url(environment: Environment) -> &'static str {
    match environment {
        Environment::Production => PRODUCTION_BASE_URL,
        Environment::Sandbox => SANDBOX_BASE_URL,
    }
}

/// Orange-native error codes returned in `error_code`.
pub mod error_codes {
    pub const INVALID_CREDENTIALS: &str = "10";
    pub const INTERNAL_ERROR: &str = "50";
    pub const CUSTOMER_NOT_EXIST: &str = "2000";
    pub const INVALID_MSISDN: &str = "2001";
    pub const ACCOUNT_BLOCKED: &str = "2013";
    pub const INSUFFICIENT_FUNDS: &str = "2020";
    pub const INSUFFICIENT_FUNDS_PAYER: &str = "2021";
    pub const INSUFFICIENT_FUNDS_PAYEE: &str = "2022";
    pub const TRANSACTION_NOT_ALLOWED: &str = "2041";
    pub const BAD_REQUEST: &str = "4099";
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct PublicKeyResponse {
    #[serde(alias = "key")]
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Msisdn {
    pub msisdn: String,
}

/// Amount in wire units (centimes for XOF).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAmount {
    pub value: i64,
    pub currency: Currency,
}

#[derive(Debug, Serialize)]
pub struct Partner {
    pub msisdn: String,
    pub encrypted_pin: String,
}

#[derive(Debug, Serialize)]
pub struct TransferRequest {
    pub recipient: Msisdn,
    pub amount: WireAmount,
    pub partner: Partner,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// A transaction record as returned by transfer, status and history calls.
#[derive(Debug, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub status: String,
    pub amount: WireAmount,
    #[serde(default)]
    pub fees: Option<WireAmount>,
    #[serde(default)]
    pub recipient: Option<Msisdn>,
    #[serde(default, alias = "created_at", alias = "createdAt")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    pub msisdn: String,
    pub balance: WireAmount,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryRequest {
    pub msisdn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub total_count: Option<usize>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct StatusRequest {
    pub transaction_id: String,
    pub msisdn: String,
}
