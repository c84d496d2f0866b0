//! Orange Money API client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deggo_types::domain::{from_wire_units, normalize_phone, to_wire_units};
use deggo_types::{
    AccountBalance, DeggoError, Diagnostics, ErrorKind, Money, PaymentProvider, PaymentRequest,
    PaymentResponse, ProviderConfig, ProviderId, Recipient, TransactionFilter,
    TransactionHistory, TransactionStatus, ValidationResult,
};
use rand::Rng;
use rand::distr::Alphanumeric;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::auth::OrangeAuth;
use crate::fees;
use crate::types::{
    self, BALANCE_PATH, BalanceResponse, CASHIN_PATH, HISTORY_PATH, HistoryRequest,
    HistoryResponse, Msisdn, Partner, STATUS_PATH, StatusRequest, TransactionRecord,
    TransferRequest, WireAmount, error_codes,
};
use crate::validator;

/// A failed call to the Orange Money API, before translation.
#[derive(Debug, thiserror::Error)]
pub enum ApiFailure {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Orange Money API returned HTTP {status}")]
    Api { status: u16, body: String },

    #[error("Malformed Orange Money response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiFailure {
    fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Http(e) => e.status().map(|s| s.as_u16()),
            ApiFailure::Api { status, .. } => Some(*status),
            ApiFailure::Json(_) => None,
        }
    }
}

/// Translates an Orange error code into the shared taxonomy.
///
/// Unknown codes map to [`ErrorKind::NetworkError`].
pub fn map_error_code(code: &str) -> ErrorKind {
    match code {
        error_codes::INSUFFICIENT_FUNDS
        | error_codes::INSUFFICIENT_FUNDS_PAYER
        | error_codes::INSUFFICIENT_FUNDS_PAYEE => ErrorKind::InsufficientFunds,
        error_codes::INVALID_MSISDN => ErrorKind::InvalidRecipient,
        error_codes::INVALID_CREDENTIALS => ErrorKind::InvalidCredentials,
        error_codes::TRANSACTION_NOT_ALLOWED => ErrorKind::TransactionLimitExceeded,
        error_codes::ACCOUNT_BLOCKED => ErrorKind::AccountSuspended,
        _ => ErrorKind::NetworkError,
    }
}

/// Converts any API failure into a domain error.
///
/// The code comes from the body's `error_code`, else the HTTP status, else
/// `UNKNOWN`; the message from `error_message`, else the failure itself.
pub fn handle_api_error(failure: ApiFailure) -> DeggoError {
    let body = match &failure {
        ApiFailure::Api { body, .. } => serde_json::from_str::<serde_json::Value>(body).ok(),
        _ => None,
    };

    let code = body
        .as_ref()
        .and_then(|b| b.get("error_code"))
        .and_then(|c| match c {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .or_else(|| failure.status().map(|s| s.to_string()))
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let message = body
        .as_ref()
        .and_then(|b| b.get("error_message"))
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| failure.to_string());

    let kind = map_error_code(&code);
    warn!(%code, %kind, "Orange Money API call failed");

    let err = DeggoError::new(kind, message).with_provider(ProviderId::Orange);
    match failure {
        ApiFailure::Api { body, .. } => err.with_details(Diagnostics::from_body(&body)),
        other => err.with_source(other),
    }
}

/// Maps an Orange transaction status onto the domain lifecycle.
pub fn map_status(status: &str) -> TransactionStatus {
    match status {
        "SUCCESS" | "COMPLETED" => TransactionStatus::Completed,
        "PENDING" => TransactionStatus::Pending,
        "FAILED" => TransactionStatus::Failed,
        "EXPIRED" => TransactionStatus::Cancelled,
        _ => TransactionStatus::Pending,
    }
}

/// Builds a best-effort unique reference: `DEGGO_<millis>_<9 random chars>`.
pub fn generate_reference() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("DEGGO_{}_{}", Utc::now().timestamp_millis(), suffix)
}

fn wire_to_money(amount: &WireAmount) -> Money {
    from_wire_units(Decimal::from(amount.value), amount.currency)
}

/// Orange Money Senegal provider.
pub struct OrangeClient {
    http: Client,
    base_url: String,
    config: ProviderConfig,
    auth: OrangeAuth,
}

impl OrangeClient {
    /// Creates a client; no network call is made until first use.
    pub fn new(config: ProviderConfig) -> Result<Self, DeggoError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                DeggoError::new(ErrorKind::InvalidConfig, "Failed to build HTTP client")
                    .with_provider(ProviderId::Orange)
                    .with_source(e)
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| types::base_url(config.environment).to_string())
            .trim_end_matches('/')
            .to_string();

        let auth = OrangeAuth::new(
            http.clone(),
            base_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        );

        Ok(Self {
            http,
            base_url,
            config,
            auth,
        })
    }

    /// The credential manager owned by this client.
    pub fn auth(&self) -> &OrangeAuth {
        &self.auth
    }

    fn partner_msisdn(&self) -> String {
        normalize_phone(&self.config.api_key)
    }

    fn record_to_response(&self, record: TransactionRecord) -> PaymentResponse {
        let amount = wire_to_money(&record.amount);
        let fees = record
            .fees
            .as_ref()
            .map(wire_to_money)
            .unwrap_or_else(|| Money::zero(amount.currency()));

        PaymentResponse {
            status: map_status(&record.status),
            amount,
            recipient: Recipient::new(record.recipient.map(|r| r.msisdn).unwrap_or_default()),
            fees,
            provider: ProviderId::Orange,
            // Undated records sort last in newest-first listings.
            timestamp: record.created_date.unwrap_or(DateTime::UNIX_EPOCH),
            reference: record.reference,
            provider_reference: Some(record.transaction_id.clone()),
            transaction_id: record.transaction_id,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DeggoError> {
        let req = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query);
        self.send(req).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeggoError> {
        let req = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        self.send(req).await
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, DeggoError> {
        let token = self.auth.get_access_token().await?;
        let resp = req
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| handle_api_error(ApiFailure::Http(e)))?;
        self.handle_response(resp).await.map_err(handle_api_error)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ApiFailure> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ApiFailure::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn fetch_history(
        &self,
        filter: &TransactionFilter,
    ) -> Result<TransactionHistory, DeggoError> {
        let request = HistoryRequest {
            msisdn: self.partner_msisdn(),
            start_date: filter.start_date.map(|d| d.date_naive().to_string()),
            end_date: filter.end_date.map(|d| d.date_naive().to_string()),
            page: filter.page.filter(|p| *p > 0),
            size: filter.limit.filter(|l| *l > 0),
        };

        let response: HistoryResponse = self.post(HISTORY_PATH, &request).await?;

        let transactions: Vec<_> = response
            .transactions
            .into_iter()
            .map(|record| self.record_to_response(record))
            .collect();

        Ok(TransactionHistory {
            total: response.total_count.unwrap_or(transactions.len()),
            page: filter.page(),
            limit: filter.limit(),
            has_more: response.has_more.unwrap_or(false),
            transactions,
        })
    }
}

#[async_trait]
impl PaymentProvider for OrangeClient {
    #[instrument(skip(self, request), fields(amount = %request.amount))]
    async fn send_money(&self, request: &PaymentRequest) -> Result<PaymentResponse, DeggoError> {
        let validation = self.validate_payment_request(request);
        if !validation.is_valid() {
            return Err(DeggoError::new(
                ErrorKind::InvalidAmount,
                format!("Invalid payment: {}", validation.errors().join(", ")),
            )
            .with_provider(ProviderId::Orange)
            .with_details(Diagnostics::new().with("errors", validation.errors().to_vec())));
        }

        let pin_code = self.config.pin_code.as_ref().ok_or_else(|| {
            DeggoError::new(
                ErrorKind::InvalidCredentials,
                "PIN code is required for Orange Money transactions",
            )
            .with_provider(ProviderId::Orange)
        })?;

        let encrypted_pin = self.auth.encrypt_secret(pin_code).await?;
        let reference = request
            .reference
            .clone()
            .unwrap_or_else(generate_reference);

        let value = to_wire_units(&request.amount).to_i64().ok_or_else(|| {
            DeggoError::new(ErrorKind::InvalidAmount, "Amount out of range")
                .with_provider(ProviderId::Orange)
        })?;

        let transfer = TransferRequest {
            recipient: Msisdn {
                msisdn: normalize_phone(&request.recipient.phone_number),
            },
            amount: WireAmount {
                value,
                currency: request.amount.currency(),
            },
            partner: Partner {
                msisdn: self.partner_msisdn(),
                encrypted_pin,
            },
            reference: reference.clone(),
            callback_url: self.config.webhook_url.clone(),
        };

        let record: TransactionRecord = self.post(CASHIN_PATH, &transfer).await?;
        info!(transaction_id = %record.transaction_id, status = %record.status, "Orange Money transfer submitted");

        Ok(PaymentResponse {
            status: map_status(&record.status),
            amount: request.amount,
            recipient: request.recipient.clone(),
            fees: record
                .fees
                .as_ref()
                .map(wire_to_money)
                .unwrap_or_else(|| Money::zero(request.amount.currency())),
            provider: ProviderId::Orange,
            timestamp: record.created_date.unwrap_or_else(Utc::now),
            reference: Some(reference),
            provider_reference: Some(record.transaction_id.clone()),
            transaction_id: record.transaction_id,
        })
    }

    #[instrument(skip(self))]
    async fn check_balance(&self, account_id: Option<&str>) -> Result<AccountBalance, DeggoError> {
        let msisdn = normalize_phone(account_id.unwrap_or(&self.config.api_key));

        let response: BalanceResponse = self.get(BALANCE_PATH, &[("msisdn", msisdn)]).await?;

        Ok(AccountBalance {
            balance: wire_to_money(&response.balance),
            provider: ProviderId::Orange,
            account_id: response.msisdn,
            last_updated: Utc::now(),
        })
    }

    #[instrument(skip(self))]
    async fn get_transaction_history(
        &self,
        filter: &TransactionFilter,
    ) -> Result<TransactionHistory, DeggoError> {
        match self.fetch_history(filter).await {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!(error = %e, "Orange Money history unavailable, returning empty page");
                Ok(TransactionHistory::empty(filter))
            }
        }
    }

    fn calculate_fees(&self, amount: &Money, _recipient: &str) -> Money {
        fees::calculate_fees(amount)
    }

    fn validate_payment_request(&self, request: &PaymentRequest) -> ValidationResult {
        validator::validate_payment(request)
    }

    #[instrument(skip(self))]
    async fn get_transaction_status(
        &self,
        transaction_id: &str,
    ) -> Result<PaymentResponse, DeggoError> {
        let request = StatusRequest {
            transaction_id: transaction_id.to_string(),
            msisdn: self.partner_msisdn(),
        };

        let record: TransactionRecord = self.post(STATUS_PATH, &request).await?;
        Ok(self.record_to_response(record))
    }

    async fn test_connection(&self) -> bool {
        self.auth.test_connection().await
    }

    fn provider_id(&self) -> ProviderId {
        ProviderId::Orange
    }
}
