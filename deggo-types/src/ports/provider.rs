//! Payment provider port.

use crate::domain::{
    AccountBalance, Money, PaymentRequest, PaymentResponse, ProviderId, TransactionFilter,
    TransactionHistory, ValidationResult,
};
use crate::error::DeggoError;

/// Capabilities every mobile-money provider must offer.
///
/// Errors returned from these methods are already translated into the
/// shared [`ErrorKind`](crate::error::ErrorKind) vocabulary.
#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Sends money to the request's recipient.
    async fn send_money(&self, request: &PaymentRequest) -> Result<PaymentResponse, DeggoError>;

    /// Fetches the balance of `account_id`, or of the configured account.
    async fn check_balance(&self, account_id: Option<&str>) -> Result<AccountBalance, DeggoError>;

    /// Lists transactions matching the filter.
    async fn get_transaction_history(
        &self,
        filter: &TransactionFilter,
    ) -> Result<TransactionHistory, DeggoError>;

    /// Computes the fee charged for sending `amount` to `recipient`.
    fn calculate_fees(&self, amount: &Money, recipient: &str) -> Money;

    /// Checks a request against the provider's business rules.
    fn validate_payment_request(&self, request: &PaymentRequest) -> ValidationResult;

    /// Fetches the current state of a transaction.
    async fn get_transaction_status(
        &self,
        transaction_id: &str,
    ) -> Result<PaymentResponse, DeggoError>;

    /// Returns true if the provider accepts our credentials.
    async fn test_connection(&self) -> bool;

    fn provider_id(&self) -> ProviderId;
}
