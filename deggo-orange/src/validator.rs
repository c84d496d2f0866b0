//! Orange Money payment validation rules.

use deggo_types::domain::is_valid_local_phone;
use deggo_types::{Currency, PaymentRequest, ValidationResult};
use rust_decimal::Decimal;

/// Largest single transfer Orange Money accepts, in XOF.
pub const MAX_TRANSACTION_AMOUNT: i64 = 300_000;

/// Orange Money Senegal only moves XOF.
pub const SUPPORTED_CURRENCY: Currency = Currency::XOF;

pub const MAX_REFERENCE_LENGTH: usize = 50;

/// Checks every rule and reports all violations in order.
pub fn validate_payment(request: &PaymentRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if !request.amount.is_positive() {
        errors.push("Amount must be greater than 0".to_string());
    }

    if request.amount.value() > Decimal::from(MAX_TRANSACTION_AMOUNT) {
        errors.push("Amount exceeds Orange Money limit of 300,000 XOF".to_string());
    }

    if request.amount.currency() != SUPPORTED_CURRENCY {
        errors.push("Orange Money only supports XOF currency".to_string());
    }

    if !is_valid_local_phone(&request.recipient.phone_number) {
        errors.push("Invalid Senegalese phone number format".to_string());
    }

    if let Some(reference) = &request.reference {
        if reference.chars().count() > MAX_REFERENCE_LENGTH {
            errors.push("Reference must be 50 characters or less".to_string());
        }
    }

    ValidationResult::from_errors(errors)
}
