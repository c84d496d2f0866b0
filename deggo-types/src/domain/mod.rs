//! Domain models for mobile-money payments.

pub mod account;
pub mod money;
pub mod payment;
pub mod phone;
pub mod provider;

pub use account::{AccountBalance, TransactionFilter, TransactionHistory};
pub use money::{Currency, Money, from_wire_units, to_wire_units};
pub use payment::{PaymentRequest, PaymentResponse, Recipient, TransactionStatus, ValidationResult};
pub use phone::{is_valid_local_phone, normalize_phone};
pub use provider::ProviderId;
