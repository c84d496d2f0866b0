//! # Deggo Types
//!
//! Domain types, configuration and the provider port for Deggo.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Money, phone numbers, payments, balances, history
//! - `ports/` - The `PaymentProvider` trait that provider adapters implement
//! - `config` - Provider credentials and settings
//! - `error` - The provider-agnostic error taxonomy

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use config::{DeggoConfig, Environment, ProviderConfig};
pub use domain::{
    AccountBalance, Currency, Money, PaymentRequest, PaymentResponse, ProviderId, Recipient,
    TransactionFilter, TransactionHistory, TransactionStatus, ValidationResult,
};
pub use error::{DeggoError, Diagnostics, ErrorKind};
pub use ports::PaymentProvider;
