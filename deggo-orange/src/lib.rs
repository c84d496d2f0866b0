//! Orange Money Senegal provider for Deggo.
//!
//! [`OrangeClient`] implements [`deggo_types::PaymentProvider`] against the
//! Sonatel eWallet API. Authentication, PIN encryption, the fee schedule and
//! request validation each live in their own module so they can be used and
//! tested without a network.

pub mod auth;
pub mod client;
pub mod fees;
pub mod types;
pub mod validator;

pub use auth::{OrangeAuth, TokenState, parse_public_key};
pub use client::{ApiFailure, OrangeClient, handle_api_error, map_error_code, map_status};
pub use fees::calculate_fees;
pub use validator::validate_payment;
