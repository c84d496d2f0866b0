//! Port traits (interfaces for adapters).
//!
//! Every mobile-money provider implements [`PaymentProvider`].
//! The orchestrator depends on this trait, never on a concrete provider.

mod provider;

pub use provider::PaymentProvider;
