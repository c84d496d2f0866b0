//! # Deggo Hex
//!
//! Application service layer and MCP adapter for Deggo.
//!
//! ## Architecture
//!
//! - `service` - The [`Deggo`] orchestrator (routes calls to providers)
//! - `factory` - Builds provider clients from configuration
//! - `inbound/` - MCP JSON-RPC server over stdio
//!
//! Providers are held as `Arc<dyn PaymentProvider>`, so tests can inject
//! in-memory implementations in place of real clients.

pub mod factory;
pub mod inbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use factory::create_providers;
pub use service::Deggo;
