//! Provider construction from configuration.

use std::sync::Arc;

use deggo_orange::OrangeClient;
use deggo_types::{DeggoConfig, DeggoError, PaymentProvider, ProviderId};
use tracing::{debug, warn};

/// Builds a client for every configured provider that can be served.
///
/// Orange Money is built only when its api key, client id and client secret
/// are all present. Other providers are not implemented and are skipped.
pub fn create_providers(config: &DeggoConfig) -> Result<Vec<Arc<dyn PaymentProvider>>, DeggoError> {
    let mut providers: Vec<Arc<dyn PaymentProvider>> = Vec::new();

    for (id, provider_config) in &config.providers {
        match id {
            ProviderId::Orange if provider_config.has_credentials() => {
                debug!(environment = ?provider_config.environment, "Creating Orange Money client");
                providers.push(Arc::new(OrangeClient::new(provider_config.clone())?));
            }
            ProviderId::Orange => {
                warn!("Orange Money credentials incomplete, provider skipped");
            }
            other => {
                warn!(provider = %other, "Provider not supported yet, skipped");
            }
        }
    }

    Ok(providers)
}
