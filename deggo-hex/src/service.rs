//! Deggo Application Service
//!
//! Routes each operation to the provider it names. Contains NO provider
//! logic; wire protocols live in the provider crates.

use std::collections::BTreeMap;
use std::sync::Arc;

use deggo_types::{
    AccountBalance, DeggoConfig, DeggoError, ErrorKind, PaymentProvider, PaymentRequest,
    PaymentResponse, ProviderId, TransactionFilter, TransactionHistory,
};
use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::factory::create_providers;

/// Unified entry point over every configured payment provider.
///
/// The provider set is fixed at construction and never empty.
pub struct Deggo {
    providers: BTreeMap<ProviderId, Arc<dyn PaymentProvider>>,
}

impl Deggo {
    /// Validates the configuration and builds its providers.
    pub fn new(config: &DeggoConfig) -> Result<Self, DeggoError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(DeggoError::new(
                ErrorKind::InvalidConfig,
                format!("Configuration errors: {}", errors.join(", ")),
            ));
        }

        Self::with_providers(create_providers(config)?)
    }

    /// Uses prebuilt providers, keyed by their own id.
    pub fn with_providers(
        providers: impl IntoIterator<Item = Arc<dyn PaymentProvider>>,
    ) -> Result<Self, DeggoError> {
        let providers: BTreeMap<_, _> = providers
            .into_iter()
            .map(|p| (p.provider_id(), p))
            .collect();

        if providers.is_empty() {
            return Err(DeggoError::new(
                ErrorKind::InvalidConfig,
                "No payment providers configured",
            ));
        }

        info!(providers = ?providers.keys().collect::<Vec<_>>(), "Deggo initialized");
        Ok(Self { providers })
    }

    fn provider(&self, id: ProviderId) -> Result<&Arc<dyn PaymentProvider>, DeggoError> {
        self.providers
            .get(&id)
            .ok_or_else(|| DeggoError::provider_not_configured(id))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────────

    /// Sends money through the provider named in the request.
    #[instrument(skip(self, request), fields(provider = %request.provider))]
    pub async fn send_money(&self, request: &PaymentRequest) -> Result<PaymentResponse, DeggoError> {
        self.provider(request.provider)?.send_money(request).await
    }

    #[instrument(skip(self))]
    pub async fn check_balance(
        &self,
        provider: ProviderId,
        account_id: Option<&str>,
    ) -> Result<AccountBalance, DeggoError> {
        self.provider(provider)?.check_balance(account_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_transaction_status(
        &self,
        provider: ProviderId,
        transaction_id: &str,
    ) -> Result<PaymentResponse, DeggoError> {
        self.provider(provider)?
            .get_transaction_status(transaction_id)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists transactions for one provider, or merges every provider.
    ///
    /// The merged list is ordered newest first and paginated after merging.
    /// A provider that fails is logged and left out.
    #[instrument(skip(self))]
    pub async fn get_transaction_history(
        &self,
        filter: &TransactionFilter,
    ) -> Result<TransactionHistory, DeggoError> {
        if let Some(id) = filter.provider {
            return self.provider(id)?.get_transaction_history(filter).await;
        }

        // Each provider must cover every slot up to the end of the requested page.
        let window = TransactionFilter {
            page: Some(1),
            limit: Some(filter.page().saturating_mul(filter.limit())),
            ..filter.clone()
        };

        let results = join_all(self.providers.iter().map(|(id, provider)| {
            let window = &window;
            async move { (*id, provider.get_transaction_history(window).await) }
        }))
        .await;

        let mut merged = Vec::new();
        let mut reported = 0usize;
        for (id, result) in results {
            match result {
                Ok(history) => {
                    let count = history.total.max(history.transactions.len());
                    reported = reported.saturating_add(count);
                    merged.extend(history.transactions);
                }
                Err(e) => warn!(provider = %id, error = %e, "Failed to get history from provider"),
            }
        }

        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut page = TransactionHistory::paginate(merged, filter);
        page.total = page.total.max(reported);
        page.has_more = (page.page as usize).saturating_mul(page.limit as usize) < page.total;
        Ok(page)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Providers
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn available_providers(&self) -> Vec<ProviderId> {
        self.providers.keys().copied().collect()
    }

    /// Probes every provider concurrently.
    pub async fn test_connections(&self) -> BTreeMap<ProviderId, bool> {
        join_all(
            self.providers
                .iter()
                .map(|(id, provider)| async move { (*id, provider.test_connection().await) }),
        )
        .await
        .into_iter()
        .collect()
    }
}
