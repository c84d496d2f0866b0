//! Deggo orchestrator unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use deggo_types::{
        AccountBalance, Currency, DeggoConfig, DeggoError, ErrorKind, Money, PaymentProvider,
        PaymentRequest, PaymentResponse, ProviderConfig, ProviderId, Recipient,
        TransactionFilter, TransactionHistory, TransactionStatus, ValidationResult,
    };

    use crate::Deggo;

    /// In-memory provider with canned answers.
    pub struct MockProvider {
        id: ProviderId,
        history: Option<Vec<PaymentResponse>>,
        connected: bool,
    }

    impl MockProvider {
        pub fn new(id: ProviderId) -> Self {
            Self {
                id,
                history: Some(Vec::new()),
                connected: true,
            }
        }

        pub fn with_history(mut self, stamps: &[i64]) -> Self {
            self.history = Some(stamps.iter().map(|s| tx(self.id, *s)).collect());
            self
        }

        pub fn failing_history(mut self) -> Self {
            self.history = None;
            self
        }

        pub fn disconnected(mut self) -> Self {
            self.connected = false;
            self
        }

        pub fn into_arc(self) -> Arc<dyn PaymentProvider> {
            Arc::new(self)
        }
    }

    pub fn tx(provider: ProviderId, stamp: i64) -> PaymentResponse {
        PaymentResponse {
            transaction_id: format!("{}-{}", provider, stamp),
            status: TransactionStatus::Completed,
            amount: Money::new(dec!(1000), Currency::XOF),
            recipient: Recipient::new("771234567"),
            fees: Money::zero(Currency::XOF),
            provider,
            timestamp: Utc.timestamp_opt(stamp, 0).unwrap(),
            reference: None,
            provider_reference: None,
        }
    }

    fn request(provider: ProviderId) -> PaymentRequest {
        PaymentRequest {
            amount: Money::new(dec!(1500), Currency::XOF),
            recipient: Recipient::new("771234567"),
            description: None,
            reference: None,
            provider,
        }
    }

    #[async_trait]
    impl PaymentProvider for MockProvider {
        async fn send_money(
            &self,
            request: &PaymentRequest,
        ) -> Result<PaymentResponse, DeggoError> {
            let mut response = tx(self.id, 0);
            response.amount = request.amount;
            Ok(response)
        }

        async fn check_balance(
            &self,
            account_id: Option<&str>,
        ) -> Result<AccountBalance, DeggoError> {
            Ok(AccountBalance {
                balance: Money::new(dec!(25000), Currency::XOF),
                provider: self.id,
                account_id: account_id.unwrap_or("default").to_string(),
                last_updated: Utc::now(),
            })
        }

        async fn get_transaction_history(
            &self,
            filter: &TransactionFilter,
        ) -> Result<TransactionHistory, DeggoError> {
            match &self.history {
                Some(all) => Ok(TransactionHistory::paginate(all.clone(), filter)),
                None => Err(DeggoError::new(ErrorKind::NetworkError, "history down")),
            }
        }

        fn calculate_fees(&self, amount: &Money, _recipient: &str) -> Money {
            Money::zero(amount.currency())
        }

        fn validate_payment_request(&self, _request: &PaymentRequest) -> ValidationResult {
            ValidationResult::valid()
        }

        async fn get_transaction_status(
            &self,
            transaction_id: &str,
        ) -> Result<PaymentResponse, DeggoError> {
            if transaction_id == "missing" {
                return Err(DeggoError::new(
                    ErrorKind::TransactionNotFound,
                    "Transaction not found",
                ));
            }
            Ok(tx(self.id, 42))
        }

        async fn test_connection(&self) -> bool {
            self.connected
        }

        fn provider_id(&self) -> ProviderId {
            self.id
        }
    }

    fn stamps(history: &TransactionHistory) -> Vec<i64> {
        history
            .transactions
            .iter()
            .map(|t| t.timestamp.timestamp())
            .collect()
    }

    #[test]
    fn test_no_providers_is_invalid_config() {
        let err = Deggo::with_providers(Vec::new()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(err.message(), "No payment providers configured");
    }

    #[test]
    fn test_new_reports_configuration_errors() {
        let err = Deggo::new(&DeggoConfig::default()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(err.message().starts_with("Configuration errors: "));
    }

    #[test]
    fn test_new_without_buildable_provider() {
        let config = DeggoConfig::default().with_provider(
            ProviderId::Wave,
            ProviderConfig::new("key", "id", "secret"),
        );
        let err = Deggo::new(&config).err().unwrap();
        assert_eq!(err.message(), "No payment providers configured");
    }

    #[test]
    fn test_new_builds_orange() {
        let config = DeggoConfig::default().with_provider(
            ProviderId::Orange,
            ProviderConfig::new("771234567", "id", "secret"),
        );
        let deggo = Deggo::new(&config).unwrap();
        assert_eq!(deggo.available_providers(), vec![ProviderId::Orange]);
    }

    #[tokio::test]
    async fn test_send_money_routes_to_named_provider() {
        let deggo =
            Deggo::with_providers(vec![MockProvider::new(ProviderId::Orange).into_arc()])
                .unwrap();

        let response = deggo.send_money(&request(ProviderId::Orange)).await.unwrap();
        assert_eq!(response.provider, ProviderId::Orange);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_rejected() {
        let deggo =
            Deggo::with_providers(vec![MockProvider::new(ProviderId::Orange).into_arc()])
                .unwrap();

        let err = deggo.send_money(&request(ProviderId::Wave)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderNotConfigured);
        assert_eq!(err.message(), "Provider wave is not configured");

        let err = deggo
            .check_balance(ProviderId::FreeMoney, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderNotConfigured);

        let err = deggo
            .get_transaction_status(ProviderId::PosteFinance, "tx")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderNotConfigured);
    }

    #[tokio::test]
    async fn test_balance_passes_account_through() {
        let deggo =
            Deggo::with_providers(vec![MockProvider::new(ProviderId::Orange).into_arc()])
                .unwrap();

        let balance = deggo
            .check_balance(ProviderId::Orange, Some("221781112233"))
            .await
            .unwrap();
        assert_eq!(balance.account_id, "221781112233");
    }

    #[tokio::test]
    async fn test_status_errors_propagate() {
        let deggo =
            Deggo::with_providers(vec![MockProvider::new(ProviderId::Orange).into_arc()])
                .unwrap();

        let err = deggo
            .get_transaction_status(ProviderId::Orange, "missing")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransactionNotFound);
    }

    #[tokio::test]
    async fn test_history_merges_newest_first() {
        let deggo = Deggo::with_providers(vec![
            MockProvider::new(ProviderId::Orange)
                .with_history(&[5, 10])
                .into_arc(),
            MockProvider::new(ProviderId::Wave).with_history(&[8]).into_arc(),
        ])
        .unwrap();

        let history = deggo
            .get_transaction_history(&TransactionFilter::default())
            .await
            .unwrap();

        assert_eq!(stamps(&history), vec![10, 8, 5]);
        assert_eq!(history.total, 3);
        assert_eq!(history.page, 1);
        assert_eq!(history.limit, 50);
        assert!(!history.has_more);
    }

    #[tokio::test]
    async fn test_history_paginates_after_merge() {
        let deggo = Deggo::with_providers(vec![
            MockProvider::new(ProviderId::Orange)
                .with_history(&[5, 10])
                .into_arc(),
            MockProvider::new(ProviderId::Wave).with_history(&[8]).into_arc(),
        ])
        .unwrap();

        let filter = TransactionFilter {
            limit: Some(2),
            ..Default::default()
        };
        let history = deggo.get_transaction_history(&filter).await.unwrap();

        assert_eq!(stamps(&history), vec![10, 8]);
        assert_eq!(history.total, 3);
        assert!(history.has_more);

        let filter = TransactionFilter {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        let history = deggo.get_transaction_history(&filter).await.unwrap();

        assert_eq!(stamps(&history), vec![5]);
        assert_eq!(history.total, 3);
        assert!(!history.has_more);
    }

    #[tokio::test]
    async fn test_history_total_counts_beyond_fetched_window() {
        let deggo = Deggo::with_providers(vec![
            MockProvider::new(ProviderId::Orange)
                .with_history(&[9, 7, 5, 3, 1])
                .into_arc(),
            MockProvider::new(ProviderId::Wave)
                .with_history(&[8, 6])
                .into_arc(),
        ])
        .unwrap();

        let page = |n| TransactionFilter {
            page: Some(n),
            limit: Some(2),
            ..Default::default()
        };

        let first = deggo.get_transaction_history(&page(1)).await.unwrap();
        assert_eq!(stamps(&first), vec![9, 8]);
        assert_eq!(first.total, 7);
        assert!(first.has_more);

        let third = deggo.get_transaction_history(&page(3)).await.unwrap();
        assert_eq!(stamps(&third), vec![5, 3]);
        assert!(third.has_more);

        let last = deggo.get_transaction_history(&page(4)).await.unwrap();
        assert_eq!(stamps(&last), vec![1]);
        assert_eq!(last.total, 7);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_history_skips_failing_provider() {
        let deggo = Deggo::with_providers(vec![
            MockProvider::new(ProviderId::Orange)
                .with_history(&[3, 1])
                .into_arc(),
            MockProvider::new(ProviderId::Wave)
                .failing_history()
                .into_arc(),
        ])
        .unwrap();

        let history = deggo
            .get_transaction_history(&TransactionFilter::default())
            .await
            .unwrap();

        assert_eq!(stamps(&history), vec![3, 1]);
        assert_eq!(history.total, 2);
    }

    #[tokio::test]
    async fn test_scoped_history_delegates_and_propagates() {
        let deggo = Deggo::with_providers(vec![
            MockProvider::new(ProviderId::Orange)
                .with_history(&[1])
                .into_arc(),
            MockProvider::new(ProviderId::Wave)
                .failing_history()
                .into_arc(),
        ])
        .unwrap();

        let scoped = TransactionFilter {
            provider: Some(ProviderId::Orange),
            ..Default::default()
        };
        assert_eq!(
            stamps(&deggo.get_transaction_history(&scoped).await.unwrap()),
            vec![1]
        );

        let failing = TransactionFilter {
            provider: Some(ProviderId::Wave),
            ..Default::default()
        };
        let err = deggo.get_transaction_history(&failing).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);

        let missing = TransactionFilter {
            provider: Some(ProviderId::FreeMoney),
            ..Default::default()
        };
        let err = deggo.get_transaction_history(&missing).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderNotConfigured);
    }

    #[tokio::test]
    async fn test_connections_reported_per_provider() {
        let deggo = Deggo::with_providers(vec![
            MockProvider::new(ProviderId::Orange).into_arc(),
            MockProvider::new(ProviderId::Wave).disconnected().into_arc(),
        ])
        .unwrap();

        let results = deggo.test_connections().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[&ProviderId::Orange], true);
        assert_eq!(results[&ProviderId::Wave], false);
        assert_eq!(
            deggo.available_providers(),
            vec![ProviderId::Orange, ProviderId::Wave]
        );
    }
}
