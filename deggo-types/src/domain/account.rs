//! Account balance and transaction history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::payment::PaymentResponse;
use super::provider::ProviderId;

/// Page returned when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not set one.
pub const DEFAULT_LIMIT: u32 = 50;

/// A freshly fetched account balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub balance: Money,
    pub provider: ProviderId,
    pub account_id: String,
    pub last_updated: DateTime<Utc>,
}

/// Query parameters for transaction history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Restrict the query to one provider; all providers otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl TransactionFilter {
    /// One-based page number; zero counts as unset.
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    /// Page size; zero counts as unset.
    pub fn limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }
}

/// One page of transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionHistory {
    pub transactions: Vec<PaymentResponse>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl TransactionHistory {
    /// An empty page for the given filter.
    pub fn empty(filter: &TransactionFilter) -> Self {
        Self {
            transactions: Vec::new(),
            total: 0,
            page: filter.page(),
            limit: filter.limit(),
            has_more: false,
        }
    }

    /// Cuts one page out of an already ordered list.
    ///
    /// `total` is the length of the full list and `has_more` is derived
    /// from the slice bounds.
    pub fn paginate(all: Vec<PaymentResponse>, filter: &TransactionFilter) -> Self {
        let page = filter.page();
        let limit = filter.limit();
        let total = all.len();
        let start = ((page - 1) as usize).saturating_mul(limit as usize);
        let end = start.saturating_add(limit as usize);

        let transactions = all
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        Self {
            transactions,
            total,
            page,
            limit,
            has_more: end < total,
        }
    }
}
