//! Mobile-money provider identifiers.

use serde::{Deserialize, Serialize};

/// A mobile-money network that can sit behind the provider port.
///
/// Only [`ProviderId::Orange`] has a client today; the others are known
/// identifiers that are never configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Orange,
    Wave,
    FreeMoney,
    PosteFinance,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Orange => "orange",
            ProviderId::Wave => "wave",
            ProviderId::FreeMoney => "free_money",
            ProviderId::PosteFinance => "poste_finance",
        }
    }

    pub fn all() -> &'static [ProviderId] {
        &[
            ProviderId::Orange,
            ProviderId::Wave,
            ProviderId::FreeMoney,
            ProviderId::PosteFinance,
        ]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown provider: {}", s))
    }
}
