//! Monetary values and provider wire-unit conversion.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies a provider may quote amounts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    XOF,
    XAF,
    USD,
    EUR,
}

impl Currency {
    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::XOF => "XOF",
            Currency::XAF => "XAF",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Whether the provider wire format expresses this currency in minor units.
    pub fn uses_minor_wire_units(&self) -> bool {
        matches!(self, Currency::XOF | Currency::XAF)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "XOF" => Ok(Currency::XOF),
            "XAF" => Ok(Currency::XAF),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            _ => Err(format!("Unknown currency: {}", s)),
        }
    }
}

/// An amount in major units (francs, dollars) with its currency.
///
/// Construction does not reject zero or negative values: payment requests
/// carry whatever the caller sent so that validation can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    value: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Creates a zero-value Money for the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value.normalize(), self.currency)
    }
}

/// Converts a major-unit amount into the value a provider expects on the wire.
///
/// XOF and XAF travel as centimes rounded to the nearest integer; other
/// currencies pass through unchanged.
pub fn to_wire_units(money: &Money) -> Decimal {
    if money.currency.uses_minor_wire_units() {
        (money.value * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    } else {
        money.value
    }
}

/// Inverse of [`to_wire_units`].
pub fn from_wire_units(value: Decimal, currency: Currency) -> Money {
    if currency.uses_minor_wire_units() {
        Money::new(value / Decimal::ONE_HUNDRED, currency)
    } else {
        Money::new(value, currency)
    }
}
