//! Orange Money transfer fee schedule.

use deggo_types::Money;
use rust_decimal::{Decimal, RoundingStrategy};

/// Upper bound (inclusive, XOF) and fee for each tier, in ascending order.
const FEE_TIERS: [(i64, i64); 6] = [
    (2_500, 0),
    (5_000, 100),
    (15_000, 200),
    (25_000, 400),
    (50_000, 800),
    (125_000, 1_500),
];

/// Share of the value charged above the last tier, rounded to the nearest unit.
const TOP_TIER_RATE: Decimal = Decimal::from_parts(125, 0, 0, false, 4);

/// Returns the fee for sending `amount`, in the same currency.
pub fn calculate_fees(amount: &Money) -> Money {
    let value = amount.value();
    let fee = FEE_TIERS
        .iter()
        .find(|(up_to, _)| value <= Decimal::from(*up_to))
        .map(|(_, fee)| Decimal::from(*fee))
        .unwrap_or_else(|| {
            (value * TOP_TIER_RATE).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        });

    Money::new(fee, amount.currency())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deggo_types::Currency;
    use rust_decimal_macros::dec;

    fn fee(value: Decimal) -> Decimal {
        calculate_fees(&Money::new(value, Currency::XOF)).value()
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(fee(dec!(1000)), dec!(0));
        assert_eq!(fee(dec!(3000)), dec!(100));
        assert_eq!(fee(dec!(10000)), dec!(200));
        assert_eq!(fee(dec!(200000)), dec!(2500));
    }

    #[test]
    fn test_breakpoints_are_inclusive() {
        assert_eq!(fee(dec!(2500)), dec!(0));
        assert_eq!(fee(dec!(2500.01)), dec!(100));
        assert_eq!(fee(dec!(5000)), dec!(100));
        assert_eq!(fee(dec!(15000)), dec!(200));
        assert_eq!(fee(dec!(25000)), dec!(400));
        assert_eq!(fee(dec!(50000)), dec!(800));
        assert_eq!(fee(dec!(125000)), dec!(1500));
        assert_eq!(fee(dec!(125001)), dec!(1563));
    }

    #[test]
    fn test_top_tier_is_rounded_percentage() {
        assert_eq!(fee(dec!(200000)), dec!(2500));
        assert_eq!(fee(dec!(300000)), dec!(3750));
        assert_eq!(fee(dec!(130020)), dec!(1625));
        // 1.25% of 130060 is 1625.75
        assert_eq!(fee(dec!(130060)), dec!(1626));
        // 1.25% of 130040 is exactly 1625.5
        assert_eq!(fee(dec!(130040)), dec!(1626));
    }

    #[test]
    fn test_fees_never_decrease() {
        let mut previous = Decimal::ZERO;
        for step in 0..=400 {
            let current = fee(Decimal::from(step * 1_000));
            assert!(current >= previous, "fee dropped at {}", step * 1_000);
            previous = current;
        }
    }

    #[test]
    fn test_fee_currency_follows_amount() {
        let fees = calculate_fees(&Money::new(dec!(3000), Currency::XAF));
        assert_eq!(fees.currency(), Currency::XAF);
    }
}
