//! Property tests for the redemption ledger

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_holdings::redemption::redeem;
use domain_holdings::Position;

use test_utils::fixtures::date;
use test_utils::SipPositionBuilder;

/// Three monthly installments of 10 units each
fn ledger() -> Position {
    SipPositionBuilder::new()
        .with_installment(date(2024, 1, 15), dec!(50))
        .with_installment(date(2024, 2, 15), dec!(50))
        .with_installment(date(2024, 3, 15), dec!(50))
        .build()
}

proptest! {
    /// Any sequence of requests leaves the ledger consistent: successes
    /// deduct exactly what was asked, failures deduct nothing, and the
    /// available balance never goes negative.
    #[test]
    fn test_available_units_stay_consistent(requests in prop::collection::vec(1u32..40, 1..8)) {
        let mut position = ledger();
        for request in requests {
            let units = Decimal::from(request);
            let before = position.available_units().unwrap();
            let result = redeem(&mut position, units, dec!(55), date(2024, 6, 1));
            let after = position.available_units().unwrap();

            match result {
                Ok(summary) => {
                    prop_assert_eq!(after, before - units);
                    prop_assert_eq!(summary.units_redeemed, units);
                }
                Err(_) => prop_assert_eq!(after, before),
            }
            prop_assert!(after >= Decimal::ZERO);
        }
    }

    /// A single redemption always consumes a prefix of the installment
    /// sequence: no tranche is touched before every earlier one is drained.
    #[test]
    fn test_consumption_is_a_fifo_prefix(request in 1u32..=30) {
        let mut position = ledger();
        let units = Decimal::from(request);
        redeem(&mut position, units, dec!(55), date(2024, 6, 1)).unwrap();

        let sip = position.sip().unwrap();
        let mut boundary_seen = false;
        let mut consumed = Decimal::ZERO;
        for installment in &sip.installments {
            if boundary_seen {
                prop_assert!(installment.redeemed_units.is_zero());
            }
            if installment.redeemed_units < installment.units {
                boundary_seen = true;
            }
            consumed += installment.redeemed_units;
        }
        prop_assert_eq!(consumed, units);
    }

    /// Summary totals always reconcile with the per-tranche breakdown.
    #[test]
    fn test_summary_totals_reconcile(request in 1u32..=30, nav in 1u32..200) {
        let mut position = ledger();
        let units = Decimal::from(request);
        let summary = redeem(&mut position, units, Decimal::from(nav), date(2024, 6, 1)).unwrap();

        let tranche_units: Decimal = summary.tranches.iter().map(|t| t.units).sum();
        let tranche_tax: Decimal = summary.tranches.iter().map(|t| t.tax).sum();
        let tranche_gain: Decimal = summary.tranches.iter().map(|t| t.gain).sum();

        prop_assert_eq!(tranche_units, units);
        prop_assert_eq!(tranche_tax, summary.total_tax);
        prop_assert_eq!(tranche_gain, summary.total_gain);
    }
}
