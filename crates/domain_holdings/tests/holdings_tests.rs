//! Ledger, redemption, and tax scenarios for domain_holdings

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_holdings::position::SipStatus;
use domain_holdings::redemption::redeem;
use domain_holdings::tax::TaxType;
use domain_holdings::valuation::value_position;
use domain_holdings::HoldingsError;

use test_utils::fixtures::{date, labels};
use test_utils::{LumpSumPositionBuilder, SipPositionBuilder};

// ============================================================================
// Ledger invariants
// ============================================================================

mod ledger_tests {
    use super::*;

    #[test]
    fn test_available_units_never_negative_through_valid_sequence() {
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .with_installment(date(2024, 2, 15), dec!(50))
            .with_installment(date(2024, 3, 15), dec!(50))
            .build();

        for _ in 0..3 {
            redeem(&mut position, dec!(9.5), dec!(55), date(2024, 6, 1)).unwrap();
            assert!(position.available_units().unwrap() >= Decimal::ZERO);
        }

        // 28.5 of 30 consumed; the remainder still redeems cleanly
        let rest = position.available_units().unwrap();
        redeem(&mut position, rest, dec!(55), date(2024, 6, 2)).unwrap();
        assert_eq!(position.available_units().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_redeemed_never_exceeds_acquired_per_installment() {
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .with_installment(date(2024, 2, 15), dec!(50))
            .build();

        redeem(&mut position, dec!(20), dec!(55), date(2024, 6, 1)).unwrap();

        for installment in &position.sip().unwrap().installments {
            assert!(installment.redeemed_units <= installment.units);
        }
    }

    #[test]
    fn test_last_redemption_date_is_max_across_installments() {
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .with_installment(date(2024, 2, 15), dec!(50))
            .build();

        redeem(&mut position, dec!(5), dec!(55), date(2024, 7, 1)).unwrap();
        redeem(&mut position, dec!(5), dec!(56), date(2024, 8, 1)).unwrap();

        assert_eq!(position.last_redemption_date(), Some(date(2024, 8, 1)));
    }

    #[test]
    fn test_units_are_not_recomputed_when_prices_move() {
        // Units fix at purchase; a later NAV only affects value, not units
        let position = LumpSumPositionBuilder::new()
            .with_amount(dec!(10000))
            .with_purchase(date(2023, 1, 1), dec!(40))
            .build();

        assert_eq!(position.total_units(), dec!(250));
        let valuation = value_position(&position, dec!(80)).unwrap();
        assert_eq!(valuation.units, dec!(250));
        assert_eq!(valuation.value, dec!(20000.00));
    }
}

// ============================================================================
// FIFO redemption
// ============================================================================

mod fifo_tests {
    use super::*;

    #[test]
    fn test_fifo_across_three_months() {
        // Jan/Feb/Mar installments of 10 units each; 15 requested takes all
        // of Jan, 5 of Feb, and leaves Mar untouched
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .with_installment(date(2024, 2, 15), dec!(50))
            .with_installment(date(2024, 3, 15), dec!(50))
            .build();

        let summary = redeem(&mut position, dec!(15), dec!(60), date(2024, 6, 1)).unwrap();

        let sip = position.sip().unwrap();
        assert_eq!(sip.installments[0].redeemed_units, dec!(10));
        assert_eq!(sip.installments[1].redeemed_units, dec!(5));
        assert_eq!(sip.installments[2].redeemed_units, Decimal::ZERO);
        assert_eq!(summary.tranches.len(), 2);
    }

    #[test]
    fn test_fifo_skips_drained_tranches() {
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .with_installment(date(2024, 2, 15), dec!(50))
            .build();

        redeem(&mut position, dec!(10), dec!(55), date(2024, 5, 1)).unwrap();
        let summary = redeem(&mut position, dec!(4), dec!(56), date(2024, 6, 1)).unwrap();

        // January is empty; the second sale comes entirely from February
        assert_eq!(summary.tranches.len(), 1);
        assert_eq!(summary.tranches[0].acquisition_date, date(2024, 2, 15));
    }

    #[test]
    fn test_atomic_failure_leaves_every_installment_untouched() {
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .with_installment(date(2024, 2, 15), dec!(50))
            .build();

        let result = redeem(&mut position, dec!(20.00000001), dec!(55), date(2024, 6, 1));
        assert!(matches!(
            result,
            Err(HoldingsError::InsufficientUnits { .. })
        ));

        let sip = position.sip().unwrap();
        assert!(sip.installments.iter().all(|i| i.redeemed_units.is_zero()));
        assert!(sip.installments.iter().all(|i| i.redemptions.is_empty()));
        assert_eq!(position.last_redemption_date(), None);
    }
}

// ============================================================================
// Tax regimes through the redemption path
// ============================================================================

mod tax_tests {
    use super::*;

    #[test]
    fn test_equity_long_term_exemption_boundary() {
        // 100 units bought at 1000, sold at 2000 after > 365 days:
        // gain is exactly 100,000, fully absorbed by the exemption
        let mut position = LumpSumPositionBuilder::new()
            .with_scheme_name(labels::EQUITY)
            .with_amount(dec!(100000))
            .with_purchase(date(2021, 1, 1), dec!(1000))
            .build();

        let summary = redeem(&mut position, dec!(100), dec!(2000), date(2023, 1, 1)).unwrap();

        assert_eq!(summary.total_gain, dec!(100000));
        assert_eq!(summary.total_tax, Decimal::ZERO);
        assert_eq!(
            summary.tranches[0].tax_type,
            TaxType::LongTermCapitalGains
        );
    }

    #[test]
    fn test_debt_scheme_taxed_flat_regardless_of_holding_period() {
        let mut position = LumpSumPositionBuilder::new()
            .with_scheme_name(labels::DEBT)
            .with_amount(dec!(10000))
            .with_purchase(date(2018, 1, 1), dec!(10))
            .build();

        // 1000 units, gain 4 per unit after six years: still short-term, 30%
        let summary = redeem(&mut position, dec!(1000), dec!(14), date(2024, 1, 1)).unwrap();

        assert_eq!(
            summary.tranches[0].tax_type,
            TaxType::ShortTermCapitalGains
        );
        assert_eq!(summary.total_tax, dec!(1200.00));
    }

    #[test]
    fn test_hybrid_scheme_uses_equity_regime() {
        let mut position = LumpSumPositionBuilder::new()
            .with_scheme_name(labels::HYBRID)
            .with_amount(dec!(10000))
            .with_purchase(date(2023, 1, 1), dec!(100))
            .build();

        // 100 units sold within a year at a 10/unit gain: 15% STCG
        let summary = redeem(&mut position, dec!(100), dec!(110), date(2023, 9, 1)).unwrap();
        assert_eq!(summary.total_tax, dec!(150.00));
    }

    #[test]
    fn test_unclassified_scheme_assesses_zero_tax() {
        let mut position = LumpSumPositionBuilder::new()
            .with_scheme_name(labels::UNCLASSIFIED)
            .with_amount(dec!(10000))
            .with_purchase(date(2023, 1, 1), dec!(100))
            .build();

        let summary = redeem(&mut position, dec!(50), dec!(150), date(2024, 6, 1)).unwrap();

        assert_eq!(summary.tranches[0].tax_type, TaxType::Unknown);
        assert_eq!(summary.total_tax, Decimal::ZERO);
        assert_eq!(summary.total_gain, dec!(2500));
    }

    #[test]
    fn test_losses_produce_negative_tax_figures() {
        // Documented upstream policy: losses are not floored, so the flat
        // branches emit a negative (rebate) figure the caller can see
        let mut position = LumpSumPositionBuilder::new()
            .with_scheme_name(labels::DEBT)
            .with_amount(dec!(10000))
            .with_purchase(date(2023, 1, 1), dec!(100))
            .build();

        let summary = redeem(&mut position, dec!(100), dec!(90), date(2023, 6, 1)).unwrap();
        assert_eq!(summary.total_gain, dec!(-1000));
        assert_eq!(summary.total_tax, dec!(-300.00));
    }
}

// ============================================================================
// SIP lifecycle
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_deactivation_stamps_end_date_and_is_final() {
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .build();
        let sip = position.sip_mut().unwrap();

        sip.set_status(SipStatus::Inactive, date(2024, 5, 1)).unwrap();
        assert_eq!(sip.status, SipStatus::Inactive);
        assert_eq!(sip.end_date, Some(date(2024, 5, 1)));
        assert!(!sip.is_due_on(15));

        assert!(sip.set_status(SipStatus::Active, date(2024, 6, 1)).is_err());
    }

    #[test]
    fn test_redemption_still_allowed_after_deactivation() {
        // Stopping contributions does not freeze the accumulated units
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 1, 15), dec!(50))
            .build();
        position
            .sip_mut()
            .unwrap()
            .set_status(SipStatus::Inactive, date(2024, 5, 1))
            .unwrap();

        let summary = redeem(&mut position, dec!(10), dec!(55), date(2024, 6, 1)).unwrap();
        assert_eq!(summary.units_redeemed, dec!(10));
    }

    #[test]
    fn test_installments_added_out_of_order_redeem_fifo() {
        let mut position = SipPositionBuilder::new()
            .with_installment(date(2024, 3, 15), dec!(50))
            .with_installment(date(2024, 1, 15), dec!(40))
            .build();

        let summary = redeem(&mut position, dec!(5), dec!(60), date(2024, 6, 1)).unwrap();
        // The January tranche (bought at 40) is consumed first
        assert_eq!(summary.tranches[0].acquisition_date, date(2024, 1, 15));
    }
}
