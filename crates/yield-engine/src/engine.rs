use crate::error::EngineError;
use crate::report::YieldReport;
use chrono::{DateTime, NaiveDate, Utc};
use configuration::ScreeningParams;
use core_types::{CouponEvent, Instrument, PriceQuote};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days-per-year convention used for annualization.
const DAYS_PER_YEAR: i64 = 365;

/// Why a bond was excluded from the ranking.
///
/// Every reason maps to a source-data condition under which the realized
/// yield either does not exist or cannot be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Settled in a currency other than the configured domestic one.
    ForeignCurrency,
    /// No finite redemption horizon.
    Perpetual,
    /// Future coupons are reset from a reference rate and unknowable today.
    FloatingCoupon,
    /// Maturity equals the platform's epoch-zero sentinel for stale records.
    StaleRecord,
    /// A coupon in the remaining schedule has no announced payment yet.
    UnknownCoupon,
    /// The last traded price is zero.
    ZeroPrice,
    /// Horizon date is today or already passed.
    HorizonPassed,
    /// Buying at the current price locks in a loss.
    NegativeProfit,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectReason::ForeignCurrency => "foreign currency",
            RejectReason::Perpetual => "perpetual",
            RejectReason::FloatingCoupon => "floating coupon",
            RejectReason::StaleRecord => "stale record",
            RejectReason::UnknownCoupon => "unknown coupon",
            RejectReason::ZeroPrice => "zero price",
            RejectReason::HorizonPassed => "horizon passed",
            RejectReason::NegativeProfit => "negative profit",
        };
        f.write_str(label)
    }
}

/// The tagged result of screening one bond.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreeningOutcome {
    Accepted(YieldReport),
    Rejected(RejectReason),
}

/// A stateless calculator deriving the realized-yield report for one bond.
#[derive(Debug, Clone)]
pub struct YieldEngine {
    params: ScreeningParams,
}

impl YieldEngine {
    pub fn new(params: ScreeningParams) -> Self {
        Self { params }
    }

    /// Checks the instrument master record alone, before any market data
    /// has been fetched for it.
    ///
    /// The orchestration loop calls this first so that bonds which can
    /// never be ranked don't cost three network round-trips. `evaluate`
    /// re-applies the same checks, so callers are free to skip this.
    pub fn pre_reject(&self, bond: &Instrument) -> Option<RejectReason> {
        if bond.currency != self.params.currency {
            return Some(RejectReason::ForeignCurrency);
        }
        if bond.perpetual_flag {
            return Some(RejectReason::Perpetual);
        }
        if bond.floating_coupon_flag {
            return Some(RejectReason::FloatingCoupon);
        }
        // Expired bonds linger in the instrument database with their
        // maturity reset to the Unix epoch.
        if bond.maturity_date == DateTime::UNIX_EPOCH {
            return Some(RejectReason::StaleRecord);
        }
        None
    }

    /// Screens one bond and, if every validity check passes, derives its
    /// yield report.
    ///
    /// # Arguments
    ///
    /// * `bond` - The instrument master record.
    /// * `quote` - Last traded price, as a percentage of nominal.
    /// * `coupons` - Remaining coupon events between `now` and the horizon.
    /// * `offer_date` - Early-redemption date, when the reference service
    ///   knows one; supersedes maturity as the payoff horizon.
    /// * `now` - The evaluation instant. Passed in explicitly so the
    ///   calculation stays deterministic and testable.
    pub fn evaluate(
        &self,
        bond: &Instrument,
        quote: &PriceQuote,
        coupons: &[CouponEvent],
        offer_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<ScreeningOutcome, EngineError> {
        if let Some(reason) = self.pre_reject(bond) {
            return Ok(ScreeningOutcome::Rejected(reason));
        }

        // A zero payment means "not announced yet", not "nothing due";
        // the yield would be unverifiable.
        if coupons.iter().any(|c| c.pay_one_bond.is_zero()) {
            return Ok(ScreeningOutcome::Rejected(RejectReason::UnknownCoupon));
        }

        let nominal = bond.nominal.to_decimal();

        // The quote is a percentage of nominal, so rescale it into currency.
        let price = quote.price.to_decimal() / Decimal::ONE_HUNDRED * nominal;
        if price.is_zero() {
            return Ok(ScreeningOutcome::Rejected(RejectReason::ZeroPrice));
        }

        let accrued_interest = bond.aci_value.to_decimal();
        let fee = ((price + accrued_interest) * self.params.fee_rate).round_dp(2);

        let coupon_sum: Decimal = coupons.iter().map(|c| c.pay_one_bond.to_decimal()).sum();

        let horizon_date = offer_date.unwrap_or_else(|| bond.maturity_date.date_naive());
        let days_remaining = (horizon_date - now.date_naive()).num_days();
        if days_remaining <= 0 {
            return Ok(ScreeningOutcome::Rejected(RejectReason::HorizonPassed));
        }

        let profit_absolute =
            (nominal - price - accrued_interest - fee + coupon_sum).round_dp(2);
        if profit_absolute < Decimal::ZERO {
            return Ok(ScreeningOutcome::Rejected(RejectReason::NegativeProfit));
        }

        let outlay = price + accrued_interest + fee;
        let profit_ratio = profit_absolute
            .checked_div(outlay)
            .ok_or_else(|| EngineError::DivisionByZero("profit ratio".to_string()))?;

        let profit_annual_pct = profit_ratio * Decimal::from(DAYS_PER_YEAR)
            / Decimal::from(days_remaining)
            * Decimal::ONE_HUNDRED;

        Ok(ScreeningOutcome::Accepted(YieldReport {
            ticker: bond.ticker.clone(),
            name: bond.name.clone(),
            nominal,
            price,
            accrued_interest,
            fee,
            coupon_sum,
            horizon_date,
            profit_absolute,
            profit_absolute_net: profit_absolute * self.params.tax_retention,
            profit_annual_pct,
            profit_annual_net_pct: profit_annual_pct * self.params.tax_retention,
            qualified_only: bond.for_qual_investor_flag,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_types::{MoneyValue, Quotation};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn params() -> ScreeningParams {
        ScreeningParams {
            currency: "rub".to_string(),
            fee_rate: dec!(0.003),
            tax_retention: dec!(0.87),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn bond() -> Instrument {
        Instrument {
            uid: "uid-1".to_string(),
            ticker: "RU000A0001".to_string(),
            name: "Test Issuer 001".to_string(),
            currency: "rub".to_string(),
            nominal: MoneyValue::new(1000, 0),
            aci_value: MoneyValue::new(12, 340_000_000),
            maturity_date: now() + Duration::days(365),
            perpetual_flag: false,
            floating_coupon_flag: false,
            for_qual_investor_flag: false,
        }
    }

    fn quote() -> PriceQuote {
        PriceQuote {
            price: Quotation::new(98, 500_000_000),
        }
    }

    fn coupons() -> Vec<CouponEvent> {
        vec![CouponEvent {
            coupon_date: now() + Duration::days(90),
            pay_one_bond: MoneyValue::new(45, 0),
        }]
    }

    fn offer_in_180_days() -> Option<NaiveDate> {
        Some((now() + Duration::days(180)).date_naive())
    }

    fn accepted(outcome: ScreeningOutcome) -> YieldReport {
        match outcome {
            ScreeningOutcome::Accepted(report) => report,
            ScreeningOutcome::Rejected(reason) => panic!("unexpected rejection: {reason}"),
        }
    }

    #[test]
    fn worked_scenario_matches_hand_computation() {
        let engine = YieldEngine::new(params());
        let outcome = engine
            .evaluate(&bond(), &quote(), &coupons(), offer_in_180_days(), now())
            .unwrap();
        let report = accepted(outcome);

        // nominal 1000.00, price 98.50% -> 985.00, ACI 12.34
        assert_eq!(report.nominal, dec!(1000.00));
        assert_eq!(report.price, dec!(985.0000));
        assert_eq!(report.accrued_interest, dec!(12.34));
        // fee = round(0.003 * 997.34, 2)
        assert_eq!(report.fee, dec!(2.99));
        assert_eq!(report.coupon_sum, dec!(45.00));
        // profit = 1000 - 985 - 12.34 - 2.99 + 45.00
        assert_eq!(report.profit_absolute, dec!(44.67));
        // 44.67 / 1000.33 * 365 / 180, as a percentage
        assert_eq!(report.profit_annual_pct.round_dp(2), dec!(9.06));
        assert_eq!(report.annual_net_display(), "7.88%");
    }

    #[test]
    fn post_tax_is_exactly_the_retention_multiple() {
        let engine = YieldEngine::new(params());
        let report = accepted(
            engine
                .evaluate(&bond(), &quote(), &coupons(), offer_in_180_days(), now())
                .unwrap(),
        );
        assert_eq!(
            report.profit_annual_net_pct,
            report.profit_annual_pct * dec!(0.87)
        );
        assert_eq!(
            report.profit_absolute_net,
            report.profit_absolute * dec!(0.87)
        );
    }

    #[test]
    fn evaluation_is_deterministic() {
        let engine = YieldEngine::new(params());
        let first = engine
            .evaluate(&bond(), &quote(), &coupons(), offer_in_180_days(), now())
            .unwrap();
        let second = engine
            .evaluate(&bond(), &quote(), &coupons(), offer_in_180_days(), now())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn foreign_currency_is_rejected() {
        let engine = YieldEngine::new(params());
        let mut b = bond();
        b.currency = "usd".to_string();
        let outcome = engine
            .evaluate(&b, &quote(), &coupons(), offer_in_180_days(), now())
            .unwrap();
        assert_eq!(
            outcome,
            ScreeningOutcome::Rejected(RejectReason::ForeignCurrency)
        );
    }

    #[test]
    fn perpetual_and_floating_bonds_are_rejected() {
        let engine = YieldEngine::new(params());

        let mut perpetual = bond();
        perpetual.perpetual_flag = true;
        assert_eq!(
            engine.pre_reject(&perpetual),
            Some(RejectReason::Perpetual)
        );

        let mut floater = bond();
        floater.floating_coupon_flag = true;
        assert_eq!(
            engine.pre_reject(&floater),
            Some(RejectReason::FloatingCoupon)
        );
    }

    #[test]
    fn epoch_zero_maturity_is_rejected_as_stale() {
        let engine = YieldEngine::new(params());
        let mut b = bond();
        b.maturity_date = DateTime::UNIX_EPOCH;
        let outcome = engine
            .evaluate(&b, &quote(), &coupons(), None, now())
            .unwrap();
        assert_eq!(outcome, ScreeningOutcome::Rejected(RejectReason::StaleRecord));
    }

    #[test]
    fn zero_coupon_payment_rejects_regardless_of_other_fields() {
        let engine = YieldEngine::new(params());
        let mut events = coupons();
        events.push(CouponEvent {
            coupon_date: now() + Duration::days(150),
            pay_one_bond: MoneyValue::new(0, 0),
        });
        let outcome = engine
            .evaluate(&bond(), &quote(), &events, offer_in_180_days(), now())
            .unwrap();
        assert_eq!(
            outcome,
            ScreeningOutcome::Rejected(RejectReason::UnknownCoupon)
        );
    }

    #[test]
    fn zero_price_is_rejected() {
        let engine = YieldEngine::new(params());
        let q = PriceQuote {
            price: Quotation::new(0, 0),
        };
        let outcome = engine
            .evaluate(&bond(), &q, &coupons(), offer_in_180_days(), now())
            .unwrap();
        assert_eq!(outcome, ScreeningOutcome::Rejected(RejectReason::ZeroPrice));
    }

    #[test]
    fn horizon_today_or_earlier_is_rejected() {
        let engine = YieldEngine::new(params());

        let today = Some(now().date_naive());
        let outcome = engine
            .evaluate(&bond(), &quote(), &coupons(), today, now())
            .unwrap();
        assert_eq!(
            outcome,
            ScreeningOutcome::Rejected(RejectReason::HorizonPassed)
        );

        let yesterday = Some((now() - Duration::days(1)).date_naive());
        let outcome = engine
            .evaluate(&bond(), &quote(), &coupons(), yesterday, now())
            .unwrap();
        assert_eq!(
            outcome,
            ScreeningOutcome::Rejected(RejectReason::HorizonPassed)
        );
    }

    #[test]
    fn negative_profit_is_rejected() {
        let engine = YieldEngine::new(params());
        // Paying 120% of nominal with only 45.00 of coupons left is a loss.
        let q = PriceQuote {
            price: Quotation::new(120, 0),
        };
        let outcome = engine
            .evaluate(&bond(), &q, &coupons(), offer_in_180_days(), now())
            .unwrap();
        assert_eq!(
            outcome,
            ScreeningOutcome::Rejected(RejectReason::NegativeProfit)
        );
    }

    #[test]
    fn missing_offer_date_falls_back_to_maturity() {
        let engine = YieldEngine::new(params());
        let report = accepted(
            engine
                .evaluate(&bond(), &quote(), &coupons(), None, now())
                .unwrap(),
        );
        assert_eq!(report.horizon_date, bond().maturity_date.date_naive());
    }

    #[test]
    fn qualified_investor_flag_passes_through() {
        let engine = YieldEngine::new(params());
        let mut b = bond();
        b.for_qual_investor_flag = true;
        let report = accepted(
            engine
                .evaluate(&b, &quote(), &coupons(), offer_in_180_days(), now())
                .unwrap(),
        );
        assert!(report.qualified_only);
    }
}
