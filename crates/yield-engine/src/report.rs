use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The derived yield record for one accepted bond.
///
/// This struct is the final output of the `YieldEngine` and the data
/// transfer object handed to the report sink. It is constructed once per
/// accepted instrument and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldReport {
    pub ticker: String,
    pub name: String,

    // I. Purchase economics, all in domestic currency units.
    /// Face value of one bond.
    pub nominal: Decimal,
    /// Cost of one bond at the last traded price.
    pub price: Decimal,
    /// Accrued coupon interest owed to the seller.
    pub accrued_interest: Decimal,
    /// Flat broker commission on the outlay.
    pub fee: Decimal,
    /// Sum of all coupon payments until the horizon.
    pub coupon_sum: Decimal,

    // II. Horizon and profit.
    /// Offer date when the issuer grants early redemption, else maturity.
    pub horizon_date: NaiveDate,
    /// Total profit of buying now and holding to the horizon.
    pub profit_absolute: Decimal,
    /// Same, after the flat income tax.
    pub profit_absolute_net: Decimal,
    /// Annualized return on outlay, as a percentage.
    pub profit_annual_pct: Decimal,
    /// Annualized post-tax return, as a percentage. The ranking key.
    pub profit_annual_net_pct: Decimal,

    /// Instrument is restricted to qualified investors.
    pub qualified_only: bool,
}

impl YieldReport {
    /// Post-tax annualized yield formatted for display, e.g. `"7.88%"`.
    pub fn annual_net_display(&self) -> String {
        format!("{}%", self.profit_annual_net_pct.round_dp(2))
    }

    /// Horizon date in the day-first format the published sheet uses.
    pub fn horizon_display(&self) -> String {
        self.horizon_date.format("%d.%m.%Y").to_string()
    }
}
