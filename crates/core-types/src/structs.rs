use crate::money::{MoneyValue, Quotation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single bond instrument as listed by the brokerage.
///
/// Immutable snapshot of the instrument master record; amounts stay in the
/// wire fixed-point encoding until the yield calculation converts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable instrument id used for price and coupon lookups.
    pub uid: String,
    pub ticker: String,
    pub name: String,
    /// Lowercase settlement currency code, e.g. "rub".
    pub currency: String,
    /// Face value of one bond.
    pub nominal: MoneyValue,
    /// Accrued coupon interest owed to the seller on purchase.
    pub aci_value: MoneyValue,
    /// Redemption date. The platform publishes the Unix epoch for stale
    /// records that no longer have a real maturity.
    pub maturity_date: DateTime<Utc>,
    pub perpetual_flag: bool,
    pub floating_coupon_flag: bool,
    pub for_qual_investor_flag: bool,
}

/// The last observed trade price of a bond, quoted as a percentage of
/// nominal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: Quotation,
}

/// One scheduled coupon payment per unit bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponEvent {
    pub coupon_date: DateTime<Utc>,
    /// Payment per bond. Zero means the issuer has not announced the
    /// payment yet, which makes the bond's yield unverifiable.
    pub pay_one_bond: MoneyValue,
}
