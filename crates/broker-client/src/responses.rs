use crate::error::BrokerError;
use chrono::{DateTime, Utc};
use core_types::{CouponEvent, Instrument, MoneyValue, PriceQuote, Quotation};
use serde::Deserialize;

// The invest API speaks proto3-mapped JSON: field names are camelCase,
// int64 values arrive as strings, and fields holding their default value
// (zero, false, empty) may be omitted entirely. Every optional-looking
// field below is `#[serde(default)]` for that reason.

fn zero_units() -> String {
    "0".to_string()
}

/// A monetary amount on the wire: string units plus nano remainder.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMoney {
    #[serde(default = "zero_units")]
    pub units: String,
    #[serde(default)]
    pub nano: i32,
}

impl RawMoney {
    fn into_money(self) -> Result<MoneyValue, BrokerError> {
        MoneyValue::from_wire(&self.units, self.nano)
            .map_err(|e| BrokerError::InvalidData(e.to_string()))
    }

    fn into_quotation(self) -> Result<Quotation, BrokerError> {
        Quotation::from_wire(&self.units, self.nano)
            .map_err(|e| BrokerError::InvalidData(e.to_string()))
    }
}

/// The response from `InstrumentsService/Bonds`.
#[derive(Debug, Deserialize)]
pub struct BondsResponse {
    #[serde(default)]
    pub instruments: Vec<RawBond>,
}

/// One bond from the instrument master list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBond {
    pub uid: String,
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub currency: String,
    pub nominal: RawMoney,
    #[serde(default)]
    pub aci_value: Option<RawMoney>,
    /// Stale records carry the Unix epoch here; the field may also be
    /// omitted outright, which maps to the same sentinel.
    #[serde(default = "unix_epoch")]
    pub maturity_date: DateTime<Utc>,
    #[serde(default)]
    pub perpetual_flag: bool,
    #[serde(default)]
    pub floating_coupon_flag: bool,
    #[serde(default)]
    pub for_qual_investor_flag: bool,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl RawBond {
    pub fn into_instrument(self) -> Result<Instrument, BrokerError> {
        let aci_value = match self.aci_value {
            Some(raw) => raw.into_money()?,
            None => MoneyValue::new(0, 0),
        };
        Ok(Instrument {
            uid: self.uid,
            ticker: self.ticker,
            name: self.name,
            currency: self.currency.to_lowercase(),
            nominal: self.nominal.into_money()?,
            aci_value,
            maturity_date: self.maturity_date,
            perpetual_flag: self.perpetual_flag,
            floating_coupon_flag: self.floating_coupon_flag,
            for_qual_investor_flag: self.for_qual_investor_flag,
        })
    }
}

/// The response from `MarketDataService/GetLastPrices`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastPricesResponse {
    #[serde(default)]
    pub last_prices: Vec<RawLastPrice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLastPrice {
    #[serde(default)]
    pub price: Option<RawMoney>,
}

impl RawLastPrice {
    pub fn into_quote(self) -> Result<PriceQuote, BrokerError> {
        let price = match self.price {
            Some(raw) => raw.into_quotation()?,
            // An instrument that has never traded reports no price at all;
            // it surfaces downstream as a zero price and is screened out.
            None => Quotation::new(0, 0),
        };
        Ok(PriceQuote { price })
    }
}

/// The response from `InstrumentsService/GetBondCoupons`.
#[derive(Debug, Deserialize)]
pub struct CouponsResponse {
    #[serde(default)]
    pub events: Vec<RawCoupon>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCoupon {
    pub coupon_date: DateTime<Utc>,
    /// Omitted when the payment is not announced yet.
    #[serde(default)]
    pub pay_one_bond: Option<RawMoney>,
}

impl RawCoupon {
    pub fn into_event(self) -> Result<CouponEvent, BrokerError> {
        let pay_one_bond = match self.pay_one_bond {
            Some(raw) => raw.into_money()?,
            None => MoneyValue::new(0, 0),
        };
        Ok(CouponEvent {
            coupon_date: self.coupon_date,
            pay_one_bond,
        })
    }
}
