use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount as published by the brokerage API: whole currency
/// units plus a signed nano-unit remainder (10^-9 of a unit).
///
/// The platform only quotes bond amounts to centi-unit (two decimal place)
/// precision; anything below that in the `nano` field is feed noise, so the
/// conversion truncates rather than rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyValue {
    pub units: i64,
    pub nano: i32,
}

/// A unitless price quotation in the same fixed-point wire encoding.
/// For bonds the quotation is expressed as a percentage of nominal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    pub units: i64,
    pub nano: i32,
}

/// Converts the wire fixed-point pair into a two-decimal `Decimal`.
///
/// A well-formed `nano` spans the full nine digits, so integer division by
/// 10^7 yields the centi-unit count. Malformed short values (e.g. `nano: 5`)
/// truncate to zero instead of being misread as 0.05.
fn fixed_point(units: i64, nano: i32) -> Decimal {
    let centi = i64::from(nano / 10_000_000);
    Decimal::from(units) + Decimal::new(centi, 2)
}

impl MoneyValue {
    pub fn new(units: i64, nano: i32) -> Self {
        Self { units, nano }
    }

    /// Builds a `MoneyValue` from the wire representation, where `units`
    /// arrives as a decimal string (int64 is not representable in JSON).
    pub fn from_wire(units: &str, nano: i32) -> Result<Self, CoreError> {
        let units = units
            .parse::<i64>()
            .map_err(|e| CoreError::InvalidInput("units".to_string(), e.to_string()))?;
        Ok(Self { units, nano })
    }

    pub fn to_decimal(&self) -> Decimal {
        fixed_point(self.units, self.nano)
    }

    /// A zero amount signals "payment not yet known" in coupon schedules.
    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.nano == 0
    }
}

impl Quotation {
    pub fn new(units: i64, nano: i32) -> Self {
        Self { units, nano }
    }

    pub fn from_wire(units: &str, nano: i32) -> Result<Self, CoreError> {
        let units = units
            .parse::<i64>()
            .map_err(|e| CoreError::InvalidInput("units".to_string(), e.to_string()))?;
        Ok(Self { units, nano })
    }

    pub fn to_decimal(&self) -> Decimal {
        fixed_point(self.units, self.nano)
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.nano == 0
    }
}
