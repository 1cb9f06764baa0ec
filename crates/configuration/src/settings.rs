use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub broker: BrokerConfig,
    pub refdata: RefdataConfig,
    pub sheet: SheetConfig,
    pub screening: ScreeningParams,
}

/// Connection parameters for the brokerage REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Base URL of the invest API, without a trailing slash.
    pub base_url: String,
    /// Bearer token. Supplied via the environment, never config.toml.
    #[serde(default)]
    pub token: String,
}

/// Connection and retry parameters for the market reference service
/// that supplies early-redemption (offer) dates.
#[derive(Debug, Clone, Deserialize)]
pub struct RefdataConfig {
    pub base_url: String,
    /// Total attempts per lookup, including the first one.
    pub retry_attempts: u32,
    /// Fixed pause between failed attempts.
    pub retry_delay_secs: u64,
}

/// Target spreadsheet for the published ranking.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    /// Numeric grid id of the worksheet inside the spreadsheet.
    pub sheet_id: i64,
    /// Worksheet title, used for A1-notation value ranges.
    pub worksheet: String,
    /// OAuth access token. Supplied via the environment.
    #[serde(default)]
    pub token: String,
}

/// Parameters of the yield screening itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningParams {
    /// Only bonds settled in this currency are ranked.
    pub currency: String,
    /// Flat broker commission on the purchase outlay (0.003 = 0.3%).
    pub fee_rate: Decimal,
    /// Fraction of profit retained after the flat income tax (0.87 = 13% tax).
    pub tax_retention: Decimal,
}
