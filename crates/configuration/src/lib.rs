use crate::error::ConfigError;
use rust_decimal::Decimal;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{BrokerConfig, RefdataConfig, ScreeningParams, Settings, SheetConfig};

/// Loads the application configuration from `config.toml` plus the
/// environment.
///
/// Environment variables use the `BONDSCREEN` prefix with `__` as the
/// nesting separator, so `BONDSCREEN_BROKER__TOKEN` fills `broker.token`.
/// This keeps the two API tokens out of the checked-in file.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml"))
        .add_source(config::Environment::with_prefix("BONDSCREEN").separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    Ok(settings)
}

/// Rejects configurations that would silently produce nonsense rankings.
fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let s = &settings.screening;
    if s.fee_rate < Decimal::ZERO || s.fee_rate >= Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "screening.fee_rate must be in [0, 1), got {}",
            s.fee_rate
        )));
    }
    if s.tax_retention <= Decimal::ZERO || s.tax_retention > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "screening.tax_retention must be in (0, 1], got {}",
            s.tax_retention
        )));
    }
    if settings.refdata.retry_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "refdata.retry_attempts must be at least 1".to_string(),
        ));
    }
    Ok(())
}
