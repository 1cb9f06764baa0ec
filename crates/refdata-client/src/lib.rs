use crate::error::RefdataError;
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::RefdataConfig;
use serde::Deserialize;
use std::time::Duration;

pub mod error;
pub mod retry;

// --- Public API ---
pub use retry::{RetryPolicy, retry_with_policy};

/// The abstract interface for the market reference lookup.
///
/// The lookup is intentionally infallible: a reference outage degrades the
/// ranking horizon to maturity dates, it never fails a run. Implementations
/// absorb their own errors and return `None`.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    /// Returns the issuer-granted early-redemption (offer) date for a
    /// ticker, if the reference service knows one.
    async fn offer_date(&self, ticker: &str) -> Option<NaiveDate>;
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reference client for the exchange's ISS endpoint.
///
/// The security description table carries an `OFFERDATE` row for bonds
/// with an early-redemption offer.
pub struct IssRefdataClient {
    client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl IssRefdataClient {
    pub fn new(config: &RefdataConfig) -> Result<Self, RefdataError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            policy: RetryPolicy::from_config(config),
        })
    }

    async fn fetch_once(&self, ticker: &str) -> Result<Option<NaiveDate>, RefdataError> {
        let url = format!(
            "{}/securities/{}.json?iss.meta=off&iss.only=description",
            self.base_url, ticker
        );

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;

        parse_offer_date(&text)
    }
}

#[async_trait]
impl ReferenceData for IssRefdataClient {
    async fn offer_date(&self, ticker: &str) -> Option<NaiveDate> {
        let looked_up = retry_with_policy(&self.policy, RefdataError::is_retryable, move || {
            self.fetch_once(ticker)
        })
        .await;

        match looked_up {
            Ok(date) => date,
            Err(err) => {
                // Degrade, don't fail: the caller falls back to maturity.
                tracing::warn!(ticker, error = %err, "offer date lookup exhausted, using maturity");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct IssResponse {
    description: IssTable,
}

/// ISS tables are column-name arrays plus row tuples.
#[derive(Debug, Deserialize)]
struct IssTable {
    columns: Vec<String>,
    data: Vec<Vec<serde_json::Value>>,
}

/// Extracts the `OFFERDATE` value from a security description payload.
///
/// Missing row, null value, or the service's `0000-00-00` placeholder all
/// mean "no offer" rather than an error.
fn parse_offer_date(body: &str) -> Result<Option<NaiveDate>, RefdataError> {
    let response: IssResponse =
        serde_json::from_str(body).map_err(|e| RefdataError::Malformed(e.to_string()))?;

    let table = response.description;
    let name_idx = table
        .columns
        .iter()
        .position(|c| c == "name")
        .ok_or_else(|| RefdataError::Malformed("description has no 'name' column".to_string()))?;
    let value_idx = table
        .columns
        .iter()
        .position(|c| c == "value")
        .ok_or_else(|| RefdataError::Malformed("description has no 'value' column".to_string()))?;

    let offer_row = table
        .data
        .iter()
        .find(|row| row.get(name_idx).and_then(|v| v.as_str()) == Some("OFFERDATE"));

    let Some(row) = offer_row else {
        return Ok(None);
    };

    let Some(raw) = row.get(value_idx).and_then(|v| v.as_str()) else {
        return Ok(None);
    };

    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}
