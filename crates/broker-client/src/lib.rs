use crate::error::BrokerError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use configuration::BrokerConfig;
use core_types::{CouponEvent, Instrument, PriceQuote};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{BondsResponse, CouponsResponse, LastPricesResponse};

/// The generic, abstract interface for the bond instrument source.
/// This trait is the contract the screening loop uses, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait BrokerApi: Send + Sync {
    /// Fetches the full bond instrument list.
    async fn list_bonds(&self) -> Result<Vec<Instrument>, BrokerError>;

    /// Fetches the last traded price for one instrument.
    async fn last_price(&self, uid: &str) -> Result<PriceQuote, BrokerError>;

    /// Fetches the coupon schedule for one instrument within a date window.
    async fn coupon_events(
        &self,
        uid: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CouponEvent>, BrokerError>;
}

// Service paths of the invest REST gateway.
const BONDS_PATH: &str = "/tinkoff.public.invest.api.contract.v1.InstrumentsService/Bonds";
const LAST_PRICES_PATH: &str =
    "/tinkoff.public.invest.api.contract.v1.MarketDataService/GetLastPrices";
const COUPONS_PATH: &str =
    "/tinkoff.public.invest.api.contract.v1.InstrumentsService/GetBondCoupons";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A concrete implementation of `BrokerApi` for the invest REST gateway.
#[derive(Clone)]
pub struct InvestRestClient {
    client: reqwest::Client,
    base_url: String,
}

impl InvestRestClient {
    pub fn new(config: &BrokerConfig) -> Result<Self, BrokerError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| BrokerError::ClientBuild(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BrokerError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// All gateway methods are POSTs with a JSON body, mirroring the
    /// underlying gRPC services.
    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BrokerError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| BrokerError::Deserialization(e.to_string()))
        } else {
            Err(BrokerError::Api(status, text))
        }
    }
}

#[async_trait]
impl BrokerApi for InvestRestClient {
    async fn list_bonds(&self) -> Result<Vec<Instrument>, BrokerError> {
        let body = serde_json::json!({ "instrumentStatus": "INSTRUMENT_STATUS_BASE" });
        let response: BondsResponse = self.post(BONDS_PATH, &body).await?;

        response
            .instruments
            .into_iter()
            .map(|raw| raw.into_instrument())
            .collect()
    }

    async fn last_price(&self, uid: &str) -> Result<PriceQuote, BrokerError> {
        let body = serde_json::json!({ "instrumentId": [uid] });
        let response: LastPricesResponse = self.post(LAST_PRICES_PATH, &body).await?;

        match response.last_prices.into_iter().next() {
            Some(raw) => raw.into_quote(),
            // No snapshot for this instrument; screened out as zero price.
            None => Ok(PriceQuote {
                price: core_types::Quotation::new(0, 0),
            }),
        }
    }

    async fn coupon_events(
        &self,
        uid: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CouponEvent>, BrokerError> {
        let body = serde_json::json!({
            "instrumentId": uid,
            "from": from.to_rfc3339(),
            "to": to.to_rfc3339(),
        });
        let response: CouponsResponse = self.post(COUPONS_PATH, &body).await?;

        response
            .events
            .into_iter()
            .map(|raw| raw.into_event())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> BrokerConfig {
        BrokerConfig {
            base_url,
            token: "test-token".to_string(),
        }
    }

    #[tokio::test]
    async fn bonds_payload_deserializes_into_instruments() {
        let server = MockServer::start().await;
        let body = r#"{
            "instruments": [
                {
                    "uid": "u1",
                    "ticker": "RU000A0001",
                    "name": "Issuer One",
                    "currency": "rub",
                    "nominal": {"currency": "rub", "units": "1000", "nano": 0},
                    "aciValue": {"currency": "rub", "units": "12", "nano": 340000000},
                    "maturityDate": "2026-05-20T00:00:00Z",
                    "floatingCouponFlag": true
                },
                {
                    "uid": "u2",
                    "ticker": "RU000A0002",
                    "name": "Issuer Two",
                    "currency": "rub",
                    "nominal": {"currency": "rub", "units": "500"}
                }
            ]
        }"#;
        Mock::given(method("POST"))
            .and(path(BONDS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let client = InvestRestClient::new(&config(server.uri())).unwrap();
        let bonds = client.list_bonds().await.unwrap();

        assert_eq!(bonds.len(), 2);
        assert_eq!(bonds[0].ticker, "RU000A0001");
        assert!(bonds[0].floating_coupon_flag);
        assert_eq!(bonds[0].aci_value, core_types::MoneyValue::new(12, 340_000_000));
        // Omitted proto3 defaults: epoch maturity, false flags, zero ACI.
        assert_eq!(bonds[1].maturity_date, DateTime::UNIX_EPOCH);
        assert!(!bonds[1].perpetual_flag);
        assert!(bonds[1].aci_value.is_zero());
    }

    #[tokio::test]
    async fn missing_last_price_degrades_to_zero_quote() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LAST_PRICES_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"lastPrices": []}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client = InvestRestClient::new(&config(server.uri())).unwrap();
        let quote = client.last_price("u1").await.unwrap();
        assert!(quote.price.is_zero());
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BONDS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthenticated"))
            .mount(&server)
            .await;

        let client = InvestRestClient::new(&config(server.uri())).unwrap();
        match client.list_bonds().await {
            Err(BrokerError::Api(status, body)) => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "unauthenticated");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
