use crate::error::SinkError;
use crate::rows::{HEADERS, SORT_COLUMN, sheet_row};
use crate::ReportSink;
use async_trait::async_trait;
use configuration::SheetConfig;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;
use yield_engine::YieldReport;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes the ranking into a spreadsheet worksheet.
///
/// The worksheet is treated as write-only state: every publish clears it
/// and rewrites it in full. Ordering is delegated to the sheet itself via
/// a sort request on the transient ranking column, which is cleared once
/// the rows are in place.
pub struct SpreadsheetSink {
    client: reqwest::Client,
    config: SheetConfig,
}

impl SpreadsheetSink {
    pub fn new(config: &SheetConfig) -> Result<Self, SinkError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| SinkError::ClientBuild(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            config: SheetConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config.clone()
            },
        })
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.config.base_url, self.config.spreadsheet_id, range, suffix
        )
    }

    async fn check(response: reqwest::Response) -> Result<(), SinkError> {
        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to decode error response".to_string());
            return Err(SinkError::Api(error_text));
        }
        Ok(())
    }

    async fn clear(&self, range: &str) -> Result<(), SinkError> {
        let url = self.values_url(range, ":clear");
        let response = self.client.post(&url).json(&json!({})).send().await?;
        Self::check(response).await
    }

    async fn write_values(&self, range: &str, values: Vec<Vec<Value>>) -> Result<(), SinkError> {
        let url = self.values_url(range, "");
        let response = self
            .client
            .put(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": values }))
            .send()
            .await?;
        Self::check(response).await
    }

    async fn batch_update(&self, requests: Vec<Value>) -> Result<(), SinkError> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.config.base_url, self.config.spreadsheet_id
        );
        let response = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        Self::check(response).await
    }
}

#[async_trait]
impl ReportSink for SpreadsheetSink {
    async fn publish(&self, reports: &[YieldReport]) -> Result<(), SinkError> {
        let worksheet = format!("'{}'", self.config.worksheet);

        // Full rewrite: drop whatever the previous run left behind.
        self.clear(&worksheet).await?;

        let mut values: Vec<Vec<Value>> = Vec::with_capacity(reports.len() + 1);
        values.push(HEADERS.iter().map(|h| Value::from(*h)).collect());
        values.extend(reports.iter().map(sheet_row));
        self.write_values(&format!("{worksheet}!A1"), values).await?;

        self.batch_update(vec![
            bold_header_request(self.config.sheet_id),
            sort_request(self.config.sheet_id),
        ])
        .await?;

        // The ranking column has done its job; keep the persisted sheet
        // to the visible columns only.
        let sort_col = column_letter(SORT_COLUMN);
        self.clear(&format!("{worksheet}!{sort_col}1:{sort_col}"))
            .await?;

        tracing::info!(rows = reports.len(), "ranking published to spreadsheet");
        Ok(())
    }
}

/// A1-notation letter for a zero-based column index.
fn column_letter(index: usize) -> char {
    // The ranking sheet never grows past column Z.
    (b'A' + index as u8) as char
}

fn bold_header_request(sheet_id: i64) -> Value {
    json!({
        "repeatCell": {
            "range": {
                "sheetId": sheet_id,
                "startRowIndex": 0,
                "endRowIndex": 1
            },
            "cell": {
                "userEnteredFormat": { "textFormat": { "bold": true } }
            },
            "fields": "userEnteredFormat.textFormat.bold"
        }
    })
}

fn sort_request(sheet_id: i64) -> Value {
    json!({
        "sortRange": {
            "range": {
                "sheetId": sheet_id,
                "startRowIndex": 1,
                "startColumnIndex": 0,
                "endColumnIndex": SORT_COLUMN + 1
            },
            "sortSpecs": [
                {
                    "dimensionIndex": SORT_COLUMN,
                    "sortOrder": "DESCENDING"
                }
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn report() -> YieldReport {
        YieldReport {
            ticker: "RU000A0001".to_string(),
            name: "Issuer One".to_string(),
            nominal: dec!(1000.00),
            price: dec!(985.00),
            accrued_interest: dec!(12.34),
            fee: dec!(2.99),
            coupon_sum: dec!(45.00),
            horizon_date: NaiveDate::from_ymd_opt(2024, 8, 28).unwrap(),
            profit_absolute: dec!(44.67),
            profit_absolute_net: dec!(38.8629),
            profit_annual_pct: dec!(9.0551),
            profit_annual_net_pct: dec!(7.8779),
            qualified_only: false,
        }
    }

    #[test]
    fn sort_request_targets_the_transient_column() {
        let request = sort_request(0);
        assert_eq!(
            request["sortRange"]["sortSpecs"][0]["dimensionIndex"],
            Value::from(SORT_COLUMN)
        );
        assert_eq!(
            request["sortRange"]["sortSpecs"][0]["sortOrder"],
            Value::from("DESCENDING")
        );
    }

    #[test]
    fn column_letters_follow_a1_notation() {
        assert_eq!(column_letter(0), 'A');
        assert_eq!(column_letter(SORT_COLUMN), 'L');
    }

    #[tokio::test]
    async fn publish_clears_writes_sorts_then_drops_the_sort_column() {
        let server = MockServer::start().await;

        // One clear before writing, one for the sort column afterwards.
        Mock::given(method("POST"))
            .and(path_regex(":clear$"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex("/values/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(":batchUpdate$"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let config = SheetConfig {
            base_url: server.uri(),
            spreadsheet_id: "abc123".to_string(),
            sheet_id: 0,
            worksheet: "Sheet1".to_string(),
            token: "test-token".to_string(),
        };
        let sink = SpreadsheetSink::new(&config).unwrap();

        sink.publish(&[report()]).await.unwrap();
    }

    #[tokio::test]
    async fn failed_sheet_calls_abort_the_publish() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(":clear$"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let config = SheetConfig {
            base_url: server.uri(),
            spreadsheet_id: "abc123".to_string(),
            sheet_id: 0,
            worksheet: "Sheet1".to_string(),
            token: "test-token".to_string(),
        };
        let sink = SpreadsheetSink::new(&config).unwrap();

        match sink.publish(&[report()]).await {
            Err(SinkError::Api(body)) => assert_eq!(body, "permission denied"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
