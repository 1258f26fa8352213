use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::gold::SpotPriceProvider;

/// Spot gold client for the metals.live API. Returns USD per troy ounce.
pub struct MetalsLiveProvider {
    base_url: String,
    client: reqwest::Client,
}

impl MetalsLiveProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("aurum/0.1")
            .timeout(timeout)
            .build()?;
        Ok(MetalsLiveProvider {
            base_url: base_url.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SpotResponse {
    price: f64,
}

#[async_trait]
impl SpotPriceProvider for MetalsLiveProvider {
    async fn fetch_spot_per_ounce(&self) -> Result<f64> {
        let url = format!("{}/v1/spot/gold", self.base_url);
        debug!("Requesting gold spot price from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from gold oracle", response.status()));
        }

        let text = response.text().await?;
        let data: SpotResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse gold spot response: {}", e))?;

        Ok(data.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_oracle(mock_response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/spot/gold"))
            .respond_with(mock_response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(base_url: &str) -> MetalsLiveProvider {
        MetalsLiveProvider::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_spot_fetch() {
        let mock_server =
            create_mock_oracle(ResponseTemplate::new(200).set_body_string(r#"{"price": 2021.55}"#))
                .await;

        let spot = provider(&mock_server.uri())
            .fetch_spot_per_ounce()
            .await
            .unwrap();
        assert_eq!(spot, 2021.55);
    }

    #[tokio::test]
    async fn test_extra_fields_are_ignored() {
        let body = r#"{"metal": "gold", "price": 1987.0, "currency": "USD"}"#;
        let mock_server =
            create_mock_oracle(ResponseTemplate::new(200).set_body_string(body)).await;

        let spot = provider(&mock_server.uri())
            .fetch_spot_per_ounce()
            .await
            .unwrap();
        assert_eq!(spot, 1987.0);
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let mock_server = create_mock_oracle(ResponseTemplate::new(500)).await;

        let result = provider(&mock_server.uri()).fetch_spot_per_ounce().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error from gold oracle"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server =
            create_mock_oracle(ResponseTemplate::new(200).set_body_string(r#"{"spot": "high"}"#))
                .await;

        let result = provider(&mock_server.uri()).fetch_spot_per_ounce().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse gold spot response")
        );
    }

    #[tokio::test]
    async fn test_non_numeric_price_field() {
        let mock_server = create_mock_oracle(
            ResponseTemplate::new(200).set_body_string(r#"{"price": "2021.55"}"#),
        )
        .await;

        let result = provider(&mock_server.uri()).fetch_spot_per_ounce().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let mock_server = create_mock_oracle(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"price": 2000.0}"#)
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let tight = MetalsLiveProvider::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();
        let result = tight.fetch_spot_per_ounce().await;
        assert!(result.is_err());
    }
}
