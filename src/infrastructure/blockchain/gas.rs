//! # Gas Price Oracle
//!
//! Best-effort gas price suggestions from an external HTTP data source.
//!
//! The oracle never fails from the caller's point of view: network errors,
//! timeouts and unparseable bodies all degrade to
//! [`FALLBACK_GAS_PRICE_GWEI`].

use super::client::BlockchainResult;
use crate::infrastructure::http_client::HttpClient;
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default oracle endpoint (ETH Gas Station).
pub const DEFAULT_GAS_ORACLE_URL: &str = "https://ethgasstation.info/json/ethgasAPI.json";

/// Price returned when the oracle cannot be used, in gwei.
pub const FALLBACK_GAS_PRICE_GWEI: u64 = 30;

/// Default oracle request timeout in milliseconds.
pub const DEFAULT_GAS_ORACLE_TIMEOUT_MS: u64 = 5_000;

const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Oracle response body.
///
/// Prices are expressed in tenths of a gwei.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasStationPrices {
    /// Price for fast inclusion.
    pub fast: f64,
    /// Price for fastest inclusion.
    #[serde(default)]
    pub fastest: f64,
    /// Price for slow inclusion.
    #[serde(default, rename = "safeLow")]
    pub safe_low: f64,
    /// Average price.
    #[serde(default)]
    pub average: f64,
}

impl GasStationPrices {
    /// Returns the fast price in whole gwei, rounded toward zero.
    #[must_use]
    pub fn fast_gwei(&self) -> u64 {
        // `as` saturates: negative and NaN map to 0.
        (self.fast / 10.0) as u64
    }
}

/// Converts a gwei amount to wei.
#[must_use]
pub fn gwei_to_wei(gwei: u64) -> U256 {
    U256::from(gwei) * U256::from(WEI_PER_GWEI)
}

/// Gas price oracle client.
#[derive(Debug, Clone)]
pub struct GasPriceOracle {
    http: HttpClient,
    url: String,
}

impl GasPriceOracle {
    /// Creates an oracle for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> BlockchainResult<Self> {
        Ok(Self {
            http: HttpClient::new(timeout_ms)?,
            url: url.into(),
        })
    }

    /// Creates an oracle for the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> BlockchainResult<Self> {
        Self::new(DEFAULT_GAS_ORACLE_URL, DEFAULT_GAS_ORACLE_TIMEOUT_MS)
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the raw price table.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, or malformed body.
    pub async fn fetch_prices(&self) -> BlockchainResult<GasStationPrices> {
        self.http.get(&self.url).await
    }

    /// Returns the suggested gas price in gwei, or the fallback.
    pub async fn suggest_gas_price_gwei(&self) -> u64 {
        match self.fetch_prices().await {
            Ok(prices) => {
                let gwei = prices.fast_gwei();
                debug!(gwei, "gas oracle suggestion");
                gwei
            }
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = FALLBACK_GAS_PRICE_GWEI,
                    "gas oracle unavailable, using fallback price"
                );
                FALLBACK_GAS_PRICE_GWEI
            }
        }
    }

    /// Returns the suggested gas price in wei, or the fallback.
    pub async fn suggest_gas_price_wei(&self) -> U256 {
        gwei_to_wei(self.suggest_gas_price_gwei().await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oracle_for(server: &MockServer) -> GasPriceOracle {
        GasPriceOracle::new(server.uri(), 500).unwrap()
    }

    #[test]
    fn fast_gwei_truncates() {
        let prices = GasStationPrices {
            fast: 123.4,
            fastest: 200.0,
            safe_low: 80.0,
            average: 100.0,
        };
        assert_eq!(prices.fast_gwei(), 12);
    }

    #[test]
    fn fast_gwei_negative_is_zero() {
        let prices = GasStationPrices {
            fast: -5.0,
            fastest: 0.0,
            safe_low: 0.0,
            average: 0.0,
        };
        assert_eq!(prices.fast_gwei(), 0);
    }

    #[test]
    fn gwei_conversion() {
        assert_eq!(gwei_to_wei(30), U256::from(30_000_000_000u64));
    }

    #[test]
    fn default_oracle_url() {
        let oracle = GasPriceOracle::with_defaults().unwrap();
        assert_eq!(oracle.url(), DEFAULT_GAS_ORACLE_URL);
    }

    #[tokio::test]
    async fn suggests_fast_over_ten() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fast": 123.4,
                "fastest": 150.0,
                "safeLow": 90.0,
                "average": 100.0
            })))
            .mount(&server)
            .await;

        let oracle = oracle_for(&server);
        assert_eq!(oracle.suggest_gas_price_gwei().await, 12);
        assert_eq!(
            oracle.suggest_gas_price_wei().await,
            U256::from(12_000_000_000u64)
        );
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let oracle = oracle_for(&server);
        assert_eq!(oracle.suggest_gas_price_gwei().await, FALLBACK_GAS_PRICE_GWEI);
    }

    #[tokio::test]
    async fn missing_fast_field_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "average": 10.0 })))
            .mount(&server)
            .await;

        let oracle = oracle_for(&server);
        assert_eq!(oracle.suggest_gas_price_gwei().await, 30);
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let oracle = oracle_for(&server);
        assert_eq!(oracle.suggest_gas_price_gwei().await, 30);
    }

    #[tokio::test]
    async fn timeout_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "fast": 500.0 }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let oracle = GasPriceOracle::new(server.uri(), 100).unwrap();
        assert_eq!(oracle.suggest_gas_price_gwei().await, 30);
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let oracle = GasPriceOracle::new("http://127.0.0.1:1/gas", 500).unwrap();
        assert_eq!(oracle.suggest_gas_price_gwei().await, FALLBACK_GAS_PRICE_GWEI);
    }
}
