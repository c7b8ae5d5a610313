use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::core::currency::{CurrencyRateProvider, RateError};

/// Upper bound on a single rate lookup; past this the in-flight request is
/// aborted and the call fails with [`RateError::Timeout`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(9000);

// FreeCurrencyProvider implementation for CurrencyRateProvider
pub struct FreeCurrencyProvider {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl FreeCurrencyProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        FreeCurrencyProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the request timeout. Tests use short windows.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    data: HashMap<String, serde_json::Value>,
}

#[async_trait]
impl CurrencyRateProvider for FreeCurrencyProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        // A currency converts to itself at unity; skip the round-trip.
        if from == to {
            return Ok(1.0);
        }

        let url = format!(
            "{}/v1/latest?apikey={}&base_currency={}&currencies={}",
            self.base_url, self.api_key, from, to
        );
        debug!("Requesting currency rate from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxc/1.0")
            .timeout(self.timeout)
            .build()
            .map_err(|e| RateError::Request(format!("Failed to build HTTP client: {e}")))?;

        let response = client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                RateError::Timeout
            } else {
                RateError::Request(format!("Request error: {e} for currency pair: {from}{to}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.json::<LatestRatesResponse>().await.map_err(|e| {
            if e.is_timeout() {
                RateError::Timeout
            } else {
                RateError::Request(format!("Failed to parse JSON response for {from}{to}: {e}"))
            }
        })?;

        match body.data.get(to).and_then(|v| v.as_f64()) {
            Some(rate) if rate.is_finite() => Ok(rate),
            _ => Err(RateError::Unavailable {
                target: to.to_string(),
            }),
        }
    }
}
