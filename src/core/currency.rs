//! Currency conversion abstractions

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of a single rate lookup.
#[derive(Debug, Error)]
pub enum RateError {
    /// No response arrived within the request timeout window.
    #[error("Request timed out")]
    Timeout,

    /// The rate endpoint answered with a non-success status.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The response was well-formed but carried no usable rate for the
    /// requested currency.
    #[error("Rate not available for {target}")]
    Unavailable { target: String },

    /// Transport or decoding failure.
    #[error("{0}")]
    Request(String),
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Returns the units of `to` equivalent to one unit of `from`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateError>;
}
