//! Conversion orchestration: validate input, fetch the rate, render the
//! result and record it in history.

use crate::core::currency::{CurrencyRateProvider, RateError};
use crate::core::history::{ConversionRecord, HistoryStore};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Bad user input, detected before any I/O.
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Rate(#[from] RateError),
}

/// A completed conversion plus its user-facing rendering.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub record: ConversionRecord,
    /// e.g. "92.00 EUR"
    pub display_text: String,
    /// e.g. "1 USD = 0.920000 EUR"
    pub rate_text: String,
}

pub struct Converter<P: CurrencyRateProvider> {
    provider: P,
    history: HistoryStore,
}

impl<P: CurrencyRateProvider> Converter<P> {
    pub fn new(provider: P, history: HistoryStore) -> Self {
        Converter { provider, history }
    }

    /// Converts `amount` of `from` into `to`. A successful conversion is
    /// recorded in history; every failure leaves history untouched.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, ConvertError> {
        if from.is_empty() || to.is_empty() {
            return Err(ConvertError::Validation("Select currencies"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConvertError::Validation("Enter valid amount"));
        }

        let rate = self.provider.get_rate(from, to).await?;
        let result = amount * rate;
        debug!(from, to, amount, rate, result, "Conversion complete");

        let record = ConversionRecord {
            timestamp: chrono::Utc::now().timestamp_millis(),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            result,
            rate,
        };
        self.history.add(record.clone());

        Ok(Conversion {
            display_text: format!("{result:.2} {to}"),
            rate_text: format!("1 {from} = {rate:.6} {to}"),
            record,
        })
    }

    /// Replays a history entry with a fresh rate lookup.
    pub async fn convert_record(
        &self,
        record: &ConversionRecord,
    ) -> Result<Conversion, ConvertError> {
        self.convert(&record.from, &record.to, record.amount).await
    }

    /// Snapshot of the recorded conversions, most-recent first.
    pub fn history(&self) -> Vec<ConversionRecord> {
        self.history.load()
    }

    pub fn clear_history(&self) {
        self.history.clear();
    }
}
