//! Core business logic abstractions

pub mod currency;
pub mod history;

// Re-export main types for cleaner imports
pub use currency::{CurrencyRateProvider, RateError};
pub use history::{ConversionRecord, HistoryStore};
