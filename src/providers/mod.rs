pub mod freecurrency;

// Re-export the provider trait for callers wiring up a converter
pub use crate::core::currency::CurrencyRateProvider;
