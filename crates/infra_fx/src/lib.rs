//! Exchange-Rate Infrastructure
//!
//! HTTP adapters implementing [`domain_funds::RateProvider`]. The only
//! source today is the Frankfurter API (ECB reference rates, no API key).
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_fx::{FrankfurterConfig, FrankfurterRateProvider};
//!
//! let provider = FrankfurterRateProvider::new(FrankfurterConfig::default())?;
//! let fx = FxConverter::new(Arc::new(provider));
//! ```

pub mod frankfurter;

pub use frankfurter::{FrankfurterConfig, FrankfurterRateProvider, PROVIDER_NAME};
