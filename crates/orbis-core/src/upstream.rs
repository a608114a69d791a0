//! Wire types for the two upstream APIs and the `DataSource` trait.
//!
//! Field shapes follow the upstream JSON; unknown keys are ignored and
//! missing optionals are tolerated.

use std::{collections::HashMap, future::Future};

use serde::Deserialize;

/// One entry of the countries directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamCountry {
  #[serde(default)]
  pub name:       String,
  pub capital:    Option<String>,
  pub region:     Option<String>,
  #[serde(default)]
  pub population: u64,
  pub flag:       Option<String>,
  /// `None` when the key is absent or `null`, which is distinct from an
  /// empty list.
  pub currencies: Option<Vec<UpstreamCurrency>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamCurrency {
  pub code: Option<String>,
}

/// Currency code → units per base currency.
pub type RateTable = HashMap<String, f64>;

/// Body of the exchange-rate endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesPayload {
  pub rates: RateTable,
}

/// Abstraction over the two upstream APIs.
///
/// Implementations must treat a non-success status as an error; there are
/// no retries.
pub trait DataSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the full country list.
  fn fetch_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<UpstreamCountry>, Self::Error>> + Send + '_;

  /// Fetch the exchange-rate table.
  fn fetch_rates(
    &self,
  ) -> impl Future<Output = Result<RateTable, Self::Error>> + Send + '_;
}
