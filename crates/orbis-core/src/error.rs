//! Error types for `orbis-core`.

use std::fmt;

use thiserror::Error;

/// Which external data source a fetch was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
  Countries,
  ExchangeRates,
}

impl Upstream {
  /// Human-readable API name used in error details.
  pub fn label(self) -> &'static str {
    match self {
      Upstream::Countries => "restcountries",
      Upstream::ExchangeRates => "exchange rates",
    }
  }
}

impl fmt::Display for Upstream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Failure of [`refresh`](crate::refresh::refresh), generic over the store
/// error `S` and the data-source error `D`.
#[derive(Debug, Error)]
pub enum RefreshError<S, D>
where
  S: std::error::Error + 'static,
  D: std::error::Error + 'static,
{
  /// A fetch failed; nothing was written.
  #[error("could not fetch data from {which} API: {error}")]
  Upstream {
    which: Upstream,
    #[source]
    error: D,
  },

  /// An upsert failed. Rows written before the failure stay written.
  #[error("store error: {0}")]
  Store(#[source] S),
}
