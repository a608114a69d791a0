//! The country record, the only persisted entity.
//!
//! Rows are denormalised: currency, exchange rate and the derived GDP
//! estimate all live on the country itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted country row, as returned by the store and the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        u64,
  pub currency_code:     Option<String>,
  /// Units of `currency_code` per US dollar.
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     Option<f64>,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: DateTime<Utc>,
}

/// Everything the refresh pipeline writes for one country.
///
/// The store assigns `id` on first insert and keeps it across upserts.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        u64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     Option<f64>,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: DateTime<Utc>,
}

/// Normalised key under which names are unique and looked up.
pub fn name_key(name: &str) -> String { name.to_lowercase() }
