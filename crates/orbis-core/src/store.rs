//! The `CountryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `orbis-store-sqlite`).
//! The refresh pipeline, the summary renderer and the HTTP layer depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::EnumString;

use crate::country::{Country, CountryRecord};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Ordering applied by [`CountryStore::list`].
///
/// Ties are broken by name. Countries without a GDP estimate sort after all
/// countries that have one, in both GDP directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
  #[default]
  NameAsc,
  GdpDesc,
  GdpAsc,
  PopulationDesc,
  PopulationAsc,
}

impl SortKey {
  /// Interpret a `sort` query parameter. Anything unrecognised, including
  /// no value at all, falls back to name order.
  pub fn from_param(param: Option<&str>) -> Self {
    param.and_then(|p| p.parse().ok()).unwrap_or_default()
  }
}

/// Parameters for [`CountryStore::list`].
#[derive(Debug, Clone, Default)]
pub struct CountryQuery {
  /// Exact match on `region`.
  pub region:   Option<String>,
  /// Exact match on `currency_code`.
  pub currency: Option<String>,
  pub sort:     SortKey,
  pub limit:    Option<usize>,
}

/// Aggregate figures reported by `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStatus {
  pub total_countries:   u64,
  /// Most recent `last_refreshed_at` across all rows; `None` when empty.
  pub last_refreshed_at: Option<DateTime<Utc>>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an Orbis country store backend.
///
/// Names are matched case-insensitively everywhere (see
/// [`name_key`](crate::country::name_key)).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CountryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert the record, or overwrite every column of the existing row with
  /// the same name key. Must be a single atomic operation.
  fn upsert(
    &self,
    record: CountryRecord,
  ) -> impl Future<Output = Result<Country, Self::Error>> + Send + '_;

  /// Filter and order countries.
  fn list<'a>(
    &'a self,
    query: &'a CountryQuery,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + 'a;

  /// Retrieve a country by name. Returns `None` if not found.
  fn get_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;

  /// Permanently delete a country by name. Returns `false` if there was no
  /// such country, in which case nothing was changed.
  fn delete_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Row count and most recent refresh timestamp.
  fn status(
    &self,
  ) -> impl Future<Output = Result<StoreStatus, Self::Error>> + Send + '_;
}
