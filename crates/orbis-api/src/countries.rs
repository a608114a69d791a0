//! Handlers for `/countries` read and delete endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/countries` | Optional `region`, `currency`, `sort` |
//! | `GET`    | `/countries/{name}` | Case-insensitive; 404 if not found |
//! | `DELETE` | `/countries/{name}` | Case-insensitive; 404 if not found |
//! | `DELETE` | `/countries/image` | Same as above for the name "image" |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use orbis_core::{
  country::Country,
  store::{CountryQuery, CountryStore, SortKey},
  upstream::DataSource,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Exact match on region. Empty means no filter.
  pub region:   Option<String>,
  /// Exact match on currency code. Empty means no filter.
  pub currency: Option<String>,
  /// `gdp_desc`, `gdp_asc`, `population_desc`, `population_asc`; anything
  /// else orders by name.
  pub sort:     Option<String>,
}

impl From<ListParams> for CountryQuery {
  fn from(p: ListParams) -> Self {
    CountryQuery {
      region:   p.region.filter(|s| !s.is_empty()),
      currency: p.currency.filter(|s| !s.is_empty()),
      sort:     SortKey::from_param(p.sort.as_deref()),
      limit:    None,
    }
  }
}

/// `GET /countries[?region=...][&currency=...][&sort=...]`
pub async fn list<S, D>(
  State(state): State<AppState<S, D>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Country>>, ApiError>
where
  S: CountryStore,
  D: DataSource,
{
  let query = CountryQuery::from(params);
  let countries = state.store.list(&query).await.map_err(ApiError::internal)?;
  Ok(Json(countries))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /countries/{name}`
pub async fn get_one<S, D>(
  State(state): State<AppState<S, D>>,
  Path(name): Path<String>,
) -> Result<Json<Country>, ApiError>
where
  S: CountryStore,
  D: DataSource,
{
  let country = state
    .store
    .get_by_name(&name)
    .await
    .map_err(ApiError::internal)?
    .ok_or(ApiError::NotFound("Country not found"))?;
  Ok(Json(country))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /countries/{name}`
pub async fn delete_one<S, D>(
  State(state): State<AppState<S, D>>,
  Path(name): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: CountryStore,
  D: DataSource,
{
  delete_named(&*state.store, &name).await
}

/// `DELETE /countries/image`
///
/// The static image route shadows `{name}` for this one segment; deletes
/// still reach the country literally called "image".
pub async fn delete_image_named<S, D>(
  State(state): State<AppState<S, D>>,
) -> Result<Json<Value>, ApiError>
where
  S: CountryStore,
  D: DataSource,
{
  delete_named(&*state.store, "image").await
}

async fn delete_named<S>(store: &S, name: &str) -> Result<Json<Value>, ApiError>
where
  S: CountryStore,
{
  let deleted = store.delete_by_name(name).await.map_err(ApiError::internal)?;

  if !deleted {
    return Err(ApiError::NotFound("Country not found"));
  }
  tracing::info!(%name, "country deleted");
  Ok(Json(json!({ "message": "Country deleted successfully" })))
}
