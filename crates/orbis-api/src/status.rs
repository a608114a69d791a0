//! Handler for `GET /status`.

use axum::{Json, extract::State};
use orbis_core::{
  store::{CountryStore, StoreStatus},
  upstream::DataSource,
};

use crate::{AppState, error::ApiError};

/// `GET /status`: `{"total_countries": n, "last_refreshed_at": ts|null}`
pub async fn handler<S, D>(
  State(state): State<AppState<S, D>>,
) -> Result<Json<StoreStatus>, ApiError>
where
  S: CountryStore,
  D: DataSource,
{
  let status = state.store.status().await.map_err(ApiError::internal)?;
  Ok(Json(status))
}
