//! Handler for `GET /countries/image`.

use std::io::ErrorKind;

use axum::{
  extract::State,
  http::header,
  response::{IntoResponse, Response},
};
use orbis_core::{store::CountryStore, upstream::DataSource};

use crate::{AppState, error::ApiError};

/// `GET /countries/image`: the cached PNG, or 404 before the first refresh.
pub async fn image<S, D>(
  State(state): State<AppState<S, D>>,
) -> Result<Response, ApiError>
where
  S: CountryStore,
  D: DataSource,
{
  let bytes = match tokio::fs::read(&*state.image_path).await {
    Ok(b) => b,
    Err(e) if e.kind() == ErrorKind::NotFound => {
      return Err(ApiError::NotFound("Summary image not found"));
    }
    Err(e) => return Err(ApiError::internal(e)),
  };

  Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}
