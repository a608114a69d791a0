//! Handler for `POST /countries/refresh`.
//!
//! Runs the refresh pipeline, then rebuilds the summary image. A failed
//! image write is logged and otherwise ignored; the refresh still succeeds.
//! Both steps finish even if the client goes away.

use axum::{Json, extract::State};
use orbis_core::{
  RefreshError,
  refresh::{RefreshReport, refresh},
  store::CountryStore,
  upstream::DataSource,
};
use serde::Serialize;

use crate::{AppState, error::ApiError};

/// Success body: the pipeline report plus a message.
#[derive(Debug, Serialize)]
pub struct RefreshBody {
  pub message: &'static str,
  #[serde(flatten)]
  pub report:  RefreshReport,
}

/// `POST /countries/refresh`
///
/// The pipeline and image rebuild run on their own task and finish even if
/// the client disconnects mid-refresh.
pub async fn handler<S, D>(
  State(state): State<AppState<S, D>>,
) -> Result<Json<RefreshBody>, ApiError>
where
  S: CountryStore + 'static,
  D: DataSource + 'static,
{
  let AppState { store, source, multiplier, image_path } = state;

  let task = tokio::spawn(async move {
    let report = refresh(&*store, &*source, multiplier.as_ref()).await?;
    tracing::info!(
      total_processed = report.total_processed,
      last_refreshed_at = %report.last_refreshed_at,
      "countries refreshed"
    );

    if let Err(e) = orbis_summary::regenerate(&*store, &image_path).await {
      tracing::warn!(
        error = %e,
        path = %image_path.display(),
        "failed to generate summary image"
      );
    }
    Ok::<_, RefreshError<S::Error, D::Error>>(report)
  });

  let report = task.await.map_err(ApiError::internal)??;
  Ok(Json(RefreshBody { message: "Countries refreshed successfully", report }))
}
