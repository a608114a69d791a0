//! JSON REST API for Orbis.
//!
//! Exposes an axum [`Router`] backed by any [`CountryStore`] and
//! [`DataSource`]. Logging middleware, CORS, and listening are the caller's
//! responsibility.
//!
//! | Method   | Path | Handler |
//! |----------|------|---------|
//! | `POST`   | `/countries/refresh` | [`refresh::handler`] |
//! | `GET`    | `/countries` | [`countries::list`] |
//! | `GET`    | `/countries/image` | [`summary::image`] |
//! | `DELETE` | `/countries/image` | [`countries::delete_image_named`] |
//! | `GET`    | `/countries/{name}` | [`countries::get_one`] |
//! | `DELETE` | `/countries/{name}` | [`countries::delete_one`] |
//! | `GET`    | `/status` | [`status::handler`] |

pub mod countries;
pub mod error;
pub mod refresh;
pub mod status;
pub mod summary;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use orbis_core::{gdp::GdpMultiplier, store::CountryStore, upstream::DataSource};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, D> {
  pub store:      Arc<S>,
  pub source:     Arc<D>,
  pub multiplier: Arc<dyn GdpMultiplier>,
  /// Where the summary PNG is written and served from.
  pub image_path: Arc<PathBuf>,
}

impl<S, D> Clone for AppState<S, D> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      source:     Arc::clone(&self.source),
      multiplier: Arc::clone(&self.multiplier),
      image_path: Arc::clone(&self.image_path),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S, D>(state: AppState<S, D>) -> Router
where
  S: CountryStore + 'static,
  D: DataSource + 'static,
{
  Router::new()
    .route("/countries", get(countries::list::<S, D>))
    .route("/countries/refresh", post(refresh::handler::<S, D>))
    .route(
      "/countries/image",
      get(summary::image::<S, D>).delete(countries::delete_image_named::<S, D>),
    )
    .route(
      "/countries/{name}",
      get(countries::get_one::<S, D>).delete(countries::delete_one::<S, D>),
    )
    .route("/status", get(status::handler::<S, D>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
