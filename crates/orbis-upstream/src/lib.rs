//! HTTP implementation of [`DataSource`] for the countries directory and the
//! exchange-rate table.
//!
//! One shared [`reqwest::Client`] with a fixed timeout; any transport error,
//! non-success status or undecodable body fails the fetch. No retries.

use std::time::Duration;

use orbis_core::upstream::{DataSource, RateTable, RatesPayload, UpstreamCountry};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default countries directory endpoint.
pub const DEFAULT_COUNTRIES_URL: &str =
  "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";

/// Default exchange-rate endpoint (USD base).
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Http(#[from] reqwest::Error),

  #[error("API returned status {}", .0.as_u16())]
  Status(StatusCode),
}

/// Endpoints and timeout for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
  pub countries_url: String,
  pub rates_url:     String,
  pub timeout:       Duration,
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      countries_url: DEFAULT_COUNTRIES_URL.to_owned(),
      rates_url:     DEFAULT_RATES_URL.to_owned(),
      timeout:       Duration::from_secs(30),
    }
  }
}

/// Fetches both upstreams over HTTP.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client: Client,
  config: SourceConfig,
}

impl HttpSource {
  pub fn new(config: SourceConfig) -> Result<Self, Error> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
    tracing::debug!(%url, "fetching upstream");
    let resp = self.client.get(url).send().await?;

    let status = resp.status();
    if status != StatusCode::OK {
      return Err(Error::Status(status));
    }
    Ok(resp.json().await?)
  }
}

impl DataSource for HttpSource {
  type Error = Error;

  async fn fetch_countries(&self) -> Result<Vec<UpstreamCountry>, Error> {
    let countries: Vec<UpstreamCountry> = self.get_json(&self.config.countries_url).await?;
    tracing::debug!(count = countries.len(), "fetched countries");
    Ok(countries)
  }

  async fn fetch_rates(&self) -> Result<RateTable, Error> {
    let payload: RatesPayload = self.get_json(&self.config.rates_url).await?;
    tracing::debug!(count = payload.rates.len(), "fetched exchange rates");
    Ok(payload.rates)
  }
}

#[cfg(test)]
mod tests {
  use axum::{Json, Router, http::StatusCode as AxumStatus, routing::get};
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  /// Serve `app` on an ephemeral port and return its base URL.
  async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
  }

  fn source(base: &str) -> HttpSource {
    HttpSource::new(SourceConfig {
      countries_url: format!("{base}/countries"),
      rates_url:     format!("{base}/rates"),
      timeout:       Duration::from_secs(5),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn fetches_both_tables() {
    let app = Router::new()
      .route(
        "/countries",
        get(|| async {
          Json(json!([
            {"name": "Nigeria", "population": 200000000, "currencies": [{"code": "NGN"}]},
            {"name": "Antarctica", "population": 1000}
          ]))
        }),
      )
      .route(
        "/rates",
        get(|| async { Json(json!({"result": "success", "rates": {"NGN": 1600.0}})) }),
      );
    let src = source(&serve(app).await);

    let countries = src.fetch_countries().await.unwrap();
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].name, "Nigeria");

    let rates = src.fetch_rates().await.unwrap();
    assert_eq!(rates.get("NGN"), Some(&1600.0));
  }

  #[tokio::test]
  async fn server_error_is_reported_with_status() {
    let app = Router::new()
      .route("/countries", get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }));
    let src = source(&serve(app).await);

    let err = src.fetch_countries().await.unwrap_err();
    assert!(matches!(err, Error::Status(s) if s.as_u16() == 500));
    assert_eq!(err.to_string(), "API returned status 500");
  }

  #[tokio::test]
  async fn missing_route_is_an_error() {
    let src = source(&serve(Router::new()).await);
    let err = src.fetch_rates().await.unwrap_err();
    assert!(matches!(err, Error::Status(s) if s.as_u16() == 404));
  }

  #[tokio::test]
  async fn undecodable_body_is_an_error() {
    let app = Router::new().route("/rates", get(|| async { "not json" }));
    let src = source(&serve(app).await);
    assert!(matches!(src.fetch_rates().await, Err(Error::Http(_))));
  }

  #[tokio::test]
  async fn unreachable_host_is_an_error() {
    // Bind then drop to get a port nobody is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let src = source(&format!("http://{addr}"));
    assert!(matches!(src.fetch_countries().await, Err(Error::Http(_))));
  }
}
