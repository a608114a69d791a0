//! The refresh pipeline: fetch both upstreams, join on currency code, compute
//! the GDP estimate and upsert one row per country.
//!
//! Both fetches must succeed before anything is written. After that every
//! row is upserted independently; there is no transaction spanning the batch.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use crate::{
  country::CountryRecord,
  error::{RefreshError, Upstream},
  gdp::{self, GdpMultiplier},
  store::CountryStore,
  upstream::{DataSource, RateTable, UpstreamCountry},
};

/// Outcome of a successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
  pub total_processed:   usize,
  /// The single timestamp stamped on every row of this batch.
  pub last_refreshed_at: DateTime<Utc>,
}

/// Run the pipeline against `store`, pulling from `source`.
pub async fn refresh<S, D>(
  store: &S,
  source: &D,
  multiplier: &dyn GdpMultiplier,
) -> Result<RefreshReport, RefreshError<S::Error, D::Error>>
where
  S: CountryStore,
  D: DataSource,
{
  let countries = source.fetch_countries().await.map_err(|error| {
    RefreshError::Upstream { which: Upstream::Countries, error }
  })?;

  let rates = source.fetch_rates().await.map_err(|error| {
    RefreshError::Upstream { which: Upstream::ExchangeRates, error }
  })?;

  // Stored timestamps carry microseconds; truncate so the reported value
  // matches what reads return.
  let now = Utc::now().trunc_subsecs(6);

  let records: Vec<CountryRecord> = countries
    .into_iter()
    .map(|c| derive_record(c, &rates, multiplier, now))
    .collect();
  let total_processed = records.len();

  for record in records {
    store.upsert(record).await.map_err(RefreshError::Store)?;
  }

  Ok(RefreshReport { total_processed, last_refreshed_at: now })
}

/// How a country's currency list resolves.
enum CurrencyField<'a> {
  /// The list is missing or empty, or its first entry has no code.
  Unusable,
  Code(&'a str),
}

fn currency_field(country: &UpstreamCountry) -> CurrencyField<'_> {
  match country.currencies.as_deref() {
    None | Some([]) => CurrencyField::Unusable,
    Some([first, ..]) => match first.code.as_deref() {
      Some(code) if !code.is_empty() => CurrencyField::Code(code),
      _ => CurrencyField::Unusable,
    },
  }
}

/// Build the row for one upstream country.
///
/// - first currency code present and rated: rate and GDP estimate are set;
/// - code present but not in `rates`: rate and GDP are `None`;
/// - currency list missing, empty, or led by an entry without code: code
///   and rate are `None`, GDP is forced to `0`.
pub fn derive_record(
  country: UpstreamCountry,
  rates: &RateTable,
  multiplier: &dyn GdpMultiplier,
  refreshed_at: DateTime<Utc>,
) -> CountryRecord {
  let (currency_code, exchange_rate, estimated_gdp) = match currency_field(&country) {
    CurrencyField::Unusable => (None, None, Some(0.0)),
    CurrencyField::Code(code) => match rates.get(code).copied() {
      Some(rate) => {
        let gdp = gdp::estimate(country.population, multiplier.draw(), rate);
        (Some(code.to_owned()), Some(rate), gdp)
      }
      None => (Some(code.to_owned()), None, None),
    },
  };

  CountryRecord {
    name: country.name,
    capital: non_empty(country.capital),
    region: non_empty(country.region),
    population: country.population,
    currency_code,
    exchange_rate,
    estimated_gdp,
    flag_url: non_empty(country.flag),
    last_refreshed_at: refreshed_at,
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::TimeZone;

  use super::*;
  use crate::{
    country::{Country, name_key},
    gdp::{FixedMultiplier, MULTIPLIER_RANGE, ThreadRngMultiplier},
    store::{CountryQuery, StoreStatus},
    upstream::UpstreamCurrency,
  };

  // ── Fixtures ────────────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("API returned status 500")]
  struct StubError;

  struct StubSource {
    countries: Result<Vec<UpstreamCountry>, ()>,
    rates:     Result<RateTable, ()>,
  }

  impl DataSource for StubSource {
    type Error = StubError;

    async fn fetch_countries(&self) -> Result<Vec<UpstreamCountry>, StubError> {
      self.countries.clone().map_err(|_| StubError)
    }

    async fn fetch_rates(&self) -> Result<RateTable, StubError> {
      self.rates.clone().map_err(|_| StubError)
    }
  }

  /// Vec-backed store; just enough to observe what the pipeline wrote.
  #[derive(Default)]
  struct MemStore {
    rows: Mutex<Vec<Country>>,
  }

  impl MemStore {
    fn rows(&self) -> Vec<Country> { self.rows.lock().unwrap().clone() }
  }

  impl CountryStore for MemStore {
    type Error = std::convert::Infallible;

    async fn upsert(&self, r: CountryRecord) -> Result<Country, Self::Error> {
      let mut rows = self.rows.lock().unwrap();
      let key = name_key(&r.name);
      let id = match rows.iter().position(|c| name_key(&c.name) == key) {
        Some(i) => rows.remove(i).id,
        None => rows.len() as i64 + 1,
      };
      let country = Country {
        id,
        name: r.name,
        capital: r.capital,
        region: r.region,
        population: r.population,
        currency_code: r.currency_code,
        exchange_rate: r.exchange_rate,
        estimated_gdp: r.estimated_gdp,
        flag_url: r.flag_url,
        last_refreshed_at: r.last_refreshed_at,
      };
      rows.push(country.clone());
      Ok(country)
    }

    async fn list(&self, _: &CountryQuery) -> Result<Vec<Country>, Self::Error> { unimplemented!() }
    async fn get_by_name(&self, _: &str) -> Result<Option<Country>, Self::Error> { unimplemented!() }
    async fn delete_by_name(&self, _: &str) -> Result<bool, Self::Error> { unimplemented!() }
    async fn status(&self) -> Result<StoreStatus, Self::Error> { unimplemented!() }
  }

  fn country(name: &str, population: u64, codes: Option<&[&str]>) -> UpstreamCountry {
    UpstreamCountry {
      name: name.into(),
      capital: Some(format!("{name} City")),
      region: Some("Africa".into()),
      population,
      flag: Some(format!("https://flags.example/{name}.svg")),
      currencies: codes.map(|cs| {
        cs.iter()
          .map(|c| UpstreamCurrency { code: Some((*c).into()) })
          .collect()
      }),
    }
  }

  fn rates(pairs: &[(&str, f64)]) -> RateTable {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
  }

  fn at() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() }

  // ── derive_record ───────────────────────────────────────────────────────────

  #[test]
  fn rated_currency_gets_rate_and_gdp() {
    let r = derive_record(
      country("Nigeria", 200_000_000, Some(&["NGN"])),
      &rates(&[("NGN", 1600.0)]),
      &FixedMultiplier(1000.0),
      at(),
    );
    assert_eq!(r.currency_code.as_deref(), Some("NGN"));
    assert_eq!(r.exchange_rate, Some(1600.0));
    assert_eq!(r.estimated_gdp, Some(125_000_000.0));
    assert_eq!(r.last_refreshed_at, at());
  }

  #[test]
  fn only_first_currency_is_used() {
    let r = derive_record(
      country("Zimbabwe", 10, Some(&["ZWL", "USD"])),
      &rates(&[("USD", 1.0)]),
      &FixedMultiplier(1500.0),
      at(),
    );
    assert_eq!(r.currency_code.as_deref(), Some("ZWL"));
    assert_eq!(r.exchange_rate, None);
    assert_eq!(r.estimated_gdp, None);
  }

  #[test]
  fn unrated_currency_has_null_rate_and_gdp() {
    let r = derive_record(
      country("Atlantis", 10, Some(&["ATL"])),
      &rates(&[("USD", 1.0)]),
      &FixedMultiplier(1500.0),
      at(),
    );
    assert_eq!(r.currency_code.as_deref(), Some("ATL"));
    assert!(r.exchange_rate.is_none());
    assert!(r.estimated_gdp.is_none());
  }

  #[test]
  fn empty_currency_list_forces_zero_gdp() {
    let r = derive_record(
      country("Antarctica", 1000, Some(&[])),
      &rates(&[("USD", 1.0)]),
      &FixedMultiplier(1500.0),
      at(),
    );
    assert!(r.currency_code.is_none());
    assert!(r.exchange_rate.is_none());
    assert_eq!(r.estimated_gdp, Some(0.0));
  }

  #[test]
  fn first_currency_without_code_counts_as_empty() {
    let mut c = country("Somewhere", 1000, None);
    c.currencies = Some(vec![UpstreamCurrency { code: Some(String::new()) }]);
    let r = derive_record(c, &rates(&[]), &FixedMultiplier(1500.0), at());
    assert!(r.currency_code.is_none());
    assert_eq!(r.estimated_gdp, Some(0.0));
  }

  #[test]
  fn missing_currency_list_forces_zero_gdp() {
    let r = derive_record(
      country("Nowhere", 1000, None),
      &rates(&[("USD", 1.0)]),
      &FixedMultiplier(1500.0),
      at(),
    );
    assert!(r.currency_code.is_none());
    assert!(r.exchange_rate.is_none());
    assert_eq!(r.estimated_gdp, Some(0.0));
  }

  #[test]
  fn bare_upstream_entry_gets_zero_gdp() {
    let bouvet: UpstreamCountry =
      serde_json::from_str(r#"{"name": "Bouvet", "population": 0}"#).unwrap();
    let r = derive_record(bouvet, &rates(&[]), &FixedMultiplier(1500.0), at());
    assert_eq!(r.name, "Bouvet");
    assert!(r.currency_code.is_none());
    assert_eq!(r.estimated_gdp, Some(0.0));
  }

  #[test]
  fn empty_strings_become_null() {
    let mut c = country("Bare", 1, Some(&["USD"]));
    c.capital = Some(String::new());
    c.region = Some(String::new());
    c.flag = Some(String::new());
    let r = derive_record(c, &rates(&[("USD", 1.0)]), &FixedMultiplier(1000.0), at());
    assert!(r.capital.is_none());
    assert!(r.region.is_none());
    assert!(r.flag_url.is_none());
  }

  // ── refresh ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn nigeria_scenario_is_bounded() {
    let store = MemStore::default();
    let source = StubSource {
      countries: Ok(vec![country("Nigeria", 200_000_000, Some(&["NGN"]))]),
      rates:     Ok(rates(&[("NGN", 1600.0)])),
    };

    let report = refresh(&store, &source, &ThreadRngMultiplier).await.unwrap();
    assert_eq!(report.total_processed, 1);

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    let ng = &rows[0];
    assert_eq!(ng.currency_code.as_deref(), Some("NGN"));
    assert_eq!(ng.exchange_rate, Some(1600.0));
    let gdp = ng.estimated_gdp.unwrap();
    let lo = 200_000_000.0 * MULTIPLIER_RANGE.start / 1600.0;
    let hi = 200_000_000.0 * MULTIPLIER_RANGE.end / 1600.0;
    assert!((lo..hi).contains(&gdp), "{gdp} not in [{lo}, {hi})");
    assert_eq!(ng.last_refreshed_at, report.last_refreshed_at);
  }

  #[tokio::test]
  async fn whole_batch_shares_one_timestamp() {
    let store = MemStore::default();
    let source = StubSource {
      countries: Ok(vec![
        country("Ghana", 30, Some(&["GHS"])),
        country("Kenya", 50, Some(&["KES"])),
        country("Chad", 20, Some(&[])),
      ]),
      rates:     Ok(rates(&[("GHS", 12.0), ("KES", 130.0)])),
    };

    let report = refresh(&store, &source, &FixedMultiplier(1000.0)).await.unwrap();
    assert_eq!(report.total_processed, 3);
    assert!(store.rows().iter().all(|c| c.last_refreshed_at == report.last_refreshed_at));
  }

  #[tokio::test]
  async fn countries_failure_writes_nothing() {
    let store = MemStore::default();
    let source = StubSource { countries: Err(()), rates: Ok(rates(&[])) };

    let err = refresh(&store, &source, &ThreadRngMultiplier).await.unwrap_err();
    assert!(matches!(err, RefreshError::Upstream { which: Upstream::Countries, .. }));
    assert_eq!(
      err.to_string(),
      "could not fetch data from restcountries API: API returned status 500"
    );
    assert!(store.rows().is_empty());
  }

  #[tokio::test]
  async fn rates_failure_writes_nothing() {
    let store = MemStore::default();
    let source = StubSource {
      countries: Ok(vec![country("Ghana", 30, Some(&["GHS"]))]),
      rates:     Err(()),
    };

    let err = refresh(&store, &source, &ThreadRngMultiplier).await.unwrap_err();
    assert!(matches!(err, RefreshError::Upstream { which: Upstream::ExchangeRates, .. }));
    assert!(store.rows().is_empty());
  }

  #[tokio::test]
  async fn repeated_refresh_redraws_gdp() {
    let store = MemStore::default();
    let source = StubSource {
      countries: Ok(vec![country("Nigeria", 200_000_000, Some(&["NGN"]))]),
      rates:     Ok(rates(&[("NGN", 1600.0)])),
    };

    refresh(&store, &source, &FixedMultiplier(1000.0)).await.unwrap();
    let first = store.rows()[0].clone();
    refresh(&store, &source, &FixedMultiplier(1999.0)).await.unwrap();
    let second = store.rows()[0].clone();

    assert_eq!(store.rows().len(), 1);
    assert_eq!(first.id, second.id);
    assert_ne!(first.estimated_gdp, second.estimated_gdp);
  }
}
