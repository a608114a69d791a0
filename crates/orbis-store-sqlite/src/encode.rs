//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! so that `MAX()` and `ORDER BY` over the text agree with time order.

use chrono::{DateTime, SecondsFormat, Utc};
use orbis_core::{country::Country, store::SortKey};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Population ──────────────────────────────────────────────────────────────

pub fn encode_population(p: u64) -> Result<i64> {
  i64::try_from(p).map_err(|_| Error::PopulationOverflow(p))
}

pub fn decode_population(p: i64) -> Result<u64> {
  u64::try_from(p).map_err(|_| Error::NegativePopulation(p))
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// `ORDER BY` clause for a sort key. `x IS NULL` sorts `0` before `1`, which
/// keeps missing GDP estimates last in both directions.
pub fn order_by(sort: SortKey) -> &'static str {
  match sort {
    SortKey::NameAsc => "name_key ASC",
    SortKey::GdpDesc => "estimated_gdp IS NULL, estimated_gdp DESC, name_key ASC",
    SortKey::GdpAsc => "estimated_gdp IS NULL, estimated_gdp ASC, name_key ASC",
    SortKey::PopulationDesc => "population DESC, name_key ASC",
    SortKey::PopulationAsc => "population ASC, name_key ASC",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCountry::from_row`].
pub const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, \
  currency_code, exchange_rate, estimated_gdp, flag_url, last_refreshed_at";

/// Raw values read directly from a `countries` row.
pub struct RawCountry {
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        i64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     Option<f64>,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: String,
}

impl RawCountry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawCountry {
      id:                row.get(0)?,
      name:              row.get(1)?,
      capital:           row.get(2)?,
      region:            row.get(3)?,
      population:        row.get(4)?,
      currency_code:     row.get(5)?,
      exchange_rate:     row.get(6)?,
      estimated_gdp:     row.get(7)?,
      flag_url:          row.get(8)?,
      last_refreshed_at: row.get(9)?,
    })
  }

  pub fn into_country(self) -> Result<Country> {
    Ok(Country {
      id:                self.id,
      name:              self.name,
      capital:           self.capital,
      region:            self.region,
      population:        decode_population(self.population)?,
      currency_code:     self.currency_code,
      exchange_rate:     self.exchange_rate,
      estimated_gdp:     self.estimated_gdp,
      flag_url:          self.flag_url,
      last_refreshed_at: decode_dt(&self.last_refreshed_at)?,
    })
  }
}
