//! [`SqliteStore`], the SQLite implementation of [`CountryStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use orbis_core::{
  country::{Country, CountryRecord, name_key},
  store::{CountryQuery, CountryStore, StoreStatus},
};

use crate::{
  Result,
  encode::{COUNTRY_COLUMNS, RawCountry, decode_dt, encode_dt, encode_population, order_by},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Orbis country store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All
/// statements run on the connection's own thread, one at a time.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CountryStore impl ───────────────────────────────────────────────────────

impl CountryStore for SqliteStore {
  type Error = crate::Error;

  async fn upsert(&self, record: CountryRecord) -> Result<Country> {
    let key             = name_key(&record.name);
    let population      = encode_population(record.population)?;
    let refreshed_at    = encode_dt(record.last_refreshed_at);
    let CountryRecord {
      name,
      capital,
      region,
      currency_code,
      exchange_rate,
      estimated_gdp,
      flag_url,
      ..
    } = record;

    let raw: RawCountry = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO countries (
             name, name_key, capital, region, population,
             currency_code, exchange_rate, estimated_gdp, flag_url,
             last_refreshed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT (name_key) DO UPDATE SET
             name              = excluded.name,
             capital           = excluded.capital,
             region            = excluded.region,
             population        = excluded.population,
             currency_code     = excluded.currency_code,
             exchange_rate     = excluded.exchange_rate,
             estimated_gdp     = excluded.estimated_gdp,
             flag_url          = excluded.flag_url,
             last_refreshed_at = excluded.last_refreshed_at
           RETURNING {COUNTRY_COLUMNS}"
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            name,
            key,
            capital,
            region,
            population,
            currency_code,
            exchange_rate,
            estimated_gdp,
            flag_url,
            refreshed_at,
          ],
          RawCountry::from_row,
        )?)
      })
      .await?;

    raw.into_country()
  }

  async fn list(&self, query: &CountryQuery) -> Result<Vec<Country>> {
    let region   = query.region.clone();
    let currency = query.currency.clone();
    // SQLite treats a negative LIMIT as "no limit".
    let limit    = query
      .limit
      .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
      .unwrap_or(-1);
    let sql = format!(
      "SELECT {COUNTRY_COLUMNS}
       FROM countries
       WHERE (?1 IS NULL OR region = ?1)
         AND (?2 IS NULL OR currency_code = ?2)
       ORDER BY {}
       LIMIT ?3",
      order_by(query.sort)
    );

    let raws: Vec<RawCountry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![region, currency, limit],
            RawCountry::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCountry::into_country).collect()
  }

  async fn get_by_name(&self, name: &str) -> Result<Option<Country>> {
    let key = name_key(name);

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE name_key = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![key], RawCountry::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCountry::into_country).transpose()
  }

  async fn delete_by_name(&self, name: &str) -> Result<bool> {
    let key = name_key(name);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM countries WHERE name_key = ?1",
          rusqlite::params![key],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn status(&self) -> Result<StoreStatus> {
    let (count, last): (i64, Option<String>) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*), MAX(last_refreshed_at) FROM countries",
          [],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
      })
      .await?;

    Ok(StoreStatus {
      total_countries:   u64::try_from(count).unwrap_or_default(),
      last_refreshed_at: last.as_deref().map(decode_dt).transpose()?,
    })
  }
}
