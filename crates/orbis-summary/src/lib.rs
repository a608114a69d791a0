//! Summary image for Orbis: total count, top five by estimated GDP and the
//! last refresh time, rendered as a fixed-layout PNG.
//!
//! Layout is pixel-fixed; [`Summary::lines`] decides what goes where and
//! [`render::render_png`] only stamps glyphs.

pub mod error;
pub mod render;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use orbis_core::store::{CountryQuery, CountryStore, SortKey};

pub use error::{Error, Result};
pub use render::render_png;

/// Number of countries listed in the image.
pub const TOP_N: usize = 5;

const TITLE: &str = "Country Currency & Exchange Summary";
const LEFT: u32 = 20;

/// One entry of the top-GDP list.
#[derive(Debug, Clone, PartialEq)]
pub struct TopEntry {
  pub name:          String,
  pub estimated_gdp: Option<f64>,
}

/// Everything the image shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
  pub total_countries:   u64,
  /// Highest estimated GDP first; at most [`TOP_N`] entries.
  pub top:               Vec<TopEntry>,
  pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// A line of text anchored at a fixed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
  pub x:        u32,
  pub baseline: u32,
  pub text:     String,
}

impl Summary {
  /// Compose the image text top to bottom.
  pub fn lines(&self) -> Vec<Line> {
    let mut out = Vec::with_capacity(self.top.len() + 4);
    let mut y = 30;
    let mut push = |y: u32, text: String| out.push(Line { x: LEFT, baseline: y, text });

    push(y, TITLE.to_owned());
    y += 40;
    push(y, format!("Total Countries: {}", self.total_countries));
    y += 30;
    push(y, format!("Top {TOP_N} Countries by Estimated GDP:"));
    y += 25;

    for (i, entry) in self.top.iter().take(TOP_N).enumerate() {
      let gdp = match entry.estimated_gdp {
        Some(v) => format!("${v:.2}"),
        None => "N/A".to_owned(),
      };
      push(y, format!("{}. {} - {gdp}", i + 1, entry.name));
      y += 25;
    }

    y += 20;
    let refreshed = self
      .last_refreshed_at
      .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
      .unwrap_or_else(|| "never".to_owned());
    push(y, format!("Last Refreshed: {refreshed}"));

    out
  }
}

/// Read the figures the image needs from `store`.
pub async fn gather<S>(store: &S) -> Result<Summary>
where
  S: CountryStore,
{
  let status = store
    .status()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let query = CountryQuery { sort: SortKey::GdpDesc, limit: Some(TOP_N), ..Default::default() };
  let top = store
    .list(&query)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .into_iter()
    .map(|c| TopEntry { name: c.name, estimated_gdp: c.estimated_gdp })
    .collect();

  Ok(Summary {
    total_countries: status.total_countries,
    top,
    last_refreshed_at: status.last_refreshed_at,
  })
}

/// Rebuild the image from `store` and overwrite `path`, creating its parent
/// directory if needed. The file is written in place without locking.
pub async fn regenerate<S>(store: &S, path: &Path) -> Result<()>
where
  S: CountryStore,
{
  let summary = gather(store).await?;
  let png = render_png(&summary)?;

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(path, png).await?;
  Ok(())
}
