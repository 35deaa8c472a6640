//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`.
//! List-valued fields (grapes, food pairings) are stored as compact JSON.
//! UUIDs are stored as hyphenated lowercase strings.

use cellar_core::wine::{Consumption, PriceTier, Rating, Wine, WineState};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Lists ───────────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawWine`]'s field order, for `SELECT`s joined
/// against `consumptions`.
pub const WINE_COLUMNS: &str = "
  w.wine_id, w.name, w.style, w.grapes, w.location, w.vendor,
  w.purchase_date, w.drink_by, w.price, w.notes, w.image,
  w.created_at, w.updated_at,
  c.rating, c.drank_at, c.would_buy_again, c.food_pairings, c.experience";

/// Raw values read directly from a `wines` row joined with `consumptions`.
pub struct RawWine {
  // wines columns
  pub wine_id:         String,
  pub name:            String,
  pub style:           String,
  pub grapes:          String,
  pub location:        String,
  pub vendor:          String,
  pub purchase_date:   String,
  pub drink_by:        Option<String>,
  pub price:           u8,
  pub notes:           Option<String>,
  pub image:           Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
  // consumptions join
  pub rating:          Option<u8>,
  pub drank_at:        Option<String>,
  pub would_buy_again: Option<bool>,
  pub food_pairings:   Option<String>,
  pub experience:      Option<String>,
}

impl RawWine {
  /// Read a row selected with [`WINE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      wine_id:         row.get(0)?,
      name:            row.get(1)?,
      style:           row.get(2)?,
      grapes:          row.get(3)?,
      location:        row.get(4)?,
      vendor:          row.get(5)?,
      purchase_date:   row.get(6)?,
      drink_by:        row.get(7)?,
      price:           row.get(8)?,
      notes:           row.get(9)?,
      image:           row.get(10)?,
      created_at:      row.get(11)?,
      updated_at:      row.get(12)?,
      rating:          row.get(13)?,
      drank_at:        row.get(14)?,
      would_buy_again: row.get(15)?,
      food_pairings:   row.get(16)?,
      experience:      row.get(17)?,
    })
  }

  pub fn into_wine(self) -> Result<Wine> {
    let corrupt = |reason: String| Error::CorruptRow {
      wine_id: self.wine_id.clone(),
      reason,
    };

    let price = PriceTier::try_from(self.price).map_err(|e| corrupt(e.to_string()))?;

    // Both columns are NOT NULL, so a join row has both or neither.
    let state = match (self.rating, self.drank_at) {
      (Some(stars), Some(drank_at)) => WineState::Archived(Consumption {
        rating:          Rating::new(stars).map_err(|e| corrupt(e.to_string()))?,
        drank_at:        decode_dt(&drank_at)?,
        would_buy_again: self.would_buy_again.unwrap_or(true),
        food_pairings:   self
          .food_pairings
          .as_deref()
          .map(decode_list)
          .transpose()?
          .unwrap_or_default(),
        experience:      self.experience,
      }),
      (None, None) => WineState::Active,
      (rating, drank_at) => {
        return Err(corrupt(format!(
          "incomplete consumption (rating {rating:?}, drank_at {drank_at:?})"
        )));
      }
    };

    Ok(Wine {
      wine_id: decode_uuid(&self.wine_id)?,
      name: self.name,
      style: self.style,
      grapes: decode_list(&self.grapes)?,
      location: self.location,
      vendor: self.vendor,
      purchase_date: decode_date(&self.purchase_date)?,
      drink_by: self.drink_by.as_deref().map(decode_date).transpose()?,
      price,
      notes: self.notes,
      image: self.image,
      state,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
