//! [`SqliteStore`] — the SQLite implementation of [`WineStore`].

use std::path::Path;

use cellar_core::{
  Error as CoreError,
  store::WineStore,
  wine::{Consumption, NewConsumption, NewWine, Wine, WinePatch, WineState},
};
use chrono::Utc;
use rusqlite::{ErrorCode, OptionalExtension as _, Transaction, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawWine, WINE_COLUMNS, encode_date, encode_dt, encode_list, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cellar wine store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
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

  /// Read the wine with `id`, apply `f` and write the result back, all in one
  /// immediate transaction. `Ok(None)` if the wine does not exist.
  ///
  /// Nothing is committed when `f` or any write fails.
  async fn modify<F>(&self, id: Uuid, f: F) -> Result<Option<Wine>>
  where
    F: FnOnce(Wine) -> cellar_core::Result<Wine> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = modify_in(&tx, id, f);
        if matches!(outcome, Ok(Some(_))) {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?
  }
}

// ─── Transaction bodies ──────────────────────────────────────────────────────

fn modify_in<F>(tx: &Transaction<'_>, id: Uuid, f: F) -> Result<Option<Wine>>
where
  F: FnOnce(Wine) -> cellar_core::Result<Wine>,
{
  let Some(before) = select_wine(tx, id)? else {
    return Ok(None);
  };
  let was_active = before.is_active();
  let after = f(before)?;

  if write_wine(tx, &after)? == 0 {
    return Ok(None);
  }
  if was_active && let WineState::Archived(c) = &after.state {
    insert_consumption(tx, id, c)?;
  }
  Ok(Some(after))
}

fn select_wine(conn: &rusqlite::Connection, id: Uuid) -> Result<Option<Wine>> {
  let sql = format!(
    "SELECT {WINE_COLUMNS}
     FROM wines w
     LEFT JOIN consumptions c ON c.wine_id = w.wine_id
     WHERE w.wine_id = ?1"
  );
  conn
    .query_row(&sql, rusqlite::params![encode_uuid(id)], RawWine::from_row)
    .optional()?
    .map(RawWine::into_wine)
    .transpose()
}

/// Overwrite every descriptive column of an existing row with `wine`.
/// Returns the number of rows changed.
fn write_wine(conn: &rusqlite::Connection, wine: &Wine) -> Result<usize> {
  let changed = conn.execute(
    "UPDATE wines SET
       name = ?2, style = ?3, grapes = ?4, location = ?5, vendor = ?6,
       purchase_date = ?7, drink_by = ?8, price = ?9, notes = ?10,
       image = ?11, updated_at = ?12
     WHERE wine_id = ?1",
    rusqlite::params![
      encode_uuid(wine.wine_id),
      wine.name,
      wine.style,
      encode_list(&wine.grapes)?,
      wine.location,
      wine.vendor,
      encode_date(wine.purchase_date),
      wine.drink_by.map(encode_date),
      u8::from(wine.price),
      wine.notes,
      wine.image,
      encode_dt(wine.updated_at),
    ],
  )?;
  Ok(changed)
}

fn insert_consumption(conn: &rusqlite::Connection, id: Uuid, c: &Consumption) -> Result<()> {
  conn
    .execute(
      "INSERT INTO consumptions (
         wine_id, rating, drank_at, would_buy_again, food_pairings, experience
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      rusqlite::params![
        encode_uuid(id),
        c.rating.stars(),
        encode_dt(c.drank_at),
        c.would_buy_again,
        encode_list(&c.food_pairings)?,
        c.experience,
      ],
    )
    .map_err(|e| consumption_conflict(e, id))?;
  Ok(())
}

/// A key violation on `consumptions` means the wine was already archived.
pub(crate) fn consumption_conflict(e: rusqlite::Error, id: Uuid) -> Error {
  if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
    Error::Core(CoreError::AlreadyConsumed(id))
  } else {
    e.into()
  }
}

// ─── WineStore impl ──────────────────────────────────────────────────────────

impl WineStore for SqliteStore {
  type Error = crate::Error;

  async fn add(&self, input: NewWine) -> Result<Wine> {
    let wine = Wine::create(Uuid::new_v4(), input, Utc::now())?;

    let id_str            = encode_uuid(wine.wine_id);
    let name              = wine.name.clone();
    let style             = wine.style.clone();
    let grapes_str        = encode_list(&wine.grapes)?;
    let location          = wine.location.clone();
    let vendor            = wine.vendor.clone();
    let purchase_date_str = encode_date(wine.purchase_date);
    let drink_by_str      = wine.drink_by.map(encode_date);
    let price             = u8::from(wine.price);
    let notes             = wine.notes.clone();
    let image             = wine.image.clone();
    let created_at_str    = encode_dt(wine.created_at);
    let updated_at_str    = encode_dt(wine.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO wines (
             wine_id, name, style, grapes, location, vendor,
             purchase_date, drink_by, price, notes, image,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            id_str,
            name,
            style,
            grapes_str,
            location,
            vendor,
            purchase_date_str,
            drink_by_str,
            price,
            notes,
            image,
            created_at_str,
            updated_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    debug!(wine_id = %wine.wine_id, name = %wine.name, "added wine");
    Ok(wine)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Wine>> {
    self.conn.call(move |conn| Ok(select_wine(conn, id))).await?
  }

  async fn list(&self) -> Result<Vec<Wine>> {
    let raws: Vec<RawWine> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {WINE_COLUMNS}
           FROM wines w
           LEFT JOIN consumptions c ON c.wine_id = w.wine_id
           ORDER BY w.rowid"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawWine::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWine::into_wine).collect()
  }

  async fn update_notes(&self, id: Uuid, notes: String) -> Result<Option<Wine>> {
    self.modify(id, move |w| Ok(w.with_notes(notes, Utc::now()))).await
  }

  async fn update(&self, id: Uuid, patch: WinePatch) -> Result<Option<Wine>> {
    self.modify(id, move |w| w.with_patch(patch, Utc::now())).await
  }

  async fn mark_consumed(
    &self,
    id: Uuid,
    consumption: NewConsumption,
  ) -> Result<Option<Wine>> {
    let wine = self
      .modify(id, move |w| w.consume(consumption, Utc::now()))
      .await?;
    if wine.is_some() {
      debug!(wine_id = %id, "archived wine");
    }
    Ok(wine)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM wines WHERE wine_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if deleted {
      debug!(wine_id = %id, "deleted wine");
    }
    Ok(deleted)
  }
}
