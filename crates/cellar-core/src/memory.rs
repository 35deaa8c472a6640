//! [`MemoryStore`] — an in-process [`WineStore`] with copy-on-write
//! snapshots.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  store::WineStore,
  wine::{NewConsumption, NewWine, Wine, WinePatch},
};

/// A wine store held entirely in memory.
///
/// The record set lives behind an `Arc`; every mutation installs a new
/// vector, so a [`MemoryStore::snapshot`] taken earlier is never modified.
#[derive(Debug, Default)]
pub struct MemoryStore {
  wines: RwLock<Arc<Vec<Wine>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// The current record set. Later mutations do not affect the returned
  /// value.
  pub fn snapshot(&self) -> Arc<Vec<Wine>> {
    self
      .wines
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Replace the wine with `id` by `f(wine)`. `Ok(None)` if absent.
  fn replace<F>(&self, id: Uuid, f: F) -> Result<Option<Wine>>
  where
    F: FnOnce(Wine) -> Result<Wine>,
  {
    let mut guard = self.wines.write().unwrap_or_else(PoisonError::into_inner);
    let Some(pos) = guard.iter().position(|w| w.wine_id == id) else {
      return Ok(None);
    };

    let updated = f(guard[pos].clone())?;
    // Clones the vector if any snapshot is still alive.
    Arc::make_mut(&mut guard)[pos] = updated.clone();
    Ok(Some(updated))
  }
}

impl WineStore for MemoryStore {
  type Error = Error;

  async fn add(&self, input: NewWine) -> Result<Wine> {
    let wine = Wine::create(Uuid::new_v4(), input, Utc::now())?;
    let mut guard = self.wines.write().unwrap_or_else(PoisonError::into_inner);
    Arc::make_mut(&mut guard).push(wine.clone());
    debug!(wine_id = %wine.wine_id, name = %wine.name, "added wine");
    Ok(wine)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Wine>> {
    Ok(self.snapshot().iter().find(|w| w.wine_id == id).cloned())
  }

  async fn list(&self) -> Result<Vec<Wine>> { Ok(self.snapshot().to_vec()) }

  async fn update_notes(&self, id: Uuid, notes: String) -> Result<Option<Wine>> {
    self.replace(id, |w| Ok(w.with_notes(notes, Utc::now())))
  }

  async fn update(&self, id: Uuid, patch: WinePatch) -> Result<Option<Wine>> {
    self.replace(id, |w| w.with_patch(patch, Utc::now()))
  }

  async fn mark_consumed(
    &self,
    id: Uuid,
    consumption: NewConsumption,
  ) -> Result<Option<Wine>> {
    let wine = self.replace(id, |w| w.consume(consumption, Utc::now()))?;
    if wine.is_some() {
      debug!(wine_id = %id, "archived wine");
    }
    Ok(wine)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let mut guard = self.wines.write().unwrap_or_else(PoisonError::into_inner);
    let Some(pos) = guard.iter().position(|w| w.wine_id == id) else {
      return Ok(false);
    };
    Arc::make_mut(&mut guard).remove(pos);
    debug!(wine_id = %id, "deleted wine");
    Ok(true)
  }
}
