//! The `WineStore` trait.
//!
//! The trait is implemented by storage backends ([`crate::memory::MemoryStore`],
//! `cellar-store-sqlite`). Higher layers (`cellar-api`, `cellar-server`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  filter::FilterSpec,
  partition::Collection,
  wine::{NewConsumption, NewWine, Wine, WineOrder, WinePatch},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Lets callers tell domain failures apart from backend failures without
/// knowing the concrete backend error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain error this failure wraps, if any.
  fn as_core(&self) -> Option<&crate::Error>;
}

impl StoreError for crate::Error {
  fn as_core(&self) -> Option<&crate::Error> { Some(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Cellar record store backend.
///
/// Lookups by id signal an absent wine with `None` (or `false` for
/// [`WineStore::delete`]) rather than an error. Mutations replace whole
/// records; a reader never observes a half-updated wine.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WineStore: Send + Sync {
  type Error: StoreError + From<crate::Error>;

  /// Validate `input`, assign a fresh id and persist the new active wine.
  fn add(
    &self,
    input: NewWine,
  ) -> impl Future<Output = Result<Wine, Self::Error>> + Send + '_;

  /// Retrieve a wine by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Wine>, Self::Error>> + Send + '_;

  /// All wines in insertion order.
  fn list(&self) -> impl Future<Output = Result<Vec<Wine>, Self::Error>> + Send + '_;

  /// Replace the notes of a wine. Blank notes clear the field.
  fn update_notes(
    &self,
    id: Uuid,
    notes: String,
  ) -> impl Future<Output = Result<Option<Wine>, Self::Error>> + Send + '_;

  /// Apply a partial update to the descriptive fields of a wine.
  fn update(
    &self,
    id: Uuid,
    patch: WinePatch,
  ) -> impl Future<Output = Result<Option<Wine>, Self::Error>> + Send + '_;

  /// Archive a wine, stamping the consumption time.
  ///
  /// Returns an error wrapping [`crate::Error::AlreadyConsumed`] if the wine
  /// is already archived.
  fn mark_consumed(
    &self,
    id: Uuid,
    consumption: NewConsumption,
  ) -> impl Future<Output = Result<Option<Wine>, Self::Error>> + Send + '_;

  /// Remove a wine. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Partitioned, filtered view of the whole catalog.
  fn query<'a>(
    &'a self,
    spec: &'a FilterSpec,
    order: WineOrder,
  ) -> impl Future<Output = Result<Collection, Self::Error>> + Send + 'a {
    async move {
      let wines = self.list().await?;
      Ok(Collection::build(wines, spec, order))
    }
  }
}
