//! JSON REST API for Cellar.
//!
//! Exposes an axum [`Router`] backed by any [`cellar_core::store::WineStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cellar_api::api_router(store.clone()))
//! ```

pub mod collection;
pub mod error;
pub mod wines;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use cellar_core::store::WineStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: WineStore + 'static,
{
  Router::new()
    // Wines
    .route("/wines", get(wines::list::<S>).post(wines::create::<S>))
    .route(
      "/wines/{id}",
      get(wines::get_one::<S>)
        .patch(wines::update_one::<S>)
        .delete(wines::delete_one::<S>),
    )
    .route("/wines/{id}/notes", put(wines::update_notes::<S>))
    .route("/wines/{id}/consume", post(wines::consume_one::<S>))
    // Read models
    .route("/collection", get(collection::handler::<S>))
    .route("/facets", get(collection::facets_handler::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
