//! Handlers for the read-model endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/collection` | Both partitions, filtered, with unfiltered totals |
//! | `GET`  | `/facets` | Distinct styles, locations and vendors |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use cellar_core::{
  filter::{Facets, facets},
  partition::Collection,
  store::WineStore,
};

use crate::{error::ApiError, wines::FilterParams};

/// `GET /collection[?style=...][&location=...][&vendor=...][&grape=...][&order=...]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Collection>, ApiError>
where
  S: WineStore,
{
  let view = store
    .query(&params.spec(), params.order)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(view))
}

/// `GET /facets` — option lists for a filter bar, over the whole catalog.
pub async fn facets_handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Facets>, ApiError>
where
  S: WineStore,
{
  let wines = store.list().await.map_err(ApiError::from_store)?;
  Ok(Json(facets(&wines)))
}
