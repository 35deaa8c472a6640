//! Handlers for `/wines` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/wines` | Optional `style`, `location`, `vendor`, `grape`, `status`, `order` |
//! | `POST`   | `/wines` | Body: [`NewWine`]; returns 201 + stored wine |
//! | `GET`    | `/wines/:id` | 404 if not found |
//! | `PATCH`  | `/wines/:id` | Body: [`WinePatch`] |
//! | `DELETE` | `/wines/:id` | 204, or 404 if not found |
//! | `PUT`    | `/wines/:id/notes` | Body: `{"notes":"..."}` |
//! | `POST`   | `/wines/:id/consume` | Body: [`NewConsumption`]; 409 if already consumed |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cellar_core::{
  filter::{FilterSpec, filter},
  store::WineStore,
  wine::{NewConsumption, NewWine, Wine, WineOrder, WinePatch},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// Which side of the partition to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
  Active,
  Archived,
  #[default]
  All,
}

impl StatusFilter {
  fn admits(self, wine: &Wine) -> bool {
    match self {
      Self::Active => wine.is_active(),
      Self::Archived => wine.state.is_archived(),
      Self::All => true,
    }
  }
}

/// Filter criteria shared by `GET /wines` and `GET /collection`.
///
/// `"all"` or an empty value on `style`, `location` or `vendor` disables
/// that criterion.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
  pub style:    Option<String>,
  pub location: Option<String>,
  pub vendor:   Option<String>,
  pub grape:    Option<String>,
  #[serde(default)]
  pub order:    WineOrder,
}

impl FilterParams {
  pub fn spec(&self) -> FilterSpec {
    FilterSpec {
      style:    self.style.clone(),
      location: self.location.clone(),
      vendor:   self.vendor.clone(),
      grape:    self.grape.clone(),
    }
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  #[serde(flatten)]
  pub filter: FilterParams,
  #[serde(default)]
  pub status: StatusFilter,
}

/// `GET /wines[?style=...][&location=...][&vendor=...][&grape=...][&status=...][&order=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Wine>>, ApiError>
where
  S: WineStore,
{
  let mut wines = store.list().await.map_err(ApiError::from_store)?;
  wines.retain(|w| params.status.admits(w));
  params.filter.order.sort(&mut wines);
  Ok(Json(filter(&wines, &params.filter.spec())))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /wines/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Wine>, ApiError>
where
  S: WineStore,
{
  let wine = store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(wine))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /wines` — returns 201 + the stored [`Wine`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewWine>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WineStore,
{
  let wine = store.add(body).await.map_err(ApiError::from_store)?;
  info!(wine_id = %wine.wine_id, name = %wine.name, "wine added");
  Ok((StatusCode::CREATED, Json(wine)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /wines/:id` — body: any subset of the descriptive fields.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<WinePatch>,
) -> Result<Json<Wine>, ApiError>
where
  S: WineStore,
{
  let wine = store
    .update(id, patch)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(wine))
}

#[derive(Debug, Deserialize)]
pub struct NotesBody {
  pub notes: String,
}

/// `PUT /wines/:id/notes` — body: `{"notes":"..."}`; an empty string clears.
pub async fn update_notes<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NotesBody>,
) -> Result<Json<Wine>, ApiError>
where
  S: WineStore,
{
  let wine = store
    .update_notes(id, body.notes)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(wine))
}

// ─── Consume ──────────────────────────────────────────────────────────────────

/// `POST /wines/:id/consume` — body: [`NewConsumption`].
///
/// Returns the archived wine; 409 if it was already consumed.
pub async fn consume_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewConsumption>,
) -> Result<Json<Wine>, ApiError>
where
  S: WineStore,
{
  let wine = store
    .mark_consumed(id, body)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found(id))?;
  info!(wine_id = %id, "wine consumed");
  Ok(Json(wine))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /wines/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: WineStore,
{
  if store.delete(id).await.map_err(ApiError::from_store)? {
    info!(wine_id = %id, "wine deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(not_found(id))
  }
}

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("wine {id} not found")) }
