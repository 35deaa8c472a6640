//! Integration tests for `SqliteStore` against an in-memory database.

use cellar_core::{
  Error as CoreError,
  filter::FilterSpec,
  store::WineStore,
  wine::{NewConsumption, NewWine, PriceTier, Rating, WineOrder, WinePatch},
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

fn barolo() -> NewWine {
  let mut input = NewWine::new(
    "Barolo",
    "Red",
    vec!["Nebbiolo".into()],
    "Cellar A",
    "Acme Wines",
    date("2023-01-01"),
  );
  input.price = PriceTier::Premium;
  input
}

fn steak_dinner() -> NewConsumption {
  let mut c = NewConsumption::new(Rating::new(4).unwrap());
  c.food_pairings = vec!["Steak".into()];
  c
}

// ─── Add / get ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_wine() {
  let s = store().await;

  let mut input = barolo();
  input.grapes = vec!["Nebbiolo".into(), "Barbera".into()];
  input.drink_by = Some(date("2030-12-31"));
  input.image = Some("https://example.com/barolo.jpg".into());
  let wine = s.add(input).await.unwrap();

  let fetched = s.get(wine.wine_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Barolo");
  assert_eq!(fetched.grapes, vec!["Nebbiolo", "Barbera"]);
  assert_eq!(fetched.drink_by, Some(date("2030-12-31")));
  assert_eq!(fetched.price, PriceTier::Premium);
  assert_eq!(fetched.image.as_deref(), Some("https://example.com/barolo.jpg"));
  assert!(fetched.is_active());
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn add_rejects_invalid_input() {
  let s = store().await;
  let mut input = barolo();
  input.drink_by = Some(date("2020-01-01"));

  let err = s.add(input).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::Validation(_))));
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_preserves_insertion_order() {
  let s = store().await;
  for name in ["first", "second", "third"] {
    let mut input = barolo();
    input.name = name.into();
    s.add(input).await.unwrap();
  }

  let names: Vec<_> = s
    .list()
    .await
    .unwrap()
    .into_iter()
    .map(|w| w.name)
    .collect();
  assert_eq!(names, ["first", "second", "third"]);
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_notes_replaces_and_clears() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();

  let updated = s
    .update_notes(wine.wine_id, "Tar and roses".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.notes.as_deref(), Some("Tar and roses"));
  assert_eq!(
    s.get(wine.wine_id).await.unwrap().unwrap().notes.as_deref(),
    Some("Tar and roses")
  );

  s.update_notes(wine.wine_id, "  ".into()).await.unwrap();
  assert_eq!(s.get(wine.wine_id).await.unwrap().unwrap().notes, None);
}

#[tokio::test]
async fn update_notes_missing_returns_none() {
  let s = store().await;
  let result = s.update_notes(Uuid::new_v4(), "x".into()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn patch_updates_selected_fields() {
  let s = store().await;
  let mut input = barolo();
  input.drink_by = Some(date("2030-01-01"));
  let wine = s.add(input).await.unwrap();

  let patch = WinePatch {
    location: Some("Cellar B".into()),
    price: Some(PriceTier::Luxury),
    drink_by: Some(None),
    ..WinePatch::default()
  };
  s.update(wine.wine_id, patch).await.unwrap().unwrap();

  let fetched = s.get(wine.wine_id).await.unwrap().unwrap();
  assert_eq!(fetched.location, "Cellar B");
  assert_eq!(fetched.price, PriceTier::Luxury);
  assert_eq!(fetched.drink_by, None);
  assert_eq!(fetched.name, "Barolo");
  assert_eq!(fetched.created_at, wine.created_at);
}

// ─── Consumption ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn mark_consumed_archives_wine() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();

  let archived = s
    .mark_consumed(wine.wine_id, steak_dinner())
    .await
    .unwrap()
    .unwrap();
  assert!(!archived.is_active());

  let fetched = s.get(wine.wine_id).await.unwrap().unwrap();
  let c = fetched.consumption().expect("consumption persisted");
  assert_eq!(c.rating.stars(), 4);
  assert!(c.would_buy_again);
  assert_eq!(c.food_pairings, vec!["Steak"]);
  assert_eq!(c.experience, None);
}

#[tokio::test]
async fn mark_consumed_twice_is_rejected() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();
  s.mark_consumed(wine.wine_id, steak_dinner()).await.unwrap();

  let mut second = NewConsumption::new(Rating::new(1).unwrap());
  second.experience = Some("corked".into());
  let err = s.mark_consumed(wine.wine_id, second).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::AlreadyConsumed(id)) if id == wine.wine_id));

  // The first consumption is untouched.
  let fetched = s.get(wine.wine_id).await.unwrap().unwrap();
  assert_eq!(fetched.consumption().unwrap().rating.stars(), 4);
}

#[tokio::test]
async fn notes_stay_editable_after_archive() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();
  s.mark_consumed(wine.wine_id, steak_dinner()).await.unwrap();

  let updated = s
    .update_notes(wine.wine_id, "Better with age".into())
    .await
    .unwrap()
    .unwrap();
  assert!(!updated.is_active());
  assert!(s.get(wine.wine_id).await.unwrap().unwrap().consumption().is_some());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_wine_and_consumption() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();
  s.mark_consumed(wine.wine_id, steak_dinner()).await.unwrap();

  assert!(s.delete(wine.wine_id).await.unwrap());
  assert!(s.get(wine.wine_id).await.unwrap().is_none());
  assert!(!s.delete(wine.wine_id).await.unwrap());
}

// ─── Query ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn query_partitions_then_filters() {
  let s = store().await;
  let barolo = s.add(barolo()).await.unwrap();

  let mut merlot = NewWine::new(
    "Merlot",
    "Red",
    vec!["Merlot".into()],
    "Cellar B",
    "Corner Shop",
    date("2023-03-01"),
  );
  merlot.price = PriceTier::Budget;
  s.add(merlot).await.unwrap();

  let view = s.query(&FilterSpec::default(), WineOrder::Added).await.unwrap();
  assert_eq!(view.active.len(), 2);
  assert!(view.archived.is_empty());

  s.mark_consumed(barolo.wine_id, steak_dinner()).await.unwrap();

  let spec = FilterSpec::default().style("Red").grape("neb");
  let view = s.query(&spec, WineOrder::Added).await.unwrap();
  assert!(view.active.is_empty());
  assert_eq!(view.archived.len(), 1);
  assert_eq!(view.archived[0].wine_id, barolo.wine_id);
  assert_eq!(view.totals.active, 1);
  assert_eq!(view.totals.archived, 1);

  let view = s
    .query(&FilterSpec::default().location("Cellar"), WineOrder::Purchased)
    .await
    .unwrap();
  assert_eq!(view.active[0].name, "Merlot");
  assert_eq!(view.archived[0].name, "Barolo");
}

// ─── Overlapping requests ────────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_consumes_archive_once() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();

  let (a, b) = tokio::join!(
    s.mark_consumed(wine.wine_id, steak_dinner()),
    s.mark_consumed(wine.wine_id, steak_dinner()),
  );
  let results = [a, b];
  let archived = results.iter().filter(|r| matches!(r, Ok(Some(_)))).count();
  let conflicts = results
    .iter()
    .filter(|r| matches!(r, Err(Error::Core(CoreError::AlreadyConsumed(_)))))
    .count();
  assert_eq!((archived, conflicts), (1, 1));
}

#[tokio::test]
async fn overlapping_patches_both_apply() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();

  let rename = WinePatch {
    name: Some("Renamed".into()),
    ..WinePatch::default()
  };
  let relocate = WinePatch {
    location: Some("Cellar B".into()),
    ..WinePatch::default()
  };
  let (a, b) = tokio::join!(
    s.update(wine.wine_id, rename),
    s.update(wine.wine_id, relocate),
  );
  a.unwrap().unwrap();
  b.unwrap().unwrap();

  let fetched = s.get(wine.wine_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Renamed");
  assert_eq!(fetched.location, "Cellar B");
}

#[tokio::test]
async fn notes_after_overlapping_delete_report_missing() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();

  let (deleted, notes) = tokio::join!(
    s.delete(wine.wine_id),
    s.update_notes(wine.wine_id, "too late".into()),
  );
  assert!(deleted.unwrap());
  assert!(notes.unwrap().is_none());
  assert!(s.get(wine.wine_id).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_transition_writes_nothing() {
  let s = store().await;
  let wine = s.add(barolo()).await.unwrap();
  s.mark_consumed(wine.wine_id, steak_dinner()).await.unwrap();
  let before = s.get(wine.wine_id).await.unwrap().unwrap();

  let bad_dates = WinePatch {
    drink_by: Some(Some(date("2000-01-01"))),
    ..WinePatch::default()
  };
  assert!(s.update(wine.wine_id, bad_dates).await.is_err());
  assert!(s.mark_consumed(wine.wine_id, steak_dinner()).await.is_err());

  assert_eq!(s.get(wine.wine_id).await.unwrap().unwrap(), before);
}

#[test]
fn consumption_key_violation_maps_to_already_consumed() {
  let conn = rusqlite::Connection::open_in_memory().unwrap();
  conn.execute_batch(crate::schema::SCHEMA).unwrap();
  let id = Uuid::new_v4();
  conn
    .execute(
      "INSERT INTO wines (wine_id, name, style, location, vendor,
         purchase_date, price, created_at, updated_at)
       VALUES (?1, 'x', 'Red', 'x', 'x', '2023-01-01', 2,
         '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')",
      rusqlite::params![id.to_string()],
    )
    .unwrap();
  let insert = "INSERT INTO consumptions (wine_id, rating, drank_at, would_buy_again)
                VALUES (?1, 4, '2024-02-01T00:00:00+00:00', 1)";
  conn.execute(insert, rusqlite::params![id.to_string()]).unwrap();
  let err = conn
    .execute(insert, rusqlite::params![id.to_string()])
    .unwrap_err();

  let mapped = crate::store::consumption_conflict(err, id);
  assert!(matches!(mapped, Error::Core(CoreError::AlreadyConsumed(got)) if got == id));
}
