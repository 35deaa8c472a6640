//! Property-based tests for the filter engine and the partition view.
//!
//! Verifies, over arbitrary collections and filters:
//! - filtering returns a subsequence of its input
//! - the all-wildcard filter is the identity
//! - filtering and partitioning commute
//! - consumption is a one-way transition

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use cellar_core::{
  filter::{FilterSpec, WILDCARD, filter},
  partition::{Partition, partition},
  wine::{NewConsumption, NewWine, PriceTier, Rating, Wine},
};

// =============================================================================
// Strategies
// =============================================================================

const STYLES: &[&str] = &["Red", "White", "Rosé", "Sparkling"];
const LOCATIONS: &[&str] = &["Cellar A", "Cellar B", "Fridge", "Garage rack"];
const VENDORS: &[&str] = &["Acme Wines", "Corner Shop", "Acme Direct"];
const GRAPES: &[&str] = &["Nebbiolo", "Merlot", "Pinot Noir", "Pinot Blanc", "Syrah"];

fn arb_wine() -> impl Strategy<Value = Wine> {
  (
    prop::sample::select(STYLES),
    prop::sample::select(LOCATIONS),
    prop::sample::select(VENDORS),
    prop::collection::vec(prop::sample::select(GRAPES), 1..3),
    1u8..=4,
    any::<bool>(),
    1u8..=5,
  )
    .prop_map(|(style, location, vendor, grapes, price, consumed, stars)| {
      let mut input = NewWine::new(
        "Wine",
        style,
        grapes.into_iter().map(str::to_owned).collect(),
        location,
        vendor,
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
      );
      input.price = PriceTier::try_from(price).unwrap();

      let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
      let wine = Wine::create(Uuid::new_v4(), input, at).unwrap();
      if consumed {
        wine
          .consume(NewConsumption::new(Rating::new(stars).unwrap()), at)
          .unwrap()
      } else {
        wine
      }
    })
}

fn arb_criterion(values: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
  prop_oneof![
    Just(None),
    Just(Some(WILDCARD.to_owned())),
    prop::sample::select(values).prop_map(|v| Some(v.to_owned())),
    // Prefixes exercise substring matching.
    prop::sample::select(values).prop_map(|v| Some(v.chars().take(4).collect())),
  ]
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
  (
    arb_criterion(STYLES),
    arb_criterion(LOCATIONS),
    arb_criterion(VENDORS),
    prop_oneof![
      Just(None),
      Just(Some(String::new())),
      prop::sample::select(GRAPES).prop_map(|g| Some(g.to_lowercase())),
      prop::sample::select(GRAPES).prop_map(|g| Some(g[1..4].to_uppercase())),
    ],
  )
    .prop_map(|(style, location, vendor, grape)| FilterSpec {
      style,
      location,
      vendor,
      grape,
    })
}

fn arb_cellar() -> impl Strategy<Value = Vec<Wine>> {
  prop::collection::vec(arb_wine(), 0..24)
}

/// Whether `sub` appears in `full` in order, without repeats.
fn is_subsequence(sub: &[Wine], full: &[Wine]) -> bool {
  let mut rest = full.iter();
  sub.iter().all(|s| rest.any(|f| f.wine_id == s.wine_id))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
  #[test]
  fn filter_returns_subsequence(wines in arb_cellar(), spec in arb_spec()) {
    let hits = filter(&wines, &spec);
    prop_assert!(hits.len() <= wines.len());
    prop_assert!(is_subsequence(&hits, &wines));
  }

  #[test]
  fn wildcard_filter_is_identity(wines in arb_cellar()) {
    let spec = FilterSpec {
      style:    Some(WILDCARD.to_owned()),
      location: Some(WILDCARD.to_owned()),
      vendor:   Some(WILDCARD.to_owned()),
      grape:    Some(String::new()),
    };
    prop_assert_eq!(filter(&wines, &spec), wines);
  }

  #[test]
  fn filter_and_partition_commute(wines in arb_cellar(), spec in arb_spec()) {
    let filtered_then_split = partition(&filter(&wines, &spec));
    let split_then_filtered = partition(&wines).filter(&spec);
    prop_assert_eq!(filtered_then_split, split_then_filtered);
  }

  #[test]
  fn partition_is_total_and_disjoint(wines in arb_cellar()) {
    let Partition { active, archived } = partition(&wines);
    prop_assert_eq!(active.len() + archived.len(), wines.len());
    prop_assert!(active.iter().all(Wine::is_active));
    prop_assert!(archived.iter().all(|w| w.consumption().is_some()));
  }

  #[test]
  fn consumption_is_one_way(wine in arb_wine(), stars in 1u8..=5) {
    let at = Utc::now();
    let input = NewConsumption::new(Rating::new(stars).unwrap());
    match wine.clone().consume(input.clone(), at) {
      Ok(archived) => {
        prop_assert!(wine.is_active());
        prop_assert!(!archived.is_active());
        prop_assert!(archived.clone().consume(input, at).is_err());
        prop_assert!(!archived.with_notes("still archived", at).is_active());
      }
      Err(_) => prop_assert!(!wine.is_active()),
    }
  }
}
