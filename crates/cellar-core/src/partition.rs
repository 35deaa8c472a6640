//! The active / archived split and the collection view built on top of it.

use serde::{Deserialize, Serialize};

use crate::{
  filter::{FilterSpec, filter},
  wine::{Wine, WineOrder},
};

/// Wines split by lifecycle state. Membership is derived from
/// [`Wine::state`] alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
  pub active:   Vec<Wine>,
  pub archived: Vec<Wine>,
}

impl Partition {
  /// Apply `spec` to both halves independently.
  pub fn filter(&self, spec: &FilterSpec) -> Self {
    Self {
      active:   filter(&self.active, spec),
      archived: filter(&self.archived, spec),
    }
  }
}

/// Split `records` into active and archived wines, preserving order within
/// each half.
pub fn partition<'a, I>(records: I) -> Partition
where
  I: IntoIterator<Item = &'a Wine>,
{
  let (active, archived): (Vec<Wine>, Vec<Wine>) = records
    .into_iter()
    .cloned()
    .partition(|w: &Wine| w.is_active());
  Partition { active, archived }
}

// ─── Collection view ─────────────────────────────────────────────────────────

/// Unfiltered partition sizes, shown next to each tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
  pub active:   usize,
  pub archived: usize,
}

/// The computed read model for the whole catalog — never stored, always
/// derived from the record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
  /// Active wines matching the filter.
  pub active:   Vec<Wine>,
  /// Archived wines matching the filter.
  pub archived: Vec<Wine>,
  pub totals:   Totals,
}

impl Collection {
  /// Order, partition, then filter each partition unless `spec` matches
  /// everything.
  pub fn build(mut records: Vec<Wine>, spec: &FilterSpec, order: WineOrder) -> Self {
    order.sort(&mut records);
    let all = partition(&records);
    let totals = Totals {
      active:   all.active.len(),
      archived: all.archived.len(),
    };
    let Partition { active, archived } =
      if spec.is_identity() { all } else { all.filter(spec) };
    Self { active, archived, totals }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::wine::{NewConsumption, NewWine, Rating};

  fn wine(name: &str, style: &str, consumed: bool) -> Wine {
    let input = NewWine::new(
      name,
      style,
      vec!["Nebbiolo".into()],
      "Cellar A",
      "Acme Wines",
      NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
    );
    let at = Utc::now();
    let w = Wine::create(Uuid::new_v4(), input, at).unwrap();
    if consumed {
      w.consume(NewConsumption::new(Rating::new(3).unwrap()), at).unwrap()
    } else {
      w
    }
  }

  #[test]
  fn splits_on_state_preserving_order() {
    let wines = vec![
      wine("a", "Red", false),
      wine("b", "Red", true),
      wine("c", "White", false),
      wine("d", "White", true),
    ];
    let p = partition(&wines);
    let names = |ws: &[Wine]| ws.iter().map(|w| w.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&p.active), ["a", "c"]);
    assert_eq!(names(&p.archived), ["b", "d"]);
  }

  #[test]
  fn empty_input_gives_empty_halves() {
    assert_eq!(partition(&Vec::<Wine>::new()), Partition::default());
  }

  #[test]
  fn wildcard_collection_keeps_everything_in_order() {
    let wines = vec![
      wine("a", "Red", true),
      wine("b", "White", false),
      wine("c", "Red", false),
    ];
    let spec = FilterSpec::default().style(crate::filter::WILDCARD).grape("");
    let view = Collection::build(wines, &spec, WineOrder::Added);
    let names = |ws: &[Wine]| ws.iter().map(|w| w.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&view.active), ["b", "c"]);
    assert_eq!(names(&view.archived), ["a"]);
    assert_eq!(view.totals, Totals { active: 2, archived: 1 });
  }

  #[test]
  fn collection_counts_are_unfiltered() {
    let wines = vec![
      wine("a", "Red", false),
      wine("b", "White", false),
      wine("c", "Red", true),
    ];
    let view = Collection::build(
      wines,
      &FilterSpec::default().style("Red"),
      WineOrder::Added,
    );
    assert_eq!(view.totals, Totals { active: 2, archived: 1 });
    assert_eq!(view.active.len(), 1);
    assert_eq!(view.archived.len(), 1);
  }
}
