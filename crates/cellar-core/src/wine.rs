//! Wine records — the single entity of the Cellar catalog.
//!
//! A wine starts out [`WineState::Active`] and moves to
//! [`WineState::Archived`] exactly once, when it is drunk. There is no way
//! back; the consumption details travel inside the archived variant so that
//! partition membership can never disagree with the record itself.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Price tier ──────────────────────────────────────────────────────────────

/// Ordinal price band. Not a currency amount; serialised as `1..=4`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
  Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum PriceTier {
  Budget = 1,
  #[default]
  Moderate = 2,
  Premium = 3,
  Luxury = 4,
}

impl PriceTier {
  /// Dollar-sign indicator, one `$` per tier.
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Budget => "$",
      Self::Moderate => "$$",
      Self::Premium => "$$$",
      Self::Luxury => "$$$$",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Budget => "Budget",
      Self::Moderate => "Moderate",
      Self::Premium => "Premium",
      Self::Luxury => "Luxury",
    }
  }
}

impl TryFrom<u8> for PriceTier {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> {
    match value {
      1 => Ok(Self::Budget),
      2 => Ok(Self::Moderate),
      3 => Ok(Self::Premium),
      4 => Ok(Self::Luxury),
      other => Err(Error::validation(format!(
        "price tier must be between 1 and 4, got {other}"
      ))),
    }
  }
}

impl From<PriceTier> for u8 {
  fn from(tier: PriceTier) -> Self { tier as u8 }
}

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A 1–5 star rating given when a bottle is drunk.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
  pub const MAX: u8 = 5;

  pub fn new(stars: u8) -> Result<Self> {
    if (1..=Self::MAX).contains(&stars) {
      Ok(Self(stars))
    } else {
      Err(Error::validation(format!(
        "rating must be between 1 and {}, got {stars}",
        Self::MAX
      )))
    }
  }

  pub fn stars(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> { Self::new(value) }
}

impl From<Rating> for u8 {
  fn from(rating: Rating) -> Self { rating.0 }
}

// ─── Consumption ─────────────────────────────────────────────────────────────

/// What happened when the bottle was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
  pub rating:          Rating,
  /// Stamped by the store at transition time; never accepted from callers.
  pub drank_at:        DateTime<Utc>,
  pub would_buy_again: bool,
  pub food_pairings:   Vec<String>,
  pub experience:      Option<String>,
}

/// Input to [`crate::store::WineStore::mark_consumed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConsumption {
  pub rating:          Rating,
  #[serde(default = "default_true")]
  pub would_buy_again: bool,
  #[serde(default)]
  pub food_pairings:   Vec<String>,
  #[serde(default)]
  pub experience:      Option<String>,
}

fn default_true() -> bool { true }

impl NewConsumption {
  pub fn new(rating: Rating) -> Self {
    Self {
      rating,
      would_buy_again: true,
      food_pairings: Vec::new(),
      experience: None,
    }
  }

  fn into_consumption(self, drank_at: DateTime<Utc>) -> Consumption {
    Consumption {
      rating: self.rating,
      drank_at,
      would_buy_again: self.would_buy_again,
      food_pairings: clean_list(self.food_pairings),
      experience: non_blank(self.experience),
    }
  }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// Where a wine sits in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WineState {
  /// Still in the collection.
  Active,
  /// Drunk; kept for the record.
  Archived(Consumption),
}

impl WineState {
  pub fn is_active(&self) -> bool { matches!(self, Self::Active) }

  pub fn is_archived(&self) -> bool { !self.is_active() }

  pub fn consumption(&self) -> Option<&Consumption> {
    match self {
      Self::Active => None,
      Self::Archived(c) => Some(c),
    }
  }
}

// ─── Wine ────────────────────────────────────────────────────────────────────

/// A bottle in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wine {
  pub wine_id:       Uuid,
  pub name:          String,
  pub style:         String,
  /// Display order is significant.
  pub grapes:        Vec<String>,
  pub location:      String,
  pub vendor:        String,
  pub purchase_date: NaiveDate,
  pub drink_by:      Option<NaiveDate>,
  pub price:         PriceTier,
  pub notes:         Option<String>,
  /// Opaque reference to a bottle image (URL or path).
  pub image:         Option<String>,
  pub state:         WineState,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Wine {
  /// Build a new active wine from validated input.
  pub fn create(wine_id: Uuid, input: NewWine, at: DateTime<Utc>) -> Result<Self> {
    let input = input.normalized();
    input.validate()?;

    Ok(Self {
      wine_id,
      name: input.name,
      style: input.style,
      grapes: input.grapes,
      location: input.location,
      vendor: input.vendor,
      purchase_date: input.purchase_date,
      drink_by: input.drink_by,
      price: input.price,
      notes: input.notes,
      image: input.image,
      state: WineState::Active,
      created_at: at,
      updated_at: at,
    })
  }

  pub fn is_active(&self) -> bool { self.state.is_active() }

  pub fn consumption(&self) -> Option<&Consumption> { self.state.consumption() }

  /// Replace the notes. Blank notes clear the field.
  pub fn with_notes(self, notes: impl Into<String>, at: DateTime<Utc>) -> Self {
    Self {
      notes: non_blank(Some(notes.into())),
      updated_at: at,
      ..self
    }
  }

  /// Apply a partial update to the descriptive fields.
  ///
  /// The identifier and lifecycle state are never touched.
  pub fn with_patch(self, patch: WinePatch, at: DateTime<Utc>) -> Result<Self> {
    let wine_id = self.wine_id;
    let state = self.state.clone();
    let created_at = self.created_at;

    let mut input = NewWine::from(self);
    if let Some(name) = patch.name {
      input.name = name;
    }
    if let Some(style) = patch.style {
      input.style = style;
    }
    if let Some(grapes) = patch.grapes {
      input.grapes = grapes;
    }
    if let Some(location) = patch.location {
      input.location = location;
    }
    if let Some(vendor) = patch.vendor {
      input.vendor = vendor;
    }
    if let Some(purchase_date) = patch.purchase_date {
      input.purchase_date = purchase_date;
    }
    if let Some(drink_by) = patch.drink_by {
      input.drink_by = drink_by;
    }
    if let Some(price) = patch.price {
      input.price = price;
    }
    if let Some(image) = patch.image {
      input.image = image;
    }

    let mut wine = Self::create(wine_id, input, at)?;
    wine.state = state;
    wine.created_at = created_at;
    Ok(wine)
  }

  /// The one-way Active → Archived transition.
  ///
  /// Fails with [`Error::AlreadyConsumed`] if the wine is already archived.
  pub fn consume(self, input: NewConsumption, at: DateTime<Utc>) -> Result<Self> {
    if !self.is_active() {
      return Err(Error::AlreadyConsumed(self.wine_id));
    }
    Ok(Self {
      state: WineState::Archived(input.into_consumption(at)),
      updated_at: at,
      ..self
    })
  }
}

// ─── NewWine ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::WineStore::add`].
/// `wine_id` and the timestamps are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWine {
  pub name:          String,
  pub style:         String,
  pub grapes:        Vec<String>,
  pub location:      String,
  pub vendor:        String,
  pub purchase_date: NaiveDate,
  #[serde(default)]
  pub drink_by:      Option<NaiveDate>,
  #[serde(default)]
  pub price:         PriceTier,
  #[serde(default)]
  pub notes:         Option<String>,
  #[serde(default)]
  pub image:         Option<String>,
}

impl NewWine {
  /// Convenience constructor with all optional fields set to their defaults.
  pub fn new(
    name: impl Into<String>,
    style: impl Into<String>,
    grapes: Vec<String>,
    location: impl Into<String>,
    vendor: impl Into<String>,
    purchase_date: NaiveDate,
  ) -> Self {
    Self {
      name: name.into(),
      style: style.into(),
      grapes,
      location: location.into(),
      vendor: vendor.into(),
      purchase_date,
      drink_by: None,
      price: PriceTier::default(),
      notes: None,
      image: None,
    }
  }

  /// Trim free text, drop blank list items and blank optional fields.
  fn normalized(self) -> Self {
    Self {
      name: self.name.trim().to_owned(),
      style: self.style.trim().to_owned(),
      grapes: clean_list(self.grapes),
      location: self.location.trim().to_owned(),
      vendor: self.vendor.trim().to_owned(),
      notes: non_blank(self.notes),
      image: non_blank(self.image),
      ..self
    }
  }

  /// Boundary checks. Price and rating ranges are enforced by their types.
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("name", &self.name),
      ("style", &self.style),
      ("location", &self.location),
      ("vendor", &self.vendor),
    ] {
      if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} must not be empty")));
      }
    }
    if self.grapes.iter().all(|g| g.trim().is_empty()) {
      return Err(Error::validation("at least one grape is required"));
    }
    if let Some(drink_by) = self.drink_by
      && drink_by < self.purchase_date
    {
      return Err(Error::validation(format!(
        "drink-by date {drink_by} is before purchase date {}",
        self.purchase_date
      )));
    }
    Ok(())
  }
}

impl From<Wine> for NewWine {
  fn from(w: Wine) -> Self {
    Self {
      name:          w.name,
      style:         w.style,
      grapes:        w.grapes,
      location:      w.location,
      vendor:        w.vendor,
      purchase_date: w.purchase_date,
      drink_by:      w.drink_by,
      price:         w.price,
      notes:         w.notes,
      image:         w.image,
    }
  }
}

// ─── WinePatch ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::WineStore::update`]. Absent fields are left
/// untouched; `drink_by` and `image` accept an explicit `null` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub style:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub grapes:        Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vendor:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub purchase_date: Option<NaiveDate>,
  #[serde(
    default,
    deserialize_with = "explicit_null",
    skip_serializing_if = "Option::is_none"
  )]
  pub drink_by:      Option<Option<NaiveDate>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price:         Option<PriceTier>,
  #[serde(
    default,
    deserialize_with = "explicit_null",
    skip_serializing_if = "Option::is_none"
  )]
  pub image:         Option<Option<String>>,
}

impl WinePatch {
  pub fn is_empty(&self) -> bool { self == &Self::default() }
}

/// Distinguishes a missing field (`None`) from an explicit `null`
/// (`Some(None)`).
fn explicit_null<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// How a listing is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WineOrder {
  /// Insertion order.
  #[default]
  Added,
  /// Most recent purchase first; ties keep insertion order.
  Purchased,
}

impl WineOrder {
  pub fn sort(self, wines: &mut [Wine]) {
    match self {
      Self::Added => {}
      Self::Purchased => {
        wines.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
      }
    }
  }
}

impl fmt::Display for WineOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Added => "added",
      Self::Purchased => "purchased",
    })
  }
}

impl FromStr for WineOrder {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "added" => Ok(Self::Added),
      "purchased" => Ok(Self::Purchased),
      other => Err(Error::validation(format!("unknown order: {other:?}"))),
    }
  }
}

// ─── Text helpers ────────────────────────────────────────────────────────────

/// Split comma-separated form input (`"Nebbiolo, Barbera"`) into trimmed,
/// non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}

fn clean_list(items: Vec<String>) -> Vec<String> {
  items
    .into_iter()
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
    .collect()
}

fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}
