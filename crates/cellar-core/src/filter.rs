//! The filter engine: per-field criteria combined with logical AND.

use serde::{Deserialize, Deserializer, Serialize};

use crate::wine::Wine;

/// The wire value that means "do not filter on this field".
pub const WILDCARD: &str = "all";

/// Criteria for [`filter`]. `None` on any field matches every wine, so
/// [`FilterSpec::default`] is the identity filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
  /// Exact match against the wine's style.
  #[serde(default, deserialize_with = "wildcard")]
  pub style:    Option<String>,
  /// Case-sensitive substring of the wine's location.
  #[serde(default, deserialize_with = "wildcard")]
  pub location: Option<String>,
  /// Case-sensitive substring of the wine's vendor.
  #[serde(default, deserialize_with = "wildcard")]
  pub vendor:   Option<String>,
  /// Case-insensitive substring of any of the wine's grapes.
  #[serde(default)]
  pub grape:    Option<String>,
}

impl FilterSpec {
  pub fn style(mut self, style: impl Into<String>) -> Self {
    self.style = Some(style.into());
    self
  }

  pub fn location(mut self, location: impl Into<String>) -> Self {
    self.location = Some(location.into());
    self
  }

  pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
    self.vendor = Some(vendor.into());
    self
  }

  pub fn grape(mut self, grape: impl Into<String>) -> Self {
    self.grape = Some(grape.into());
    self
  }

  /// Whether every criterion is a wildcard.
  pub fn is_identity(&self) -> bool {
    active(&self.style).is_none()
      && active(&self.location).is_none()
      && active(&self.vendor).is_none()
      && self.grape_needle().is_none()
  }

  pub fn matches(&self, wine: &Wine) -> bool {
    let style = active(&self.style).is_none_or(|s| wine.style == s);
    let location =
      active(&self.location).is_none_or(|l| wine.location.contains(l));
    let vendor = active(&self.vendor).is_none_or(|v| wine.vendor.contains(v));
    let grape = match self.grape_needle() {
      None => true,
      Some(needle) => wine
        .grapes
        .iter()
        .any(|grape| grape.to_lowercase().contains(&needle)),
    };
    style && location && vendor && grape
  }

  /// The lowercased grape search text. Only an empty search disables it;
  /// `"all"` is searched for like any other text.
  fn grape_needle(&self) -> Option<String> {
    self
      .grape
      .as_deref()
      .filter(|g| !g.is_empty())
      .map(str::to_lowercase)
  }
}

/// A criterion that is present, non-empty and not the wildcard.
fn active(criterion: &Option<String>) -> Option<&str> {
  criterion
    .as_deref()
    .filter(|c| !c.is_empty() && *c != WILDCARD)
}

/// Maps the `"all"` wildcard and empty strings to `None` on the way in.
fn wildcard<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<String>::deserialize(de)?;
  Ok(raw.filter(|s| !s.is_empty() && s != WILDCARD))
}

/// Return the wines matching `spec`, preserving their order.
pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Vec<Wine>
where
  I: IntoIterator<Item = &'a Wine>,
{
  records
    .into_iter()
    .filter(|w| spec.matches(w))
    .cloned()
    .collect()
}

// ─── Facets ──────────────────────────────────────────────────────────────────

/// The distinct values a filter bar offers, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
  pub styles:    Vec<String>,
  pub locations: Vec<String>,
  pub vendors:   Vec<String>,
}

pub fn facets<'a, I>(records: I) -> Facets
where
  I: IntoIterator<Item = &'a Wine>,
{
  fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
      values.push(value.to_owned());
    }
  }

  let mut out = Facets::default();
  for wine in records {
    push_distinct(&mut out.styles, &wine.style);
    push_distinct(&mut out.locations, &wine.location);
    push_distinct(&mut out.vendors, &wine.vendor);
  }
  out
}
