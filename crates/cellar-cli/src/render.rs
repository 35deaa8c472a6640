//! Plain-text rendering of wines for the terminal.

use std::fmt::Write as _;

use cellar_core::{
  filter::Facets,
  partition::Collection,
  wine::{Consumption, Rating, Wine},
};
use chrono::Local;

/// One line per wine: short id, price, name, style, grapes, location.
pub fn wine_line(wine: &Wine) -> String {
  let short_id: String = wine.wine_id.to_string().chars().take(8).collect();
  let mut line = format!(
    "{short_id}  {:<4}  {}  ({})  {}  @ {}",
    wine.price.symbol(),
    wine.name,
    wine.style,
    wine.grapes.join(", "),
    wine.location,
  );
  if let Some(c) = wine.consumption() {
    let _ = write!(line, "  {}", stars(c.rating));
  }
  line
}

/// Both partitions, headed like the collection / archive tabs.
pub fn collection(view: &Collection) -> String {
  let mut out = String::new();
  section(&mut out, "Collection", view.totals.active, &view.active);
  out.push('\n');
  section(&mut out, "Archive", view.totals.archived, &view.archived);
  out
}

fn section(out: &mut String, title: &str, total: usize, wines: &[Wine]) {
  if wines.len() == total {
    let _ = writeln!(out, "{title} ({total})");
  } else {
    let _ = writeln!(out, "{title} ({}/{total})", wines.len());
  }
  if wines.is_empty() {
    out.push_str("  (none)\n");
  }
  for wine in wines {
    let _ = writeln!(out, "  {}", wine_line(wine));
  }
}

/// Full detail view of a single wine.
pub fn wine_detail(wine: &Wine) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", wine.name);
  let _ = writeln!(out, "  id:        {}", wine.wine_id);
  let _ = writeln!(out, "  style:     {}", wine.style);
  let _ = writeln!(out, "  grapes:    {}", wine.grapes.join(", "));
  let _ = writeln!(out, "  location:  {}", wine.location);
  let _ = writeln!(out, "  vendor:    {}", wine.vendor);
  let _ = writeln!(out, "  purchased: {}", wine.purchase_date);
  if let Some(d) = wine.drink_by {
    let _ = writeln!(out, "  drink by:  {d}");
  }
  let _ = writeln!(
    out,
    "  price:     {} {}",
    wine.price.symbol(),
    wine.price.label()
  );
  if let Some(image) = &wine.image {
    let _ = writeln!(out, "  image:     {image}");
  }
  if let Some(notes) = &wine.notes {
    let _ = writeln!(out, "  notes:     {notes}");
  }
  if let Some(c) = wine.consumption() {
    consumption_detail(&mut out, c);
  }
  out
}

fn consumption_detail(out: &mut String, c: &Consumption) {
  let drank = c.drank_at.with_timezone(&Local).format("%Y-%m-%d");
  let _ = writeln!(out, "  enjoyed:   {drank}  {}", stars(c.rating));
  let _ = writeln!(
    out,
    "             {}",
    if c.would_buy_again { "Would buy again" } else { "One time experience" }
  );
  if !c.food_pairings.is_empty() {
    let _ = writeln!(out, "  pairings:  {}", c.food_pairings.join(", "));
  }
  if let Some(experience) = &c.experience {
    let _ = writeln!(out, "  experience: {experience}");
  }
}

pub fn facets(f: &Facets) -> String {
  let mut out = String::new();
  for (title, values) in [
    ("Styles", &f.styles),
    ("Locations", &f.locations),
    ("Vendors", &f.vendors),
  ] {
    let _ = writeln!(out, "{title}:");
    for v in values {
      let _ = writeln!(out, "  {v}");
    }
  }
  out
}

fn stars(rating: Rating) -> String {
  let n = usize::from(rating.stars());
  format!("{}{}", "★".repeat(n), "☆".repeat(usize::from(Rating::MAX) - n))
}
