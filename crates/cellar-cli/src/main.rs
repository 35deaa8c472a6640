//! `cellar` — command-line client for the Cellar wine catalog.
//!
//! # Usage
//!
//! ```text
//! cellar --url http://localhost:5233 list --grape neb
//! cellar add --name Barolo --style Red --grapes Nebbiolo \
//!   --location "Cellar A" --vendor "Acme Wines" --purchased 2023-01-01 --price 3
//! cellar drink 3f2a --rating 4 --pairings "Steak, Mushrooms"
//! ```

mod client;
mod render;

use anyhow::{Context, Result};
use cellar_core::{
  filter::FilterSpec,
  wine::{
    NewConsumption, NewWine, PriceTier, Rating, WineOrder, WinePatch, split_list,
  },
};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5233";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cellar", version, about = "Command-line client for the Cellar wine catalog")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the cellar server (default: http://localhost:5233).
  #[arg(long, env = "CELLAR_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the collection and the archive, optionally filtered.
  List(ListArgs),
  /// Show every detail of one wine.
  Show { id: String },
  /// Add a wine to the collection.
  Add(AddArgs),
  /// Change descriptive fields of a wine.
  Edit(EditArgs),
  /// Replace a wine's notes (an empty string clears them).
  Notes { id: String, notes: String },
  /// Record that a wine was drunk and move it to the archive.
  Drink(DrinkArgs),
  /// Remove a wine entirely.
  Delete { id: String },
  /// List the distinct styles, locations and vendors.
  Facets,
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
  /// Exact style, or "all".
  #[arg(long)]
  style:    Option<String>,
  /// Substring of the location, or "all".
  #[arg(long)]
  location: Option<String>,
  /// Substring of the vendor, or "all".
  #[arg(long)]
  vendor:   Option<String>,
  /// Case-insensitive substring of any grape.
  #[arg(long)]
  grape:    Option<String>,
  /// `added` or `purchased` (newest first).
  #[arg(long, default_value = "added")]
  order:    WineOrder,
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
  #[arg(long)]
  name:      String,
  #[arg(long)]
  style:     String,
  /// Comma-separated, in display order.
  #[arg(long)]
  grapes:    String,
  #[arg(long)]
  location:  String,
  #[arg(long)]
  vendor:    String,
  /// Purchase date (YYYY-MM-DD).
  #[arg(long)]
  purchased: NaiveDate,
  /// Drink-by date (YYYY-MM-DD).
  #[arg(long)]
  drink_by:  Option<NaiveDate>,
  /// Price tier 1–4 ($ Budget … $$$$ Luxury).
  #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=4))]
  price:     u8,
  #[arg(long)]
  notes:     Option<String>,
  /// Image URL or path.
  #[arg(long)]
  image:     Option<String>,
}

#[derive(ClapArgs, Debug)]
struct EditArgs {
  id:        String,
  #[arg(long)]
  name:      Option<String>,
  #[arg(long)]
  style:     Option<String>,
  /// Comma-separated, in display order.
  #[arg(long)]
  grapes:    Option<String>,
  #[arg(long)]
  location:  Option<String>,
  #[arg(long)]
  vendor:    Option<String>,
  #[arg(long)]
  purchased: Option<NaiveDate>,
  #[arg(long, conflicts_with = "clear_drink_by")]
  drink_by:  Option<NaiveDate>,
  /// Remove the drink-by date.
  #[arg(long)]
  clear_drink_by: bool,
  #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
  price:     Option<u8>,
  #[arg(long)]
  image:     Option<String>,
}

#[derive(ClapArgs, Debug)]
struct DrinkArgs {
  id:            String,
  /// 1–5 stars.
  #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
  rating:        u8,
  /// Record that you would not buy it again.
  #[arg(long)]
  no_buy_again:  bool,
  /// Comma-separated food pairings.
  #[arg(long, default_value = "")]
  pairings:      String,
  #[arg(long)]
  experience:    Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::List(a) => {
      let spec = FilterSpec {
        style:    a.style,
        location: a.location,
        vendor:   a.vendor,
        grape:    a.grape,
      };
      let view = client.collection(&spec, a.order).await?;
      print!("{}", render::collection(&view));
    }

    Command::Show { id } => {
      let id = client.resolve_id(&id).await?;
      print!("{}", render::wine_detail(&client.get_wine(id).await?));
    }

    Command::Add(a) => {
      let input = NewWine {
        name:          a.name,
        style:         a.style,
        grapes:        split_list(&a.grapes),
        location:      a.location,
        vendor:        a.vendor,
        purchase_date: a.purchased,
        drink_by:      a.drink_by,
        price:         PriceTier::try_from(a.price)?,
        notes:         a.notes,
        image:         a.image,
      };
      let wine = client.add_wine(&input).await?;
      println!("Added {}", render::wine_line(&wine));
    }

    Command::Edit(a) => {
      let id = client.resolve_id(&a.id).await?;
      let patch = WinePatch {
        name:          a.name,
        style:         a.style,
        grapes:        a.grapes.as_deref().map(split_list),
        location:      a.location,
        vendor:        a.vendor,
        purchase_date: a.purchased,
        drink_by:      if a.clear_drink_by { Some(None) } else { a.drink_by.map(Some) },
        price:         a.price.map(PriceTier::try_from).transpose()?,
        image:         a.image.map(Some),
      };
      if patch.is_empty() {
        anyhow::bail!("nothing to change; pass at least one field");
      }
      let wine = client.update_wine(id, &patch).await?;
      println!("Updated {}", render::wine_line(&wine));
    }

    Command::Notes { id, notes } => {
      let id = client.resolve_id(&id).await?;
      let wine = client.update_notes(id, &notes).await?;
      print!("{}", render::wine_detail(&wine));
    }

    Command::Drink(a) => {
      let id = client.resolve_id(&a.id).await?;
      let input = NewConsumption {
        rating:          Rating::new(a.rating)?,
        would_buy_again: !a.no_buy_again,
        food_pairings:   split_list(&a.pairings),
        experience:      a.experience,
      };
      let wine = client.consume(id, &input).await?;
      println!("Archived {}", render::wine_line(&wine));
    }

    Command::Delete { id } => {
      let id = client.resolve_id(&id).await?;
      client.delete_wine(id).await?;
      println!("Deleted {id}");
    }

    Command::Facets => {
      print!("{}", render::facets(&client.facets().await?));
    }
  }
  Ok(())
}
