//! Core types and trait definitions for the Cellar wine catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod filter;
pub mod memory;
pub mod partition;
pub mod store;
pub mod wine;

pub use error::{Error, Result};
