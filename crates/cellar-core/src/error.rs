//! Error types for `cellar-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("wine {0} is already consumed")]
  AlreadyConsumed(Uuid),

  #[error("validation failed: {0}")]
  Validation(String),
}

impl Error {
  pub(crate) fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
