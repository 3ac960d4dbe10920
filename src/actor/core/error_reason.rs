use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque reason attached to a failed handler effect. Carries a message
/// only; causes raised by user thunks are flattened at the raise site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReason {
  message: String,
}

impl ErrorReason {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn from_error<E: Error>(error: &E) -> Self {
    Self {
      message: error.to_string(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

impl Display for ErrorReason {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl Error for ErrorReason {}

static_assertions::assert_impl_all!(ErrorReason: Send, Sync);
