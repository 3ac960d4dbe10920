use crate::actor::core::ErrorReason;
use crate::actor::pid::Pid;
use thiserror::Error;

/// Why an envelope could not be delivered and handled normally. Every
/// variant ends up inside a `Failure` or `DeadLetterEvent` payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
  #[error("unknown process: {0}")]
  UnknownProcess(Pid),
  #[error("mailbox full for {0}")]
  EventDelivery(Pid),
  #[error("no handler matched {0}")]
  EventMatch(String),
  #[error("event handling failed: {0}")]
  EventHandling(ErrorReason),
  #[error("illegal state: {0}")]
  IllegalState(String),
}

impl DeliveryError {
  pub fn illegal_state(state: &str) -> Self {
    DeliveryError::IllegalState(state.to_string())
  }
}

static_assertions::assert_impl_all!(DeliveryError: Send, Sync);
