use crate::actor::core::DeliveryError;
use crate::actor::message::Envelope;
use crate::impl_event;

/// Sent back to the sender of an envelope whose handler raised. Clients may
/// handle it like any other event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
  pub envelope: Envelope,
  pub cause: DeliveryError,
}

impl Failure {
  pub fn new(envelope: Envelope, cause: DeliveryError) -> Self {
    Self { envelope, cause }
  }
}

/// Terminal event targeted at the dead-letter process. Its sender is always
/// the system ref, so receiving one can never re-trigger dead-lettering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetterEvent {
  pub envelope: Envelope,
  pub cause: DeliveryError,
}

impl DeadLetterEvent {
  pub fn new(envelope: Envelope, cause: DeliveryError) -> Self {
    Self { envelope, cause }
  }
}

impl_event!(Failure, DeadLetterEvent);
