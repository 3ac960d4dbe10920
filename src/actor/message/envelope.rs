use crate::actor::message::EventHandle;
use crate::actor::pid::Pid;

/// Immutable `(sender, event, receiver)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
  sender: Pid,
  event: EventHandle,
  receiver: Pid,
}

impl Envelope {
  pub fn new(sender: Pid, event: EventHandle, receiver: Pid) -> Self {
    Self {
      sender,
      event,
      receiver,
    }
  }

  pub fn sender(&self) -> &Pid {
    &self.sender
  }

  pub fn event(&self) -> &EventHandle {
    &self.event
  }

  pub fn receiver(&self) -> &Pid {
    &self.receiver
  }
}

static_assertions::assert_impl_all!(Envelope: Send, Sync);
