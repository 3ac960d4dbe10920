use crate::impl_event;

/// Runtime-generated lifecycle events. `Start` is the first event every
/// process observes, `Stop` is the last one it handles, `Kill` is never
/// delivered to a handler: the scheduler turns it into an interruption
/// signal plus a scheduled `Stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
  Start,
  Stop,
  Kill,
}

impl SystemEvent {
  pub fn is_start(&self) -> bool {
    matches!(self, SystemEvent::Start)
  }

  pub fn is_stop(&self) -> bool {
    matches!(self, SystemEvent::Stop)
  }

  pub fn is_kill(&self) -> bool {
    matches!(self, SystemEvent::Kill)
  }
}

impl_event!(SystemEvent);
