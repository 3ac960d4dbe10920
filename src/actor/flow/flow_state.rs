use crate::actor::pid::Pid;

/// Immutable interpretation context: who sent the event being handled and
/// which process is handling it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
  sender: Pid,
  self_ref: Pid,
}

impl FlowState {
  pub fn new(sender: Pid, self_ref: Pid) -> Self {
    Self { sender, self_ref }
  }

  pub fn sender(&self) -> &Pid {
    &self.sender
  }

  pub fn self_ref(&self) -> &Pid {
    &self.self_ref
  }
}
