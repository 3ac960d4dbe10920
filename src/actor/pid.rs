use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const SYSTEM_ID: u64 = 0;
const DEAD_LETTER_ID: u64 = 1;

static PID_SEQUENCE: AtomicU64 = AtomicU64::new(2);

/// Stable, value-equal identifier of a process. Equality and hashing use the
/// id only; the name is carried for display.
#[derive(Debug, Clone)]
pub struct Pid {
  id: u64,
  name: Arc<str>,
}

impl Pid {
  pub fn of(name: &str) -> Self {
    Self {
      id: PID_SEQUENCE.fetch_add(1, Ordering::SeqCst),
      name: Arc::from(name),
    }
  }

  /// Origin of runtime-generated envelopes and root of the process tree.
  pub fn system() -> Self {
    Self {
      id: SYSTEM_ID,
      name: Arc::from("system"),
    }
  }

  /// Receiver for undeliverable envelopes.
  pub fn dead_letter() -> Self {
    Self {
      id: DEAD_LETTER_ID,
      name: Arc::from("dead-letter"),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_system(&self) -> bool {
    self.id == SYSTEM_ID
  }

  pub fn is_dead_letter(&self) -> bool {
    self.id == DEAD_LETTER_ID
  }
}

impl PartialEq for Pid {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Pid {}

impl Hash for Pid {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl Display for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}#{}", self.name, self.id)
  }
}

static_assertions::assert_impl_all!(Pid: Send, Sync);
