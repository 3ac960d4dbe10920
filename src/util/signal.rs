use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// One-shot completion signal. `complete` is idempotent; `wait` returns
/// immediately once the signal has been completed.
#[derive(Clone)]
pub struct Signal {
  completed: Arc<AtomicBool>,
  notify: Arc<Notify>,
}

impl Debug for Signal {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Signal")
      .field("completed", &self.completed.load(Ordering::SeqCst))
      .finish()
  }
}

impl Default for Signal {
  fn default() -> Self {
    Self::new()
  }
}

impl Signal {
  pub fn new() -> Self {
    Self {
      completed: Arc::new(AtomicBool::new(false)),
      notify: Arc::new(Notify::new()),
    }
  }

  pub fn complete(&self) {
    if !self.completed.swap(true, Ordering::SeqCst) {
      self.notify.notify_waiters();
    }
  }

  pub fn is_completed(&self) -> bool {
    self.completed.load(Ordering::SeqCst)
  }

  pub async fn wait(&self) {
    while !self.completed.load(Ordering::SeqCst) {
      let notified = self.notify.notified();
      if self.completed.load(Ordering::SeqCst) {
        break;
      }
      notified.await;
    }
  }
}

static_assertions::assert_impl_all!(Signal: Send, Sync);
