use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::actor::core::Process;
use crate::actor::dispatch::MailboxQueue;
use crate::actor::scheduler::SchedulerTask;
use crate::util::Signal;

/// Per-process runtime state: the bounded mailbox, the worker-exclusion
/// lock and the lifecycle flags. `try_put`, `interrupt` and `stop` are safe
/// to call concurrently; everything else belongs to the lock owner.
pub struct ProcessState {
  process: Arc<Process>,
  mailbox: MailboxQueue<SchedulerTask>,
  scheduler_status: AtomicBool,
  stopped: AtomicBool,
  interrupted: AtomicBool,
  interruption: Signal,
}

impl Debug for ProcessState {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProcessState")
      .field("process", &self.process)
      .field("mailbox_len", &self.mailbox.len())
      .field("owned", &self.scheduler_status.load(Ordering::SeqCst))
      .field("stopped", &self.stopped.load(Ordering::SeqCst))
      .field("interrupted", &self.interrupted.load(Ordering::SeqCst))
      .finish()
  }
}

impl ProcessState {
  pub(crate) fn new(process: Arc<Process>, mailbox_capacity: usize) -> Self {
    Self {
      process,
      mailbox: MailboxQueue::new(mailbox_capacity),
      scheduler_status: AtomicBool::new(false),
      stopped: AtomicBool::new(false),
      interrupted: AtomicBool::new(false),
      interruption: Signal::new(),
    }
  }

  pub fn process(&self) -> &Arc<Process> {
    &self.process
  }

  /// Inserts into the mailbox if there is room.
  pub fn try_put(&self, task: SchedulerTask) -> bool {
    self.mailbox.try_offer(task).is_ok()
  }

  /// Removes the mailbox head without suspending.
  pub fn try_take_task(&self) -> Option<SchedulerTask> {
    self.mailbox.try_poll()
  }

  pub fn mailbox_len(&self) -> usize {
    self.mailbox.len()
  }

  pub fn mailbox_capacity(&self) -> usize {
    self.mailbox.capacity()
  }

  /// Atomically claims the lock; exactly one concurrent caller wins.
  pub fn acquire(&self) -> bool {
    self
      .scheduler_status
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }

  /// Releases the lock (owner only). Returns `false` when a producer
  /// slipped a task in between the drain's empty observation and the
  /// release store and this caller re-claimed ownership; the owner must
  /// then continue draining. Returning `true` means the state is idle or
  /// another worker took over via its own ready-queue entry.
  pub fn release(&self) -> bool {
    self.scheduler_status.store(false, Ordering::SeqCst);
    if self.mailbox.len() > 0 && self.acquire() {
      return false;
    }
    true
  }

  /// Raises `interrupted` and completes the interruption signal.
  /// Idempotent.
  pub fn interrupt(&self) {
    self.interrupted.store(true, Ordering::SeqCst);
    self.interruption.complete();
  }

  /// One-way transition; returns whether this call effected it.
  pub fn stop(&self) -> bool {
    self
      .stopped
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }

  pub fn is_stopped(&self) -> bool {
    self.stopped.load(Ordering::SeqCst)
  }

  pub fn is_interrupted(&self) -> bool {
    self.interrupted.load(Ordering::SeqCst)
  }

  /// Observed by the in-flight handler race; completed at most once.
  pub fn interruption(&self) -> &Signal {
    &self.interruption
  }
}

static_assertions::assert_impl_all!(ProcessState: Send, Sync);

#[cfg(test)]
mod tests;
