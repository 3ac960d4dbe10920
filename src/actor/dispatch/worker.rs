use std::sync::Arc;

use crate::actor::dispatch::{BoundedQueue, EventInvoker, ProcessState};
use crate::actor::pid::Pid;
use crate::actor::scheduler::SchedulerTask;

/// Drains the ready queue: claims a published process, then drains its
/// mailbox one envelope at a time under the lock.
#[derive(Debug, Clone)]
pub(crate) struct Worker {
  id: usize,
  ready_queue: BoundedQueue<Pid>,
  invoker: EventInvoker,
}

impl Worker {
  pub(crate) fn new(id: usize, ready_queue: BoundedQueue<Pid>, invoker: EventInvoker) -> Self {
    Self {
      id,
      ready_queue,
      invoker,
    }
  }

  pub(crate) async fn run(&self) {
    while let Some(pid) = self.ready_queue.dequeue().await {
      // A missing state means the process was removed after its ref was
      // published; a failed acquire means another worker owns it. Either
      // way the entry is discarded.
      let Some(state) = self.invoker.registry().get_process_state(&pid) else {
        continue;
      };
      if !state.acquire() {
        continue;
      }
      self.drain(&state).await;
    }
    tracing::debug!(worker = self.id, "worker terminated");
  }

  async fn drain(&self, state: &Arc<ProcessState>) {
    loop {
      match state.try_take_task() {
        Some(SchedulerTask::Deliver(envelope)) => {
          self.invoker.invoke(state, envelope).await;
        }
        None => {
          if state.release() {
            break;
          }
        }
      }
    }
  }
}
