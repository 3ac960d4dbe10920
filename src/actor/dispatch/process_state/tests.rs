use std::sync::Arc;

use super::*;
use crate::actor::core::{Behavior, Process};
use crate::actor::flow::Flow;
use crate::actor::message::{Envelope, EventHandle, SystemEvent};
use crate::actor::pid::Pid;
use crate::actor::scheduler::SchedulerTask;

fn new_state(capacity: usize) -> ProcessState {
  let process = Process::from_behavior("subject", Behavior::total(|_| Flow::unit()));
  ProcessState::new(process, capacity)
}

fn deliver_task(state: &ProcessState) -> SchedulerTask {
  let pid = state.process().pid().clone();
  SchedulerTask::Deliver(Envelope::new(
    Pid::system(),
    EventHandle::new(SystemEvent::Start),
    pid,
  ))
}

#[tokio::test]
async fn test_mailbox_respects_capacity() {
  let state = new_state(2);
  assert!(state.try_put(deliver_task(&state)));
  assert!(state.try_put(deliver_task(&state)));
  assert!(!state.try_put(deliver_task(&state)));
  assert_eq!(state.mailbox_len(), 2);

  assert!(state.try_take_task().is_some());
  assert!(state.try_put(deliver_task(&state)));
}

#[tokio::test]
async fn test_acquire_is_exclusive() {
  let state = Arc::new(new_state(4));
  assert!(state.acquire());
  assert!(!state.acquire());
  assert!(state.release());
  assert!(state.acquire());
}

#[tokio::test]
async fn test_release_returns_false_when_work_arrived() {
  let state = new_state(4);
  assert!(state.acquire());
  // Producer slips a task in after the drain observed an empty mailbox.
  assert!(state.try_put(deliver_task(&state)));
  assert!(!state.release());
  // The caller is still the owner and must keep draining.
  assert!(!state.acquire());
  assert!(state.try_take_task().is_some());
  assert!(state.release());
}

#[tokio::test]
async fn test_stop_transitions_once() {
  let state = new_state(4);
  assert!(!state.is_stopped());
  assert!(state.stop());
  assert!(!state.stop());
  assert!(state.is_stopped());
}

#[tokio::test]
async fn test_interrupt_completes_signal_idempotently() {
  let state = new_state(4);
  assert!(!state.is_interrupted());
  state.interrupt();
  state.interrupt();
  assert!(state.is_interrupted());
  // Returns immediately once completed.
  state.interruption().wait().await;
}
