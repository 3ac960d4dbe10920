//! Process registry: pid to runtime state, the parent/child graph and the
//! global task intake queue.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::actor::config::Config;
use crate::actor::core::{Behavior, Process};
use crate::actor::flow::Flow;
use crate::actor::dispatch::{BoundedQueue, ProcessState};
use crate::actor::message::{Envelope, EventHandle, SystemEvent};
use crate::actor::pid::Pid;
use crate::actor::scheduler::SchedulerTask;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
  #[error("unknown parent: {0}")]
  UnknownParent(Pid),
  #[error("{0} is already registered under a different parent")]
  AlreadyRegistered(Pid),
  #[error("registering {child} under {parent} would close a cycle")]
  CycleDetected { parent: Pid, child: Pid },
  #[error("task queue is closed")]
  TaskQueueClosed,
}

#[derive(Debug, Clone)]
pub struct ProcessRegistry {
  processes: Arc<DashMap<Pid, Arc<ProcessState>>>,
  children: Arc<DashMap<Pid, Vec<Pid>>>,
  parents: Arc<DashMap<Pid, Pid>>,
  task_queue: BoundedQueue<SchedulerTask>,
  process_queue_size: usize,
}

impl ProcessRegistry {
  /// Installs the system root and the dead-letter process; neither receives
  /// a synthetic `Start`.
  pub(crate) fn new(config: &Config, dead_letter: Arc<Process>) -> Self {
    let registry = Self {
      processes: Arc::new(DashMap::new()),
      children: Arc::new(DashMap::new()),
      parents: Arc::new(DashMap::new()),
      task_queue: BoundedQueue::new(config.queue_size),
      process_queue_size: config.process_queue_size,
    };
    let system_root = Process::with_pid(Pid::system(), "system", Behavior::new(|_| false, |_| Flow::unit()));
    registry.install(system_root, None);
    registry.install(dead_letter, Some(&Pid::system()));
    registry
  }

  pub(crate) fn install(&self, process: Arc<Process>, parent: Option<&Pid>) {
    let pid = process.pid().clone();
    let state = Arc::new(ProcessState::new(process, self.process_queue_size));
    self.processes.insert(pid.clone(), state);
    if let Some(parent) = parent {
      self.link(parent, &pid);
    }
  }

  /// Registers `process` as a child of `parent` and schedules the synthetic
  /// `Start` envelope through the task queue, so `Start` is FIFO-ordered
  /// before any user event toward the new process. Idempotent on an
  /// identical `(parent, pid)` pair; `Start` is enqueued at most once.
  pub async fn register(&self, parent: &Pid, process: Arc<Process>) -> Result<(), RegistrationError> {
    let pid = process.pid().clone();
    if !self.processes.contains_key(parent) {
      return Err(RegistrationError::UnknownParent(parent.clone()));
    }
    if self.is_descendant(&pid, parent) || pid == *parent {
      return Err(RegistrationError::CycleDetected {
        parent: parent.clone(),
        child: pid,
      });
    }
    if let Some(existing) = self.parents.get(&pid) {
      if *existing.value() == *parent {
        return Ok(());
      }
      return Err(RegistrationError::AlreadyRegistered(pid));
    }
    self.install(process, Some(parent));
    let start = Envelope::new(Pid::system(), EventHandle::new(SystemEvent::Start), pid);
    self
      .task_queue
      .enqueue(SchedulerTask::Deliver(start))
      .await
      .map_err(|_| RegistrationError::TaskQueueClosed)
  }

  pub fn get_process_state(&self, pid: &Pid) -> Option<Arc<ProcessState>> {
    self.processes.get(pid).map(|entry| entry.value().clone())
  }

  pub fn get_process(&self, pid: &Pid) -> Option<Arc<Process>> {
    self
      .processes
      .get(pid)
      .map(|entry| entry.value().process().clone())
  }

  /// Point-in-time snapshot of the child set.
  pub fn children(&self, pid: &Pid) -> Vec<Pid> {
    self
      .children
      .get(pid)
      .map(|entry| entry.value().clone())
      .unwrap_or_default()
  }

  /// Idempotent. Unlinks the pid from its parent's child set.
  pub fn remove(&self, pid: &Pid) {
    self.processes.remove(pid);
    self.children.remove(pid);
    if let Some((_, parent)) = self.parents.remove(pid) {
      if let Some(mut siblings) = self.children.get_mut(&parent) {
        siblings.value_mut().retain(|child| child != pid);
      }
    }
  }

  pub fn interrupt(&self, pid: &Pid) {
    if let Some(state) = self.get_process_state(pid) {
      state.interrupt();
    }
  }

  pub fn task_queue(&self) -> &BoundedQueue<SchedulerTask> {
    &self.task_queue
  }

  fn link(&self, parent: &Pid, child: &Pid) {
    self.parents.insert(child.clone(), parent.clone());
    self.children.entry(parent.clone()).or_default().push(child.clone());
  }

  /// Breadth-first walk of the child graph from `root`.
  fn is_descendant(&self, root: &Pid, candidate: &Pid) -> bool {
    let mut frontier = VecDeque::from(self.children(root));
    while let Some(pid) = frontier.pop_front() {
      if pid == *candidate {
        return true;
      }
      frontier.extend(self.children(&pid));
    }
    false
  }
}

static_assertions::assert_impl_all!(ProcessRegistry: Send, Sync);
