use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;

use crate::actor::core::Behavior;
use crate::actor::flow::Flow;
use crate::actor::message::EventHandle;
use crate::actor::pid::Pid;

type BehaviorFactory = Arc<dyn Fn() -> Behavior + Send + Sync>;

/// A process: a stable ref, a name and an event handler. The handler is
/// built lazily from the factory on first delivery and can be replaced
/// atomically with [`Process::switch`].
pub struct Process {
  pid: Pid,
  name: String,
  factory: BehaviorFactory,
  handler: OnceCell<ArcSwap<Behavior>>,
}

impl Debug for Process {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Process")
      .field("pid", &self.pid)
      .field("name", &self.name)
      .finish()
  }
}

impl Process {
  pub fn new(name: &str, factory: impl Fn() -> Behavior + Send + Sync + 'static) -> Arc<Self> {
    Arc::new(Self {
      pid: Pid::of(name),
      name: name.to_string(),
      factory: Arc::new(factory),
      handler: OnceCell::new(),
    })
  }

  pub fn from_behavior(name: &str, behavior: Behavior) -> Arc<Self> {
    Self::new(name, move || behavior.clone())
  }

  /// Like [`Process::new`], but the factory receives a weak self reference
  /// so the initial handler can switch the process from inside a flow.
  pub fn stateful(name: &str, factory: impl Fn(Weak<Process>) -> Behavior + Send + Sync + 'static) -> Arc<Self> {
    Arc::new_cyclic(|weak: &Weak<Process>| {
      let weak = weak.clone();
      Self {
        pid: Pid::of(name),
        name: name.to_string(),
        factory: Arc::new(move || factory(weak.clone())),
        handler: OnceCell::new(),
      }
    })
  }

  pub(crate) fn with_pid(pid: Pid, name: &str, behavior: Behavior) -> Arc<Self> {
    Arc::new(Self {
      pid,
      name: name.to_string(),
      factory: Arc::new(move || behavior.clone()),
      handler: OnceCell::new(),
    })
  }

  pub fn pid(&self) -> &Pid {
    &self.pid
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  fn handler(&self) -> &ArcSwap<Behavior> {
    self
      .handler
      .get_or_init(|| ArcSwap::from_pointee((self.factory)()))
  }

  /// Replaces the handler for all subsequent deliveries.
  pub fn switch(&self, behavior: Behavior) {
    self.handler().store(Arc::new(behavior));
  }

  pub fn is_defined_at(&self, event: &EventHandle) -> bool {
    self.handler().load().is_defined_at(event)
  }

  /// `None` where the handler is undefined at `event`.
  pub fn receive(&self, event: &EventHandle) -> Option<Flow> {
    self.handler().load().apply(event)
  }
}

static_assertions::assert_impl_all!(Process: Send, Sync);
