//! Scheduler: consumes the task intake queue, routes envelopes into
//! mailboxes, publishes ready processes to the worker fleet and owns the
//! shutdown cascade.

use std::sync::Arc;

use crate::actor::config::Config;
use crate::actor::core::{Behavior, DeliveryError, Process};
use crate::actor::dead_letter_process::dead_letter_process;
use crate::actor::dispatch::{
  BoundedQueue, Dispatcher, DispatcherHandle, EventInvoker, QueueError, Runnable, Worker,
};
use crate::actor::flow::EffectInterpreter;
use crate::actor::message::{Envelope, EventHandle, SystemEvent};
use crate::actor::pid::Pid;
use crate::actor::process_registry::{ProcessRegistry, RegistrationError};
use crate::util::Signal;

/// Unit of work accepted by [`Scheduler::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerTask {
  Deliver(Envelope),
}

#[derive(Debug, Clone)]
pub struct Scheduler {
  config: Config,
  registry: ProcessRegistry,
  ready_queue: BoundedQueue<Pid>,
  invoker: EventInvoker,
  dispatcher: DispatcherHandle,
  shutdown: Signal,
}

impl Scheduler {
  pub fn new(config: Config) -> Self {
    let dead_letter = dead_letter_process();
    Self::assemble(config, dead_letter)
  }

  /// Installs `behavior` as the dead-letter process instead of the
  /// built-in logging one.
  pub fn with_dead_letter(config: Config, behavior: Behavior) -> Self {
    let dead_letter = Process::with_pid(Pid::dead_letter(), "dead-letter", behavior);
    Self::assemble(config, dead_letter)
  }

  fn assemble(config: Config, dead_letter: Arc<Process>) -> Self {
    let registry = ProcessRegistry::new(&config, dead_letter);
    let dispatcher = DispatcherHandle::new_arc(config.system_dispatcher.clone());
    let interpreter = EffectInterpreter::new(registry.clone(), dispatcher.clone());
    let invoker = EventInvoker::new(registry.clone(), Arc::new(interpreter));
    let ready_queue = BoundedQueue::new(config.queue_size);
    Self {
      config,
      registry,
      ready_queue,
      invoker,
      dispatcher,
      shutdown: Signal::new(),
    }
  }

  pub fn process_registry(&self) -> &ProcessRegistry {
    &self.registry
  }

  /// Registers a root process under the system ref.
  pub async fn register_root(&self, process: Arc<Process>) -> Result<(), RegistrationError> {
    self.registry.register(&Pid::system(), process).await
  }

  pub async fn register(&self, parent: &Pid, process: Arc<Process>) -> Result<(), RegistrationError> {
    self.registry.register(parent, process).await
  }

  /// Enqueues a task on the global intake queue; suspends while the queue
  /// is full.
  pub async fn submit(&self, task: SchedulerTask) -> Result<(), QueueError<SchedulerTask>> {
    self.registry.task_queue().enqueue(task).await
  }

  /// Runs the routing loop until [`Scheduler::trigger_shutdown`]. The
  /// shutdown finalizer — stop cascade from the system root, queue
  /// teardown — runs on every return path.
  pub async fn run(&self) {
    for id in 0..self.config.number_of_workers.max(1) {
      let worker = Worker::new(id, self.ready_queue.clone(), self.invoker.clone());
      self
        .dispatcher
        .schedule(Runnable::new(move || async move { worker.run().await }))
        .await;
    }
    tokio::select! {
      _ = self.routing_loop() => {}
      _ = self.shutdown.wait() => {}
    }
    self.finalize().await;
  }

  /// Completes the shutdown signal; `run` observes it and finalizes.
  pub fn trigger_shutdown(&self) {
    self.shutdown.complete();
  }

  async fn routing_loop(&self) {
    while let Some(task) = self.registry.task_queue().dequeue().await {
      let SchedulerTask::Deliver(envelope) = task;
      self.route(envelope).await;
    }
  }

  async fn route(&self, envelope: Envelope) {
    let receiver = envelope.receiver().clone();
    let Some(state) = self.registry.get_process_state(&receiver) else {
      let cause = DeliveryError::UnknownProcess(receiver);
      self.invoker.route_dead_letter(envelope, cause).await;
      return;
    };
    if envelope.event().to_typed::<SystemEvent>().is_some_and(|event| event.is_kill()) {
      // A Kill is never delivered inline: raise the interruption, then
      // schedule a Stop through the normal path so it serializes with
      // whatever the process is doing right now.
      self.registry.interrupt(&receiver);
      let stop = Envelope::new(
        envelope.sender().clone(),
        EventHandle::new(SystemEvent::Stop),
        receiver,
      );
      if let Err(error) = self.submit(SchedulerTask::Deliver(stop)).await {
        tracing::warn!(%error, "stop follow-up dropped, task queue closed");
      }
      return;
    }
    if state.try_put(SchedulerTask::Deliver(envelope.clone())) {
      if let Err(error) = self.ready_queue.enqueue(receiver).await {
        tracing::warn!(%error, "ready queue closed");
      }
    } else {
      let cause = DeliveryError::EventDelivery(receiver);
      self.invoker.route_dead_letter(envelope, cause).await;
    }
  }

  async fn finalize(&self) {
    let system = Pid::system();
    self.invoker.stop_process(&system, &system).await;
    self.registry.task_queue().close().await;
    self.ready_queue.close().await;
    tracing::info!("scheduler terminated");
  }
}

static_assertions::assert_impl_all!(Scheduler: Send, Sync);
