//! Delivery state machine and failure routing, shared by the workers and
//! the scheduler's shutdown path.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use crate::actor::core::{DeliveryError, ErrorReason};
use crate::actor::dispatch::ProcessState;
use crate::actor::flow::{FlowInterpreter, FlowState};
use crate::actor::message::{DeadLetterEvent, Envelope, EventHandle, Failure, SystemEvent};
use crate::actor::pid::Pid;
use crate::actor::process_registry::ProcessRegistry;
use crate::actor::scheduler::SchedulerTask;

#[derive(Debug, Clone)]
pub struct EventInvoker {
  registry: ProcessRegistry,
  interpreter: Arc<dyn FlowInterpreter>,
}

impl EventInvoker {
  pub fn new(registry: ProcessRegistry, interpreter: Arc<dyn FlowInterpreter>) -> Self {
    Self {
      registry,
      interpreter,
    }
  }

  pub fn registry(&self) -> &ProcessRegistry {
    &self.registry
  }

  /// Handles one mailbox envelope under the receiver's lock.
  pub async fn invoke(&self, state: &Arc<ProcessState>, envelope: Envelope) {
    let event = envelope.event().clone();
    if event.to_typed::<SystemEvent>().is_some_and(|event| event.is_stop()) {
      if state.stop() {
        self.finalize_stop(state, &envelope).await;
      } else {
        self
          .route_dead_letter(envelope, DeliveryError::illegal_state("stopped"))
          .await;
      }
      return;
    }
    if state.is_stopped() {
      self
        .route_dead_letter(envelope, DeliveryError::illegal_state("stopped"))
        .await;
      return;
    }
    if state.is_interrupted() {
      self
        .route_dead_letter(envelope, DeliveryError::illegal_state("terminated"))
        .await;
      return;
    }
    match state.process().receive(&event) {
      Some(flow) => {
        let flow_state = FlowState::new(envelope.sender().clone(), envelope.receiver().clone());
        tokio::select! {
          result = self.interpreter.interpret(flow, flow_state) => {
            if let Err(reason) = result {
              self.escalate_failure(envelope, reason).await;
            }
          }
          _ = state.interruption().wait() => {
            // The Stop enqueued alongside the interruption finishes the
            // process; dispatching it here would race that envelope.
            tracing::debug!(process = %envelope.receiver(), "handler interrupted");
          }
        }
      }
      None => self.unhandled(envelope, event).await,
    }
  }

  async fn unhandled(&self, envelope: Envelope, event: EventHandle) {
    if let Some(failure) = event.to_typed::<Failure>() {
      // The failure itself becomes the dead-letter payload.
      self.route_dead_letter(failure.envelope, failure.cause).await;
      return;
    }
    if event.to_typed::<SystemEvent>().is_some_and(|event| event.is_start()) {
      return;
    }
    let cause = DeliveryError::EventMatch(event.type_name());
    self.route_dead_letter(envelope, cause).await;
  }

  /// Error policy for a raised handler effect: a failed `Failure` handler
  /// escalates to dead-letter, anything else turns into a `Failure` sent
  /// back to the sender via the system ref.
  pub async fn escalate_failure(&self, envelope: Envelope, reason: ErrorReason) {
    if let Some(failure) = envelope.event().to_typed::<Failure>() {
      tracing::debug!(%reason, "failure handler raised; escalating to dead letter");
      self.route_dead_letter(failure.envelope, failure.cause).await;
      return;
    }
    let sender = envelope.sender().clone();
    let failure = Failure::new(envelope, DeliveryError::EventHandling(reason));
    let notification = Envelope::new(Pid::system(), EventHandle::new(failure), sender);
    if let Err(error) = self
      .registry
      .task_queue()
      .enqueue(SchedulerTask::Deliver(notification))
      .await
    {
      tracing::warn!(%error, "failure notification dropped");
    }
  }

  /// Routes an undeliverable envelope to the dead-letter process. An
  /// envelope that was itself addressed to the dead-letter process is
  /// dropped: dead-lettering must never re-trigger.
  pub async fn route_dead_letter(&self, envelope: Envelope, cause: DeliveryError) {
    if envelope.receiver().is_dead_letter() {
      tracing::warn!(%cause, sender = %envelope.sender(), "undeliverable dead letter dropped");
      return;
    }
    tracing::debug!(%cause, receiver = %envelope.receiver(), "routing to dead letter");
    let dead_letter = DeadLetterEvent::new(envelope, cause);
    let notification = Envelope::new(Pid::system(), EventHandle::new(dead_letter), Pid::dead_letter());
    if let Err(error) = self
      .registry
      .task_queue()
      .enqueue(SchedulerTask::Deliver(notification))
      .await
    {
      tracing::warn!(%error, "dead letter dropped, task queue closed");
    }
  }

  /// Stops `pid` if it is still live: descendants first, then the `Stop`
  /// handler, then removal from the registry.
  pub fn stop_process<'a>(&'a self, sender: &'a Pid, pid: &'a Pid) -> BoxFuture<'a, ()> {
    async move {
      let Some(state) = self.registry.get_process_state(pid) else {
        return;
      };
      if !state.stop() {
        return;
      }
      let envelope = Envelope::new(
        sender.clone(),
        EventHandle::new(SystemEvent::Stop),
        pid.clone(),
      );
      self.finalize_stop(&state, &envelope).await;
    }
    .boxed()
  }

  /// The caller has already won the `stop()` transition.
  async fn finalize_stop(&self, state: &Arc<ProcessState>, envelope: &Envelope) {
    let pid = envelope.receiver();
    let children = self.registry.children(pid);
    join_all(children.iter().map(|child| self.stop_process(pid, child))).await;
    let stop = envelope.event();
    if let Some(flow) = state.process().receive(stop) {
      let flow_state = FlowState::new(envelope.sender().clone(), pid.clone());
      if let Err(reason) = self.interpreter.interpret(flow, flow_state).await {
        self.escalate_failure(envelope.clone(), reason).await;
      }
    }
    self.registry.remove(pid);
    tracing::debug!(process = %pid, "process stopped");
  }
}

static_assertions::assert_impl_all!(EventInvoker: Send, Sync);
