use std::fmt::Debug;

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use crate::actor::core::ErrorReason;
use crate::actor::dispatch::{Dispatcher, DispatcherHandle, Runnable};
use crate::actor::flow::{Flow, FlowState};
use crate::actor::message::{Envelope, EventHandle};
use crate::actor::pid::Pid;
use crate::actor::process_registry::ProcessRegistry;
use crate::actor::scheduler::SchedulerTask;

/// Folds a flow term into one effect. The effect must be cancellable as a
/// unit: the worker races it against the process interruption signal and
/// drops it on interruption.
#[async_trait]
pub trait FlowInterpreter: Debug + Send + Sync + 'static {
  async fn interpret(&self, flow: Flow, state: FlowState) -> Result<(), ErrorReason>;
}

/// Direct interpretation onto the runtime: sends become task-queue
/// submissions, `par`/`race`/`fork`/`delay` become the corresponding
/// future combinators.
#[derive(Debug, Clone)]
pub struct EffectInterpreter {
  registry: ProcessRegistry,
  dispatcher: DispatcherHandle,
}

impl EffectInterpreter {
  pub fn new(registry: ProcessRegistry, dispatcher: DispatcherHandle) -> Self {
    Self {
      registry,
      dispatcher,
    }
  }

  async fn deliver(&self, sender: &Pid, event: &EventHandle, receivers: Vec<Pid>) -> Result<(), ErrorReason> {
    for receiver in receivers {
      let envelope = Envelope::new(sender.clone(), event.clone(), receiver);
      self
        .registry
        .task_queue()
        .enqueue(SchedulerTask::Deliver(envelope))
        .await
        .map_err(|error| ErrorReason::new(error.to_string()))?;
    }
    Ok(())
  }

  fn interpret_boxed(&self, flow: Flow, state: FlowState) -> BoxFuture<'static, Result<(), ErrorReason>> {
    let this = self.clone();
    async move {
      match flow {
        Flow::Unit => Ok(()),
        Flow::Send { event, receivers } => this.deliver(state.self_ref(), &event, receivers).await,
        Flow::Forward { event, receivers } => this.deliver(state.sender(), &event, receivers).await,
        Flow::Seq(flows) => {
          for flow in flows {
            this.interpret_boxed(flow, state.clone()).await?;
          }
          Ok(())
        }
        Flow::Par(flows) => {
          let children = flows
            .into_iter()
            .map(|flow| this.interpret_boxed(flow, state.clone()));
          join_all(children)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map(|_| ())
        }
        Flow::Fork(flow) => {
          let child = this.interpret_boxed(*flow, state);
          this
            .dispatcher
            .schedule(Runnable::new(move || async move {
              if let Err(reason) = child.await {
                tracing::debug!(%reason, "forked flow failed");
              }
            }))
            .await;
          Ok(())
        }
        Flow::Race(a, b) => {
          tokio::select! {
            result = this.interpret_boxed(*a, state.clone()) => result,
            result = this.interpret_boxed(*b, state) => result,
          }
        }
        Flow::Delay { duration, flow } => {
          tokio::time::sleep(duration).await;
          match flow {
            Some(flow) => this.interpret_boxed(*flow, state).await,
            None => Ok(()),
          }
        }
        Flow::WithSender(f) => {
          let flow = f(state.sender().clone());
          this.interpret_boxed(flow, state).await
        }
        Flow::Invoke {
          caller,
          callee,
          body,
        } => {
          this
            .interpret_boxed(*body, FlowState::new(caller, callee))
            .await
        }
        Flow::Register { parent, process } => this
          .registry
          .register(&parent, process)
          .await
          .map_err(|error| ErrorReason::new(error.to_string())),
        Flow::Suspend { thunk, bind } => {
          let value = thunk().await?;
          match bind {
            Some(bind) => this.interpret_boxed(bind(value), state).await,
            None => Ok(()),
          }
        }
        Flow::Eval { thunk, bind } => {
          let value = thunk()?;
          match bind {
            Some(bind) => this.interpret_boxed(bind(value), state).await,
            None => Ok(()),
          }
        }
      }
    }
    .boxed()
  }
}

#[async_trait]
impl FlowInterpreter for EffectInterpreter {
  async fn interpret(&self, flow: Flow, state: FlowState) -> Result<(), ErrorReason> {
    self.interpret_boxed(flow, state).await
  }
}

static_assertions::assert_impl_all!(EffectInterpreter: Send, Sync);
