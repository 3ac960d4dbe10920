//! Flow AST: one tagged variant per primitive, folded by the interpreter.

use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::actor::core::{ErrorReason, Process};
use crate::actor::message::{Event, EventHandle};
use crate::actor::pid::Pid;

/// Result of a lifted computation, bound by `eval_with` / `suspend_with`.
pub type FlowValue = Arc<dyn Any + Send + Sync>;

type EvalThunk = Arc<dyn Fn() -> Result<FlowValue, ErrorReason> + Send + Sync>;
type SuspendThunk = Arc<dyn Fn() -> BoxFuture<'static, Result<FlowValue, ErrorReason>> + Send + Sync>;
type BindFn = Arc<dyn Fn(FlowValue) -> Flow + Send + Sync>;
type SenderFn = Arc<dyn Fn(Pid) -> Flow + Send + Sync>;

#[derive(Clone)]
pub enum Flow {
  Unit,
  Send {
    event: EventHandle,
    receivers: Vec<Pid>,
  },
  Forward {
    event: EventHandle,
    receivers: Vec<Pid>,
  },
  Seq(Vec<Flow>),
  Par(Vec<Flow>),
  Fork(Box<Flow>),
  Race(Box<Flow>, Box<Flow>),
  Delay {
    duration: Duration,
    flow: Option<Box<Flow>>,
  },
  WithSender(SenderFn),
  Invoke {
    caller: Pid,
    callee: Pid,
    body: Box<Flow>,
  },
  Register {
    parent: Pid,
    process: Arc<Process>,
  },
  Suspend {
    thunk: SuspendThunk,
    bind: Option<BindFn>,
  },
  Eval {
    thunk: EvalThunk,
    bind: Option<BindFn>,
  },
}

impl Debug for Flow {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Flow::Unit => write!(f, "Unit"),
      Flow::Send { event, receivers } => write!(f, "Send({}, {:?})", event.type_name(), receivers),
      Flow::Forward { event, receivers } => write!(f, "Forward({}, {:?})", event.type_name(), receivers),
      Flow::Seq(flows) => f.debug_tuple("Seq").field(flows).finish(),
      Flow::Par(flows) => f.debug_tuple("Par").field(flows).finish(),
      Flow::Fork(flow) => f.debug_tuple("Fork").field(flow).finish(),
      Flow::Race(a, b) => f.debug_tuple("Race").field(a).field(b).finish(),
      Flow::Delay { duration, flow } => f.debug_struct("Delay").field("duration", duration).field("flow", flow).finish(),
      Flow::WithSender(_) => write!(f, "WithSender"),
      Flow::Invoke { caller, callee, .. } => write!(f, "Invoke({caller}, {callee})"),
      Flow::Register { parent, process } => write!(f, "Register({parent}, {})", process.pid()),
      Flow::Suspend { .. } => write!(f, "Suspend"),
      Flow::Eval { .. } => write!(f, "Eval"),
    }
  }
}

fn nil_value() -> FlowValue {
  Arc::new(())
}

impl Flow {
  pub fn unit() -> Flow {
    Flow::Unit
  }

  /// Enqueues `Deliver(Envelope(self, event, receiver))` toward each
  /// receiver, in order.
  pub fn send(event: impl Event, receivers: impl IntoIterator<Item = Pid>) -> Flow {
    Flow::Send {
      event: EventHandle::new(event),
      receivers: receivers.into_iter().collect(),
    }
  }

  pub fn send_handle(event: EventHandle, receivers: impl IntoIterator<Item = Pid>) -> Flow {
    Flow::Send {
      event,
      receivers: receivers.into_iter().collect(),
    }
  }

  /// Like `send`, but the envelope carries the original sender.
  pub fn forward(event: impl Event, receivers: impl IntoIterator<Item = Pid>) -> Flow {
    Flow::Forward {
      event: EventHandle::new(event),
      receivers: receivers.into_iter().collect(),
    }
  }

  pub fn forward_handle(event: EventHandle, receivers: impl IntoIterator<Item = Pid>) -> Flow {
    Flow::Forward {
      event,
      receivers: receivers.into_iter().collect(),
    }
  }

  /// Sequential composition; flattens nested sequences.
  pub fn and_then(self, next: Flow) -> Flow {
    match (self, next) {
      (Flow::Unit, next) => next,
      (prev, Flow::Unit) => prev,
      (Flow::Seq(mut flows), Flow::Seq(next)) => {
        flows.extend(next);
        Flow::Seq(flows)
      }
      (Flow::Seq(mut flows), next) => {
        flows.push(next);
        Flow::Seq(flows)
      }
      (prev, Flow::Seq(mut next)) => {
        next.insert(0, prev);
        Flow::Seq(next)
      }
      (prev, next) => Flow::Seq(vec![prev, next]),
    }
  }

  /// Runs the flows concurrently; completes when all complete.
  pub fn par(flows: impl IntoIterator<Item = Flow>) -> Flow {
    Flow::Par(flows.into_iter().collect())
  }

  /// Spawns the flow concurrently and returns immediately.
  pub fn fork(flow: Flow) -> Flow {
    Flow::Fork(Box::new(flow))
  }

  /// Runs both concurrently; the first to complete wins, the loser is
  /// cancelled.
  pub fn race(a: Flow, b: Flow) -> Flow {
    Flow::Race(Box::new(a), Box::new(b))
  }

  pub fn delay(duration: Duration) -> Flow {
    Flow::Delay {
      duration,
      flow: None,
    }
  }

  pub fn delay_then(duration: Duration, flow: Flow) -> Flow {
    Flow::Delay {
      duration,
      flow: Some(Box::new(flow)),
    }
  }

  pub fn with_sender(f: impl Fn(Pid) -> Flow + Send + Sync + 'static) -> Flow {
    Flow::WithSender(Arc::new(f))
  }

  /// Runs `body` under `FlowState(caller, callee)`.
  pub fn invoke(caller: Pid, body: Flow, callee: Pid) -> Flow {
    Flow::Invoke {
      caller,
      callee,
      body: Box::new(body),
    }
  }

  pub fn register(parent: Pid, process: Arc<Process>) -> Flow {
    Flow::Register { parent, process }
  }

  /// Lifts a pure computation.
  pub fn eval(thunk: impl Fn() -> Result<(), ErrorReason> + Send + Sync + 'static) -> Flow {
    Flow::Eval {
      thunk: Arc::new(move || thunk().map(|_| nil_value())),
      bind: None,
    }
  }

  /// Lifts a pure computation and binds its result.
  pub fn eval_with(
    thunk: impl Fn() -> Result<FlowValue, ErrorReason> + Send + Sync + 'static,
    bind: impl Fn(FlowValue) -> Flow + Send + Sync + 'static,
  ) -> Flow {
    Flow::Eval {
      thunk: Arc::new(thunk),
      bind: Some(Arc::new(bind)),
    }
  }

  /// Lifts an external effect.
  pub fn suspend<Fut>(thunk: impl Fn() -> Fut + Send + Sync + 'static) -> Flow
  where
    Fut: Future<Output = Result<(), ErrorReason>> + Send + 'static, {
    Flow::Suspend {
      thunk: Arc::new(move || thunk().map(|result| result.map(|_| nil_value())).boxed()),
      bind: None,
    }
  }

  /// Lifts an external effect and binds its result.
  pub fn suspend_with<Fut>(
    thunk: impl Fn() -> Fut + Send + Sync + 'static,
    bind: impl Fn(FlowValue) -> Flow + Send + Sync + 'static,
  ) -> Flow
  where
    Fut: Future<Output = Result<FlowValue, ErrorReason>> + Send + 'static, {
    Flow::Suspend {
      thunk: Arc::new(move || thunk().boxed()),
      bind: Some(Arc::new(bind)),
    }
  }
}

static_assertions::assert_impl_all!(Flow: Send, Sync);
