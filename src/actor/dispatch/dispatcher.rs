use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::runtime::{Builder, Runtime};


pub struct Runnable(Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + 'static>);

impl Runnable {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Box::new(move || Box::pin(f()) as BoxFuture<'static, ()>))
  }

  pub async fn run(self) {
    (self.0)().await;
  }
}

impl Debug for Runnable {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Runnable")
  }
}

#[async_trait]
pub trait Dispatcher: Debug + Send + Sync + 'static {
  async fn schedule(&self, runner: Runnable);
}

#[derive(Debug, Clone)]
pub struct DispatcherHandle(Arc<dyn Dispatcher>);

impl DispatcherHandle {
  pub fn new_arc(dispatcher: Arc<dyn Dispatcher>) -> Self {
    Self(dispatcher)
  }

  pub fn new(dispatcher: impl Dispatcher + 'static) -> Self {
    Self(Arc::new(dispatcher))
  }
}

#[async_trait]
impl Dispatcher for DispatcherHandle {
  async fn schedule(&self, runner: Runnable) {
    self.0.schedule(runner).await;
  }
}

// --- TokioRuntimeContextDispatcher implementation

/// Schedules onto the ambient tokio runtime. The default.
#[derive(Debug, Clone)]
pub struct TokioRuntimeContextDispatcher;

impl TokioRuntimeContextDispatcher {
  pub fn new() -> Self {
    Self
  }
}

impl Default for TokioRuntimeContextDispatcher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Dispatcher for TokioRuntimeContextDispatcher {
  async fn schedule(&self, runner: Runnable) {
    tokio::spawn(runner.run());
  }
}

// --- FixedPoolDispatcher implementation

/// Owns a runtime with a fixed number of worker threads; workers and the
/// routing loop share this pool.
#[derive(Debug, Clone)]
pub struct FixedPoolDispatcher {
  runtime: Arc<Runtime>,
}

impl FixedPoolDispatcher {
  pub fn new(worker_threads: usize) -> Result<Self, std::io::Error> {
    let runtime = Builder::new_multi_thread()
      .worker_threads(worker_threads.max(1))
      .enable_all()
      .build()?;
    Ok(Self {
      runtime: Arc::new(runtime),
    })
  }
}

#[async_trait]
impl Dispatcher for FixedPoolDispatcher {
  async fn schedule(&self, runner: Runnable) {
    self.runtime.spawn(runner.run());
  }
}

// --- CurrentThreadDispatcher implementation

/// Runs the runnable inline; useful in tests.
#[derive(Debug, Clone)]
pub struct CurrentThreadDispatcher;

impl CurrentThreadDispatcher {
  pub fn new() -> Self {
    Self
  }
}

impl Default for CurrentThreadDispatcher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Dispatcher for CurrentThreadDispatcher {
  async fn schedule(&self, runner: Runnable) {
    runner.run().await
  }
}
