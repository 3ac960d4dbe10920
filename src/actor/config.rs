use std::sync::Arc;

use crate::actor::dispatch::{Dispatcher, TokioRuntimeContextDispatcher};
use crate::actor::ConfigOption;

/// Runtime configuration. `queue_size` bounds the global task and ready
/// queues, `process_queue_size` bounds each mailbox and
/// `number_of_workers` fixes the executor width.
#[derive(Debug, Clone)]
pub struct Config {
  pub queue_size: usize,
  pub number_of_workers: usize,
  pub process_queue_size: usize,
  pub system_dispatcher: Arc<dyn Dispatcher>,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      queue_size: 1024,
      number_of_workers: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
      process_queue_size: 64,
      system_dispatcher: Arc::new(TokioRuntimeContextDispatcher::new()),
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}
