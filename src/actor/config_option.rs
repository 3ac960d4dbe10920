use std::sync::Arc;

use crate::actor::config::Config;
use crate::actor::dispatch::Dispatcher;

pub enum ConfigOption {
  SetQueueSize(usize),
  SetNumberOfWorkers(usize),
  SetProcessQueueSize(usize),
  SetSystemDispatcher(Arc<dyn Dispatcher>),
}

impl ConfigOption {
  pub(crate) fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetQueueSize(size) => {
        config.queue_size = (*size).max(1);
      }
      ConfigOption::SetNumberOfWorkers(workers) => {
        config.number_of_workers = (*workers).max(1);
      }
      ConfigOption::SetProcessQueueSize(size) => {
        config.process_queue_size = (*size).max(1);
      }
      ConfigOption::SetSystemDispatcher(dispatcher) => {
        config.system_dispatcher = Arc::clone(dispatcher);
      }
    }
  }

  pub fn with_queue_size(size: usize) -> ConfigOption {
    ConfigOption::SetQueueSize(size)
  }

  pub fn with_number_of_workers(workers: usize) -> ConfigOption {
    ConfigOption::SetNumberOfWorkers(workers)
  }

  pub fn with_process_queue_size(size: usize) -> ConfigOption {
    ConfigOption::SetProcessQueueSize(size)
  }

  pub fn with_system_dispatcher(dispatcher: Arc<dyn Dispatcher>) -> ConfigOption {
    ConfigOption::SetSystemDispatcher(dispatcher)
  }
}
