mod bounded_queue;
mod dispatcher;
mod event_invoker;
mod mailbox_queue;
mod process_state;
mod worker;

pub use {
  self::bounded_queue::*, self::dispatcher::*, self::event_invoker::*, self::mailbox_queue::*,
  self::process_state::*, self::worker::*,
};
