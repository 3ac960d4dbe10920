//! An in-process actor runtime: processes own private state and communicate
//! exclusively by asynchronous events routed through a bounded task queue,
//! per-process mailboxes and a fleet of cooperative workers.

pub mod actor;
pub mod util;

pub use actor::*;
