use std::sync::Arc;

use crate::actor::core::{Behavior, Process};
use crate::actor::flow::Flow;
use crate::actor::message::DeadLetterEvent;
use crate::actor::pid::Pid;

/// Built-in dead-letter process: logs each undeliverable envelope and
/// drops it.
pub(crate) fn dead_letter_process() -> Arc<Process> {
  let behavior = Behavior::on::<DeadLetterEvent>(|dead_letter| {
    let dead_letter = dead_letter.clone();
    Flow::eval(move || {
      tracing::warn!(
        sender = %dead_letter.envelope.sender(),
        receiver = %dead_letter.envelope.receiver(),
        cause = %dead_letter.cause,
        "dead letter"
      );
      Ok(())
    })
  });
  Process::with_pid(Pid::dead_letter(), "dead-letter", behavior)
}
