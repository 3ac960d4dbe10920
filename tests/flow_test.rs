use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

use plexus_actor_rs::actor::core::{Behavior, Process};
use plexus_actor_rs::actor::flow::{Flow, FlowValue};
use plexus_actor_rs::actor::message::{Envelope, EventHandle, SystemEvent};
use plexus_actor_rs::actor::pid::Pid;
use plexus_actor_rs::actor::scheduler::{Scheduler, SchedulerTask};
use plexus_actor_rs::actor::{Config, ConfigOption};
use plexus_actor_rs::impl_event;
use plexus_actor_rs::util::CountDownLatch;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Trigger;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Left;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Right;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ping;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pong;

impl_event!(Trigger, Left, Right, Ping, Pong);

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();
}

fn test_config() -> Config {
  Config::from([ConfigOption::with_number_of_workers(4)])
}

async fn await_latch(latch: &CountDownLatch) {
  timeout(Duration::from_secs(5), latch.wait())
    .await
    .expect("latch timed out");
}

fn spawn_scheduler(scheduler: &Scheduler) -> tokio::task::JoinHandle<()> {
  let scheduler = scheduler.clone();
  tokio::spawn(async move { scheduler.run().await })
}

async fn submit_from_system(scheduler: &Scheduler, event: EventHandle, receiver: Pid) {
  scheduler
    .submit(SchedulerTask::Deliver(Envelope::new(Pid::system(), event, receiver)))
    .await
    .unwrap();
}

#[tokio::test]
async fn test_par_runs_all_branches() {
  init_tracing();
  let store = Arc::new(Mutex::new(Vec::<String>::new()));
  let latch = CountDownLatch::new(2);
  let scheduler = Scheduler::new(test_config());

  let recorder = {
    let store = store.clone();
    let latch = latch.clone();
    let record = move |label: &'static str| {
      let store = store.clone();
      let latch = latch.clone();
      Flow::eval(move || {
        store.lock().push(label.to_string());
        latch.count_down();
        Ok(())
      })
    };
    let left = {
      let record = record.clone();
      Behavior::on::<Left>(move |_| record("left"))
    };
    let right = Behavior::on::<Right>(move |_| record("right"));
    Process::from_behavior("recorder", left.or_else(right))
  };
  let recorder_pid = recorder.pid().clone();
  let fanout = {
    let recorder_pid = recorder_pid.clone();
    Process::from_behavior(
      "fanout",
      Behavior::on::<Trigger>(move |_| {
        Flow::par([
          Flow::delay_then(Duration::from_millis(30), Flow::send(Left, [recorder_pid.clone()])),
          Flow::send(Right, [recorder_pid.clone()]),
        ])
      }),
    )
  };
  let fanout_pid = fanout.pid().clone();
  scheduler.register_root(recorder).await.unwrap();
  scheduler.register_root(fanout).await.unwrap();
  let runner = spawn_scheduler(&scheduler);

  submit_from_system(&scheduler, EventHandle::new(Trigger), fanout_pid).await;
  await_latch(&latch).await;
  let mut recorded = store.lock().clone();
  recorded.sort();
  assert_eq!(recorded, vec!["left", "right"]);

  scheduler.trigger_shutdown();
  let _ = timeout(Duration::from_secs(5), runner).await;
}

#[tokio::test]
async fn test_race_cancels_the_loser() {
  init_tracing();
  let store = Arc::new(Mutex::new(Vec::<String>::new()));
  let latch = CountDownLatch::new(1);
  let scheduler = Scheduler::new(test_config());

  let racer = {
    let store = store.clone();
    let latch = latch.clone();
    Process::from_behavior(
      "racer",
      Behavior::on::<Trigger>(move |_| {
        let fast = {
          let store = store.clone();
          let latch = latch.clone();
          Flow::delay_then(
            Duration::from_millis(20),
            Flow::eval(move || {
              store.lock().push("fast".to_string());
              latch.count_down();
              Ok(())
            }),
          )
        };
        let slow = {
          let store = store.clone();
          Flow::delay_then(
            Duration::from_millis(500),
            Flow::eval(move || {
              store.lock().push("slow".to_string());
              Ok(())
            }),
          )
        };
        Flow::race(slow, fast)
      }),
    )
  };
  let racer_pid = racer.pid().clone();
  scheduler.register_root(racer).await.unwrap();
  let runner = spawn_scheduler(&scheduler);

  submit_from_system(&scheduler, EventHandle::new(Trigger), racer_pid).await;
  await_latch(&latch).await;
  tokio::time::sleep(Duration::from_millis(600)).await;
  assert_eq!(*store.lock(), vec!["fast"]);

  scheduler.trigger_shutdown();
  let _ = timeout(Duration::from_secs(5), runner).await;
}

#[tokio::test]
async fn test_forward_preserves_original_sender() {
  init_tracing();
  let store = Arc::new(Mutex::new(Vec::<Pid>::new()));
  let latch = CountDownLatch::new(1);
  let scheduler = Scheduler::new(test_config());

  let sink = {
    let store = store.clone();
    let latch = latch.clone();
    Process::from_behavior(
      "sink",
      Behavior::on::<Pong>(move |_| {
        let store = store.clone();
        let latch = latch.clone();
        Flow::with_sender(move |sender| {
          let store = store.clone();
          let latch = latch.clone();
          Flow::eval(move || {
            store.lock().push(sender.clone());
            latch.count_down();
            Ok(())
          })
        })
      }),
    )
  };
  let sink_pid = sink.pid().clone();
  let relay = {
    let sink_pid = sink_pid.clone();
    Process::from_behavior(
      "relay",
      Behavior::on::<Ping>(move |_| Flow::forward(Pong, [sink_pid.clone()])),
    )
  };
  let relay_pid = relay.pid().clone();
  let client = {
    let relay_pid = relay_pid.clone();
    Process::from_behavior(
      "client",
      Behavior::on_value(SystemEvent::Start, move || Flow::send(Ping, [relay_pid.clone()])),
    )
  };
  let client_pid = client.pid().clone();
  scheduler.register_root(sink).await.unwrap();
  scheduler.register_root(relay).await.unwrap();
  scheduler.register_root(client).await.unwrap();
  let runner = spawn_scheduler(&scheduler);

  await_latch(&latch).await;
  // The relay forwarded, so the sink observes the client, not the relay.
  assert_eq!(*store.lock(), vec![client_pid]);

  scheduler.trigger_shutdown();
  let _ = timeout(Duration::from_secs(5), runner).await;
}

#[tokio::test]
async fn test_invoke_rebinds_flow_state() {
  init_tracing();
  let store = Arc::new(Mutex::new(Vec::<Pid>::new()));
  let latch = CountDownLatch::new(1);
  let scheduler = Scheduler::new(test_config());

  let impersonated = Pid::of("impersonated");
  let subject = {
    let store = store.clone();
    let latch = latch.clone();
    let impersonated = impersonated.clone();
    Process::from_behavior(
      "subject",
      Behavior::on::<Trigger>(move |_| {
        let store = store.clone();
        let latch = latch.clone();
        let body = Flow::with_sender({
          let store = store.clone();
          let latch = latch.clone();
          move |sender| {
            let store = store.clone();
            let latch = latch.clone();
            Flow::eval(move || {
              store.lock().push(sender.clone());
              latch.count_down();
              Ok(())
            })
          }
        });
        Flow::invoke(impersonated.clone(), body, Pid::system())
      }),
    )
  };
  let subject_pid = subject.pid().clone();
  scheduler.register_root(subject).await.unwrap();
  let runner = spawn_scheduler(&scheduler);

  submit_from_system(&scheduler, EventHandle::new(Trigger), subject_pid).await;
  await_latch(&latch).await;
  assert_eq!(*store.lock(), vec![impersonated]);

  scheduler.trigger_shutdown();
  let _ = timeout(Duration::from_secs(5), runner).await;
}

#[tokio::test]
async fn test_suspend_with_binds_result() {
  init_tracing();
  let store = Arc::new(Mutex::new(Vec::<u32>::new()));
  let latch = CountDownLatch::new(1);
  let scheduler = Scheduler::new(test_config());

  let subject = {
    let store = store.clone();
    let latch = latch.clone();
    Process::from_behavior(
      "subject",
      Behavior::on::<Trigger>(move |_| {
        let store = store.clone();
        let latch = latch.clone();
        Flow::suspend_with(
          || async { Ok(Arc::new(41u32) as FlowValue) },
          move |value| {
            let bound = value.downcast::<u32>().map(|value| *value).unwrap_or_default();
            let store = store.clone();
            let latch = latch.clone();
            Flow::eval(move || {
              store.lock().push(bound + 1);
              latch.count_down();
              Ok(())
            })
          },
        )
      }),
    )
  };
  let subject_pid = subject.pid().clone();
  scheduler.register_root(subject).await.unwrap();
  let runner = spawn_scheduler(&scheduler);

  submit_from_system(&scheduler, EventHandle::new(Trigger), subject_pid).await;
  await_latch(&latch).await;
  assert_eq!(*store.lock(), vec![42]);

  scheduler.trigger_shutdown();
  let _ = timeout(Duration::from_secs(5), runner).await;
}

#[tokio::test]
async fn test_fork_returns_before_the_forked_flow_completes() {
  init_tracing();
  let store = Arc::new(Mutex::new(Vec::<String>::new()));
  let latch = CountDownLatch::new(2);
  let scheduler = Scheduler::new(test_config());

  let subject = {
    let store = store.clone();
    let latch = latch.clone();
    Process::from_behavior(
      "subject",
      Behavior::on::<Trigger>(move |_| {
        let forked = {
          let store = store.clone();
          let latch = latch.clone();
          Flow::delay_then(
            Duration::from_millis(100),
            Flow::eval(move || {
              store.lock().push("forked".to_string());
              latch.count_down();
              Ok(())
            }),
          )
        };
        let immediate = {
          let store = store.clone();
          let latch = latch.clone();
          Flow::eval(move || {
            store.lock().push("immediate".to_string());
            latch.count_down();
            Ok(())
          })
        };
        Flow::fork(forked).and_then(immediate)
      }),
    )
  };
  let subject_pid = subject.pid().clone();
  scheduler.register_root(subject).await.unwrap();
  let runner = spawn_scheduler(&scheduler);

  submit_from_system(&scheduler, EventHandle::new(Trigger), subject_pid).await;
  await_latch(&latch).await;
  assert_eq!(*store.lock(), vec!["immediate", "forked"]);

  scheduler.trigger_shutdown();
  let _ = timeout(Duration::from_secs(5), runner).await;
}
