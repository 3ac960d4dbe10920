use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::actor::dispatch::QueueError;

#[derive(Debug)]
struct MailboxQueueInner<E> {
  receiver: Mutex<mpsc::Receiver<E>>,
  capacity: usize,
}

/// Bounded FIFO with non-blocking operations only, backing a process
/// mailbox. Producers `try_offer` concurrently; the single lock-owning
/// worker polls.
#[derive(Debug, Clone)]
pub(crate) struct MailboxQueue<E> {
  sender: mpsc::Sender<E>,
  inner: Arc<MailboxQueueInner<E>>,
  count: Arc<AtomicUsize>,
}

impl<E: Debug + Send + 'static> MailboxQueue<E> {
  pub(crate) fn new(capacity: usize) -> Self {
    assert!(capacity > 0, "capacity must be greater than zero");
    let (sender, receiver) = mpsc::channel(capacity);
    Self {
      sender,
      inner: Arc::new(MailboxQueueInner {
        receiver: Mutex::new(receiver),
        capacity,
      }),
      count: Arc::new(AtomicUsize::new(0)),
    }
  }

  pub(crate) fn try_offer(&self, element: E) -> Result<(), QueueError<E>> {
    match self.sender.try_send(element) {
      Ok(()) => {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
      }
      Err(TrySendError::Full(element)) => Err(QueueError::Full(element)),
      Err(TrySendError::Closed(element)) => Err(QueueError::Closed(element)),
    }
  }

  pub(crate) fn try_poll(&self) -> Option<E> {
    let mut receiver = self.inner.receiver.lock();
    match receiver.try_recv() {
      Ok(element) => {
        self.decrement_count();
        Some(element)
      }
      Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.count.load(Ordering::SeqCst)
  }

  pub(crate) fn capacity(&self) -> usize {
    self.inner.capacity
  }

  fn decrement_count(&self) {
    self
      .count
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
        Some(current.saturating_sub(1))
      })
      .ok();
  }
}
