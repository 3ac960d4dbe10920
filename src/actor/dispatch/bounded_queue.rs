use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::Mutex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError<E: Debug> {
  #[error("queue is full")]
  Full(E),
  #[error("queue is closed")]
  Closed(E),
}

#[derive(Debug)]
struct BoundedQueueInner<E> {
  receiver: Mutex<mpsc::Receiver<E>>,
  capacity: usize,
  closed: AtomicBool,
}

/// Bounded MPMC FIFO. `enqueue` suspends while full, `dequeue` suspends
/// while empty (multiple consumers serialize on the receiver mutex) and
/// `try_offer` never suspends. After `close`, `dequeue` drains the buffer
/// and then returns `None`.
#[derive(Debug, Clone)]
pub struct BoundedQueue<E> {
  sender: mpsc::Sender<E>,
  inner: Arc<BoundedQueueInner<E>>,
  count: Arc<AtomicUsize>,
}

impl<E: Debug + Send + 'static> BoundedQueue<E> {
  pub fn new(capacity: usize) -> Self {
    assert!(capacity > 0, "capacity must be greater than zero");
    let (sender, receiver) = mpsc::channel(capacity);
    Self {
      sender,
      inner: Arc::new(BoundedQueueInner {
        receiver: Mutex::new(receiver),
        capacity,
        closed: AtomicBool::new(false),
      }),
      count: Arc::new(AtomicUsize::new(0)),
    }
  }

  pub async fn enqueue(&self, element: E) -> Result<(), QueueError<E>> {
    if self.inner.closed.load(Ordering::SeqCst) {
      return Err(QueueError::Closed(element));
    }
    match self.sender.send(element).await {
      Ok(()) => {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
      }
      Err(mpsc::error::SendError(element)) => Err(QueueError::Closed(element)),
    }
  }

  pub async fn dequeue(&self) -> Option<E> {
    let mut receiver = self.inner.receiver.lock().await;
    let element = receiver.recv().await;
    if element.is_some() {
      self.decrement_count();
    }
    element
  }

  pub fn try_offer(&self, element: E) -> Result<(), QueueError<E>> {
    if self.inner.closed.load(Ordering::SeqCst) {
      return Err(QueueError::Closed(element));
    }
    match self.sender.try_send(element) {
      Ok(()) => {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
      }
      Err(TrySendError::Full(element)) => Err(QueueError::Full(element)),
      Err(TrySendError::Closed(element)) => Err(QueueError::Closed(element)),
    }
  }

  pub fn len(&self) -> usize {
    self.count.load(Ordering::SeqCst)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn capacity(&self) -> usize {
    self.inner.capacity
  }

  /// Closing stops producers immediately; consumers drain what is buffered.
  pub async fn close(&self) {
    self.inner.closed.store(true, Ordering::SeqCst);
    let mut receiver = self.inner.receiver.lock().await;
    receiver.close();
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
