//! Event trait and the shared handle passed through mailboxes.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// An opaque value carried by envelopes. Implementations are value classes:
/// equality is decided by `eq_event`, which downcasts the other side.
/// Use [`crate::impl_event!`] to derive the boilerplate for a `PartialEq` type.
pub trait Event: Debug + Send + Sync + 'static {
  fn eq_event(&self, other: &dyn Event) -> bool;

  fn as_any(&self) -> &(dyn Any + Send + Sync + 'static);

  fn type_name(&self) -> String {
    std::any::type_name_of_val(self).to_string()
  }
}

#[derive(Debug, Clone)]
pub struct EventHandle(Arc<dyn Event>);

impl EventHandle {
  pub fn new(event: impl Event) -> Self {
    Self(Arc::new(event))
  }

  pub fn new_arc(event: Arc<dyn Event>) -> Self {
    Self(event)
  }

  pub fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
    self.0.as_any()
  }

  pub fn is_typed<T: Event>(&self) -> bool {
    self.as_any().is::<T>()
  }

  pub fn to_typed<T: Event + Clone>(&self) -> Option<T> {
    self.as_any().downcast_ref::<T>().cloned()
  }

  pub fn type_name(&self) -> String {
    self.0.type_name()
  }
}

impl PartialEq for EventHandle {
  fn eq(&self, other: &Self) -> bool {
    self.0.eq_event(other.0.as_ref())
  }
}

impl Eq for EventHandle {}

/// Implements [`Event`] for a `PartialEq + Debug + Send + Sync` type.
#[macro_export]
macro_rules! impl_event {
  ($($t:ty),+ $(,)?) => {
    $(
      impl $crate::actor::message::Event for $t {
        fn eq_event(&self, other: &dyn $crate::actor::message::Event) -> bool {
          other.as_any().downcast_ref::<$t>().map_or(false, |that| self == that)
        }

        fn as_any(&self) -> &(dyn std::any::Any + Send + Sync + 'static) {
          self
        }
      }
    )+
  };
}

static_assertions::assert_impl_all!(EventHandle: Send, Sync);
