use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::actor::flow::Flow;
use crate::actor::message::{Event, EventHandle};

type MatchFn = Arc<dyn Fn(&EventHandle) -> bool + Send + Sync>;
type ApplyFn = Arc<dyn Fn(&EventHandle) -> Flow + Send + Sync>;

/// Partial function from `EventHandle` to a flow term, represented as a
/// `(matches, apply)` pair. `apply` must only be called where `matches`
/// holds; the combinators preserve that contract.
#[derive(Clone)]
pub struct Behavior {
  matches: MatchFn,
  apply: ApplyFn,
}

impl Debug for Behavior {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Behavior")
  }
}

impl Behavior {
  pub fn new(
    matches: impl Fn(&EventHandle) -> bool + Send + Sync + 'static,
    apply: impl Fn(&EventHandle) -> Flow + Send + Sync + 'static,
  ) -> Self {
    Self {
      matches: Arc::new(matches),
      apply: Arc::new(apply),
    }
  }

  /// Defined for every event.
  pub fn total(apply: impl Fn(&EventHandle) -> Flow + Send + Sync + 'static) -> Self {
    Self::new(|_| true, apply)
  }

  /// Defined for events of type `T`.
  pub fn on<T: Event>(apply: impl Fn(&T) -> Flow + Send + Sync + 'static) -> Self {
    Self::new(
      |event| event.is_typed::<T>(),
      move |event| match event.as_any().downcast_ref::<T>() {
        Some(typed) => apply(typed),
        None => Flow::unit(),
      },
    )
  }

  /// Defined for events equal to `value`.
  pub fn on_value(value: impl Event, apply: impl Fn() -> Flow + Send + Sync + 'static) -> Self {
    let value = EventHandle::new(value);
    Self::new(move |event| *event == value, move |_| apply())
  }

  pub fn is_defined_at(&self, event: &EventHandle) -> bool {
    (self.matches)(event)
  }

  /// `None` where the partial function is undefined.
  pub fn apply(&self, event: &EventHandle) -> Option<Flow> {
    if self.is_defined_at(event) {
      Some((self.apply)(event))
    } else {
      None
    }
  }

  /// Defined only where both sides are; interprets both flows in order on
  /// the same event.
  pub fn and_also(self, other: Behavior) -> Behavior {
    let (this, that) = (self, other);
    let matches = {
      let (this, that) = (this.clone(), that.clone());
      move |event: &EventHandle| this.is_defined_at(event) && that.is_defined_at(event)
    };
    Behavior::new(matches, move |event| {
      (this.apply)(event).and_then((that.apply)(event))
    })
  }

  /// Defined where either side is; the left side wins where both are.
  pub fn or_else(self, other: Behavior) -> Behavior {
    let (this, that) = (self, other);
    let matches = {
      let (this, that) = (this.clone(), that.clone());
      move |event: &EventHandle| this.is_defined_at(event) || that.is_defined_at(event)
    };
    Behavior::new(matches, move |event| {
      if this.is_defined_at(event) {
        (this.apply)(event)
      } else {
        (that.apply)(event)
      }
    })
  }
}

static_assertions::assert_impl_all!(Behavior: Send, Sync);
