/// Port and signal types for module interconnection
use serde::Serialize;

/// A registered output that carries a payload plus its VALID flag.
/// Clearing a wire drops VALID but keeps the last payload on the lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Wire<T: Clone> {
  pub value: T,
  pub valid: bool,
}

impl<T: Clone> Wire<T> {
  pub fn new(value: T) -> Self {
    Self { value, valid: false }
  }

  pub fn set(&mut self, value: T) {
    self.value = value;
    self.valid = true;
  }

  pub fn clear(&mut self) {
    self.valid = false;
  }
}

impl<T: Clone + Default> Default for Wire<T> {
  fn default() -> Self {
    Self {
      value: T::default(),
      valid: false,
    }
  }
}

/// One VALID/READY channel as seen by both ends during a single cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Channel<T: Clone> {
  pub valid: bool,
  pub ready: bool,
  pub payload: T,
}

impl<T: Clone> Channel<T> {
  /// Joins the requester's wire with the acknowledger's READY.
  pub fn join(wire: &Wire<T>, ready: bool) -> Self {
    Self {
      valid: wire.valid,
      ready,
      payload: wire.value.clone(),
    }
  }

  /// True when the transfer commits on this cycle's edge.
  pub fn fire(&self) -> bool {
    self.valid && self.ready
  }

  /// VALID held without READY.
  pub fn stalled(&self) -> bool {
    self.valid && !self.ready
  }
}
