/// Single decision point between the write and read pipelines
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRequest {
  pub addr: u64,
  pub data: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
  pub addr: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
  Write(WriteRequest),
  Read(ReadRequest),
}

/// Grants at most one request per cycle, and only while the bus is idle.
///
/// Priority, highest first: the deferred request, a fresh write, a fresh
/// read. When two requests compete on an idle cycle the runner-up is parked
/// in the one-deep deferred slot and granted on the edge where the winner
/// completes, so the bus never shows idle while a request is still owed.
/// Anything else is rejected, which includes every fresh request that
/// arrives while a transaction is in flight.
#[derive(Debug, Default)]
pub struct Arbiter {
  deferred: Option<Grant>,
  rejected: u64,
}

impl Arbiter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn deferred(&self) -> Option<Grant> {
    self.deferred
  }

  pub fn rejected(&self) -> u64 {
    self.rejected
  }

  /// `was_busy` is the bus state at the start of the cycle, `busy` the state
  /// after this edge's pipeline updates.
  pub fn arbitrate(
    &mut self,
    write: Option<WriteRequest>,
    read: Option<ReadRequest>,
    was_busy: bool,
    busy: bool,
  ) -> Option<Grant> {
    let fresh = [write.map(Grant::Write), read.map(Grant::Read)];

    if was_busy {
      for request in fresh.into_iter().flatten() {
        self.reject(request);
      }
      // the in-flight transaction finished on this edge
      if busy {
        return None;
      }
      return self.deferred.take();
    }

    let mut candidates = self.deferred.take().into_iter().chain(fresh.into_iter().flatten());
    let grant = candidates.next();
    self.deferred = candidates.next();
    for request in candidates {
      self.reject(request);
    }
    grant
  }

  fn reject(&mut self, request: Grant) {
    self.rejected += 1;
    warn!("arbiter: dropped {:?}, bus busy", request);
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }
}
