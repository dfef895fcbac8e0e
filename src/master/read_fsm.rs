/// Master read pipeline: IDLE -> ADDR -> DATA -> IDLE
use super::arbiter::ReadRequest;
use crate::builtin::Wire;
use crate::protocol::{AddrBeat, AxiLiteBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
  Idle,
  Addr,
  Data,
}

#[derive(Clone, Debug)]
pub struct ReadFsm {
  state: ReadState,
  pub ar: Wire<AddrBeat>,
  pub r_ready: bool,
  busy: bool,
  done: bool,
  rdata: u64,
}

impl ReadFsm {
  pub fn new() -> Self {
    Self {
      state: ReadState::Idle,
      ar: Wire::default(),
      r_ready: false,
      busy: false,
      done: false,
      rdata: 0,
    }
  }

  pub fn state(&self) -> ReadState {
    self.state
  }

  pub fn busy(&self) -> bool {
    self.busy
  }

  pub fn done(&self) -> bool {
    self.done
  }

  /// Data of the last completed read; stable until the next one completes.
  pub fn rdata(&self) -> u64 {
    self.rdata
  }

  pub fn start(&mut self, req: ReadRequest) {
    debug_assert_eq!(self.state, ReadState::Idle);
    self.ar.set(AddrBeat::new(req.addr));
    self.state = ReadState::Addr;
    self.busy = true;
  }

  pub fn run(&mut self, bus: &AxiLiteBus) {
    self.done = false;

    match self.state {
      ReadState::Idle => {},
      ReadState::Addr => {
        if bus.ar.fire() {
          self.ar.clear();
          self.r_ready = true;
          self.state = ReadState::Data;
        }
      },
      ReadState::Data => {
        if bus.r.fire() {
          self.r_ready = false;
          self.rdata = bus.r.payload.data;
          self.done = true;
          self.busy = false;
          self.state = ReadState::Idle;
        }
      },
    }
  }

  pub fn reset(&mut self) {
    *self = Self::new();
  }
}

impl Default for ReadFsm {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::builtin::Channel;
  use crate::protocol::{ReadBeat, Resp};

  #[test]
  fn latches_returned_data() {
    let mut fsm = ReadFsm::new();
    fsm.start(ReadRequest { addr: 0xc });
    assert!(fsm.ar.valid && fsm.busy());

    fsm.run(&AxiLiteBus {
      ar: Channel::join(&fsm.ar, true),
      ..AxiLiteBus::default()
    });
    assert_eq!(fsm.state(), ReadState::Data);
    assert!(fsm.r_ready && !fsm.ar.valid);

    // no data yet
    fsm.run(&AxiLiteBus::default());
    assert_eq!(fsm.state(), ReadState::Data);

    fsm.run(&AxiLiteBus {
      r: Channel {
        valid: true,
        ready: fsm.r_ready,
        payload: ReadBeat { data: 0xbeef, resp: Resp::Okay },
      },
      ..AxiLiteBus::default()
    });
    assert!(fsm.done() && !fsm.busy());
    assert_eq!(fsm.rdata(), 0xbeef);

    fsm.run(&AxiLiteBus::default());
    assert!(!fsm.done());
    assert_eq!(fsm.rdata(), 0xbeef);
  }
}
