/// Master write pipeline: IDLE -> ADDR -> DATA -> RESP -> IDLE
use super::arbiter::WriteRequest;
use crate::builtin::Wire;
use crate::protocol::{AddrBeat, AxiLiteBus, Resp, WriteBeat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
  Idle,
  Addr,
  Data,
  Resp,
}

#[derive(Clone, Debug)]
pub struct WriteFsm {
  state: WriteState,
  pub aw: Wire<AddrBeat>,
  pub w: Wire<WriteBeat>,
  pub b_ready: bool,
  busy: bool,
  done: bool,
  last_resp: Resp,
}

impl WriteFsm {
  pub fn new() -> Self {
    Self {
      state: WriteState::Idle,
      aw: Wire::default(),
      w: Wire::default(),
      b_ready: false,
      busy: false,
      done: false,
      last_resp: Resp::Okay,
    }
  }

  pub fn state(&self) -> WriteState {
    self.state
  }

  pub fn busy(&self) -> bool {
    self.busy
  }

  /// High for the single cycle after the response handshake.
  pub fn done(&self) -> bool {
    self.done
  }

  /// Status of the last response. Recorded, never acted on.
  pub fn last_resp(&self) -> Resp {
    self.last_resp
  }

  /// Latches a granted request. Only the arbiter calls this, and only while
  /// both pipelines are idle.
  pub fn start(&mut self, req: WriteRequest, strb: u8) {
    debug_assert_eq!(self.state, WriteState::Idle);
    self.aw.set(AddrBeat::new(req.addr));
    self.w = Wire::new(WriteBeat { data: req.data, strb });
    self.state = WriteState::Addr;
    self.busy = true;
  }

  pub fn run(&mut self, bus: &AxiLiteBus) {
    self.done = false;

    match self.state {
      WriteState::Idle => {},
      WriteState::Addr => {
        if bus.aw.fire() {
          self.aw.clear();
          self.w.valid = true;
          self.state = WriteState::Data;
        }
      },
      WriteState::Data => {
        if bus.w.fire() {
          self.w.clear();
          self.b_ready = true;
          self.state = WriteState::Resp;
        }
      },
      WriteState::Resp => {
        if bus.b.fire() {
          self.b_ready = false;
          self.last_resp = bus.b.payload.resp;
          self.done = true;
          self.busy = false;
          self.state = WriteState::Idle;
        }
      },
    }
  }

  pub fn reset(&mut self) {
    *self = Self::new();
  }
}

impl Default for WriteFsm {
  fn default() -> Self {
    Self::new()
  }
}
