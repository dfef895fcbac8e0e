/// Slave write side: AW and W acceptance, B response
use super::regbank::RegisterBank;
use crate::builtin::Wire;
use crate::protocol::{AxiLiteBus, Resp, WriteResp};
use log::debug;

/// Holds at most one write transaction. A new address is refused while an
/// address is held or a response is pending.
#[derive(Clone, Debug, Default)]
pub struct WritePort {
  pub aw_ready: bool,
  pub w_ready: bool,
  pub b: Wire<WriteResp>,
  held_addr: Option<u64>,
}

impl WritePort {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn held_addr(&self) -> Option<u64> {
    self.held_addr
  }

  /// True while a transaction occupies the port.
  pub fn outstanding(&self) -> bool {
    self.held_addr.is_some() || self.b.valid
  }

  pub fn run(&mut self, bus: &AxiLiteBus, regs: &mut RegisterBank) {
    if bus.b.fire() {
      self.b.clear();
    }

    if bus.w.fire() {
      if let Some(addr) = self.held_addr.take() {
        regs.write(addr, bus.w.payload.data);
        debug!("slave: reg[{:#x}] <= {:#x}", addr, bus.w.payload.data);
        self.b.set(WriteResp { resp: Resp::Okay });
      }
    }

    if bus.aw.fire() {
      self.held_addr = Some(bus.aw.payload.addr);
    }

    self.aw_ready = self.held_addr.is_none() && !self.b.valid;
    self.w_ready = self.held_addr.is_some() && !self.b.valid;
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }
}
