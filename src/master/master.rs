/// Master controller - user command surface in, five channels out
use super::arbiter::{Arbiter, Grant, ReadRequest, WriteRequest};
use super::read_fsm::ReadFsm;
use super::write_fsm::WriteFsm;
use crate::builtin::Module;
use crate::config::BusConfig;
use crate::protocol::{AxiLiteBus, MasterDrive};
use log::info;

/// User-side inputs, sampled at the start of a cycle. The start bits are
/// pulses; the owner clears them after every edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserPort {
  pub start_write: bool,
  pub start_read: bool,
  pub addr: u64,
  pub wdata: u64,
}

impl UserPort {
  pub fn pending(&self) -> bool {
    self.start_write || self.start_read
  }
}

/// Completion flags that stay up until acknowledged, for consumers that do
/// not sample every cycle. A second completion before acknowledgement
/// overwrites the first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Completions {
  write: bool,
  read: Option<u64>,
}

impl Completions {
  pub fn write_complete(&self) -> bool {
    self.write
  }

  pub fn read_result(&self) -> Option<u64> {
    self.read
  }
}

pub struct Master {
  name: String,
  config: BusConfig,

  // inputs
  pub bus: AxiLiteBus,
  pub user: UserPort,

  arbiter: Arbiter,
  write: WriteFsm,
  read: ReadFsm,
  held: Completions,
}

impl Master {
  pub fn new(name: impl Into<String>, config: BusConfig) -> Self {
    Self {
      name: name.into(),
      config,
      bus: AxiLiteBus::default(),
      user: UserPort::default(),
      arbiter: Arbiter::new(),
      write: WriteFsm::new(),
      read: ReadFsm::new(),
      held: Completions::default(),
    }
  }

  pub fn drive(&self) -> MasterDrive {
    MasterDrive {
      aw: self.write.aw.clone(),
      w: self.write.w.clone(),
      b_ready: self.write.b_ready,
      ar: self.read.ar.clone(),
      r_ready: self.read.r_ready,
    }
  }

  /// Either pipeline in flight. Derived, never stored.
  pub fn busy(&self) -> bool {
    self.write.busy() || self.read.busy()
  }

  pub fn write_busy(&self) -> bool {
    self.write.busy()
  }

  pub fn read_busy(&self) -> bool {
    self.read.busy()
  }

  pub fn write_done(&self) -> bool {
    self.write.done()
  }

  pub fn read_done(&self) -> bool {
    self.read.done()
  }

  pub fn rdata(&self) -> u64 {
    self.read.rdata()
  }

  /// Nothing in flight, nothing deferred and no start pulse waiting.
  pub fn idle(&self) -> bool {
    !self.busy() && self.arbiter.deferred().is_none() && !self.user.pending()
  }

  pub fn completions(&self) -> Completions {
    self.held
  }

  /// Clears the held write completion, returning whether one was set.
  pub fn acknowledge_write(&mut self) -> bool {
    std::mem::take(&mut self.held.write)
  }

  /// Takes the held read result.
  pub fn take_read(&mut self) -> Option<u64> {
    self.held.read.take()
  }

  pub fn arbiter(&self) -> &Arbiter {
    &self.arbiter
  }

  pub fn write_fsm(&self) -> &WriteFsm {
    &self.write
  }

  pub fn read_fsm(&self) -> &ReadFsm {
    &self.read
  }

  fn requests(&self) -> (Option<WriteRequest>, Option<ReadRequest>) {
    let addr = self.config.mask_addr(self.user.addr);
    let write = self.user.start_write.then(|| WriteRequest {
      addr,
      data: self.config.mask_data(self.user.wdata),
    });
    let read = self.user.start_read.then_some(ReadRequest { addr });
    (write, read)
  }
}

impl Module for Master {
  fn run(&mut self) {
    let was_busy = self.busy();

    self.write.run(&self.bus);
    self.read.run(&self.bus);

    if self.write.done() {
      info!("{}: write done ({:?})", self.name, self.write.last_resp());
      self.held.write = true;
    }
    if self.read.done() {
      info!("{}: read done, rdata={:#x}", self.name, self.read.rdata());
      self.held.read = Some(self.read.rdata());
    }

    let (write, read) = self.requests();
    match self.arbiter.arbitrate(write, read, was_busy, self.busy()) {
      Some(Grant::Write(req)) => {
        info!("{}: write {:#x} <= {:#x}", self.name, req.addr, req.data);
        self.write.start(req, self.config.data_width.full_strobe());
      },
      Some(Grant::Read(req)) => {
        info!("{}: read {:#x}", self.name, req.addr);
        self.read.start(req);
      },
      None => {},
    }
  }

  fn reset(&mut self) {
    self.bus = AxiLiteBus::default();
    self.user = UserPort::default();
    self.arbiter.reset();
    self.write.reset();
    self.read.reset();
    self.held = Completions::default();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
