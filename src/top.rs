/// Top Module - wires master, slave and the verification harness together
use crate::builtin::Module;
use crate::config::BusConfig;
use crate::error::{ProtocolViolation, SimError};
use crate::harness::{Backpressure, HandshakeEvent, HandshakeMonitor};
use crate::master::{Master, UserPort};
use crate::protocol::AxiLiteBus;
use crate::slave::Slave;

/// Edges from the one that accepts a start to the one that raises
/// `write_done`, inclusive, with no stalls: accept, AW, W, B.
pub const WRITE_LATENCY: u64 = 4;

/// Same for reads: accept, AR, pipeline stage, R.
pub const READ_LATENCY: u64 = 4;

pub struct Top {
  name: String,
  config: BusConfig,
  cycle: u64,

  pub master: Master,
  pub slave: Slave,
  pub backpressure: Backpressure,

  monitor: HandshakeMonitor,
  bus: AxiLiteBus,
}

impl Top {
  pub fn new(name: impl Into<String>, config: BusConfig) -> Self {
    Self::with_seed(name, config, 0)
  }

  /// `seed` drives the random backpressure generator.
  pub fn with_seed(name: impl Into<String>, config: BusConfig, seed: u64) -> Self {
    Self {
      name: name.into(),
      config,
      cycle: 0,
      master: Master::new("master", config),
      slave: Slave::new("slave", config),
      backpressure: Backpressure::new(seed),
      monitor: HandshakeMonitor::new(),
      bus: AxiLiteBus::default(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn config(&self) -> BusConfig {
    self.config
  }

  /// Number of edges evaluated since reset.
  pub fn cycle(&self) -> u64 {
    self.cycle
  }

  /// The bus as it was sampled on the last edge.
  pub fn bus(&self) -> &AxiLiteBus {
    &self.bus
  }

  pub fn registers(&self) -> [u64; 4] {
    self.slave.registers()
  }

  pub fn monitor(&self) -> &HandshakeMonitor {
    &self.monitor
  }

  pub fn monitor_mut(&mut self) -> &mut HandshakeMonitor {
    &mut self.monitor
  }

  /// Drives the user port for the next edge only.
  pub fn issue(&mut self, port: UserPort) {
    self.master.user = port;
  }

  pub fn start_write(&mut self, addr: u64, data: u64) {
    self.master.user.start_write = true;
    self.master.user.addr = addr;
    self.master.user.wdata = data;
  }

  pub fn start_read(&mut self, addr: u64) {
    self.master.user.start_read = true;
    self.master.user.addr = addr;
  }

  /// No transaction in flight or waiting anywhere on the bus.
  pub fn idle(&self) -> bool {
    self.master.idle() && !self.slave.write_port().outstanding() && !self.slave.read_port().outstanding()
  }

  /// Evaluates one rising edge and returns the handshakes it committed.
  pub fn tick(&mut self) -> Result<Vec<HandshakeEvent>, ProtocolViolation> {
    // wiring: this cycle's bus is the registered outputs of the last edge
    let stall = self.backpressure.sample();
    self.bus = AxiLiteBus::compose(&self.master.drive(), &self.slave.drive(), stall);
    self.master.bus = self.bus.clone();
    self.slave.bus = self.bus.clone();

    let events = self.monitor.observe(self.cycle, &self.bus)?;

    // both sides read the same snapshot, so the order here is irrelevant
    self.slave.run();
    self.master.run();
    self.backpressure.advance(&self.bus);

    self.master.user = UserPort::default();
    self
      .monitor
      .check_pipelines(self.cycle, self.master.write_busy(), self.master.read_busy())?;

    self.cycle += 1;
    Ok(events)
  }

  /// Ticks until the bus is idle. The core has no timeout of its own, so a
  /// permanently stalled channel is caught here after `max_cycles`.
  pub fn run_until_idle(&mut self, max_cycles: u64) -> Result<u64, SimError> {
    let start = self.cycle;
    while !self.idle() {
      if self.cycle - start >= max_cycles {
        return Err(SimError::Timeout { cycles: max_cycles });
      }
      self.tick()?;
    }
    Ok(self.cycle - start)
  }

  /// Performs one write and returns the edges it took, start to done.
  pub fn write(&mut self, addr: u64, data: u64, max_cycles: u64) -> Result<u64, SimError> {
    self.run_until_idle(max_cycles)?;
    self.start_write(addr, data);
    let start = self.cycle;
    loop {
      self.tick()?;
      if self.master.write_done() {
        self.master.acknowledge_write();
        return Ok(self.cycle - start);
      }
      if self.cycle - start >= max_cycles {
        return Err(SimError::Timeout { cycles: max_cycles });
      }
    }
  }

  /// Performs one read and returns the data.
  pub fn read(&mut self, addr: u64, max_cycles: u64) -> Result<u64, SimError> {
    self.run_until_idle(max_cycles)?;
    self.start_read(addr);
    let start = self.cycle;
    loop {
      self.tick()?;
      if self.master.read_done() {
        self.master.take_read();
        return Ok(self.master.rdata());
      }
      if self.cycle - start >= max_cycles {
        return Err(SimError::Timeout { cycles: max_cycles });
      }
    }
  }

  pub fn reset(&mut self) {
    self.master.reset();
    self.slave.reset();
    self.backpressure.reset();
    self.monitor.reset();
    self.bus = AxiLiteBus::default();
    self.cycle = 0;
  }
}
