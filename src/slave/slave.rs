/// Slave controller - terminates the bus against the register bank
use super::read_port::ReadPort;
use super::regbank::{RegisterBank, REG_COUNT};
use super::write_port::WritePort;
use crate::builtin::Module;
use crate::config::BusConfig;
use crate::protocol::{AxiLiteBus, SlaveDrive};

pub struct Slave {
  name: String,

  // input: the bus as sampled at the start of the cycle
  pub bus: AxiLiteBus,

  write: WritePort,
  read: ReadPort,
  regs: RegisterBank,
}

impl Slave {
  pub fn new(name: impl Into<String>, config: BusConfig) -> Self {
    Self {
      name: name.into(),
      bus: AxiLiteBus::default(),
      write: WritePort::new(),
      read: ReadPort::new(),
      regs: RegisterBank::new(config.data_width),
    }
  }

  /// Registered outputs, as presented to the bus on the next cycle.
  pub fn drive(&self) -> SlaveDrive {
    SlaveDrive {
      aw_ready: self.write.aw_ready,
      w_ready: self.write.w_ready,
      b: self.write.b.clone(),
      ar_ready: self.read.ar_ready,
      r: self.read.r.clone(),
    }
  }

  pub fn registers(&self) -> [u64; REG_COUNT] {
    self.regs.words()
  }

  /// Backdoor load of a register, bypassing the bus.
  pub fn preload(&mut self, addr: u64, data: u64) {
    self.regs.write(addr, data);
  }

  pub fn write_port(&self) -> &WritePort {
    &self.write
  }

  pub fn read_port(&self) -> &ReadPort {
    &self.read
  }
}

impl Module for Slave {
  fn run(&mut self) {
    self.write.run(&self.bus, &mut self.regs);
    self.read.run(&self.bus, &self.regs);
  }

  fn reset(&mut self) {
    self.bus = AxiLiteBus::default();
    self.write.reset();
    self.read.reset();
    self.regs.reset();
  }

  fn name(&self) -> &str {
    &self.name
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ready_lines_rise_after_first_edge() {
    let mut slave = Slave::new("slave", BusConfig::default());
    let drive = slave.drive();
    assert!(!drive.aw_ready && !drive.ar_ready);

    slave.run();
    let drive = slave.drive();
    assert!(drive.aw_ready);
    assert!(!drive.w_ready);
    assert!(drive.ar_ready);
    assert!(!drive.b.valid && !drive.r.valid);
  }

  #[test]
  fn reset_clears_registers_and_ports() {
    let mut slave = Slave::new("slave", BusConfig::default());
    slave.preload(0x4, 9);
    slave.run();
    slave.reset();
    assert_eq!(slave.registers(), [0; REG_COUNT]);
    assert!(!slave.drive().aw_ready);
    assert_eq!(slave.name(), "slave");
  }
}
