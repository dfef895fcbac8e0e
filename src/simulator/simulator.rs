use super::config::AppConfig;
use super::sim::mode::StepMode;
use super::sim::shell::{Command, Shell, HELP};
use super::sim::soak::{run_soak, SoakConfig};
use super::utils::TraceWriter;
use crate::error::SimError;
use crate::harness::HandshakeEvent;
use crate::master::UserPort;
use crate::protocol::ChannelId;
use crate::top::Top;
use log::info;
use std::io::{self, Result};
use std::path::Path;

fn to_io(err: SimError) -> io::Error {
  match err {
    SimError::Io(e) => e,
    other => io::Error::new(io::ErrorKind::Other, other.to_string()),
  }
}

pub struct Simulator {
  config: AppConfig,
  top: Top,
  trace: Option<TraceWriter>,
}

impl Simulator {
  pub fn from_app_config(config: &AppConfig) -> Result<Self> {
    let mut top = Top::with_seed("axilite_top", config.bus, config.simulation.seed);
    let bp = &config.backpressure;
    top.backpressure.set_random(ChannelId::Aw, bp.aw_probability);
    top.backpressure.set_random(ChannelId::W, bp.w_probability);
    top.backpressure.set_random(ChannelId::Ar, bp.ar_probability);

    let trace = if config.simulation.trace_file.is_empty() {
      None
    } else {
      info!("writing handshake trace to {}", config.simulation.trace_file);
      Some(TraceWriter::create(Path::new(&config.simulation.trace_file))?)
    };

    Ok(Self {
      config: config.clone(),
      top,
      trace,
    })
  }

  pub fn top(&self) -> &Top {
    &self.top
  }

  pub fn run(&mut self) -> Result<()> {
    info!(
      "bus: data_width={} addr_width={}",
      self.config.bus.data_width, self.config.bus.addr_width
    );
    let result = match StepMode::from(self.config.simulation.step_mode) {
      StepMode::Continuous => self.run_continuous(),
      StepMode::Step => self.run_step_mode(),
    };
    if let Some(trace) = self.trace.as_mut() {
      trace.flush()?;
    }
    result
  }

  fn run_continuous(&mut self) -> Result<()> {
    let soak = SoakConfig {
      transactions: self.config.simulation.transactions,
      seed: self.config.simulation.seed,
      max_cycles: self.config.simulation.max_cycles,
    };
    let report = run_soak(&mut self.top, &soak, self.trace.as_mut()).map_err(to_io)?;

    println!("\n--- Soak Report ---");
    println!("  writes          {}", report.writes);
    println!("  reads           {}", report.reads);
    println!("  simultaneous    {}", report.simultaneous);
    println!("  handshakes      {}", report.handshakes);
    println!("  cycles          {}", report.cycles);
    println!("  stalled cycles  {}", report.stalled_cycles);
    println!("  rejected starts {}", report.rejected);
    println!("--- End Report ---\n");
    Ok(())
  }

  fn run_step_mode(&mut self) -> Result<()> {
    println!("Step mode - {}", HELP);
    let mut shell = Shell::new()?;
    loop {
      match shell.read_command()? {
        Command::Step(n) => {
          for _ in 0..n {
            self.step()?;
          }
        },
        Command::Write { addr, data } => self.top.start_write(addr, data),
        Command::Read { addr } => self.top.start_read(addr),
        Command::WriteRead { addr, data } => self.top.issue(UserPort {
          start_write: true,
          start_read: true,
          addr,
          wdata: data,
        }),
        Command::Stall { channel, cycles } => {
          if !self.top.backpressure.stall(channel, cycles) {
            eprintln!("Error: only AW, W and AR can be stalled");
          }
        },
        Command::Regs => {
          for (i, word) in self.top.registers().iter().enumerate() {
            println!("  reg[{:#04x}] = {:#x}", i * 4, word);
          }
        },
        Command::Continue => {
          let max = self.config.simulation.max_cycles;
          let start = self.top.cycle();
          while !self.top.idle() {
            if self.step()? - start >= max {
              eprintln!("Error: bus still busy after {} cycles", max);
              break;
            }
          }
        },
        Command::Quit => break,
      }
    }
    Ok(())
  }

  /// Advance one cycle and print what happened; returns the cycle count.
  fn step(&mut self) -> Result<u64> {
    let events = self.top.tick().map_err(|e| to_io(e.into()))?;
    if let Some(trace) = self.trace.as_mut() {
      trace.record(&events)?;
    }
    self.top.monitor_mut().clear_history();
    self.print_cycle(&events);
    Ok(self.top.cycle())
  }

  fn print_cycle(&mut self, events: &[HandshakeEvent]) {
    let cycle = self.top.cycle() - 1;
    for event in events {
      println!("[{:>6}] {:<2} handshake {:?} {:?} {:?}", cycle, event.channel, event.addr, event.data, event.resp);
    }
    let master = &mut self.top.master;
    if master.write_done() {
      master.acknowledge_write();
      println!("[{:>6}] write done", cycle);
    }
    if master.read_done() {
      master.take_read();
      println!("[{:>6}] read done, rdata={:#x}", cycle, master.rdata());
    }
    println!("[{:>6}] busy={} write_busy={} read_busy={}", cycle, master.busy(), master.write_busy(), master.read_busy());
  }
}
