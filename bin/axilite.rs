use axilite::simulator::config::{load_and_merge_configs, CliOverrides};
use axilite::simulator::log::init_log;
use axilite::simulator::Simulator;
use clap::Parser;
use std::path::PathBuf;

/// axilite - cycle model of a single-beat AXI-lite master and register slave
#[derive(Parser, Debug)]
#[command(name = "axilite")]
#[command(version = "0.1.0")]
#[command(about = "Handshake-accurate bus simulator with backpressure injection", long_about = None)]
struct Args {
  /// Configuration file layered over the built-in defaults
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Enable step mode (interactive stepping)
  #[arg(short, long)]
  step: bool,

  /// Quiet mode (suppress log messages)
  #[arg(short, long)]
  quiet: bool,

  /// Output trace file path
  #[arg(long, value_name = "FILE")]
  trace_file: Option<String>,

  /// Data width in bits: 32 or 64
  #[arg(long, value_name = "BITS")]
  data_width: Option<u32>,

  /// Address width in bits
  #[arg(long, value_name = "BITS")]
  addr_width: Option<u32>,

  /// Number of random transactions in continuous mode
  #[arg(short, long, value_name = "N")]
  transactions: Option<u64>,

  /// Seed for the workload and backpressure generators
  #[arg(long)]
  seed: Option<u64>,
}

fn main() -> std::io::Result<()> {
  let args = Args::parse();

  let cli = CliOverrides {
    quiet: args.quiet,
    step: args.step,
    trace_file: args.trace_file,
    data_width: args.data_width,
    addr_width: args.addr_width,
    transactions: args.transactions,
    seed: args.seed,
  };
  let config = load_and_merge_configs(args.config.as_deref(), &cli)?;

  init_log(config.simulation.quiet);

  let mut simulator = Simulator::from_app_config(&config)?;
  simulator.run()
}
