use crate::config::{BusConfig, DataWidth};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// Simulation section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSection {
  #[serde(default)]
  pub quiet: bool,
  #[serde(default)]
  pub step_mode: bool,
  #[serde(default)]
  pub trace_file: String,
  #[serde(default = "default_transactions")]
  pub transactions: u64,
  #[serde(default = "default_seed")]
  pub seed: u64,
  /// Harness watchdog per transaction. The bus itself never times out.
  #[serde(default = "default_max_cycles")]
  pub max_cycles: u64,
}

fn default_transactions() -> u64 {
  1000
}

fn default_seed() -> u64 {
  1
}

fn default_max_cycles() -> u64 {
  10_000
}

impl Default for SimulationSection {
  fn default() -> Self {
    Self {
      quiet: false,
      step_mode: false,
      trace_file: String::new(),
      transactions: default_transactions(),
      seed: default_seed(),
      max_cycles: default_max_cycles(),
    }
  }
}

/// Per-cycle probability of forcing READY low on each request channel
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackpressureSection {
  #[serde(default)]
  pub aw_probability: f64,
  #[serde(default)]
  pub w_probability: f64,
  #[serde(default)]
  pub ar_probability: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
  #[serde(default)]
  pub bus: BusConfig,
  #[serde(default)]
  pub simulation: SimulationSection,
  #[serde(default)]
  pub backpressure: BackpressureSection,
}

/// Settings given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
  pub quiet: bool,
  pub step: bool,
  pub trace_file: Option<String>,
  pub data_width: Option<u32>,
  pub addr_width: Option<u32>,
  pub transactions: Option<u64>,
  pub seed: Option<u64>,
}

fn invalid(msg: impl Into<String>) -> io::Error {
  io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

fn parse_table(content: &str, origin: &str) -> io::Result<toml::Table> {
  content
    .parse::<toml::Table>()
    .map_err(|e| invalid(format!("failed to parse {}: {}", origin, e)))
}

/// Load the built-in default configuration
pub fn load_default_config() -> io::Result<AppConfig> {
  parse_config(DEFAULT_CONFIG, "default.toml")
}

pub fn parse_config(content: &str, origin: &str) -> io::Result<AppConfig> {
  toml::from_str::<AppConfig>(content).map_err(|e| invalid(format!("failed to parse {}: {}", origin, e)))
}

fn read_config_file(path: &Path) -> io::Result<String> {
  fs::read_to_string(path)
    .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("cannot read config file {:?}: {}", path, e)))
}

/// Merge two tables key by key, the override wins
pub fn merge_tables(mut base: toml::Table, overlay: toml::Table) -> toml::Table {
  for (key, value) in overlay {
    let merged = match (base.remove(&key), value) {
      (Some(toml::Value::Table(inner)), toml::Value::Table(over)) => toml::Value::Table(merge_tables(inner, over)),
      (_, value) => value,
    };
    base.insert(key, merged);
  }
  base
}

/// Layer a user file over the defaults
pub fn merge_config(base: &str, overlay: &str, origin: &str) -> io::Result<AppConfig> {
  let merged = merge_tables(parse_table(base, "default.toml")?, parse_table(overlay, origin)?);
  AppConfig::deserialize(toml::Value::Table(merged)).map_err(|e| invalid(format!("invalid config {}: {}", origin, e)))
}

pub fn apply_cli_overrides(config: &mut AppConfig, cli: &CliOverrides) -> io::Result<()> {
  if cli.quiet {
    config.simulation.quiet = true;
  }
  if cli.step {
    config.simulation.step_mode = true;
  }
  if let Some(file) = &cli.trace_file {
    config.simulation.trace_file = file.clone();
  }
  if let Some(bits) = cli.data_width {
    config.bus.data_width = DataWidth::try_from(bits).map_err(invalid)?;
  }
  if let Some(bits) = cli.addr_width {
    config.bus.addr_width = bits;
  }
  if let Some(n) = cli.transactions {
    config.simulation.transactions = n;
  }
  if let Some(seed) = cli.seed {
    config.simulation.seed = seed;
  }
  Ok(())
}

pub fn validate_config(config: &AppConfig) -> io::Result<()> {
  // bits [3:2] select the register
  if !(4..=64).contains(&config.bus.addr_width) {
    return Err(invalid(format!(
      "addr_width must be between 4 and 64, got {}",
      config.bus.addr_width
    )));
  }

  let bp = &config.backpressure;
  for (name, p) in [
    ("aw_probability", bp.aw_probability),
    ("w_probability", bp.w_probability),
    ("ar_probability", bp.ar_probability),
  ] {
    if !(0.0..1.0).contains(&p) {
      return Err(invalid(format!("{} must be in [0, 1), got {}", name, p)));
    }
  }

  if config.simulation.max_cycles == 0 {
    return Err(invalid("max_cycles cannot be 0"));
  }

  Ok(())
}

/// Load and merge configuration
///
/// 1. built-in defaults
/// 2. optional user file layered on top
/// 3. CLI overrides
/// 4. validation
pub fn load_and_merge_configs(custom_config_path: Option<&Path>, cli: &CliOverrides) -> io::Result<AppConfig> {
  let mut config = match custom_config_path {
    Some(path) => merge_config(DEFAULT_CONFIG, &read_config_file(path)?, &path.display().to_string())?,
    None => load_default_config()?,
  };

  apply_cli_overrides(&mut config, cli)?;
  validate_config(&config)?;

  Ok(config)
}
