/// Global logging setup
use env_logger::Env;
use log::LevelFilter;

/// Install the logger. Quiet mode keeps only warnings and errors;
/// `RUST_LOG` takes precedence either way. Safe to call more than once.
pub fn init_log(quiet: bool) {
  let level = if quiet { LevelFilter::Warn } else { LevelFilter::Info };
  let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str()))
    .format_timestamp(None)
    .format_target(false)
    .try_init();
}
