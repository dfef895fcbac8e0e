pub mod port;

pub use port::{Channel, Wire};

/// A clocked hardware block.
///
/// `run` evaluates one rising edge: it reads the input ports as they were
/// sampled at the start of the cycle and updates the block's registers.
/// Inputs are rewired by the owner between calls, never by the block itself.
pub trait Module {
  fn run(&mut self);

  fn reset(&mut self);

  fn name(&self) -> &str;
}
