pub mod builtin;
pub mod config;
pub mod error;
pub mod harness;
pub mod master;
pub mod protocol;
pub mod simulator;
pub mod slave;
pub mod top;

pub use config::{BusConfig, DataWidth};
pub use error::{ProtocolViolation, SimError};
pub use top::Top;
