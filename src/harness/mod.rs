pub mod backpressure;
pub mod monitor;

pub use backpressure::Backpressure;
pub use monitor::{HandshakeEvent, HandshakeMonitor};
