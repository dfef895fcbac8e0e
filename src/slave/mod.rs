pub mod read_port;
pub mod regbank;
pub mod slave;
pub mod write_port;

pub use read_port::{ReadPort, ReadStage};
pub use regbank::RegisterBank;
pub use slave::Slave;
pub use write_port::WritePort;
