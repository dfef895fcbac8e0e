pub mod arbiter;
pub mod master;
pub mod read_fsm;
pub mod write_fsm;

pub use arbiter::{Arbiter, Grant, ReadRequest, WriteRequest};
pub use master::{Completions, Master, UserPort};
pub use read_fsm::{ReadFsm, ReadState};
pub use write_fsm::{WriteFsm, WriteState};
