pub mod beat;
pub mod bus;

pub use beat::{AddrBeat, Prot, ReadBeat, Resp, WriteBeat, WriteResp};
pub use bus::{AxiLiteBus, ChannelId, MasterDrive, SlaveDrive, StallMask};
