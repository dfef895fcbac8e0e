use crate::protocol::ChannelId;
use thiserror::Error;

/// A collaborator broke the VALID/READY contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
  #[error("cycle {cycle}: {channel} VALID withdrawn before handshake")]
  ValidWithdrawn { channel: ChannelId, cycle: u64 },

  #[error("cycle {cycle}: {channel} payload changed while stalled ({before} -> {after})")]
  PayloadChanged {
    channel: ChannelId,
    cycle: u64,
    before: String,
    after: String,
  },

  #[error("cycle {cycle}: write and read pipelines both in flight")]
  ConcurrentPipelines { cycle: u64 },
}

#[derive(Debug, Error)]
pub enum SimError {
  #[error(transparent)]
  Violation(#[from] ProtocolViolation),

  #[error("bus still busy after {cycles} cycles")]
  Timeout { cycles: u64 },

  #[error("read of {addr:#x} returned {actual:#x}, expected {expected:#x}")]
  Mismatch { addr: u64, expected: u64, actual: u64 },

  #[error("trace output failed: {0}")]
  Io(#[from] std::io::Error),
}
