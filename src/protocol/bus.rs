/// The five-channel bus between master and slave
use super::beat::{AddrBeat, ReadBeat, WriteBeat, WriteResp};
use crate::builtin::{Channel, Wire};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChannelId {
  Aw,
  W,
  B,
  Ar,
  R,
}

impl ChannelId {
  pub const ALL: [ChannelId; 5] = [ChannelId::Aw, ChannelId::W, ChannelId::B, ChannelId::Ar, ChannelId::R];

  pub fn parse(name: &str) -> Option<Self> {
    match name.to_lowercase().as_str() {
      "aw" => Some(ChannelId::Aw),
      "w" => Some(ChannelId::W),
      "b" => Some(ChannelId::B),
      "ar" => Some(ChannelId::Ar),
      "r" => Some(ChannelId::R),
      _ => None,
    }
  }
}

impl fmt::Display for ChannelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ChannelId::Aw => "AW",
      ChannelId::W => "W",
      ChannelId::B => "B",
      ChannelId::Ar => "AR",
      ChannelId::R => "R",
    };
    f.pad(name)
  }
}

/// Registered outputs of the master.
#[derive(Clone, Debug, Default)]
pub struct MasterDrive {
  pub aw: Wire<AddrBeat>,
  pub w: Wire<WriteBeat>,
  pub b_ready: bool,
  pub ar: Wire<AddrBeat>,
  pub r_ready: bool,
}

/// Registered outputs of the slave.
#[derive(Clone, Debug, Default)]
pub struct SlaveDrive {
  pub aw_ready: bool,
  pub w_ready: bool,
  pub b: Wire<WriteResp>,
  pub ar_ready: bool,
  pub r: Wire<ReadBeat>,
}

/// READY lines forced low by the harness this cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StallMask {
  pub aw: bool,
  pub w: bool,
  pub ar: bool,
}

impl StallMask {
  pub fn none() -> Self {
    Self::default()
  }

  pub fn any(&self) -> bool {
    self.aw || self.w || self.ar
  }
}

/// Every channel as both ends observe it during one cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AxiLiteBus {
  pub aw: Channel<AddrBeat>,
  pub w: Channel<WriteBeat>,
  pub b: Channel<WriteResp>,
  pub ar: Channel<AddrBeat>,
  pub r: Channel<ReadBeat>,
}

impl AxiLiteBus {
  /// Wires the two sides together. A stalled READY is low for both ends,
  /// so master and slave always agree on which handshakes fire.
  pub fn compose(master: &MasterDrive, slave: &SlaveDrive, stall: StallMask) -> Self {
    Self {
      aw: Channel::join(&master.aw, slave.aw_ready && !stall.aw),
      w: Channel::join(&master.w, slave.w_ready && !stall.w),
      b: Channel::join(&slave.b, master.b_ready),
      ar: Channel::join(&master.ar, slave.ar_ready && !stall.ar),
      r: Channel::join(&slave.r, master.r_ready),
    }
  }

  pub fn valid(&self, id: ChannelId) -> bool {
    match id {
      ChannelId::Aw => self.aw.valid,
      ChannelId::W => self.w.valid,
      ChannelId::B => self.b.valid,
      ChannelId::Ar => self.ar.valid,
      ChannelId::R => self.r.valid,
    }
  }

  pub fn fired(&self, id: ChannelId) -> bool {
    match id {
      ChannelId::Aw => self.aw.fire(),
      ChannelId::W => self.w.fire(),
      ChannelId::B => self.b.fire(),
      ChannelId::Ar => self.ar.fire(),
      ChannelId::R => self.r.fire(),
    }
  }

  pub fn idle(&self) -> bool {
    ChannelId::ALL.iter().all(|&id| !self.valid(id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stall_masks_ready_for_both_ends() {
    let mut master = MasterDrive::default();
    master.aw.set(AddrBeat::new(0x8));
    let slave = SlaveDrive {
      aw_ready: true,
      ..SlaveDrive::default()
    };

    let stalled = AxiLiteBus::compose(&master, &slave, StallMask { aw: true, ..StallMask::none() });
    assert!(stalled.aw.stalled());
    assert!(!stalled.fired(ChannelId::Aw));

    let open = AxiLiteBus::compose(&master, &slave, StallMask::none());
    assert!(open.fired(ChannelId::Aw));
    assert_eq!(open.aw.payload.addr, 0x8);
  }

  #[test]
  fn stall_does_not_touch_response_channels() {
    let master = MasterDrive {
      b_ready: true,
      r_ready: true,
      ..MasterDrive::default()
    };
    let mut slave = SlaveDrive::default();
    slave.b.set(WriteResp::default());
    let all = StallMask { aw: true, w: true, ar: true };
    let bus = AxiLiteBus::compose(&master, &slave, all);
    assert!(bus.b.fire());
    assert!(!bus.idle());
  }

  #[test]
  fn channel_names_round_trip() {
    for id in ChannelId::ALL {
      assert_eq!(ChannelId::parse(&id.to_string()), Some(id));
    }
    assert_eq!(ChannelId::parse("x"), None);
  }
}
