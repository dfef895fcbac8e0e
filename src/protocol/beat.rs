/// Payloads carried by the five channels
use serde::Serialize;
use std::fmt;

/// Two-bit response status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Resp {
  #[default]
  Okay,
  ExOkay,
  SlvErr,
  DecErr,
}

impl Resp {
  pub fn bits(self) -> u8 {
    match self {
      Resp::Okay => 0b00,
      Resp::ExOkay => 0b01,
      Resp::SlvErr => 0b10,
      Resp::DecErr => 0b11,
    }
  }
}

/// Three-bit protection qualifier. Always driven as 0 here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Prot(pub u8);

impl Prot {
  pub const UNPRIVILEGED_SECURE_DATA: Prot = Prot(0);
}

/// AW and AR payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddrBeat {
  pub addr: u64,
  pub prot: Prot,
}

impl AddrBeat {
  pub fn new(addr: u64) -> Self {
    Self {
      addr,
      prot: Prot::UNPRIVILEGED_SECURE_DATA,
    }
  }
}

/// W payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteBeat {
  pub data: u64,
  pub strb: u8,
}

/// B payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteResp {
  pub resp: Resp,
}

/// R payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadBeat {
  pub data: u64,
  pub resp: Resp,
}

impl fmt::Display for AddrBeat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "addr={:#x} prot={}", self.addr, self.prot.0)
  }
}

impl fmt::Display for WriteBeat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "data={:#x} strb={:#x}", self.data, self.strb)
  }
}

impl fmt::Display for WriteResp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "resp={:?}", self.resp)
  }
}

impl fmt::Display for ReadBeat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "data={:#x} resp={:?}", self.data, self.resp)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resp_encoding() {
    assert_eq!(Resp::Okay.bits(), 0);
    assert_eq!(Resp::DecErr.bits(), 3);
    assert_eq!(Resp::default(), Resp::Okay);
  }
}
