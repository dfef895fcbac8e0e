/// Bus configuration parameters
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the data lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DataWidth {
  W32,
  W64,
}

impl DataWidth {
  pub fn bits(self) -> u32 {
    match self {
      DataWidth::W32 => 32,
      DataWidth::W64 => 64,
    }
  }

  /// Truncates a value to the data lines.
  pub fn mask(self, value: u64) -> u64 {
    match self {
      DataWidth::W32 => value & u64::from(u32::MAX),
      DataWidth::W64 => value,
    }
  }

  /// Byte-enable mask with every lane set.
  pub fn full_strobe(self) -> u8 {
    match self {
      DataWidth::W32 => 0x0f,
      DataWidth::W64 => 0xff,
    }
  }
}

impl TryFrom<u32> for DataWidth {
  type Error = String;

  fn try_from(bits: u32) -> Result<Self, Self::Error> {
    match bits {
      32 => Ok(DataWidth::W32),
      64 => Ok(DataWidth::W64),
      other => Err(format!("unsupported data width: {}", other)),
    }
  }
}

impl From<DataWidth> for u32 {
  fn from(width: DataWidth) -> u32 {
    width.bits()
  }
}

impl fmt::Display for DataWidth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.bits())
  }
}

/// Widths shared by master and slave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
  #[serde(default = "default_data_width")]
  pub data_width: DataWidth,
  #[serde(default = "default_addr_width")]
  pub addr_width: u32,
}

fn default_data_width() -> DataWidth {
  DataWidth::W32
}

fn default_addr_width() -> u32 {
  32
}

impl BusConfig {
  pub fn new() -> Self {
    Self {
      data_width: default_data_width(),
      addr_width: default_addr_width(),
    }
  }

  pub fn with_widths(data_width: DataWidth, addr_width: u32) -> Self {
    Self { data_width, addr_width }
  }

  /// Truncates an address to the address lines.
  pub fn mask_addr(&self, addr: u64) -> u64 {
    if self.addr_width >= 64 {
      addr
    } else {
      addr & ((1u64 << self.addr_width) - 1)
    }
  }

  pub fn mask_data(&self, data: u64) -> u64 {
    self.data_width.mask(data)
  }
}

impl Default for BusConfig {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn data_width_from_bits() {
    assert_eq!(DataWidth::try_from(32), Ok(DataWidth::W32));
    assert_eq!(DataWidth::try_from(64), Ok(DataWidth::W64));
    assert!(DataWidth::try_from(16).is_err());
  }

  #[test]
  fn masks_follow_widths() {
    let narrow = BusConfig::with_widths(DataWidth::W32, 16);
    assert_eq!(narrow.mask_data(0x1_2345_6789), 0x2345_6789);
    assert_eq!(narrow.mask_addr(0xabcd_0008), 0x0008);

    let wide = BusConfig::with_widths(DataWidth::W64, 64);
    assert_eq!(wide.mask_data(u64::MAX), u64::MAX);
    assert_eq!(wide.mask_addr(u64::MAX), u64::MAX);
    assert_eq!(wide.data_width.full_strobe(), 0xff);
  }
}
