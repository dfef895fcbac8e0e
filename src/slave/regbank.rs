/// Register bank behind the slave
use crate::config::DataWidth;

pub const REG_COUNT: usize = 4;

/// Returned for a select outside the bank. Unreachable with a two-bit select.
pub const UNMAPPED_READ: u64 = 0;

/// Selects one of the four registers from address bits [3:2].
pub fn select(addr: u64) -> usize {
  ((addr >> 2) & 0b11) as usize
}

#[derive(Clone, Debug)]
pub struct RegisterBank {
  words: [u64; REG_COUNT],
  width: DataWidth,
}

impl RegisterBank {
  pub fn new(width: DataWidth) -> Self {
    Self {
      words: [0; REG_COUNT],
      width,
    }
  }

  pub fn read(&self, addr: u64) -> u64 {
    self.words.get(select(addr)).copied().unwrap_or(UNMAPPED_READ)
  }

  pub fn write(&mut self, addr: u64, data: u64) {
    let width = self.width;
    if let Some(word) = self.words.get_mut(select(addr)) {
      *word = width.mask(data);
    }
  }

  pub fn words(&self) -> [u64; REG_COUNT] {
    self.words
  }

  pub fn reset(&mut self) {
    self.words = [0; REG_COUNT];
  }
}
