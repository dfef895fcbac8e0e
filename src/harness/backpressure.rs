/// READY stall injection on the AW, W and AR channels
use crate::protocol::{AxiLiteBus, ChannelId, StallMask};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_STALL_PROBABILITY: f64 = 0.95;

#[derive(Clone, Copy, Debug, Default)]
struct ChannelStall {
  // cycles still to withhold from a waiting VALID
  remaining: u32,
  probability: f64,
}

impl ChannelStall {
  fn sample(&self, rng: &mut StdRng) -> bool {
    self.remaining > 0 || (self.probability > 0.0 && rng.gen_bool(self.probability))
  }

  fn consume(&mut self) {
    self.remaining = self.remaining.saturating_sub(1);
  }
}

/// Forces READY low on the three request channels, independently of the
/// slave's own readiness.
///
/// A fixed stall of `n` cycles withholds READY for the next `n` cycles in
/// which the channel's VALID is asserted, so a stall armed ahead of time
/// lands on the transaction that eventually uses the channel. Random stalls
/// are drawn every cycle from a seeded generator.
#[derive(Debug)]
pub struct Backpressure {
  aw: ChannelStall,
  w: ChannelStall,
  ar: ChannelStall,
  seed: u64,
  rng: StdRng,
  mask: StallMask,
  stalled_cycles: u64,
}

impl Backpressure {
  pub fn new(seed: u64) -> Self {
    Self {
      aw: ChannelStall::default(),
      w: ChannelStall::default(),
      ar: ChannelStall::default(),
      seed,
      rng: StdRng::seed_from_u64(seed),
      mask: StallMask::none(),
      stalled_cycles: 0,
    }
  }

  fn channel_mut(&mut self, channel: ChannelId) -> Option<&mut ChannelStall> {
    match channel {
      ChannelId::Aw => Some(&mut self.aw),
      ChannelId::W => Some(&mut self.w),
      ChannelId::Ar => Some(&mut self.ar),
      ChannelId::B | ChannelId::R => None,
    }
  }

  /// Withholds READY for `cycles` more waiting cycles. Returns false for the
  /// response channels, whose READY belongs to the master.
  pub fn stall(&mut self, channel: ChannelId, cycles: u32) -> bool {
    match self.channel_mut(channel) {
      Some(state) => {
        state.remaining = state.remaining.saturating_add(cycles);
        debug!("backpressure: {} stalled for {} cycles", channel, cycles);
        true
      },
      None => {
        warn!("backpressure: {} is not a stallable channel", channel);
        false
      },
    }
  }

  /// Withholds READY with the given per-cycle probability, clamped below 1
  /// so the channel is never stalled forever.
  pub fn set_random(&mut self, channel: ChannelId, probability: f64) -> bool {
    let probability = probability.clamp(0.0, MAX_STALL_PROBABILITY);
    match self.channel_mut(channel) {
      Some(state) => {
        state.probability = probability;
        true
      },
      None => false,
    }
  }

  /// Decides this cycle's mask.
  pub fn sample(&mut self) -> StallMask {
    self.mask = StallMask {
      aw: self.aw.sample(&mut self.rng),
      w: self.w.sample(&mut self.rng),
      ar: self.ar.sample(&mut self.rng),
    };
    self.mask
  }

  /// Consumes fixed stall cycles that a waiting VALID actually saw.
  pub fn advance(&mut self, bus: &AxiLiteBus) {
    if self.mask.aw && bus.aw.valid {
      self.aw.consume();
      self.stalled_cycles += 1;
    }
    if self.mask.w && bus.w.valid {
      self.w.consume();
      self.stalled_cycles += 1;
    }
    if self.mask.ar && bus.ar.valid {
      self.ar.consume();
      self.stalled_cycles += 1;
    }
  }

  pub fn remaining(&self, channel: ChannelId) -> u32 {
    match channel {
      ChannelId::Aw => self.aw.remaining,
      ChannelId::W => self.w.remaining,
      ChannelId::Ar => self.ar.remaining,
      ChannelId::B | ChannelId::R => 0,
    }
  }

  /// Channel-cycles in which a VALID was held against a forced-low READY.
  pub fn stalled_cycles(&self) -> u64 {
    self.stalled_cycles
  }

  /// Drops pending fixed stalls and restarts the random sequence from the
  /// seed. Random probabilities are configuration and stay in place.
  pub fn reset(&mut self) {
    let (aw, w, ar) = (self.aw.probability, self.w.probability, self.ar.probability);
    *self = Self::new(self.seed);
    self.aw.probability = aw;
    self.w.probability = w;
    self.ar.probability = ar;
  }
}

impl Default for Backpressure {
  fn default() -> Self {
    Self::new(0)
  }
}
