/// Protocol checker and handshake recorder
use crate::builtin::Channel;
use crate::error::ProtocolViolation;
use crate::protocol::{AxiLiteBus, ChannelId, Resp};
use log::debug;
use serde::Serialize;
use std::fmt;

/// One committed transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HandshakeEvent {
  pub cycle: u64,
  pub channel: ChannelId,
  pub addr: Option<u64>,
  pub data: Option<u64>,
  pub resp: Option<Resp>,
}

impl HandshakeEvent {
  fn new(cycle: u64, channel: ChannelId) -> Self {
    Self {
      cycle,
      channel,
      addr: None,
      data: None,
      resp: None,
    }
  }
}

fn check<T>(channel: ChannelId, cycle: u64, prev: &Channel<T>, cur: &Channel<T>) -> Result<(), ProtocolViolation>
where
  T: Clone + PartialEq + fmt::Display,
{
  if !prev.stalled() {
    return Ok(());
  }
  if !cur.valid {
    return Err(ProtocolViolation::ValidWithdrawn { channel, cycle });
  }
  if cur.payload != prev.payload {
    return Err(ProtocolViolation::PayloadChanged {
      channel,
      cycle,
      before: prev.payload.to_string(),
      after: cur.payload.to_string(),
    });
  }
  Ok(())
}

/// Watches the bus once per cycle. A VALID that was waiting on the previous
/// cycle must still be up, with the same payload.
#[derive(Debug, Default)]
pub struct HandshakeMonitor {
  prev: Option<AxiLiteBus>,
  history: Vec<HandshakeEvent>,
}

impl HandshakeMonitor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn observe(&mut self, cycle: u64, bus: &AxiLiteBus) -> Result<Vec<HandshakeEvent>, ProtocolViolation> {
    if let Some(prev) = &self.prev {
      check(ChannelId::Aw, cycle, &prev.aw, &bus.aw)?;
      check(ChannelId::W, cycle, &prev.w, &bus.w)?;
      check(ChannelId::B, cycle, &prev.b, &bus.b)?;
      check(ChannelId::Ar, cycle, &prev.ar, &bus.ar)?;
      check(ChannelId::R, cycle, &prev.r, &bus.r)?;
    }
    self.prev = Some(bus.clone());

    let mut events = Vec::new();
    if bus.aw.fire() {
      events.push(HandshakeEvent {
        addr: Some(bus.aw.payload.addr),
        ..HandshakeEvent::new(cycle, ChannelId::Aw)
      });
    }
    if bus.w.fire() {
      events.push(HandshakeEvent {
        data: Some(bus.w.payload.data),
        ..HandshakeEvent::new(cycle, ChannelId::W)
      });
    }
    if bus.b.fire() {
      events.push(HandshakeEvent {
        resp: Some(bus.b.payload.resp),
        ..HandshakeEvent::new(cycle, ChannelId::B)
      });
    }
    if bus.ar.fire() {
      events.push(HandshakeEvent {
        addr: Some(bus.ar.payload.addr),
        ..HandshakeEvent::new(cycle, ChannelId::Ar)
      });
    }
    if bus.r.fire() {
      events.push(HandshakeEvent {
        data: Some(bus.r.payload.data),
        resp: Some(bus.r.payload.resp),
        ..HandshakeEvent::new(cycle, ChannelId::R)
      });
    }

    for event in &events {
      debug!("cycle {}: {} handshake {:?}", cycle, event.channel, event);
    }
    self.history.extend(events.iter().cloned());
    Ok(events)
  }

  /// At most one transaction may be in flight system-wide.
  pub fn check_pipelines(&self, cycle: u64, write_busy: bool, read_busy: bool) -> Result<(), ProtocolViolation> {
    if write_busy && read_busy {
      return Err(ProtocolViolation::ConcurrentPipelines { cycle });
    }
    Ok(())
  }

  pub fn history(&self) -> &[HandshakeEvent] {
    &self.history
  }

  pub fn clear_history(&mut self) {
    self.history.clear();
  }

  pub fn reset(&mut self) {
    self.prev = None;
    self.history.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::protocol::{AddrBeat, WriteBeat};

  fn aw(valid: bool, ready: bool, addr: u64) -> AxiLiteBus {
    AxiLiteBus {
      aw: Channel {
        valid,
        ready,
        payload: AddrBeat::new(addr),
      },
      ..AxiLiteBus::default()
    }
  }

  #[test]
  fn withdrawn_valid_is_reported() {
    let mut mon = HandshakeMonitor::new();
    mon.observe(0, &aw(true, false, 0x4)).unwrap();
    let err = mon.observe(1, &aw(false, false, 0x4)).unwrap_err();
    assert_eq!(err, ProtocolViolation::ValidWithdrawn { channel: ChannelId::Aw, cycle: 1 });
  }

  #[test]
  fn payload_change_while_stalled_is_reported() {
    let mut mon = HandshakeMonitor::new();
    let mut bus = AxiLiteBus::default();
    bus.w = Channel {
      valid: true,
      ready: false,
      payload: WriteBeat { data: 1, strb: 0xf },
    };
    mon.observe(3, &bus).unwrap();
    bus.w.payload.data = 2;
    let err = mon.observe(4, &bus).unwrap_err();
    assert!(matches!(err, ProtocolViolation::PayloadChanged { channel: ChannelId::W, cycle: 4, .. }));
  }

  #[test]
  fn valid_may_drop_after_handshake() {
    let mut mon = HandshakeMonitor::new();
    let events = mon.observe(0, &aw(true, true, 0x8)).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].addr, Some(0x8));
    assert!(mon.observe(1, &aw(false, false, 0)).unwrap().is_empty());
    assert_eq!(mon.history().len(), 1);
  }

  #[test]
  fn both_pipelines_busy_is_a_violation() {
    let mon = HandshakeMonitor::new();
    assert!(mon.check_pipelines(0, true, false).is_ok());
    assert_eq!(
      mon.check_pipelines(9, true, true),
      Err(ProtocolViolation::ConcurrentPipelines { cycle: 9 })
    );
  }
}
