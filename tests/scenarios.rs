use axilite::master::UserPort;
use axilite::protocol::ChannelId;
use axilite::top::{Top, READ_LATENCY, WRITE_LATENCY};
use axilite::BusConfig;

const MAX_CYCLES: u64 = 1_000;

fn top() -> Top {
  Top::new("top", BusConfig::default())
}

#[test]
fn write_survives_address_then_data_stall() {
  let mut top = top();
  top.backpressure.stall(ChannelId::Aw, 3);
  top.backpressure.stall(ChannelId::W, 4);

  let cycles = top.write(0x00, 0xDEAD_BEEF, MAX_CYCLES).unwrap();
  assert_eq!(cycles, WRITE_LATENCY + 3 + 4);
  assert_eq!(top.backpressure.stalled_cycles(), 7);
  assert_eq!(top.registers()[0], 0xDEAD_BEEF);

  assert_eq!(top.read(0x00, MAX_CYCLES).unwrap(), 0xDEAD_BEEF);
}

#[test]
fn read_survives_address_stall() {
  let mut top = top();
  assert_eq!(top.write(0x08, 0x1234_5678, MAX_CYCLES).unwrap(), WRITE_LATENCY);

  top.backpressure.stall(ChannelId::Ar, 2);
  let start = top.cycle();
  assert_eq!(top.read(0x08, MAX_CYCLES).unwrap(), 0x1234_5678);
  assert_eq!(top.cycle() - start, READ_LATENCY + 2);
}

#[test]
fn simultaneous_start_runs_write_then_read() {
  let mut top = top();
  top.issue(UserPort {
    start_write: true,
    start_read: true,
    addr: 0x04,
    wdata: 0xAAAA_5555,
  });

  let mut write_done_at = None;
  let mut read_done_at = None;
  while !top.idle() {
    top.tick().unwrap();
    if top.master.write_done() {
      write_done_at = Some(top.cycle());
    }
    if top.master.read_done() {
      read_done_at = Some(top.cycle());
    }
    // the parked read keeps the bus busy until its own completion
    assert_eq!(top.master.busy(), !top.master.read_done(), "cycle {}", top.cycle());
    assert!(top.cycle() < MAX_CYCLES);
  }

  // the read takes over on the write's completion edge
  assert_eq!(write_done_at, Some(WRITE_LATENCY));
  assert_eq!(read_done_at, Some(WRITE_LATENCY + READ_LATENCY - 1));
  assert_eq!(top.master.rdata(), 0xAAAA_5555);
  assert_eq!(top.master.arbiter().rejected(), 0);

  // nobody sampled the pulses through the held flags; they are still up
  assert!(top.master.acknowledge_write());
  assert_eq!(top.master.take_read(), Some(0xAAAA_5555));
}

#[test]
fn simultaneous_start_under_backpressure() {
  let mut top = top();
  top.backpressure.stall(ChannelId::Aw, 2);
  top.backpressure.stall(ChannelId::W, 5);
  top.backpressure.stall(ChannelId::Ar, 3);
  top.issue(UserPort {
    start_write: true,
    start_read: true,
    addr: 0x0C,
    wdata: 0x0BAD_F00D,
  });
  top.run_until_idle(MAX_CYCLES).unwrap();

  assert!(top.master.acknowledge_write());
  assert_eq!(top.master.take_read(), Some(0x0BAD_F00D));
  assert_eq!(top.registers()[3], 0x0BAD_F00D);
}

#[test]
fn start_while_busy_is_rejected() {
  let mut top = top();
  top.start_write(0x0, 1);
  top.tick().unwrap();
  assert!(top.master.write_busy());

  top.start_read(0x0);
  top.tick().unwrap();
  top.run_until_idle(MAX_CYCLES).unwrap();

  assert_eq!(top.master.arbiter().rejected(), 1);
  assert!(top.master.acknowledge_write());
  assert_eq!(top.master.take_read(), None);
  let reads = top
    .monitor()
    .history()
    .iter()
    .filter(|e| e.channel == ChannelId::Ar)
    .count();
  assert_eq!(reads, 0);
}
