/// JSON-lines handshake trace
use crate::harness::HandshakeEvent;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;

pub struct TraceWriter<W: Write = BufWriter<File>> {
  out: W,
  written: u64,
}

impl TraceWriter {
  pub fn create(path: &Path) -> Result<Self> {
    Ok(Self::new(BufWriter::new(File::create(path)?)))
  }
}

impl<W: Write> TraceWriter<W> {
  pub fn new(out: W) -> Self {
    Self { out, written: 0 }
  }

  /// One JSON object per handshake.
  pub fn record(&mut self, events: &[HandshakeEvent]) -> Result<()> {
    for event in events {
      serde_json::to_writer(&mut self.out, event)?;
      writeln!(self.out)?;
      self.written += 1;
    }
    Ok(())
  }

  pub fn written(&self) -> u64 {
    self.written
  }

  pub fn flush(&mut self) -> Result<()> {
    self.out.flush()
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}
