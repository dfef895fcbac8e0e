use crate::protocol::ChannelId;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  Step(u32), // Step N times
  Write { addr: u64, data: u64 },
  Read { addr: u64 },
  WriteRead { addr: u64, data: u64 },
  Stall { channel: ChannelId, cycles: u32 },
  Regs,
  Continue,
  Quit,
}

pub const HELP: &str =
  "Enter: step, 'si N': step N, 'w ADDR DATA', 'r ADDR', 'wr ADDR DATA', 'stall aw|w|ar N', 'regs', 'c': run until idle, 'q': quit";

/// Hex with a 0x prefix, decimal otherwise
pub fn parse_number(text: &str) -> std::result::Result<u64, String> {
  let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
    Some(hex) => u64::from_str_radix(hex, 16),
    None => text.parse::<u64>(),
  };
  parsed.map_err(|e| format!("invalid number '{}': {}", text, e))
}

pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
  let mut words = line.split_whitespace();
  let Some(head) = words.next() else {
    return Ok(Command::Step(1));
  };
  let args: Vec<&str> = words.collect();

  let arg = |i: usize| -> std::result::Result<u64, String> {
    args
      .get(i)
      .ok_or_else(|| format!("'{}' expects {} argument(s)", head, i + 1))
      .and_then(|s| parse_number(s))
  };

  match head {
    "si" => {
      let n = arg(0)?;
      if n == 0 {
        return Err("step count must be greater than 0".to_string());
      }
      u32::try_from(n)
        .map(Command::Step)
        .map_err(|_| format!("step count too large: {}", n))
    },
    "w" => Ok(Command::Write {
      addr: arg(0)?,
      data: arg(1)?,
    }),
    "r" => Ok(Command::Read { addr: arg(0)? }),
    "wr" => Ok(Command::WriteRead {
      addr: arg(0)?,
      data: arg(1)?,
    }),
    "stall" => {
      let name = args.first().ok_or("'stall' expects a channel and a cycle count")?;
      let channel = ChannelId::parse(name).ok_or_else(|| format!("unknown channel '{}'", name))?;
      let cycles = u32::try_from(arg(1)?).map_err(|_| "stall too long".to_string())?;
      Ok(Command::Stall { channel, cycles })
    },
    "regs" => Ok(Command::Regs),
    "c" => Ok(Command::Continue),
    "q" => Ok(Command::Quit),
    other => Err(format!("Unknown command: '{}'. {}", other, HELP)),
  }
}

pub struct Shell {
  editor: DefaultEditor,
}

impl Shell {
  pub fn new() -> Result<Self> {
    let editor = DefaultEditor::new().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(Self { editor })
  }

  pub fn read_command(&mut self) -> Result<Command> {
    loop {
      match self.editor.readline("(axilite) ") {
        Ok(line) => {
          let trimmed = line.trim();
          if !trimmed.is_empty() {
            let _ = self.editor.add_history_entry(trimmed);
          }
          match parse_command(trimmed) {
            Ok(cmd) => return Ok(cmd),
            Err(msg) => eprintln!("Error: {}", msg),
          }
        },
        // Ctrl-C / Ctrl-D
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Command::Quit),
        Err(err) => return Err(io::Error::new(io::ErrorKind::Other, err)),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_line_steps_once() {
    assert_eq!(parse_command(""), Ok(Command::Step(1)));
    assert_eq!(parse_command("si 0x10"), Ok(Command::Step(16)));
    assert!(parse_command("si 0").is_err());
    assert!(parse_command("si").is_err());
  }

  #[test]
  fn transactions_parse_hex_and_decimal() {
    assert_eq!(
      parse_command("w 0x8 0xdeadbeef"),
      Ok(Command::Write {
        addr: 8,
        data: 0xdead_beef
      })
    );
    assert_eq!(parse_command("r 12"), Ok(Command::Read { addr: 12 }));
    assert_eq!(parse_command("wr 0 7"), Ok(Command::WriteRead { addr: 0, data: 7 }));
    assert!(parse_command("w 0x8").is_err());
    assert!(parse_command("r zz").is_err());
  }

  #[test]
  fn stall_needs_a_known_channel() {
    assert_eq!(
      parse_command("stall AR 3"),
      Ok(Command::Stall {
        channel: ChannelId::Ar,
        cycles: 3
      })
    );
    assert!(parse_command("stall xx 3").is_err());
    assert!(parse_command("stall").is_err());
  }

  #[test]
  fn unknown_command_is_reported() {
    assert!(parse_command("jump").unwrap_err().contains("Unknown command"));
    assert_eq!(parse_command("q"), Ok(Command::Quit));
    assert_eq!(parse_command("regs"), Ok(Command::Regs));
  }
}
