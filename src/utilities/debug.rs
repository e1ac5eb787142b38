use std::fmt::{self, Write as _};
use std::io::{self, stdout, Stdout, Write};

use crossterm::{cursor, terminal, ExecutableCommand, Result};

use shared_resources::status_message::StatusMessage;

/// Redraws the dispatcher status as a table in place on the terminal.
pub struct Debug {
    stdout: Stdout,
    lines_drawn: u16,
}

impl Debug {
    pub fn new() -> Self {
        Debug {
            stdout: stdout(),
            lines_drawn: 0,
        }
    }

    pub fn printstatus(&mut self, status: &StatusMessage) -> Result<()> {
        if self.lines_drawn > 0 {
            self.stdout.execute(cursor::MoveUp(self.lines_drawn))?;
        }
        self.stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

        let table = table(status).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.stdout.write_all(table.as_bytes())?;
        self.stdout.flush()?;
        self.lines_drawn = u16::try_from(table.lines().count()).unwrap_or(u16::MAX);
        Ok(())
    }
}

impl Default for Debug {
    fn default() -> Self {
        Self::new()
    }
}

fn mark(set: bool) -> &'static str {
    if set { "x" } else { "" }
}

// Highest floor first, the way the shaft looks.
fn table(status: &StatusMessage) -> std::result::Result<String, fmt::Error> {
    const RULE: &str = "+------------+------------+------------+------------+";
    let mut out = String::new();

    writeln!(out, "{}", RULE)?;
    writeln!(out, "| {0:<10} | {1:<10} | {2:<10} | {3:<10} |", "FLOOR", "UP", "DOWN", "CAR")?;
    for floor in status.floors().rev() {
        let (up, down) = status.requests_at(floor);
        writeln!(out, "{}", RULE)?;
        writeln!(
            out,
            "| {0:<10} | {1:<10} | {2:<10} | {3:<10} |",
            floor,
            mark(up),
            mark(down),
            mark(status.floor == Some(floor)),
        )?;
    }
    writeln!(out, "{}", RULE)?;

    writeln!(out, "+------------+------------+")?;
    writeln!(out, "| {0:<10} | {1:<10} |", "DIRECTION", status.direction.as_str())?;
    writeln!(out, "+------------+------------+")?;
    if let Some(error) = &status.tick_error {
        writeln!(out, "LAST TICK FAILED: {}", error)?;
    }
    Ok(out)
}
