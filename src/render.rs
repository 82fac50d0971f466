use std::io::Write;

use crate::prelude::*;
use crate::process::ProcessRecord;
use crate::table::ProcessTable;

/// Moves the cursor home and clears the screen
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[J";

const HEADER: &str = "PID\t| User\t\t| PROCNAME\t\t| State";
const SEPARATOR: &str = "----\t| --------\t| ------------------\t| ------";

fn format_record(record: &ProcessRecord) -> String {
    format!(
        "{}\t| {:<8}\t| {:<16}\t| {}",
        record.pid, record.owner, record.name, record.state
    )
}

/// Format the header and one line per record, without the screen clear
pub fn format_table(table: &ProcessTable) -> String {
    let mut output = format!("{HEADER}\n{SEPARATOR}\n");
    for record in table.iter() {
        output.push_str(&format_record(record));
        output.push('\n');
    }
    output
}

pub struct Renderer<W> {
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Clear the display and draw `table`
    pub fn render(&mut self, table: &ProcessTable) -> Result<()> {
        self.out
            .write_all(CLEAR_SCREEN.as_bytes())
            .context("Failed to clear the display")?;
        self.out
            .write_all(format_table(table).as_bytes())
            .context("Failed to write the process table")?;
        self.out.flush().context("Failed to flush the display")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
