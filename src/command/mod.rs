//! Operator commands: `<pid> <signal>` integer pairs validated against the current snapshot.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crate::prelude::*;
use crate::table::SharedTable;

mod input;
mod signal;

pub use input::spawn_input_reader;
pub use signal::{KillSignal, SignalSender, signal_name};

pub const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub pid: i32,
    pub signal: i32,
}

/// Pairs up whitespace separated integers from the input stream.
///
/// A pair may span lines and a line may hold several pairs. A token that is not an
/// integer is discarded together with any half-read pair.
#[derive(Debug, Default)]
pub struct CommandTokens {
    pending_pid: Option<i32>,
}

impl CommandTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line of input, returning the commands it completes
    pub fn feed(&mut self, line: &str) -> Vec<Command> {
        let mut commands = Vec::new();
        for token in line.split_whitespace() {
            let Ok(number) = token.parse::<i32>() else {
                trace!("Discarding malformed command token {token:?}");
                self.pending_pid = None;
                continue;
            };
            match self.pending_pid.take() {
                Some(pid) => commands.push(Command {
                    pid,
                    signal: number,
                }),
                None => self.pending_pid = Some(number),
            }
        }
        commands
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The pid is not part of the current snapshot, nothing was sent
    NotFound { pid: i32 },
    Delivered { pid: i32, signal: i32 },
    Failed { pid: i32, signal: i32, cause: String },
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::NotFound { pid } => write!(f, "PID {pid} not found in table."),
            CommandOutcome::Delivered { pid, signal } => match signal_name(*signal) {
                Some(name) => write!(f, "Signal {signal} ({name}) sent to process {pid}"),
                None => write!(f, "Signal {signal} sent to process {pid}"),
            },
            CommandOutcome::Failed { pid, signal, cause } => {
                write!(f, "Failed to send signal {signal} to process {pid}: {cause}")
            }
        }
    }
}

pub struct CommandLoop<D> {
    table: SharedTable,
    sender: D,
    throttle: Duration,
}

impl<D: SignalSender> CommandLoop<D> {
    pub fn new(table: SharedTable, sender: D, throttle: Duration) -> Self {
        Self {
            table,
            sender,
            throttle,
        }
    }

    /// Validate the target against the current snapshot, then deliver.
    ///
    /// Finding the pid is advisory: the snapshot may be up to one refresh old, so the
    /// delivery result decides the outcome.
    pub fn execute(&self, command: Command) -> CommandOutcome {
        let Command { pid, signal } = command;

        if !self.table.snapshot().contains(pid) {
            return CommandOutcome::NotFound { pid };
        }

        match self.sender.deliver(pid, signal) {
            Ok(()) => CommandOutcome::Delivered { pid, signal },
            Err(e) => CommandOutcome::Failed {
                pid,
                signal,
                cause: format!("{e:#}"),
            },
        }
    }

    /// Prompt, read and execute commands until the input closes or `cancel` fires
    pub async fn run<W: Write>(
        &self,
        mut lines: UnboundedReceiver<String>,
        mut out: W,
        cancel: CancellationToken,
    ) {
        let mut tokens = CommandTokens::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.throttle) => {}
            }

            emit(&mut out, format_args!("{PROMPT}"));

            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                line = lines.recv() => line,
            };
            let Some(line) = line else {
                debug!("Command input closed, no more signals will be sent");
                break;
            };

            for command in tokens.feed(&line) {
                let outcome = self.execute(command);
                debug!("{outcome}");
                emit(&mut out, format_args!("{outcome}\n"));
            }
        }
    }
}

/// Output failures are logged, they never stop the loop
fn emit<W: Write>(out: &mut W, message: fmt::Arguments<'_>) {
    if let Err(e) = out.write_fmt(message).and_then(|_| out.flush()) {
        warn!("Failed to write command output: {e}");
    }
}
