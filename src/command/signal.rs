use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::prelude::*;

/// Delivers a numeric signal to a process
pub trait SignalSender {
    fn deliver(&self, pid: i32, signal: i32) -> Result<()>;
}

/// Sends signals with `kill(2)`
#[derive(Debug, Default, Clone, Copy)]
pub struct KillSignal;

impl SignalSender for KillSignal {
    fn deliver(&self, pid: i32, signal: i32) -> Result<()> {
        // kill(2) addresses process groups for pids <= 0
        if pid <= 0 {
            bail!("Refusing to signal non-positive pid {pid}");
        }

        // Signal 0 only checks that the process exists and can be signaled
        let signal = match signal {
            0 => None,
            number => Some(Signal::try_from(number)?),
        };
        kill(Pid::from_raw(pid), signal)?;
        Ok(())
    }
}

/// Symbolic name of a signal number, e.g. `SIGTERM` for 15
pub fn signal_name(signal: i32) -> Option<&'static str> {
    Signal::try_from(signal).ok().map(Signal::as_str)
}
