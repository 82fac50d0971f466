use std::io::{BufRead, ErrorKind};
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::prelude::*;

/// Read lines from `reader` on a dedicated thread.
///
/// The blocking read stays off the runtime, so the command loop can be cancelled while
/// no input is pending. The channel closes at end of input.
pub fn spawn_input_reader<R>(reader: R) -> Result<UnboundedReceiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    thread::Builder::new()
        .name("proctop-input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::InvalidData => {
                        trace!("Discarding non UTF-8 input: {e}");
                    }
                    Err(e) => {
                        warn!("Failed to read command input: {e}");
                        break;
                    }
                }
            }
            debug!("Command input closed");
        })
        .context("Failed to spawn the input reader thread")?;

    Ok(rx)
}
