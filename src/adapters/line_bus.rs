//! Line-oriented message bus adapter.
//!
//! The hub link is a serial stream of `<topic> <payload>\n` lines in both
//! directions.  [`LineBus`] implements the outbound [`MessageBus`] port on
//! any `std::io::Write`; [`spawn_line_reader`] pumps inbound lines from any
//! `BufRead` into a channel that the main loop drains between polls, so the
//! driver is only ever touched from one context.

use std::io::{BufRead, ErrorKind, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::app::ports::MessageBus;
use crate::error::BusError;

/// Longest line (without newline) the hub accepts.
pub const MAX_LINE_LEN: usize = 64;

/// Adapter that writes every outbound message as one line.
pub struct LineBus<W> {
    out: W,
}

impl<W: Write> LineBus<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> MessageBus for LineBus<W> {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BusError> {
        if topic.len() + 1 + payload.len() > MAX_LINE_LEN {
            return Err(BusError::TooLong);
        }
        debug!("BUS | {} {}", topic, payload);
        writeln!(self.out, "{} {}", topic, payload).map_err(|_| BusError::Disconnected)?;
        self.out.flush().map_err(|_| BusError::Disconnected)
    }
}

/// Pause before retrying a read that found nothing to return yet.
const IDLE_RETRY: Duration = Duration::from_millis(10);

/// Read lines on a background thread and forward the non-blank ones.
///
/// A read that would block or was interrupted is retried; a partial line
/// is kept until its newline arrives.  The thread ends at EOF, on any
/// other read error, or once the receiver is dropped.
pub fn spawn_line_reader<R>(mut reader: R) -> std::io::Result<Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new().name("bus-rx".into()).spawn(move || {
        let mut line = String::new();
        loop {
            match reader.read_line(&mut line) {
                Ok(0) => {
                    forward(&tx, &line);
                    debug!("bus-rx: end of stream");
                    break;
                }
                Ok(_) if !line.ends_with('\n') => {}
                Ok(_) => {
                    if !forward(&tx, &line) {
                        break;
                    }
                    line.clear();
                }
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                    thread::sleep(IDLE_RETRY);
                }
                Err(e) => {
                    warn!("bus-rx: read failed: {}", e);
                    break;
                }
            }
        }
    })?;
    Ok(rx)
}

/// Send `raw` trimmed unless blank.  `false` once the receiver is gone.
fn forward(tx: &Sender<String>, raw: &str) -> bool {
    let line = raw.trim();
    line.is_empty() || tx.send(line.to_string()).is_ok()
}
