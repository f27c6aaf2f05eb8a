use std::fmt;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};

use packet_core::{advance, HostState, LoopEvent};
use packet_logging::{append_error_log, packet_debug, packet_error, packet_info, packet_warn};

use crate::dispatch::Dispatcher;
use crate::frame::FrameCodec;

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The peer closed the stream between messages.
    StreamClosed,
    /// A message could not be framed (bad length, truncated body, read error).
    FramingFailed(String),
    /// A response could not be written back.
    WriteFailed(String),
    /// The loop body panicked outside any handler.
    Panicked(String),
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StreamClosed => write!(f, "stream closed"),
            ExitReason::FramingFailed(reason) => write!(f, "framing failed: {reason}"),
            ExitReason::WriteFailed(reason) => write!(f, "write failed: {reason}"),
            ExitReason::Panicked(reason) => write!(f, "panicked: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub handled: usize,
    pub exit: ExitReason,
}

/// The companion process's read-dispatch-write loop.
pub struct Host {
    dispatcher: Dispatcher,
    codec: FrameCodec,
}

impl Host {
    pub fn new(dispatcher: Dispatcher, codec: FrameCodec) -> Self {
        Self { dispatcher, codec }
    }

    /// Serves requests one at a time until the stream ends or breaks.
    ///
    /// Each response is written and flushed before the next message is read.
    /// Every exit other than a clean close is appended to the error log.
    pub fn run<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> SessionSummary {
        let mut handled = 0;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.serve(reader, writer, &mut handled)
        }));
        let exit = result.unwrap_or_else(|panic| {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ExitReason::Panicked(detail)
        });

        match &exit {
            ExitReason::StreamClosed => {
                packet_info!("Peer closed the stream after {} request(s)", handled);
            }
            other => {
                packet_error!("Host loop stopped after {} request(s): {}", handled, other);
                append_error_log(
                    self.dispatcher.error_log(),
                    &format!("host loop stopped: {other}"),
                );
            }
        }
        SessionSummary { handled, exit }
    }

    fn serve<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        handled: &mut usize,
    ) -> ExitReason {
        let mut state = HostState::Idle;
        loop {
            let message = match self.codec.read_message(reader) {
                Ok(Some(message)) => message,
                Ok(None) => {
                    state = advance(state, LoopEvent::StreamClosed);
                    debug_assert!(state.is_terminated());
                    return ExitReason::StreamClosed;
                }
                Err(err) => {
                    packet_warn!("Dropping session: {}", err);
                    state = advance(state, LoopEvent::StreamClosed);
                    debug_assert!(state.is_terminated());
                    return ExitReason::FramingFailed(err.to_string());
                }
            };
            state = advance(state, LoopEvent::MessageReceived);
            packet_debug!("Received {} byte message", message.len());

            let response = self.dispatcher.handle_message(&message);
            if let Err(err) = self.codec.write_message(writer, &response) {
                state = advance(state, LoopEvent::Fault);
                debug_assert!(state.is_terminated());
                return ExitReason::WriteFailed(err.to_string());
            }
            state = advance(state, LoopEvent::ResponseWritten);
            *handled += 1;
        }
    }
}
