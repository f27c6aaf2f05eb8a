//! Caller side of the transport: start the companion process, send one
//! request, wait a bounded time for its response.

use std::io;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use packet_core::{Envelope, Response};
use packet_logging::{packet_debug, packet_warn};
use thiserror::Error;

use crate::frame::{FrameCodec, FrameError};

/// How long a caller waits for the host before giving up.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to native host {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to send request: {0}")]
    Send(#[source] FrameError),
    #[error("failed to read response: {0}")]
    Receive(#[source] FrameError),
    #[error("native host disconnected without responding")]
    Disconnected,
    #[error("native host response timeout ({} seconds)", .0.as_secs())]
    Timeout(Duration),
    #[error("invalid response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("response is for request {actual:?}, expected {expected:?}")]
    MismatchedRequestId { expected: String, actual: String },
}

/// Spawns the host executable for each call, the way a browser does.
#[derive(Debug, Clone)]
pub struct HostClient {
    program: PathBuf,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    timeout: Duration,
}

impl HostClient {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            timeout: RESPONSE_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `envelope` and returns the host's response.
    ///
    /// On timeout the child is killed and the call fails; nothing further is
    /// awaited from it.
    pub fn call(&self, envelope: &Envelope) -> Result<Response, ClientError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        let result = self.exchange(&mut child, envelope);
        if result.is_err() {
            let _ = child.kill();
        }
        let _ = child.wait();

        let response = result?;
        if response.request_id != envelope.request_id {
            return Err(ClientError::MismatchedRequestId {
                expected: envelope.request_id.clone(),
                actual: response.request_id,
            });
        }
        Ok(response)
    }

    fn exchange(&self, child: &mut Child, envelope: &Envelope) -> Result<Response, ClientError> {
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(self.spawn_error(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child stdio was not captured",
            )));
        };

        // The timeout covers the write too: a host that stops reading can
        // block a large request on a full pipe.
        let codec = FrameCodec::default();
        let request = envelope.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(round_trip(codec, stdin, stdout, &request));
        });
        packet_debug!("Sending {:?} request {}", envelope.request.kind(), envelope.request_id);

        let outcome = rx.recv_timeout(self.timeout);

        match outcome {
            Ok(Ok(Some(text))) => {
                serde_json::from_str(&text).map_err(ClientError::InvalidResponse)
            }
            Ok(Ok(None)) | Err(RecvTimeoutError::Disconnected) => Err(ClientError::Disconnected),
            Ok(Err(err)) => Err(err),
            Err(RecvTimeoutError::Timeout) => {
                packet_warn!(
                    "No response to request {} within {:?}",
                    envelope.request_id,
                    self.timeout
                );
                Err(ClientError::Timeout(self.timeout))
            }
        }
    }

    fn spawn_error(&self, source: io::Error) -> ClientError {
        ClientError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

/// Writes one request frame, closes stdin and reads one response frame.
///
/// Closing stdin ends the host's session once it has answered.
fn round_trip(
    codec: FrameCodec,
    mut stdin: ChildStdin,
    mut stdout: ChildStdout,
    request: &Envelope,
) -> Result<Option<String>, ClientError> {
    codec
        .write_message(&mut stdin, request)
        .map_err(ClientError::Send)?;
    drop(stdin);
    codec.read_message(&mut stdout).map_err(ClientError::Receive)
}
