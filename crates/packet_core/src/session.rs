/// Lifecycle of the companion process's read-dispatch-write loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostState {
    /// Waiting for the next framed message.
    #[default]
    Idle,
    /// One request is in flight; nothing else is read until its response is written.
    Processing,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    MessageReceived,
    ResponseWritten,
    /// The peer closed the stream, or framing failed.
    StreamClosed,
    /// An unrecoverable failure in the loop body (e.g. the response could not be written).
    Fault,
}

/// Pure transition function. Events that do not apply to the current state
/// leave it unchanged.
pub fn advance(state: HostState, event: LoopEvent) -> HostState {
    match (state, event) {
        (HostState::Terminated, _) => HostState::Terminated,
        (_, LoopEvent::Fault) => HostState::Terminated,
        (HostState::Idle, LoopEvent::MessageReceived) => HostState::Processing,
        (HostState::Idle, LoopEvent::StreamClosed) => HostState::Terminated,
        (HostState::Processing, LoopEvent::ResponseWritten) => HostState::Idle,
        (state, _) => state,
    }
}

impl HostState {
    pub fn is_terminated(self) -> bool {
        self == HostState::Terminated
    }
}
