use packet_core::{advance, HostState, LoopEvent};

#[test]
fn one_request_cycle_returns_to_idle() {
    let state = HostState::default();
    assert_eq!(state, HostState::Idle);
    let state = advance(state, LoopEvent::MessageReceived);
    assert_eq!(state, HostState::Processing);
    let state = advance(state, LoopEvent::ResponseWritten);
    assert_eq!(state, HostState::Idle);
}

#[test]
fn stream_close_terminates_from_idle() {
    let state = advance(HostState::Idle, LoopEvent::StreamClosed);
    assert!(state.is_terminated());
    assert_eq!(
        advance(state, LoopEvent::MessageReceived),
        HostState::Terminated
    );
}

#[test]
fn processing_does_not_accept_another_message() {
    let state = advance(HostState::Processing, LoopEvent::MessageReceived);
    assert_eq!(state, HostState::Processing);
}

#[test]
fn fault_terminates_from_any_state() {
    for state in [HostState::Idle, HostState::Processing] {
        assert_eq!(advance(state, LoopEvent::Fault), HostState::Terminated);
    }
}
