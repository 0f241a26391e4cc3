//! State-aware placeholder text for the input area.

use eliza_engine::{ExchangeState, Settlement};

/// Get placeholder text for the input area based on the exchange state.
#[must_use]
pub fn input_placeholder(state: ExchangeState) -> &'static str {
    match state {
        ExchangeState::Idle => "Tell Eliza what's on your mind...",
        ExchangeState::AwaitingResponse => "Waiting for Eliza...",
        ExchangeState::Settled(Settlement::Success) => "Type your reply...",
        ExchangeState::Settled(Settlement::Failure) => "Try sending that again...",
    }
}
