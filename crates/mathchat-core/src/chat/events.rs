//! Turn events
//!
//! Lifecycle events of a send, emitted through tracing.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::ai::DecoderState;

/// Events during one turn
#[derive(Debug, Clone, Serialize)]
pub enum TurnEvent {
    /// Request sent
    TurnStart { turn: usize, message_count: usize },
    /// Reply fully received
    TurnComplete {
        turn: usize,
        duration_ms: u64,
        chars: usize,
        state: DecoderState,
    },
    /// Transport failed; partial content is kept
    TurnError { turn: usize, error: String },
}

/// Turn counter and timing for a session
#[derive(Debug, Default)]
pub struct TurnTracker {
    /// Current turn number (increments on every send)
    pub current_turn: usize,
    turn_start: Option<Instant>,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new turn
    pub fn start_turn(&mut self, message_count: usize) {
        self.current_turn += 1;
        self.turn_start = Some(Instant::now());
        self.emit(TurnEvent::TurnStart {
            turn: self.current_turn,
            message_count,
        });
    }

    pub fn turn_duration(&self) -> Option<Duration> {
        self.turn_start.map(|start| start.elapsed())
    }

    pub fn complete(&mut self, chars: usize, state: DecoderState) {
        let duration_ms = self
            .turn_duration()
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.turn_start = None;
        self.emit(TurnEvent::TurnComplete {
            turn: self.current_turn,
            duration_ms,
            chars,
            state,
        });
    }

    pub fn fail(&mut self, error: &crate::error::ChatError) {
        self.turn_start = None;
        self.emit(TurnEvent::TurnError {
            turn: self.current_turn,
            error: error.to_string(),
        });
    }

    fn emit(&self, event: TurnEvent) {
        match &event {
            TurnEvent::TurnError { .. } => tracing::error!("Turn event: {:?}", event),
            _ => tracing::debug!("Turn event: {:?}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;

    #[test]
    fn test_turn_numbers_increase() {
        let mut tracker = TurnTracker::new();
        tracker.start_turn(2);
        assert!(tracker.turn_duration().is_some());
        tracker.complete(10, DecoderState::Done);
        assert!(tracker.turn_duration().is_none());

        tracker.start_turn(4);
        tracker.fail(&ChatError::NoActiveTurn);
        assert_eq!(tracker.current_turn, 2);
        assert!(tracker.turn_duration().is_none());
    }

    #[test]
    fn test_event_serializes() {
        let event = TurnEvent::TurnComplete {
            turn: 1,
            duration_ms: 5,
            chars: 3,
            state: DecoderState::Done,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["TurnComplete"]["state"], "done");
    }
}
