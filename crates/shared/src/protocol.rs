use serde::{Deserialize, Serialize};

use crate::domain::{SessionId, SymbolId};

/// Exact payload the command channel accepts as a confirmation.
pub const CONFIRM_TOKEN: &str = "CONFIRM_OK";

/// Object lifecycle events produced by the marker-tracking transport.
///
/// Angles are whatever the transport delivers; consumers normalize them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum TrackingEvent {
    Added {
        session_id: SessionId,
        symbol_id: SymbolId,
        angle: f64,
    },
    Updated {
        session_id: SessionId,
        symbol_id: SymbolId,
        angle: f64,
    },
    Removed {
        session_id: SessionId,
        symbol_id: SymbolId,
    },
}

/// Consumer of tracking callbacks. Called from the transport's delivery thread,
/// one event at a time.
pub trait TrackingListener: Send {
    fn on_add(&mut self, session_id: SessionId, symbol_id: SymbolId, angle: f64);
    fn on_update(&mut self, session_id: SessionId, symbol_id: SymbolId, angle: f64);
    fn on_remove(&mut self, session_id: SessionId, symbol_id: SymbolId);

    fn dispatch(&mut self, event: TrackingEvent) {
        match event {
            TrackingEvent::Added {
                session_id,
                symbol_id,
                angle,
            } => self.on_add(session_id, symbol_id, angle),
            TrackingEvent::Updated {
                session_id,
                symbol_id,
                angle,
            } => self.on_update(session_id, symbol_id, angle),
            TrackingEvent::Removed {
                session_id,
                symbol_id,
            } => self.on_remove(session_id, symbol_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSignal {
    Confirm,
}

/// Interprets one line read from the command channel. Only the line terminator
/// is stripped; any other difference from the token is rejected.
pub fn parse_command_line(line: &str) -> Option<CommandSignal> {
    let line = line
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line);
    (line == CONFIRM_TOKEN).then_some(CommandSignal::Confirm)
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
