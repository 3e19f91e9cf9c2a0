//! The single queue every producer posts into; drained by the thread that owns
//! the [`NavigationMachine`](crate::NavigationMachine).

use crossbeam_channel::{Sender, TrySendError};

use crate::machine::Action;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    Action(Action),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Queued,
    /// Queue full; the message was dropped.
    Dropped,
    /// The owning thread is gone. Producers should stop.
    Disconnected,
}

/// Posts `message` without blocking, except [`ControlMessage::Shutdown`],
/// which waits for room so a busy queue cannot swallow it.
pub fn dispatch_control(
    control_tx: &Sender<ControlMessage>,
    message: ControlMessage,
    source: &'static str,
) -> DispatchOutcome {
    if message == ControlMessage::Shutdown {
        return match control_tx.send(message) {
            Ok(()) => DispatchOutcome::Queued,
            Err(_) => {
                tracing::debug!(source, "controller disconnected");
                DispatchOutcome::Disconnected
            }
        };
    }
    match control_tx.try_send(message) {
        Ok(()) => {
            tracing::trace!(source, ?message, "queued control message");
            DispatchOutcome::Queued
        }
        Err(TrySendError::Full(message)) => {
            tracing::warn!(source, ?message, "control queue is full; dropping message");
            DispatchOutcome::Dropped
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(source, "controller disconnected");
            DispatchOutcome::Disconnected
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        assert_eq!(
            dispatch_control(&tx, ControlMessage::Action(Action::Confirm), "test"),
            DispatchOutcome::Queued
        );
        assert_eq!(
            dispatch_control(&tx, ControlMessage::Action(Action::Back), "test"),
            DispatchOutcome::Dropped
        );
        assert_eq!(rx.recv().expect("queued"), ControlMessage::Action(Action::Confirm));
        drop(rx);
        assert_eq!(
            dispatch_control(&tx, ControlMessage::Shutdown, "test"),
            DispatchOutcome::Disconnected
        );
    }

    #[test]
    fn shutdown_waits_for_room_in_a_full_queue() {
        let (tx, rx) = bounded(1);
        dispatch_control(&tx, ControlMessage::Action(Action::Confirm), "test");

        let producer = thread::spawn(move || dispatch_control(&tx, ControlMessage::Shutdown, "test"));
        assert_eq!(rx.recv().expect("first"), ControlMessage::Action(Action::Confirm));
        assert_eq!(rx.recv().expect("second"), ControlMessage::Shutdown);
        assert_eq!(producer.join().expect("producer"), DispatchOutcome::Queued);
    }
}
