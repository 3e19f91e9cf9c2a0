use std::sync::Arc;

use crossbeam_channel::Sender;
use shared::{
    domain::{SessionId, SymbolId, TrackedMarker},
    protocol::TrackingListener,
};
use tracing::debug;

use crate::{
    angle::normalize_signed,
    machine::Action,
    queue::{dispatch_control, ControlMessage, DispatchOutcome},
    registry::ObjectRegistry,
};

/// Tracking callback consumer.
///
/// Records every marker in the registry on the delivery thread and forwards
/// only the recognized symbol to the control queue.
pub struct MarkerRouter {
    registry: Arc<ObjectRegistry>,
    control_tx: Sender<ControlMessage>,
    recognized_symbol: SymbolId,
}

impl MarkerRouter {
    pub fn new(
        registry: Arc<ObjectRegistry>,
        control_tx: Sender<ControlMessage>,
        recognized_symbol: SymbolId,
    ) -> Self {
        Self {
            registry,
            control_tx,
            recognized_symbol,
        }
    }

    fn finite(session_id: SessionId, angle: f64) -> bool {
        if !angle.is_finite() {
            debug!(session_id = session_id.0, angle, "ignoring non-finite marker angle");
        }
        angle.is_finite()
    }

    fn forward(&self, action: Action) -> DispatchOutcome {
        dispatch_control(&self.control_tx, ControlMessage::Action(action), "tracking")
    }
}

impl TrackingListener for MarkerRouter {
    fn on_add(&mut self, session_id: SessionId, symbol_id: SymbolId, angle: f64) {
        if !Self::finite(session_id, angle) {
            return;
        }
        let angle = normalize_signed(angle);
        self.registry.add_or_replace(
            session_id,
            TrackedMarker {
                session_id,
                symbol_id,
                angle,
            },
        );
        debug!(session_id = session_id.0, symbol_id = symbol_id.0, angle, "marker added");

        if symbol_id == self.recognized_symbol {
            self.forward(Action::MarkerAdded { symbol_id });
        }
    }

    fn on_update(&mut self, session_id: SessionId, symbol_id: SymbolId, angle: f64) {
        if !Self::finite(session_id, angle) {
            return;
        }
        let angle = normalize_signed(angle);
        if !self.registry.update_angle(session_id, angle) {
            self.registry.add_or_replace(
                session_id,
                TrackedMarker {
                    session_id,
                    symbol_id,
                    angle,
                },
            );
        }

        if symbol_id == self.recognized_symbol {
            self.forward(Action::MarkerAngle { symbol_id, angle });
        }
    }

    fn on_remove(&mut self, session_id: SessionId, symbol_id: SymbolId) {
        self.registry.remove(session_id);
        debug!(session_id = session_id.0, symbol_id = symbol_id.0, "marker removed");
    }
}
