//! The thread that owns the navigation machine: drains the control queue and
//! redraws on a fixed tick.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use navigation::{ControlMessage, MediaPlayer, NavigationMachine, NavigationSnapshot};
use tracing::{debug, info, warn};

use crate::render::Renderer;

pub struct Controller<P: MediaPlayer> {
    machine: NavigationMachine<P>,
    control_rx: Receiver<ControlMessage>,
    renderer: Box<dyn Renderer>,
    refresh: Duration,
    last_rendered: Option<NavigationSnapshot>,
}

impl<P: MediaPlayer> Controller<P> {
    pub fn new(
        machine: NavigationMachine<P>,
        control_rx: Receiver<ControlMessage>,
        renderer: Box<dyn Renderer>,
        refresh: Duration,
    ) -> Self {
        Self {
            machine,
            control_rx,
            renderer,
            refresh,
            last_rendered: None,
        }
    }

    pub fn machine(&self) -> &NavigationMachine<P> {
        &self.machine
    }

    /// Runs until a shutdown message arrives or every producer is gone.
    pub fn run(mut self) -> NavigationMachine<P> {
        self.redraw();
        loop {
            match self.control_rx.recv_timeout(self.refresh) {
                Ok(message) => {
                    if !self.handle(message) {
                        break;
                    }
                    // Drain whatever queued up meanwhile before drawing.
                    while let Ok(message) = self.control_rx.try_recv() {
                        if !self.handle(message) {
                            info!("controller shutting down");
                            return self.machine;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.redraw();
        }
        info!("controller shutting down");
        self.machine
    }

    /// Applies one message. Returns `false` when the loop should stop.
    pub fn handle(&mut self, message: ControlMessage) -> bool {
        match message {
            ControlMessage::Action(action) => {
                let transition = self.machine.apply(action);
                if !transition.changed_state() {
                    debug!(?action, state = ?transition.to, "action left state unchanged");
                }
                true
            }
            ControlMessage::Shutdown => false,
        }
    }

    fn redraw(&mut self) {
        self.machine.refresh_playback();
        let snapshot = self.machine.snapshot();
        if self.last_rendered.as_ref() == Some(&snapshot) {
            return;
        }
        if let Err(err) = self.renderer.render(&snapshot) {
            warn!("render failed: {err}");
        }
        self.last_rendered = Some(snapshot);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
