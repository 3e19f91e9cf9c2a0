//! Keyboard equivalents for the marker gestures, read line by line from stdin.

use std::{
    io::{self, BufRead},
    thread::{self, JoinHandle},
};

use crossbeam_channel::Sender;
use navigation::{dispatch_control, Action, ControlMessage, DispatchOutcome};
use tracing::{debug, warn};

pub fn parse_console_command(line: &str) -> Option<ControlMessage> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "enter" | "confirm" => Some(ControlMessage::Action(Action::Confirm)),
        "b" | "back" | "backspace" => Some(ControlMessage::Action(Action::Back)),
        "q" | "quit" | "esc" | "exit" => Some(ControlMessage::Shutdown),
        _ => None,
    }
}

/// The thread is never joined: a blocking stdin read cannot be interrupted,
/// and it ends with the process.
pub fn spawn_console_input(control_tx: Sender<ControlMessage>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console-input".into())
        .spawn(move || read_commands(io::stdin().lock(), &control_tx))
}

fn read_commands(input: impl BufRead, control_tx: &Sender<ControlMessage>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("console input failed: {err}");
                break;
            }
        };
        let Some(message) = parse_console_command(&line) else {
            debug!(input = %line, "unknown console command");
            continue;
        };
        if dispatch_control(control_tx, message, "console") == DispatchOutcome::Disconnected {
            break;
        }
    }
    debug!("console input closed");
}
