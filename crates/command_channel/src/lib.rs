//! TCP listener for out-of-band confirmation signals.
//!
//! Each connection delivers exactly one line. `CONFIRM_OK` becomes a
//! [`Action::Confirm`] posted to the control queue; the listener itself never
//! touches navigation state.

use std::{
    io,
    net::SocketAddr,
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::Sender;
use navigation::{dispatch_control, Action, ControlMessage, DispatchOutcome};
use shared::{
    error::KioskError,
    protocol::{parse_command_line, CommandSignal},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::watch,
};
use tracing::{debug, error, info, warn};

pub const DEFAULT_COMMAND_PORT: u16 = 9000;
const MAX_LINE_BYTES: u64 = 256;
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct CommandChannelConfig {
    pub bind_addr: SocketAddr,
    pub read_timeout: Duration,
}

impl Default for CommandChannelConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_COMMAND_PORT)),
            read_timeout: Duration::from_secs(5),
        }
    }
}

/// Handle to the listener thread. Dropping it stops the listener.
pub struct CommandChannel {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl CommandChannel {
    /// Binds the listener on the calling thread, so bind failures are reported
    /// here, then serves it from a dedicated thread.
    pub fn spawn(
        config: CommandChannelConfig,
        control_tx: Sender<ControlMessage>,
    ) -> Result<Self, KioskError> {
        let std_listener = std::net::TcpListener::bind(config.bind_addr)?;
        std_listener.set_nonblocking(true)?;
        let local_addr = std_listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let read_timeout = config.read_timeout;

        let handle = thread::Builder::new()
            .name("command-channel".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        error!("failed to build command channel runtime: {err}");
                        return;
                    }
                };

                runtime.block_on(async move {
                    let listener = match TcpListener::from_std(std_listener) {
                        Ok(listener) => listener,
                        Err(err) => {
                            error!("failed to register command listener: {err}");
                            return;
                        }
                    };
                    serve(listener, control_tx, read_timeout, shutdown_rx).await;
                });
            })?;

        info!(%local_addr, "command channel listening");
        Ok(Self {
            local_addr,
            shutdown_tx,
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("command channel thread panicked");
            }
        }
    }
}

impl Drop for CommandChannel {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Accepts connections one at a time until `shutdown` fires or the control
/// queue disconnects. Per-connection failures are logged and skipped.
pub async fn serve(
    listener: TcpListener,
    control_tx: Sender<ControlMessage>,
    read_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let accepted = tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => accepted,
        };
        let (stream, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!("command channel accept failed: {err}");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let outcome = tokio::select! {
            _ = shutdown.changed() => break,
            outcome = read_command(stream, read_timeout) => outcome,
        };
        match outcome {
            Ok(Some(CommandSignal::Confirm)) => {
                info!(%peer, "confirm signal received");
                let message = ControlMessage::Action(Action::Confirm);
                if dispatch_control(&control_tx, message, "command_channel")
                    == DispatchOutcome::Disconnected
                {
                    break;
                }
            }
            Ok(None) => debug!(%peer, "ignoring unrecognized command"),
            Err(err) => warn!(%peer, "command channel read failed: {err}"),
        }
    }
    debug!("command channel stopped");
}

async fn read_command(
    stream: TcpStream,
    read_timeout: Duration,
) -> Result<Option<CommandSignal>, KioskError> {
    let mut reader = BufReader::new(stream).take(MAX_LINE_BYTES);
    let mut line = String::new();
    let read = tokio::time::timeout(read_timeout, reader.read_line(&mut line))
        .await
        .map_err(|_| {
            io::Error::new(io::ErrorKind::TimedOut, "no command line before timeout")
        })??;
    if read == 0 {
        return Err(KioskError::Malformed(
            "connection closed before a line was sent".into(),
        ));
    }
    Ok(parse_command_line(&line))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
