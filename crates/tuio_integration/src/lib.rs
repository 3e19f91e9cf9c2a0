//! TUIO 1.1 object tracking over UDP.
//!
//! Only the `/tuio/2Dobj` profile is consumed. Each frame is a bundle of
//! `alive`, `set` and `fseq` messages; events are emitted when `fseq` commits
//! the frame.

use std::{
    collections::{HashMap, HashSet},
    io,
    net::{SocketAddr, UdpSocket},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use rosc::{OscMessage, OscPacket, OscType};
use shared::{
    domain::{SessionId, SymbolId},
    error::KioskError,
    protocol::{TrackingEvent, TrackingListener},
};
use tracing::{debug, info, warn};

pub const DEFAULT_TRACKING_PORT: u16 = 3333;
pub const OBJECT_PROFILE: &str = "/tuio/2Dobj";

const MAX_PACKET_BYTES: usize = 65_536;
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_millis(250);
/// A frame id this far behind the last one means the tracker restarted.
const FRAME_RESET_WINDOW: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ObjectSample {
    symbol_id: SymbolId,
    x: f32,
    y: f32,
    angle: f64,
}

/// Reassembles TUIO frames into add/update/remove events.
#[derive(Debug, Default)]
pub struct TuioDecoder {
    objects: HashMap<SessionId, ObjectSample>,
    pending: Vec<(SessionId, ObjectSample)>,
    alive: Option<HashSet<SessionId>>,
    last_frame: Option<i64>,
}

impl TuioDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a packet, skipping malformed messages with a warning.
    pub fn process_packet(&mut self, packet: &OscPacket) -> Vec<TrackingEvent> {
        let mut events = Vec::new();
        self.walk(packet, &mut events);
        events
    }

    fn walk(&mut self, packet: &OscPacket, events: &mut Vec<TrackingEvent>) {
        match packet {
            OscPacket::Message(message) => match self.handle_message(message) {
                Ok(committed) => events.extend(committed),
                Err(err) => warn!(
                    addr = %message.addr,
                    kind = ?err.kind(),
                    "skipping tuio message: {err}"
                ),
            },
            OscPacket::Bundle(bundle) => {
                for inner in &bundle.content {
                    self.walk(inner, events);
                }
            }
        }
    }

    pub fn handle_message(&mut self, message: &OscMessage) -> Result<Vec<TrackingEvent>, KioskError> {
        if message.addr != OBJECT_PROFILE {
            return Ok(Vec::new());
        }
        let command = match message.args.first() {
            Some(OscType::String(command)) => command.as_str(),
            _ => return Err(KioskError::Malformed("missing 2Dobj command".into())),
        };

        match command {
            "set" => {
                let (session_id, sample) = parse_set(&message.args)?;
                self.pending.push((session_id, sample));
                Ok(Vec::new())
            }
            "alive" => {
                let alive = message.args[1..]
                    .iter()
                    .map(|arg| int_arg(arg, "alive session id").map(SessionId))
                    .collect::<Result<HashSet<_>, _>>()?;
                self.alive = Some(alive);
                Ok(Vec::new())
            }
            "fseq" => {
                let frame = message
                    .args
                    .get(1)
                    .ok_or_else(|| KioskError::Malformed("fseq without frame id".into()))
                    .and_then(|arg| int_arg(arg, "frame id"))?;
                Ok(self.commit(frame))
            }
            "source" => Ok(Vec::new()),
            other => Err(KioskError::Malformed(format!("unknown 2Dobj command '{other}'"))),
        }
    }

    fn commit(&mut self, frame: i64) -> Vec<TrackingEvent> {
        let pending = std::mem::take(&mut self.pending);
        let alive = self.alive.take();

        if !self.accepts_frame(frame) {
            debug!(frame, last_frame = ?self.last_frame, "dropping late tuio frame");
            return Vec::new();
        }
        if frame != -1 {
            self.last_frame = Some(frame);
        }

        let mut events = Vec::new();
        if let Some(alive) = &alive {
            let gone: Vec<SessionId> = self
                .objects
                .keys()
                .filter(|session_id| !alive.contains(session_id))
                .copied()
                .collect();
            for session_id in gone {
                if let Some(sample) = self.objects.remove(&session_id) {
                    events.push(TrackingEvent::Removed {
                        session_id,
                        symbol_id: sample.symbol_id,
                    });
                }
            }
        }

        for (session_id, sample) in pending {
            if alive.as_ref().is_some_and(|alive| !alive.contains(&session_id)) {
                continue;
            }
            match self.objects.insert(session_id, sample) {
                None => events.push(TrackingEvent::Added {
                    session_id,
                    symbol_id: sample.symbol_id,
                    angle: sample.angle,
                }),
                Some(previous) if previous != sample => events.push(TrackingEvent::Updated {
                    session_id,
                    symbol_id: sample.symbol_id,
                    angle: sample.angle,
                }),
                Some(_) => {}
            }
        }
        events
    }

    fn accepts_frame(&self, frame: i64) -> bool {
        match self.last_frame {
            _ if frame == -1 => true,
            None => true,
            Some(last) => frame > last || last.saturating_sub(frame) > FRAME_RESET_WINDOW,
        }
    }
}

fn parse_set(args: &[OscType]) -> Result<(SessionId, ObjectSample), KioskError> {
    if args.len() < 6 {
        return Err(KioskError::Malformed(format!(
            "2Dobj set needs at least 6 arguments, got {}",
            args.len()
        )));
    }
    let session_id = SessionId(int_arg(&args[1], "session id")?);
    let symbol_id = SymbolId(int_arg(&args[2], "class id")?);
    let x = float_arg(&args[3], "x")? as f32;
    let y = float_arg(&args[4], "y")? as f32;
    let angle = float_arg(&args[5], "angle")?;
    if !angle.is_finite() {
        return Err(KioskError::Malformed(format!("angle must be finite, got {angle}")));
    }
    Ok((
        session_id,
        ObjectSample {
            symbol_id,
            x,
            y,
            angle,
        },
    ))
}

fn int_arg(arg: &OscType, field: &str) -> Result<i64, KioskError> {
    match arg {
        OscType::Int(value) => Ok(i64::from(*value)),
        OscType::Long(value) => Ok(*value),
        other => Err(KioskError::Malformed(format!(
            "{field} must be an integer, got {other:?}"
        ))),
    }
}

fn float_arg(arg: &OscType, field: &str) -> Result<f64, KioskError> {
    match arg {
        OscType::Float(value) => Ok(f64::from(*value)),
        OscType::Double(value) => Ok(*value),
        other => Err(KioskError::Malformed(format!(
            "{field} must be a float, got {other:?}"
        ))),
    }
}

/// Handle to the UDP receive thread. Dropping it stops the thread.
pub struct TuioReceiver {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TuioReceiver {
    pub fn spawn<L>(bind_addr: SocketAddr, listener: L) -> Result<Self, KioskError>
    where
        L: TrackingListener + 'static,
    {
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_read_timeout(Some(POLL_INTERVAL))?;
        let local_addr = socket.local_addr()?;
        let running = Arc::new(AtomicBool::new(true));

        let handle = thread::Builder::new().name("tuio-receiver".into()).spawn({
            let running = Arc::clone(&running);
            move || run_receive_loop(socket, listener, running)
        })?;

        info!(%local_addr, "listening for tuio objects");
        Ok(Self {
            local_addr,
            running,
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
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("tuio receiver thread panicked");
            }
        }
    }
}

impl Drop for TuioReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_receive_loop<L: TrackingListener>(socket: UdpSocket, mut listener: L, running: Arc<AtomicBool>) {
    let mut decoder = TuioDecoder::new();
    let mut buf = vec![0u8; MAX_PACKET_BYTES];

    while running.load(Ordering::Relaxed) {
        let (len, peer) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(err) if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                continue;
            }
            Err(err) => {
                warn!("tuio socket receive failed: {err}");
                thread::sleep(RECEIVE_ERROR_BACKOFF);
                continue;
            }
        };

        let packet = match rosc::decoder::decode_udp(&buf[..len]) {
            Ok((_, packet)) => packet,
            Err(err) => {
                warn!(%peer, "undecodable tuio packet: {err:?}");
                continue;
            }
        };
        for event in decoder.process_packet(&packet) {
            listener.dispatch(event);
        }
    }
    debug!("tuio receiver stopped");
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
