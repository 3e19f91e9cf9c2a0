use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use command_channel::CommandChannel;
use crossbeam_channel::bounded;
use navigation::{MarkerRouter, NavigationMachine, ObjectRegistry};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tuio_integration::TuioReceiver;

mod assets;
mod config;
mod console;
mod controller;
mod player;
mod render;

use assets::{FrameLibrary, ImageFrameLoader};
use config::{load_settings, resolve_tracking_port};
use controller::Controller;
use player::ProcessPlayer;
use render::{renderer_for, RenderMode};

const CONTROL_QUEUE_DEPTH: usize = 256;

#[derive(Parser, Debug)]
#[command(about = "Marker-driven car showcase kiosk")]
struct Args {
    /// UDP port for TUIO tracking. Invalid or missing values fall back to the configured port.
    port: Option<String>,
    #[arg(long, default_value = "kiosk.toml")]
    config: PathBuf,
    #[arg(long, value_enum, default_value_t = RenderMode::Text)]
    render: RenderMode,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(&args.config)?;
    let tracking_port = resolve_tracking_port(args.port.as_deref(), settings.tracking_port);

    let library = Arc::new(FrameLibrary::load(&ImageFrameLoader, &settings.cars));
    let catalog = library.catalog(&settings.cars);
    let player = ProcessPlayer::new(settings.player_program.clone(), settings.player_args.clone());
    let machine = NavigationMachine::new(catalog, player, settings.machine_config());

    let (control_tx, control_rx) = bounded(CONTROL_QUEUE_DEPTH);
    let registry = Arc::new(ObjectRegistry::new());
    let router = MarkerRouter::new(
        Arc::clone(&registry),
        control_tx.clone(),
        settings.recognized_symbol(),
    );

    let tracking_addr = SocketAddr::from(([0, 0, 0, 0], tracking_port));
    let tuio = TuioReceiver::spawn(tracking_addr, router)
        .with_context(|| format!("failed to listen for tuio on {tracking_addr}"))?;
    let command_config = settings.command_channel_config()?;
    let command_addr = command_config.bind_addr;
    let command = CommandChannel::spawn(command_config, control_tx.clone())
        .with_context(|| format!("failed to start command channel on {command_addr}"))?;
    console::spawn_console_input(control_tx).context("failed to start console input")?;

    let renderer = renderer_for(args.render, machine.catalog(), Arc::clone(&library));
    info!(
        tracking = %tuio.local_addr(),
        command = %command.local_addr(),
        cars = machine.catalog().len(),
        "kiosk ready"
    );

    let machine = Controller::new(machine, control_rx, renderer, settings.refresh_interval()).run();

    command.shutdown();
    tuio.shutdown();
    drop(machine);
    info!(tracked_markers = registry.len(), "kiosk stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_port_is_optional() {
        let args = Args::try_parse_from(["kiosk"]).expect("args");
        assert_eq!(args.port, None);
        assert_eq!(args.render, RenderMode::Text);
        assert_eq!(args.config, PathBuf::from("kiosk.toml"));
    }

    #[test]
    fn non_numeric_port_is_accepted_then_defaulted() {
        let args = Args::try_parse_from(["kiosk", "not-a-port", "--render", "json"]).expect("args");
        assert_eq!(resolve_tracking_port(args.port.as_deref(), 3333), 3333);
        assert_eq!(args.render, RenderMode::Json);
    }
}
