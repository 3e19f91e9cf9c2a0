//! Screen output. Renderers only read the navigation snapshot.

use std::{
    io::{self, Write},
    sync::Arc,
};

use clap::ValueEnum;
use image::GenericImageView;
use navigation::{Catalog, NavigationSnapshot};
use shared::domain::{MenuOption, NavigationState};

use crate::assets::FrameLibrary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    Text,
    Json,
}

pub trait Renderer {
    fn render(&mut self, snapshot: &NavigationSnapshot) -> io::Result<()>;
}

pub fn renderer_for(
    mode: RenderMode,
    catalog: &Catalog,
    library: Arc<FrameLibrary>,
) -> Box<dyn Renderer> {
    match mode {
        RenderMode::Text => Box::new(TextRenderer::new(catalog, library, io::stdout())),
        RenderMode::Json => Box::new(JsonRenderer::new(io::stdout())),
    }
}

pub struct TextRenderer<W: Write> {
    car_names: Vec<String>,
    library: Arc<FrameLibrary>,
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(catalog: &Catalog, library: Arc<FrameLibrary>, out: W) -> Self {
        Self {
            car_names: catalog.iter().map(|car| car.name.clone()).collect(),
            library,
            out,
        }
    }

    pub fn compose(&self, snapshot: &NavigationSnapshot) -> Vec<String> {
        let mut lines = Vec::new();
        match snapshot.state {
            NavigationState::Idle => lines.push("Waiting for TUIO marker...".to_string()),
            NavigationState::CarMenu => {
                lines.push("Car Selection Menu".to_string());
                lines.extend(menu_lines(
                    self.car_names.iter().map(String::as_str),
                    snapshot.car_index,
                ));
                lines.push("Rotate marker or press Enter to confirm selection.".to_string());
            }
            NavigationState::OptionsMenu => {
                lines.push("Options Menu".to_string());
                lines.extend(menu_lines(
                    MenuOption::ALL.iter().map(|option| option.label()),
                    snapshot.option_index,
                ));
                lines.push("Rotate marker or press Enter to confirm option.".to_string());
                lines.push("Type 'back' to go back.".to_string());
            }
            NavigationState::Carousel => match snapshot.frame_index {
                Some(index) => {
                    let size = self
                        .library
                        .frame(snapshot.car_index, index)
                        .map(|frame| {
                            let (width, height) = frame.dimensions();
                            format!(" ({width}x{height})")
                        })
                        .unwrap_or_default();
                    lines.push(format!(
                        "360 View: Frame {}/{}{size}",
                        index + 1,
                        snapshot.frame_count
                    ));
                    lines.push("Type 'back' to return to options.".to_string());
                }
                None => lines.push("No images available for this car.".to_string()),
            },
            NavigationState::VideoPlayback => {
                lines.push("Playing Video...".to_string());
                lines.push("Type 'back' to return to options.".to_string());
            }
        }
        if let Some(notice) = &snapshot.notice {
            lines.push(format!("! {notice}"));
        }
        lines
    }
}

fn menu_lines<'a>(
    labels: impl Iterator<Item = &'a str> + 'a,
    selected: usize,
) -> impl Iterator<Item = String> + 'a {
    labels.enumerate().map(move |(index, label)| {
        let prefix = if index == selected { ">> " } else { "   " };
        format!("{prefix}{label}")
    })
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &NavigationSnapshot) -> io::Result<()> {
        let lines = self.compose(snapshot);
        writeln!(self.out)?;
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

/// One JSON object per changed snapshot, for an external display process.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, snapshot: &NavigationSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
