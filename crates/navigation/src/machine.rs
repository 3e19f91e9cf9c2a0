//! The kiosk navigation state machine.
//!
//! Every mutation goes through [`NavigationMachine::apply`], which is called
//! only by the thread draining the control queue. Rendering reads a
//! [`NavigationSnapshot`].

use std::fmt;

use serde::{Deserialize, Serialize};
use shared::domain::{MenuOption, NavigationState, SymbolId, DEFAULT_RECOGNIZED_SYMBOL};
use tracing::{debug, info, warn};

use crate::{
    angle::{AngleDeltaTracker, RotationStep, DEFAULT_ANGLE_THRESHOLD},
    carousel::CarouselContext,
    catalog::Catalog,
    player::MediaPlayer,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    MarkerAdded { symbol_id: SymbolId },
    /// Absolute orientation sample of a tracked marker.
    MarkerAngle { symbol_id: SymbolId, angle: f64 },
    Confirm,
    Back,
}

/// A resource the user asked for could not be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    FramesUnavailable { car: String },
    VideoUnavailable { car: String },
    PlaybackFailed { car: String, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FramesUnavailable { car } => write!(f, "No images available for {car}."),
            Self::VideoUnavailable { car } => write!(f, "Video not available for {car}."),
            Self::PlaybackFailed { car, reason } => {
                write!(f, "Could not play video for {car}: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: NavigationState,
    pub to: NavigationState,
    pub notice: Option<Notice>,
}

impl Transition {
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationSnapshot {
    pub state: NavigationState,
    pub car_index: usize,
    pub car_name: Option<String>,
    pub option_index: usize,
    pub option_label: &'static str,
    pub frame_index: Option<usize>,
    pub frame_count: usize,
    pub playback_active: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineConfig {
    pub recognized_symbol: SymbolId,
    pub angle_threshold: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            recognized_symbol: DEFAULT_RECOGNIZED_SYMBOL,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
        }
    }
}

pub struct NavigationMachine<P: MediaPlayer> {
    state: NavigationState,
    catalog: Catalog,
    recognized_symbol: SymbolId,
    car_index: usize,
    option_index: usize,
    rotation: AngleDeltaTracker,
    carousel: Option<CarouselContext>,
    player: P,
    playback_active: bool,
    notice: Option<Notice>,
}

impl<P: MediaPlayer> NavigationMachine<P> {
    pub fn new(catalog: Catalog, player: P, config: MachineConfig) -> Self {
        Self {
            state: NavigationState::Idle,
            catalog,
            recognized_symbol: config.recognized_symbol,
            car_index: 0,
            option_index: 0,
            rotation: AngleDeltaTracker::new(config.angle_threshold),
            carousel: None,
            player,
            playback_active: false,
            notice: None,
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn car_index(&self) -> usize {
        self.car_index
    }

    pub fn option_index(&self) -> usize {
        self.option_index
    }

    pub fn rotation_seeded(&self) -> bool {
        self.rotation.is_seeded()
    }

    /// Clears the playback flag once the player has exited on its own. The
    /// state stays at [`NavigationState::VideoPlayback`] until Back.
    pub fn refresh_playback(&mut self) -> bool {
        if !self.playback_active || self.player.is_playing() {
            return false;
        }
        info!(state = ?self.state, "video playback finished");
        self.playback_active = false;
        true
    }

    pub fn apply(&mut self, action: Action) -> Transition {
        let from = self.state;
        let notice = match action {
            Action::MarkerAdded { symbol_id } => {
                if symbol_id == self.recognized_symbol && self.state == NavigationState::Idle {
                    self.enter(NavigationState::CarMenu);
                }
                None
            }
            Action::MarkerAngle { symbol_id, angle } => {
                if symbol_id == self.recognized_symbol {
                    self.track_angle(angle);
                }
                None
            }
            Action::Confirm => self.confirm(),
            Action::Back => {
                self.back();
                None
            }
        };

        if let Some(notice) = &notice {
            warn!(state = ?self.state, %notice, "requested resource unavailable");
            self.notice = Some(notice.clone());
        } else if from != self.state {
            self.notice = None;
        }
        if from != self.state {
            info!(?from, to = ?self.state, "navigation transition");
        }

        Transition {
            from,
            to: self.state,
            notice,
        }
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        let option = MenuOption::from_index(self.option_index).unwrap_or(MenuOption::View360);
        NavigationSnapshot {
            state: self.state,
            car_index: self.car_index,
            car_name: self.catalog.get(self.car_index).map(|car| car.name.clone()),
            option_index: self.option_index,
            option_label: option.label(),
            frame_index: self
                .carousel
                .as_ref()
                .filter(|carousel| carousel.frame_count > 0)
                .map(|carousel| carousel.frame_index),
            frame_count: self.carousel.as_ref().map_or(0, |c| c.frame_count),
            playback_active: self.playback_active,
            notice: self.notice.as_ref().map(ToString::to_string),
        }
    }

    fn enter(&mut self, state: NavigationState) {
        self.state = state;
        self.rotation.reset();
    }

    fn track_angle(&mut self, angle: f64) {
        match self.state {
            NavigationState::CarMenu | NavigationState::OptionsMenu => {
                if let Some(step) = self.rotation.observe(angle) {
                    self.step_cursor(step);
                }
            }
            NavigationState::Carousel => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.track(angle);
                }
            }
            NavigationState::Idle | NavigationState::VideoPlayback => {}
        }
    }

    fn step_cursor(&mut self, step: RotationStep) {
        if self.state == NavigationState::CarMenu {
            self.car_index = step.apply_cyclic(self.car_index, self.catalog.len());
            debug!(car_index = self.car_index, ?step, "car cursor moved");
        } else {
            self.option_index = step.apply_cyclic(self.option_index, MenuOption::ALL.len());
            debug!(option_index = self.option_index, ?step, "option cursor moved");
        }
    }

    fn confirm(&mut self) -> Option<Notice> {
        match self.state {
            NavigationState::CarMenu => {
                info!(car = ?self.selected_car_name(), "car confirmed");
                self.enter(NavigationState::OptionsMenu);
                None
            }
            NavigationState::OptionsMenu => {
                let notice = match MenuOption::from_index(self.option_index) {
                    Some(MenuOption::View360) => self.open_carousel(),
                    Some(MenuOption::ShowVideo) => self.start_video(),
                    None => None,
                };
                self.rotation.reset();
                notice
            }
            NavigationState::Idle | NavigationState::Carousel | NavigationState::VideoPlayback => {
                debug!(state = ?self.state, "confirm ignored");
                None
            }
        }
    }

    fn open_carousel(&mut self) -> Option<Notice> {
        let frame_count = self
            .catalog
            .get(self.car_index)
            .map_or(0, |car| car.frame_count);
        if frame_count == 0 {
            return Some(Notice::FramesUnavailable {
                car: self.selected_car_name(),
            });
        }
        self.carousel = Some(CarouselContext::new(self.car_index, frame_count));
        self.state = NavigationState::Carousel;
        None
    }

    fn start_video(&mut self) -> Option<Notice> {
        let car = self.selected_car_name();
        let Some(path) = self
            .catalog
            .get(self.car_index)
            .and_then(|profile| profile.playable_video())
            .cloned()
        else {
            return Some(Notice::VideoUnavailable { car });
        };

        match self.player.play(&path) {
            Ok(()) => {
                info!(path = %path.display(), "video playback started");
                self.playback_active = true;
                self.state = NavigationState::VideoPlayback;
                None
            }
            Err(err) => Some(Notice::PlaybackFailed {
                car,
                reason: err.to_string(),
            }),
        }
    }

    fn back(&mut self) {
        match self.state {
            NavigationState::Carousel => {
                self.carousel = None;
                self.enter(NavigationState::OptionsMenu);
            }
            NavigationState::VideoPlayback => {
                self.player.stop();
                self.playback_active = false;
                self.enter(NavigationState::OptionsMenu);
            }
            NavigationState::OptionsMenu => self.enter(NavigationState::CarMenu),
            NavigationState::Idle | NavigationState::CarMenu => {}
        }
    }

    fn selected_car_name(&self) -> String {
        self.catalog
            .get(self.car_index)
            .map(|car| car.name.clone())
            .unwrap_or_else(|| "this car".to_string())
    }
}

impl<P: MediaPlayer> Drop for NavigationMachine<P> {
    fn drop(&mut self) {
        if self.playback_active {
            self.player.stop();
        }
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
