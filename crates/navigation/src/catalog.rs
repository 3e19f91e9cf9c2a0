use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One car the kiosk can present, with what was found on disk at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarProfile {
    pub name: String,
    pub frame_count: usize,
    pub video_path: Option<PathBuf>,
}

impl CarProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_count: 0,
            video_path: None,
        }
    }

    pub fn with_frames(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    pub fn with_video(mut self, path: impl Into<PathBuf>) -> Self {
        self.video_path = Some(path.into());
        self
    }

    /// Video path, only if it points at an existing file right now.
    pub fn playable_video(&self) -> Option<&PathBuf> {
        self.video_path.as_ref().filter(|path| path.is_file())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    cars: Vec<CarProfile>,
}

impl Catalog {
    pub fn new(cars: Vec<CarProfile>) -> Self {
        Self { cars }
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CarProfile> {
        self.cars.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarProfile> {
        self.cars.iter()
    }
}
