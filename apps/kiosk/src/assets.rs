use std::{
    fs, io,
    path::{Path, PathBuf},
};

use image::DynamicImage;
use navigation::{CarProfile, Catalog};
use tracing::{info, warn};

use crate::config::CarSettings;

const FRAME_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFrameLoader;

impl ImageFrameLoader {
    /// Decodes every frame image in `dir`, ordered by file name. A missing
    /// directory yields no frames; unreadable files are skipped.
    pub fn load_frames(&self, dir: &Path) -> Vec<DynamicImage> {
        let files = match list_frame_files(dir) {
            Ok(files) => files,
            Err(err) => {
                warn!(dir = %dir.display(), "frame folder not found: {err}");
                return Vec::new();
            }
        };

        let frames: Vec<DynamicImage> = files
            .iter()
            .filter_map(|file| match image::open(file) {
                Ok(frame) => Some(frame),
                Err(err) => {
                    warn!(file = %file.display(), "could not load frame: {err}");
                    None
                }
            })
            .collect();
        info!(dir = %dir.display(), count = frames.len(), "loaded frames");
        frames
    }
}

fn list_frame_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_frame = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                FRAME_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if is_frame && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Frames for every configured car, in catalog order.
#[derive(Debug, Default)]
pub struct FrameLibrary {
    cars: Vec<Vec<DynamicImage>>,
}

impl FrameLibrary {
    pub fn load(loader: &ImageFrameLoader, cars: &[CarSettings]) -> Self {
        let cars = cars
            .iter()
            .map(|car| match &car.frames_dir {
                Some(dir) => loader.load_frames(dir),
                None => Vec::new(),
            })
            .collect();
        Self { cars }
    }

    pub fn frame_count(&self, car_index: usize) -> usize {
        self.cars.get(car_index).map_or(0, Vec::len)
    }

    pub fn frame(&self, car_index: usize, frame_index: usize) -> Option<&DynamicImage> {
        self.cars.get(car_index)?.get(frame_index)
    }

    pub fn catalog(&self, cars: &[CarSettings]) -> Catalog {
        Catalog::new(
            cars.iter()
                .enumerate()
                .map(|(index, car)| {
                    let profile =
                        CarProfile::new(car.name.clone()).with_frames(self.frame_count(index));
                    match &car.video_path {
                        Some(video) => profile.with_video(video.clone()),
                        None => profile,
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "tests/assets_tests.rs"]
mod tests;
