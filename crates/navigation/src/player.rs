use std::path::Path;

use shared::error::KioskError;

/// Video playback collaborator. The machine checks the file exists before
/// calling [`MediaPlayer::play`].
pub trait MediaPlayer: Send {
    fn play(&mut self, path: &Path) -> Result<(), KioskError>;
    fn stop(&mut self);
    fn is_playing(&mut self) -> bool;
}

impl<P: MediaPlayer + ?Sized> MediaPlayer for Box<P> {
    fn play(&mut self, path: &Path) -> Result<(), KioskError> {
        (**self).play(path)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_playing(&mut self) -> bool {
        (**self).is_playing()
    }
}
