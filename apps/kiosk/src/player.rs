use std::{
    path::Path,
    process::{Child, Command, Stdio},
};

use navigation::MediaPlayer;
use shared::error::KioskError;
use tracing::{debug, info, warn};

/// Plays videos by launching an external player program with the file path
/// as its last argument.
pub struct ProcessPlayer {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl ProcessPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
        }
    }
}

impl MediaPlayer for ProcessPlayer {
    fn play(&mut self, path: &Path) -> Result<(), KioskError> {
        self.stop();
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| KioskError::Player {
                path: path.display().to_string(),
                message: format!("{}: {err}", self.program),
            })?;
        info!(pid = child.id(), program = %self.program, "player started");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        if let Err(err) = child.kill() {
            // Already exited on its own.
            debug!(pid = child.id(), "player kill: {err}");
        }
        match child.wait() {
            Ok(status) => debug!(pid = child.id(), %status, "player stopped"),
            Err(err) => warn!(pid = child.id(), "failed to reap player: {err}"),
        }
    }

    fn is_playing(&mut self) -> bool {
        matches!(
            self.child.as_mut().map(Child::try_wait),
            Some(Ok(None))
        )
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_player_error() {
        let mut player = ProcessPlayer::new("kiosk-test-no-such-player", Vec::new());
        let err = player
            .play(Path::new("clip.mp4"))
            .expect_err("spawn should fail");
        assert!(matches!(err, KioskError::Player { .. }));
        assert!(!player.is_playing());
    }

    #[cfg(unix)]
    #[test]
    fn stop_kills_running_player() {
        // `sleep 30` stands in for a player that runs until stopped.
        let mut player = ProcessPlayer::new("sleep", Vec::new());
        player.play(Path::new("30")).expect("spawn sleep");
        assert!(player.is_playing());
        player.stop();
        assert!(!player.is_playing());
    }
}
