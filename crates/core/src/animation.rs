//! Snapshot animation
//!
//! Simulations write one structured-grid file per output step,
//! `output.<step>.vts`. An animation cycles through the snapshots that exist
//! in a directory, reloading the grid and re-rendering the same scene plan on
//! each timer tick.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, VizError};

/// Default timer period between frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(600);

/// File name of the snapshot written at `step`
#[must_use]
pub fn snapshot_name(step: u64) -> String {
    format!("output.{step}.vts")
}

/// Inclusive range of snapshot steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotRange {
    pub start: u64,
    pub end: u64,
    pub step: u64,
}

impl Default for SnapshotRange {
    fn default() -> Self {
        Self {
            start: 10_000,
            end: 20_000,
            step: 1_000,
        }
    }
}

impl SnapshotRange {
    /// Steps `start, start+step, …` up to and including `end`
    ///
    /// # Errors
    /// Returns [`VizError::ZeroStep`] when `step` is zero.
    pub fn steps(&self) -> Result<Vec<u64>> {
        if self.step == 0 {
            return Err(VizError::ZeroStep);
        }
        let mut steps = Vec::new();
        let mut t = self.start;
        while t <= self.end {
            steps.push(t);
            match t.checked_add(self.step) {
                Some(next) => t = next,
                None => break,
            }
        }
        Ok(steps)
    }

    /// Snapshot paths in `dir` for which `exists` returns true
    ///
    /// # Errors
    /// Returns [`VizError::ZeroStep`] when `step` is zero.
    pub fn frame_paths<F>(&self, dir: &Path, exists: F) -> Result<Vec<PathBuf>>
    where
        F: Fn(&Path) -> bool,
    {
        let paths: Vec<PathBuf> = self
            .steps()?
            .into_iter()
            .map(|t| dir.join(snapshot_name(t)))
            .filter(|p| exists(p))
            .collect();
        info!("Found {} animation frames in {}", paths.len(), dir.display());
        Ok(paths)
    }
}

/// What a key press asks the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    Quit,
    PrintCamera,
    Ignored,
}

impl KeyAction {
    /// `space` pauses/resumes, `q` quits, `p` prints the camera
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "space" | " " => KeyAction::TogglePause,
            "q" => KeyAction::Quit,
            "p" => KeyAction::PrintCamera,
            _ => KeyAction::Ignored,
        }
    }
}

/// Cyclic, pausable cursor over snapshot paths
#[derive(Debug, Clone)]
pub struct FrameCycler {
    frames: Vec<PathBuf>,
    index: usize,
    running: bool,
    quit: bool,
}

impl FrameCycler {
    #[must_use]
    pub fn new(frames: Vec<PathBuf>) -> Self {
        Self {
            frames,
            index: 0,
            running: true,
            quit: false,
        }
    }

    #[must_use]
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    /// No frames: the viewer falls back to a single static render
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Path to load on this timer tick, advancing cyclically
    ///
    /// `None` while paused, after quit, or with no frames.
    pub fn tick(&mut self) -> Option<&Path> {
        if !self.running || self.quit || self.frames.is_empty() {
            return None;
        }
        let current = self.index;
        self.index = (current + 1) % self.frames.len();
        let path = &self.frames[current];
        debug!("Loading frame {}", path.display());
        Some(path)
    }

    /// Apply a key press; returns the interpreted action
    pub fn handle_key(&mut self, key: &str) -> KeyAction {
        let action = KeyAction::from_key(key);
        match action {
            KeyAction::TogglePause => {
                self.running = !self.running;
                info!("Animation running={}", self.running);
            }
            KeyAction::Quit => self.quit = true,
            KeyAction::PrintCamera | KeyAction::Ignored => {}
        }
        action
    }
}
