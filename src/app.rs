//! Application run loop.
//!
//! The controller is toolkit-agnostic; a `Frontend` supplies key events and
//! draws the per-frame snapshot. The loop is single-threaded: poll input with
//! a short timeout, advance the controller clock, present.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::ui::controller::{FrameState, MainController};
use crate::ui::keys::KeyEvent;

/// Input poll interval, which also bounds the frame cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// One input-side event from the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontendEvent {
    Key(KeyEvent),
    Quit,
}

/// A rendering and input surface for the controller.
pub trait Frontend {
    /// Collects pending events, waiting up to `timeout` for the first one.
    fn poll_events(&mut self, timeout: Duration) -> Result<Vec<FrontendEvent>>;
    /// Draws one frame snapshot.
    fn present(&mut self, frame: &FrameState) -> Result<()>;
}

pub struct ClipsortApp {
    controller: MainController,
    frontend: Box<dyn Frontend>,
}

impl ClipsortApp {
    pub fn new(controller: MainController, frontend: Box<dyn Frontend>) -> Self {
        Self {
            controller,
            frontend,
        }
    }

    /// Runs until the frontend reports `Quit`.
    pub fn run(mut self, launch_path: Option<&Path>) -> Result<()> {
        self.controller.startup(launch_path);
        self.frontend.present(&self.controller.frame())?;

        let mut last_tick = Instant::now();
        loop {
            for event in self.frontend.poll_events(TICK_INTERVAL)? {
                match event {
                    FrontendEvent::Key(key) => self.controller.handle_key(key),
                    FrontendEvent::Quit => return Ok(()),
                }
            }

            let now = Instant::now();
            self.controller.tick(now.duration_since(last_tick).as_secs_f64());
            last_tick = now;

            self.frontend.present(&self.controller.frame())?;
        }
    }
}
