//! Play/pause state machine driving the window over a trajectory.

use lc_core::defaults;
use lc_sim::Trajectory;

use crate::playhead::{PlaybackState, PlayheadState};
use crate::window::{Frame, WindowSelector};

/// Host requests accepted by the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Tick,
    Seek(f64),
    Reset,
}

#[derive(Clone, Debug)]
pub struct AnimationController {
    playhead: PlayheadState,
    speed: f64,
    selector: WindowSelector,
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(defaults::SPEED)
    }
}

impl AnimationController {
    pub fn new(speed: f64) -> Self {
        let mut controller = Self {
            playhead: PlayheadState::default(),
            speed: defaults::SPEED,
            selector: WindowSelector::default(),
        };
        controller.set_speed(speed);
        controller
    }

    pub fn with_selector(mut self, selector: WindowSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn selector(&self) -> &WindowSelector {
        &self.selector
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Clamped to `[SPEED_MIN, SPEED_MAX]`; NaN falls back to the default.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = if speed.is_nan() {
            defaults::SPEED
        } else {
            speed.clamp(defaults::SPEED_MIN, defaults::SPEED_MAX)
        };
    }

    /// Play-head advance per tick.
    pub fn step(&self) -> f64 {
        defaults::BASE_INCREMENT * self.speed
    }

    pub fn playhead(&self) -> PlayheadState {
        self.playhead
    }

    pub fn position(&self) -> f64 {
        self.playhead.position
    }

    pub fn state(&self) -> PlaybackState {
        self.playhead.state()
    }

    pub fn is_playing(&self) -> bool {
        self.playhead.playing
    }

    pub fn play(&mut self) {
        if !self.playhead.playing {
            tracing::debug!(position = self.playhead.position, "playback started");
        }
        self.playhead.playing = true;
    }

    pub fn pause(&mut self) {
        if self.playhead.playing {
            tracing::debug!(position = self.playhead.position, "playback paused");
        }
        self.playhead.playing = false;
    }

    pub fn seek(&mut self, position: f64, tau_end: f64) {
        self.playhead.seek(position, tau_end);
    }

    pub fn reset(&mut self) {
        self.playhead = PlayheadState::default();
    }

    /// Advance one tick. Yields nothing while paused.
    pub fn tick<'a>(&mut self, trajectory: &'a Trajectory) -> Option<Frame<'a>> {
        if !self.playhead.playing {
            return None;
        }
        if self.playhead.advance(self.step(), trajectory.tau_end()) {
            tracing::trace!("play-head wrapped to start");
        }
        Some(self.current_frame(trajectory))
    }

    /// Window at the current position, without moving it.
    pub fn current_frame<'a>(&self, trajectory: &'a Trajectory) -> Frame<'a> {
        self.selector.select(trajectory, self.playhead.position)
    }

    /// Dispatch a host command; only `Tick` can yield a frame.
    pub fn apply<'a>(&mut self, command: Command, trajectory: &'a Trajectory) -> Option<Frame<'a>> {
        match command {
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Tick => return self.tick(trajectory),
            Command::Seek(position) => self.seek(position, trajectory.tau_end()),
            Command::Reset => self.reset(),
        }
        None
    }
}
