//! Per-host playback session.
//!
//! A session owns the parameters, the trajectory it currently holds and
//! the animation controller. Changing what the trajectory depends on drops
//! it; the next [`Session::trajectory`] call fetches the new key.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use lc_anim::{
    AnimationController, BurstOutcome, Command, Frame, FrameSink, PlaybackState, WindowSelector,
    run_burst,
};
use lc_core::{CircuitParams, Mode};
use lc_sim::Trajectory;
use uuid::Uuid;

use crate::config::SimConfig;
use crate::error::AppResult;
use crate::trajectory_service::{TrajectoryRequest, TrajectoryService};

pub struct Session {
    id: Uuid,
    service: TrajectoryService,
    request: TrajectoryRequest,
    trajectory: Option<Arc<Trajectory>>,
    controller: AnimationController,
}

impl Session {
    pub fn new(service: TrajectoryService, config: &SimConfig) -> Self {
        let controller = AnimationController::new(config.animation.speed)
            .with_selector(WindowSelector::new(config.animation.window));
        let id = Uuid::new_v4();
        tracing::info!(session = %id, mode = config.mode.label(), "session created");
        Self {
            id,
            service,
            request: TrajectoryRequest::from_config(config),
            trajectory: None,
            controller,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> &TrajectoryRequest {
        &self.request
    }

    pub fn params(&self) -> &CircuitParams {
        &self.request.circuit
    }

    pub fn mode(&self) -> Mode {
        self.request.mode
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn position(&self) -> f64 {
        self.controller.position()
    }

    /// The trajectory currently held, without fetching.
    pub fn loaded_trajectory(&self) -> Option<&Arc<Trajectory>> {
        self.trajectory.as_ref()
    }

    /// Fetch (or reuse) the trajectory for the current parameters.
    pub fn trajectory(&mut self) -> AppResult<Arc<Trajectory>> {
        if let Some(trajectory) = &self.trajectory {
            return Ok(Arc::clone(trajectory));
        }
        let response = self.service.get_trajectory(&self.request)?;
        let trajectory = response.trajectory;
        self.controller
            .seek(self.controller.position(), trajectory.tau_end());
        self.trajectory = Some(Arc::clone(&trajectory));
        Ok(trajectory)
    }

    fn update_request(&mut self, request: TrajectoryRequest) {
        if request != self.request {
            tracing::info!(session = %self.id, mode = request.mode.label(), "parameters changed");
            self.request = request;
            self.trajectory = None;
        }
    }

    pub fn set_params(&mut self, circuit: CircuitParams) {
        self.update_request(TrajectoryRequest {
            circuit,
            ..self.request
        });
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.update_request(TrajectoryRequest {
            mode,
            ..self.request
        });
    }

    pub fn set_domain(&mut self, tau_end: f64, samples: usize) {
        self.update_request(TrajectoryRequest {
            tau_end,
            samples,
            ..self.request
        });
    }

    /// Only the play-head rate changes; the trajectory is kept.
    pub fn set_speed(&mut self, speed: f64) {
        self.controller.set_speed(speed);
    }

    /// No-op until a trajectory is held.
    pub fn on_play(&mut self) {
        if self.trajectory.is_none() {
            tracing::warn!(session = %self.id, "play ignored: no trajectory loaded");
            return;
        }
        self.controller.play();
    }

    pub fn on_pause(&mut self) {
        self.controller.pause();
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    pub fn seek(&mut self, position: f64) {
        let tau_end = self
            .trajectory
            .as_ref()
            .map_or(self.request.tau_end, |t| t.tau_end());
        self.controller.seek(position, tau_end);
    }

    /// Apply one command; only `Tick` yields a frame.
    pub fn apply(&mut self, command: Command) -> Option<Frame<'_>> {
        match command {
            Command::Play => self.on_play(),
            Command::Pause => self.on_pause(),
            Command::Reset => self.reset(),
            Command::Seek(position) => self.seek(position),
            Command::Tick => return self.tick(),
        }
        None
    }

    /// Advance one tick; `None` while paused or without a trajectory.
    pub fn tick(&mut self) -> Option<Frame<'_>> {
        let trajectory = self.trajectory.as_deref()?;
        self.controller.tick(trajectory)
    }

    /// Window at the current position.
    pub fn current_frame(&self) -> Option<Frame<'_>> {
        let trajectory = self.trajectory.as_deref()?;
        Some(self.controller.current_frame(trajectory))
    }

    /// Window ending at an arbitrary cut; the play-head does not move.
    pub fn frame_at(&self, cut: f64) -> Option<Frame<'_>> {
        let trajectory = self.trajectory.as_deref()?;
        Some(self.controller.selector().select(trajectory, cut))
    }

    /// Up to `max_ticks` ticks, polling `commands` before each one.
    pub fn run_burst(
        &mut self,
        commands: &Receiver<Command>,
        sink: &mut impl FrameSink,
        max_ticks: usize,
    ) -> BurstOutcome {
        let Some(trajectory) = self.trajectory.as_deref() else {
            // Still honour commands so a queued Pause or Reset is not lost.
            let mut outcome = BurstOutcome::default();
            while let Ok(command) = commands.try_recv() {
                outcome.paused |= command == Command::Pause;
                self.apply(command);
            }
            return outcome;
        };
        run_burst(&mut self.controller, trajectory, commands, sink, max_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.domain.samples = 1_000;
        config.domain.tau_end = 30.0;
        config
    }

    #[test]
    fn play_without_trajectory_is_noop() {
        let mut session = Session::new(TrajectoryService::default(), &small_config());
        session.on_play();
        assert_eq!(session.state(), PlaybackState::Paused);
        assert!(session.tick().is_none());
    }

    #[test]
    fn tick_command_yields_frame() {
        let mut session = Session::new(TrajectoryService::default(), &small_config());
        session.trajectory().unwrap();
        assert!(session.apply(Command::Play).is_none());
        let frame = session.apply(Command::Tick).unwrap();
        assert!((frame.tau_max - 0.04 * 0.3).abs() < 1e-12);
        assert!(session.apply(Command::Pause).is_none());
        assert!(session.apply(Command::Tick).is_none());
    }

    #[test]
    fn non_finite_domain_is_rejected() {
        let mut session = Session::new(TrajectoryService::default(), &small_config());
        session.set_domain(f64::NAN, 100);
        assert!(session.trajectory().is_err());
        session.set_domain(f64::INFINITY, 100);
        assert!(session.trajectory().is_err());
        assert!(session.loaded_trajectory().is_none());
    }

    #[test]
    fn param_change_drops_trajectory() {
        let mut session = Session::new(TrajectoryService::default(), &small_config());
        session.trajectory().unwrap();
        assert!(session.loaded_trajectory().is_some());

        session.set_params(*session.params());
        assert!(session.loaded_trajectory().is_some());

        session.set_mode(Mode::Numerical);
        assert!(session.loaded_trajectory().is_none());
        let tr = session.trajectory().unwrap();
        assert_eq!(tr.mode(), Mode::Numerical);
    }
}
