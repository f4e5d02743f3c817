//! End-to-end playback through the service layer.
//!
//! Checks that:
//! - play is ignored until a trajectory is held
//! - ticks advance by 0.04 × speed and frames end at the play-head
//! - pause holds the play-head
//! - sessions sharing a service reuse one cached trajectory
//! - a burst stops when Pause arrives on the command channel

use std::sync::Arc;
use std::sync::mpsc::channel;

use lc_anim::{Command, Frame, FrameSink, PlaybackState};
use lc_app::{AppError, Session, SimConfig, TrajectoryService};
use lc_core::{CircuitParams, Mode};

#[derive(Default)]
struct CountingSink {
    frames: usize,
    last_tau_max: f64,
}

impl FrameSink for CountingSink {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        self.last_tau_max = frame.tau_max;
    }
}

#[test]
fn ticks_follow_speed() {
    let mut config = SimConfig::default();
    config.animation.speed = 0.5;
    let mut session = Session::new(TrajectoryService::default(), &config);

    session.on_play();
    assert_eq!(session.state(), PlaybackState::Paused);

    session.trajectory().unwrap();
    session.on_play();
    for _ in 0..10 {
        let frame = session.tick().unwrap();
        assert!(frame.tau.iter().all(|&t| t <= frame.tau_max));
    }
    assert!((session.position() - 0.2).abs() < 1e-12);

    session.on_pause();
    for _ in 0..5 {
        assert!(session.tick().is_none());
    }
    assert!((session.position() - 0.2).abs() < 1e-12);

    let frame = session.current_frame().unwrap();
    assert_eq!(frame.tau_max, session.position());
    assert_eq!(frame.y_range, [-1.1, 1.1]);
}

#[test]
fn sessions_share_cached_trajectories() {
    let service = TrajectoryService::default();
    let mut config = SimConfig::default();
    config.mode = Mode::Numerical;
    config.domain.tau_end = 60.0;

    let mut a = Session::new(service.clone(), &config);
    let mut b = Session::new(service.clone(), &config);
    assert_ne!(a.id(), b.id());

    let ta = a.trajectory().unwrap();
    let tb = b.trajectory().unwrap();
    assert!(Arc::ptr_eq(&ta, &tb));
    assert_eq!(service.cache().computations(), 1);
}

#[test]
fn burst_honours_pause() {
    let mut session = Session::new(TrajectoryService::default(), &SimConfig::default());
    session.trajectory().unwrap();

    let (tx, rx) = channel();
    let mut sink = CountingSink::default();
    tx.send(Command::Play).unwrap();
    let out = session.run_burst(&rx, &mut sink, 200);
    assert_eq!(out.ticks, 200);
    assert_eq!(sink.frames, 200);
    assert_eq!(sink.last_tau_max, session.position());

    tx.send(Command::Pause).unwrap();
    let out = session.run_burst(&rx, &mut sink, 200);
    assert!(out.paused);
    assert_eq!(out.ticks, 0);
    assert_eq!(session.state(), PlaybackState::Paused);
}

#[test]
fn invalid_parameters_surface_and_session_survives() {
    let mut config = SimConfig::default();
    config.mode = Mode::Numerical;
    config.domain.tau_end = 20.0;
    let mut session = Session::new(TrajectoryService::default(), &config);

    session.set_params(CircuitParams {
        inductance_h: -1.0,
        ..CircuitParams::default()
    });
    assert!(matches!(
        session.trajectory(),
        Err(AppError::InvalidParameter(_))
    ));
    session.on_play();
    assert_eq!(session.state(), PlaybackState::Paused);

    session.set_params(CircuitParams::default());
    session.trajectory().unwrap();
    session.on_play();
    assert_eq!(session.state(), PlaybackState::Playing);
}
