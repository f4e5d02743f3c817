//! Tick cadence and bounded bursts.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use lc_core::defaults;
use lc_sim::Trajectory;

use crate::controller::{AnimationController, Command};
use crate::window::Frame;

/// Receives each frame produced during a burst.
pub trait FrameSink {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Reports how many ticks are due; never sleeps.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    burst: usize,
    anchor: Option<Instant>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(defaults::TICK_INTERVAL_MS),
            defaults::BURST_TICKS,
        )
    }
}

impl Ticker {
    pub fn new(interval: Duration, burst: usize) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            burst: burst.max(1),
            anchor: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn burst(&self) -> usize {
        self.burst
    }

    /// Start counting from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.anchor = Some(now);
    }

    /// Ticks elapsed since the last call, capped at the burst bound.
    ///
    /// The first call only starts the clock. A backlog beyond the cap is
    /// dropped rather than carried into the next burst.
    pub fn due(&mut self, now: Instant) -> usize {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(now);
            return 0;
        };
        let elapsed = now.saturating_duration_since(anchor);
        let ticks = (elapsed.as_nanos() / self.interval.as_nanos()) as usize;
        if ticks >= self.burst {
            self.anchor = Some(now);
            return self.burst;
        }
        let advanced = u32::try_from(ticks)
            .ok()
            .and_then(|n| self.interval.checked_mul(n))
            .and_then(|d| anchor.checked_add(d));
        self.anchor = Some(advanced.unwrap_or(now));
        ticks
    }

    /// Time until the next tick is due; `Duration::MAX` when the next tick
    /// lies beyond what `Instant` can represent.
    pub fn until_next(&self, now: Instant) -> Duration {
        match self.anchor {
            Some(anchor) => anchor
                .checked_add(self.interval)
                .map_or(Duration::MAX, |next| next.saturating_duration_since(now)),
            None => Duration::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BurstOutcome {
    pub ticks: usize,
    pub frames: usize,
    /// A Pause arrived on the command channel.
    pub paused: bool,
}

/// Run up to `max_ticks` ticks.
///
/// Pending commands are applied before every tick; the burst ends early
/// when a Pause is observed or the controller is otherwise not playing.
pub fn run_burst(
    controller: &mut AnimationController,
    trajectory: &Trajectory,
    commands: &Receiver<Command>,
    sink: &mut impl FrameSink,
    max_ticks: usize,
) -> BurstOutcome {
    let mut outcome = BurstOutcome::default();
    for _ in 0..max_ticks {
        loop {
            match commands.try_recv() {
                Ok(Command::Pause) => {
                    controller.pause();
                    outcome.paused = true;
                }
                // The burst itself supplies the ticks.
                Ok(Command::Tick) => {}
                Ok(command) => {
                    controller.apply(command, trajectory);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        if outcome.paused || !controller.is_playing() {
            break;
        }
        if let Some(frame) = controller.tick(trajectory) {
            sink.render(&frame);
            outcome.frames += 1;
        }
        outcome.ticks += 1;
    }
    tracing::trace!(
        ticks = outcome.ticks,
        paused = outcome.paused,
        position = controller.position(),
        "burst finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use lc_sim::AnalyticalTrajectory;

    use super::*;

    #[test]
    fn due_counts_whole_intervals() {
        let t0 = Instant::now();
        let mut ticker = Ticker::default();
        assert_eq!(ticker.due(t0), 0);
        assert_eq!(ticker.due(t0 + Duration::from_millis(29)), 0);
        assert_eq!(ticker.due(t0 + Duration::from_millis(95)), 3);
        // Remainder is kept: 95 -> 90 anchor, next tick at 120.
        assert_eq!(ticker.until_next(t0 + Duration::from_millis(95)), Duration::from_millis(25));
        assert_eq!(ticker.due(t0 + Duration::from_millis(120)), 1);
    }

    #[test]
    fn due_caps_at_burst() {
        let t0 = Instant::now();
        let mut ticker = Ticker::default();
        ticker.restart(t0);
        assert_eq!(ticker.due(t0 + Duration::from_secs(60)), 200);
        assert_eq!(ticker.due(t0 + Duration::from_secs(60)), 0);
    }

    #[test]
    fn unrepresentable_interval_does_not_overflow() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(Duration::MAX, 1);
        ticker.restart(t0);
        assert_eq!(ticker.due(t0 + Duration::from_secs(3600)), 0);
        assert_eq!(ticker.until_next(t0), Duration::MAX);
    }

    #[derive(Default)]
    struct Recorder(Vec<f64>);

    impl FrameSink for Recorder {
        fn render(&mut self, frame: &Frame<'_>) {
            self.0.push(frame.tau_max);
        }
    }

    #[test]
    fn burst_runs_requested_ticks() {
        let tr = AnalyticalTrajectory::default().generate();
        let mut controller = AnimationController::new(1.0);
        controller.play();
        let (_tx, rx) = channel();
        let mut sink = Recorder::default();

        let out = run_burst(&mut controller, &tr, &rx, &mut sink, 5);
        assert_eq!(
            out,
            BurstOutcome {
                ticks: 5,
                frames: 5,
                paused: false
            }
        );
        assert_eq!(sink.0.len(), 5);
        assert!((controller.position() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn burst_stops_on_pause() {
        let tr = AnalyticalTrajectory::default().generate();
        let mut controller = AnimationController::default();
        let (tx, rx) = channel();
        tx.send(Command::Play).unwrap();

        let mut sink = Recorder::default();
        let out = run_burst(&mut controller, &tr, &rx, &mut sink, 3);
        assert_eq!(out.ticks, 3);

        tx.send(Command::Pause).unwrap();
        let held = controller.position();
        let out = run_burst(&mut controller, &tr, &rx, &mut sink, 200);
        assert!(out.paused);
        assert_eq!(out.ticks, 0);
        assert_eq!(controller.position(), held);
        assert_eq!(sink.0.len(), 3);
    }

    #[test]
    fn paused_controller_runs_nothing() {
        let tr = AnalyticalTrajectory::default().generate();
        let mut controller = AnimationController::default();
        let (_tx, rx) = channel::<Command>();
        let out = run_burst(&mut controller, &tr, &rx, &mut Recorder::default(), 10);
        assert_eq!(out, BurstOutcome::default());
    }
}
