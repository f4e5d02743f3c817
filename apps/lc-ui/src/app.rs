use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use lc_anim::{Command, FrameSink, PlaybackState, Ticker};
use lc_app::{Session, SimConfig, TrajectoryService};

use crate::views::{ControlActions, ControlsView, PlotView};

pub struct OscillatorApp {
    session: Session,
    controls: ControlsView,
    plot_view: PlotView,
    ticker: Ticker,
    commands_tx: Sender<Command>,
    commands_rx: Receiver<Command>,
    status: Option<String>,
    last_error: Option<String>,
}

impl OscillatorApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: SimConfig,
        load_error: Option<String>,
    ) -> Self {
        let service = TrajectoryService::from_config(&config);
        let session = Session::new(service, &config);
        let controls = ControlsView::new(&config.circuit, config.mode, config.animation.speed);
        let ticker = Ticker::new(
            Duration::from_millis(config.animation.tick_interval_ms),
            config.animation.burst_ticks,
        );
        let (commands_tx, commands_rx) = channel();

        let mut app = Self {
            session,
            controls,
            plot_view: PlotView::default(),
            ticker,
            commands_tx,
            commands_rx,
            status: None,
            last_error: load_error,
        };
        app.refresh_trajectory();
        app
    }

    /// Fetch the trajectory for the current parameters and redraw the window.
    fn refresh_trajectory(&mut self) {
        match self.session.trajectory() {
            Ok(trajectory) => {
                self.status = Some(format!(
                    "{}: {} samples, τ ∈ [0, {:.1}]",
                    trajectory.mode().label(),
                    trajectory.len(),
                    trajectory.tau_end()
                ));
                self.last_error = None;
                self.redraw_current();
            }
            Err(e) => {
                self.session.on_pause();
                self.plot_view.clear();
                self.status = None;
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn redraw_current(&mut self) {
        if let Some(frame) = self.session.current_frame() {
            self.plot_view.render(&frame);
        }
    }

    fn send(&self, command: Command) {
        // The receiver lives as long as the app.
        let _ = self.commands_tx.send(command);
    }

    fn handle_actions(&mut self, actions: ControlActions) {
        if actions.circuit_changed {
            self.session.set_params(self.controls.circuit());
        }
        if actions.mode_changed {
            self.session.set_mode(self.controls.mode);
        }
        if actions.circuit_changed || actions.mode_changed {
            self.refresh_trajectory();
        }
        if actions.speed_changed {
            self.session.set_speed(self.controls.speed);
        }
        if actions.play {
            if self.session.loaded_trajectory().is_none() {
                self.refresh_trajectory();
            }
            self.send(Command::Play);
        }
        if actions.pause {
            self.send(Command::Pause);
        }
        if actions.reset {
            self.send(Command::Reset);
        }
    }

    fn advance(&mut self, now: Instant) {
        if self.session.state() == PlaybackState::Paused {
            let mut changed = false;
            while let Ok(command) = self.commands_rx.try_recv() {
                self.session.apply(command);
                changed = true;
            }
            if changed {
                self.ticker.restart(now);
                self.redraw_current();
            }
            return;
        }

        let due = self.ticker.due(now);
        let outcome = self
            .session
            .run_burst(&self.commands_rx, &mut self.plot_view, due);
        if outcome.frames == 0 {
            // Commands like Reset or Seek move the play-head without a tick.
            self.redraw_current();
        }
    }
}

impl eframe::App for OscillatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let playing = self.session.state() == PlaybackState::Playing;

        let actions = egui::SidePanel::left("controls")
            .default_width(280.0)
            .show(ctx, |ui| {
                let actions = self.controls.show(ui, playing);
                ui.separator();
                ui.label(format!("τ = {:.2}", self.session.position()));
                if let Some(status) = &self.status {
                    ui.label(status);
                }
                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                actions
            })
            .inner;
        self.handle_actions(actions);

        let now = Instant::now();
        self.advance(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot_view.show(ui);
        });

        if self.session.state() == PlaybackState::Playing {
            ctx.request_repaint_after(self.ticker.until_next(now));
        }
    }
}
