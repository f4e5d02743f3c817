use lc_core::{CircuitParams, Mode, defaults};

/// What the user changed this frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControlActions {
    pub circuit_changed: bool,
    pub mode_changed: bool,
    pub speed_changed: bool,
    pub play: bool,
    pub pause: bool,
    pub reset: bool,
}

pub struct ControlsView {
    pub log10_l: f64,
    pub log10_c: f64,
    pub speed: f64,
    pub mode: Mode,
    q0_c: f64,
    i0_a: f64,
}

impl ControlsView {
    pub fn new(circuit: &CircuitParams, mode: Mode, speed: f64) -> Self {
        let [l_min, l_max] = defaults::LOG10_L_RANGE;
        let [c_min, c_max] = defaults::LOG10_C_RANGE;
        Self {
            log10_l: circuit.inductance_h.log10().clamp(l_min, l_max),
            log10_c: circuit.capacitance_f.log10().clamp(c_min, c_max),
            speed: speed.clamp(defaults::SPEED_MIN, defaults::SPEED_MAX),
            mode,
            q0_c: circuit.q0_c,
            i0_a: circuit.i0_a,
        }
    }

    pub fn circuit(&self) -> CircuitParams {
        CircuitParams {
            q0_c: self.q0_c,
            i0_a: self.i0_a,
            ..CircuitParams::from_log10(self.log10_l, self.log10_c)
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, playing: bool) -> ControlActions {
        let mut actions = ControlActions::default();

        ui.heading("Circuit");
        let [l_min, l_max] = defaults::LOG10_L_RANGE;
        let [c_min, c_max] = defaults::LOG10_C_RANGE;
        actions.circuit_changed |= ui
            .add(egui::Slider::new(&mut self.log10_l, l_min..=l_max).text("log₁₀ L [H]"))
            .changed();
        actions.circuit_changed |= ui
            .add(egui::Slider::new(&mut self.log10_c, c_min..=c_max).text("log₁₀ C [F]"))
            .changed();
        let circuit = self.circuit();
        ui.label(format!(
            "L = {:.3e} H, C = {:.3e} F",
            circuit.inductance_h, circuit.capacitance_f
        ));
        if let Ok(omega) = circuit.omega_rad_s() {
            ui.label(format!("ω = {:.4e} rad/s", omega));
        }

        ui.separator();
        ui.heading("Mode");
        ui.horizontal(|ui| {
            for mode in [Mode::Analytical, Mode::Numerical] {
                actions.mode_changed |= ui
                    .radio_value(&mut self.mode, mode, mode.label())
                    .changed();
            }
        });

        ui.separator();
        ui.heading("Playback");
        actions.speed_changed |= ui
            .add(
                egui::Slider::new(
                    &mut self.speed,
                    defaults::SPEED_MIN..=defaults::SPEED_MAX,
                )
                .text("speed"),
            )
            .changed();
        ui.horizontal(|ui| {
            if playing {
                actions.pause |= ui.button("⏸ Pause").clicked();
            } else {
                actions.play |= ui.button("▶ Play").clicked();
            }
            actions.reset |= ui.button("⏮ Reset").clicked();
        });

        actions
    }
}
