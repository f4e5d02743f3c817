use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};
use lc_anim::{Frame, FrameSink};
use lc_core::defaults;

/// Owned copy of the last rendered frame.
pub struct PlotView {
    tau_min: f64,
    tau_max: f64,
    y_range: [f64; 2],
    charge: Vec<[f64; 2]>,
    current: Vec<[f64; 2]>,
}

impl Default for PlotView {
    fn default() -> Self {
        Self {
            tau_min: -defaults::WINDOW,
            tau_max: 0.0,
            y_range: defaults::Y_RANGE,
            charge: Vec::new(),
            current: Vec::new(),
        }
    }
}

impl FrameSink for PlotView {
    fn render(&mut self, frame: &Frame<'_>) {
        self.tau_min = frame.tau_min;
        self.tau_max = frame.tau_max;
        self.y_range = frame.y_range;
        self.charge = frame.charge_points();
        self.current = frame.current_points();
    }
}

impl PlotView {
    pub fn clear(&mut self) {
        self.charge.clear();
        self.current.clear();
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let bounds = PlotBounds::from_min_max(
            [self.tau_min, self.y_range[0]],
            [self.tau_max, self.y_range[1]],
        );
        Plot::new("oscillation_plot")
            .legend(Legend::default())
            .x_axis_label("τ")
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(bounds);
                plot_ui.line(Line::new(PlotPoints::from(self.charge.clone())).name("q(τ)"));
                plot_ui.line(Line::new(PlotPoints::from(self.current.clone())).name("i(τ)"));
            });
    }
}
