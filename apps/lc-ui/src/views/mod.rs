pub mod controls_view;
pub mod plot_view;

pub use controls_view::{ControlActions, ControlsView};
pub use plot_view::PlotView;
