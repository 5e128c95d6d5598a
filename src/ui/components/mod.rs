pub mod chart_popover;
pub mod computation_panel;
pub mod gate;
pub mod input;
pub mod table;
