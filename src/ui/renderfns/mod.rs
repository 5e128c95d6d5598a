pub mod footer;
pub mod header;
pub mod utils;

pub use footer::draw_footer;
pub use header::draw_header;
pub use utils::{
  efficiency_color, legend_line, slippage_color, stacked_bar, status_color, truncate, wrap_text,
};
