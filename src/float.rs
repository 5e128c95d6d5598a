//! Placement math for floating overlays.
//!
//! All functions are pure over (anchor rect, viewport rect) so the clamping
//! rules can be tested without drawing anything. Distances are in terminal
//! cells. Overlays never fail to place: when an overlay does not fit on its
//! preferred side it flips, and as a last resort it is clamped inside the
//! viewport margins.

use ratatui::layout::Rect;

/// Minimum distance kept from the viewport edges
pub const MARGIN: u16 = 2;
/// Gap between an anchor and the overlay attached to it
pub const GAP: u16 = 1;

/// Calculator button footprint
pub const CALC_WIDTH: u16 = 5;
pub const CALC_HEIGHT: u16 = 1;

/// Computation panel and chart popover widths
pub const PANEL_WIDTH: u16 = 42;
pub const POPOVER_WIDTH: u16 = 42;

fn clamp_x(x: i32, width: u16, viewport: Rect) -> u16 {
  let max_x = (viewport.right() as i32 - width as i32 - MARGIN as i32).max(MARGIN as i32);
  x.clamp(MARGIN as i32, max_x) as u16
}

fn clamp_y(y: i32, height: u16, viewport: Rect) -> u16 {
  let max_y = (viewport.bottom() as i32 - height as i32 - MARGIN as i32).max(MARGIN as i32);
  y.clamp(MARGIN as i32, max_y) as u16
}

/// Place the calculator button just right of the clicked cell, pulled back
/// inside the margin when the cell hugs the right viewport edge.
pub fn calculator_rect(cell: Rect, viewport: Rect) -> Rect {
  let x = clamp_x(cell.right() as i32 + GAP as i32, CALC_WIDTH, viewport);
  let y = clamp_y(cell.y as i32, CALC_HEIGHT, viewport);
  Rect::new(x, y, CALC_WIDTH, CALC_HEIGHT)
}

/// Place the computation panel beside the calculator: right side preferred,
/// flipping to the left when the right side would overflow, clamped inside
/// the margins when neither side has room.
pub fn panel_rect(calculator: Rect, height: u16, viewport: Rect) -> Rect {
  let height = height.min(viewport.height.saturating_sub(2 * MARGIN)).max(3);

  let right_of = calculator.right() as i32 + GAP as i32;
  let x = if right_of + PANEL_WIDTH as i32 + MARGIN as i32 > viewport.right() as i32 {
    calculator.x as i32 - PANEL_WIDTH as i32 - GAP as i32
  } else {
    right_of
  };

  let x = clamp_x(x, PANEL_WIDTH, viewport);
  let y = clamp_y(calculator.y as i32, height, viewport);
  Rect::new(x, y, PANEL_WIDTH.min(viewport.width), height)
}

/// Place a chart popover to the left of the clicked field, clamped to the
/// viewport on every side (a terminal overlay cannot scroll off-screen).
pub fn popover_rect(anchor: Rect, height: u16, viewport: Rect) -> Rect {
  let height = height.min(viewport.height.saturating_sub(2 * MARGIN)).max(3);

  let x = anchor.x as i32 - POPOVER_WIDTH as i32 - GAP as i32;
  let x = clamp_x(x, POPOVER_WIDTH, viewport);
  let y = clamp_y(anchor.y as i32, height, viewport);
  Rect::new(x, y, POPOVER_WIDTH.min(viewport.width), height)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn viewport() -> Rect {
    Rect::new(0, 0, 120, 40)
  }

  #[test]
  fn test_calculator_sits_right_of_cell() {
    let cell = Rect::new(30, 10, 12, 1);
    let calc = calculator_rect(cell, viewport());
    assert_eq!(calc.x, 30 + 12 + GAP);
    assert_eq!(calc.y, 10);
  }

  #[test]
  fn test_calculator_clamped_at_right_edge() {
    let cell = Rect::new(110, 10, 9, 1);
    let calc = calculator_rect(cell, viewport());
    assert_eq!(calc.right() + MARGIN, viewport().right());
  }

  #[test]
  fn test_panel_prefers_right_side() {
    let calc = Rect::new(20, 8, CALC_WIDTH, CALC_HEIGHT);
    let panel = panel_rect(calc, 12, viewport());
    assert_eq!(panel.x, calc.right() + GAP);
    assert_eq!(panel.y, 8);
  }

  #[test]
  fn test_panel_flips_left_when_right_overflows() {
    let calc = Rect::new(100, 8, CALC_WIDTH, CALC_HEIGHT);
    let panel = panel_rect(calc, 12, viewport());
    assert_eq!(panel.right() + GAP, calc.x);
  }

  #[test]
  fn test_panel_clamped_when_neither_side_fits() {
    let narrow = Rect::new(0, 0, PANEL_WIDTH + 6, 40);
    let calc = Rect::new(2, 8, CALC_WIDTH, CALC_HEIGHT);
    let panel = panel_rect(calc, 12, narrow);
    assert!(panel.x >= MARGIN);
    assert!(panel.right() <= narrow.right());
  }

  #[test]
  fn test_popover_opens_left_of_anchor() {
    let anchor = Rect::new(80, 12, 10, 1);
    let pop = popover_rect(anchor, 16, viewport());
    assert_eq!(pop.right() + GAP, anchor.x);
    assert_eq!(pop.y, 12);
  }

  #[test]
  fn test_popover_clamps_left_and_top() {
    let anchor = Rect::new(5, 0, 10, 1);
    let pop = popover_rect(anchor, 16, viewport());
    assert_eq!(pop.x, MARGIN);
    assert_eq!(pop.y, MARGIN);
  }

  #[test]
  fn test_popover_clamps_bottom() {
    let anchor = Rect::new(80, 38, 10, 1);
    let pop = popover_rect(anchor, 16, viewport());
    assert!(pop.bottom() + MARGIN <= viewport().bottom());
  }

  #[test]
  fn test_tall_overlay_shrinks_to_viewport() {
    let anchor = Rect::new(80, 5, 10, 1);
    let pop = popover_rect(anchor, 100, viewport());
    assert!(pop.height <= viewport().height - 2 * MARGIN);
  }
}
