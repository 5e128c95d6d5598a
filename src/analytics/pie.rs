//! Shared pie-segment builder.
//!
//! Every chart feeds `{label, value, color}` triples through [`build_pie`]
//! and gets back slices carrying fractions and arc angles. The angle math
//! exists in exactly one place; renderers are free to use the fractions for
//! proportional bars instead of arcs.

use ratatui::style::Color;

/// One input wedge
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
  pub label: String,
  pub value: f64,
  pub color: Color,
}

impl Segment {
  pub fn new(label: impl Into<String>, value: f64, color: Color) -> Self {
    Segment {
      label: label.into(),
      value,
      color,
    }
  }
}

/// A wedge with its share of the whole. Angles start at 12 o'clock (-90°)
/// and sweep clockwise.
#[derive(Debug, Clone)]
pub struct PieSlice {
  pub segment: Segment,
  pub fraction: f64,
  pub start_angle: f64,
  pub sweep: f64,
}

impl PieSlice {
  pub fn percent(&self) -> u32 {
    (self.sweep / 360.0 * 100.0).round() as u32
  }
}

/// Build slices from segments, dropping empty wedges. Returns an empty list
/// when there is nothing to chart (total is zero or negative).
pub fn build_pie(segments: Vec<Segment>) -> Vec<PieSlice> {
  let segments: Vec<Segment> = segments.into_iter().filter(|s| s.value > 0.0).collect();
  let total: f64 = segments.iter().map(|s| s.value).sum();
  if total <= 0.0 {
    return Vec::new();
  }

  let mut current_angle = -90.0;
  segments
    .into_iter()
    .map(|segment| {
      let fraction = segment.value / total;
      let sweep = fraction * 360.0;
      let slice = PieSlice {
        segment,
        fraction,
        start_angle: current_angle,
        sweep,
      };
      current_angle += sweep;
      slice
    })
    .collect()
}

/// Palette for status-shaped charts
pub fn done_color() -> Color {
  Color::Green
}

pub fn in_progress_color() -> Color {
  Color::Blue
}

pub fn todo_color() -> Color {
  Color::DarkGray
}

pub fn warn_color() -> Color {
  Color::Yellow
}

pub fn danger_color() -> Color {
  Color::Red
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_build_pie_fractions_and_angles() {
    let slices = build_pie(vec![
      Segment::new("a", 1.0, Color::Green),
      Segment::new("b", 3.0, Color::Red),
    ]);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].fraction, 0.25);
    assert_eq!(slices[0].start_angle, -90.0);
    assert_eq!(slices[0].sweep, 90.0);
    assert_eq!(slices[1].start_angle, 0.0);
    assert_eq!(slices[1].sweep, 270.0);
  }

  #[test]
  fn test_build_pie_drops_zero_segments() {
    let slices = build_pie(vec![
      Segment::new("a", 0.0, Color::Green),
      Segment::new("b", 2.0, Color::Red),
    ]);
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].fraction, 1.0);
  }

  #[test]
  fn test_build_pie_empty_when_no_data() {
    assert!(build_pie(Vec::new()).is_empty());
    assert!(build_pie(vec![Segment::new("a", 0.0, Color::Green)]).is_empty());
  }

  #[test]
  fn test_sweeps_cover_full_circle() {
    let slices = build_pie(vec![
      Segment::new("a", 2.0, Color::Green),
      Segment::new("b", 5.0, Color::Blue),
      Segment::new("c", 3.0, Color::Red),
    ]);
    let total: f64 = slices.iter().map(|s| s.sweep).sum();
    assert!((total - 360.0).abs() < 1e-9);
  }
}
