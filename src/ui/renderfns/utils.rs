use crate::analytics::pie::PieSlice;
use crate::model::Status;
use ratatui::prelude::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

/// Display color for an issue status
pub fn status_color(status: Status) -> Color {
  match status {
    Status::Done => Color::Green,
    Status::InProgress => Color::Blue,
    Status::Todo => Color::DarkGray,
  }
}

/// Color for a time/budget usage percentage: red past 120%, yellow past 100%
pub fn efficiency_color(pct: f64) -> Color {
  if pct > 120.0 {
    Color::Red
  } else if pct > 100.0 {
    Color::Yellow
  } else {
    Color::Green
  }
}

/// Color for slippage days: late is red past 3 days, early is green
pub fn slippage_color(days: f64) -> Color {
  if days > 3.0 {
    Color::Red
  } else if days > 0.0 {
    Color::Yellow
  } else if days < 0.0 {
    Color::Green
  } else {
    Color::DarkGray
  }
}

/// A horizontal stand-in for the pie: one colored block run per slice,
/// sized by its fraction of the given width.
pub fn stacked_bar(slices: &[PieSlice], width: u16) -> Line<'static> {
  if slices.is_empty() {
    return Line::from(Span::styled(
      "░".repeat(width as usize),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let mut spans = Vec::with_capacity(slices.len());
  let mut used = 0usize;
  for (idx, slice) in slices.iter().enumerate() {
    let cells = if idx == slices.len() - 1 {
      (width as usize).saturating_sub(used) // last slice absorbs rounding
    } else {
      ((slice.fraction * width as f64).round() as usize).min(width as usize - used)
    };
    used += cells;
    spans.push(Span::styled(
      "█".repeat(cells),
      Style::default().fg(slice.segment.color),
    ));
  }
  Line::from(spans)
}

/// One legend row: colored marker, label, value, percentage
pub fn legend_line(color: Color, label: &str, value: &str, pct: &str) -> Line<'static> {
  Line::from(vec![
    Span::styled("● ", Style::default().fg(color)),
    Span::raw(format!("{:<14}", truncate(label, 14))),
    Span::styled(format!("{:>10}", value), Style::default().bold()),
    Span::styled(format!("{:>6}", pct), Style::default().fg(Color::DarkGray)),
  ])
}

/// Naive word wrap for digest paragraphs
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();
  let mut current = String::new();
  for word in text.split_whitespace() {
    if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
      lines.push(std::mem::take(&mut current));
    }
    if !current.is_empty() {
      current.push(' ');
    }
    current.push_str(word);
  }
  if !current.is_empty() {
    lines.push(current);
  }
  lines
}
