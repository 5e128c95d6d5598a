pub mod components;
pub mod renderfns;

use crate::app::{DashboardState, Screen};
use crate::float;
use crate::model::CellField;
use components::{chart_popover, computation_panel, table};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// What lives under a screen position. Overlays register after the table, so
/// the last match wins on lookup.
#[derive(Debug, Clone)]
pub enum HitTarget {
  /// A selectable issue cell
  Cell { issue_id: String, field: CellField },
  /// A summary field that opens a chart popover
  Summary { id: crate::app::FieldId },
  /// The expand/collapse area of a group header
  GroupToggle { assignee_id: String },
  /// The floating calculator button
  Calculator,
  /// Anywhere inside the computation panel
  Panel,
  /// Anywhere inside the chart popover
  Popover,
}

/// Click targets registered during the last draw
#[derive(Debug, Default)]
pub struct HitMap {
  entries: Vec<(Rect, HitTarget)>,
}

impl HitMap {
  pub fn push(&mut self, rect: Rect, target: HitTarget) {
    self.entries.push((rect, target));
  }

  /// Topmost target under (x, y)
  pub fn hit(&self, x: u16, y: u16) -> Option<(Rect, HitTarget)> {
    self
      .entries
      .iter()
      .rev()
      .find(|(rect, _)| rect.contains(Position { x, y }))
      .map(|(rect, target)| (*rect, target.clone()))
  }
}

/// Main draw function. Returns the hit map for the frame just drawn.
pub fn draw(frame: &mut Frame, screen: &Screen, dash: &mut DashboardState, title: &str) -> HitMap {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let mut hits = HitMap::default();

  match screen {
    Screen::Gate(gate) => {
      renderfns::draw_header(frame, chunks[0], title, true);
      gate.render(frame, chunks[1]);
      renderfns::draw_footer(frame, chunks[2], 0, false, false);
    }
    Screen::Dashboard => {
      renderfns::draw_header(frame, chunks[0], title, false);
      table::render(frame, chunks[1], dash, &mut hits);
      draw_overlays(frame, dash, &mut hits);
      renderfns::draw_footer(
        frame,
        chunks[2],
        dash.selection.len(),
        dash.panel.is_some(),
        dash.popover.is_some(),
      );
    }
  }

  hits
}

/// Floating surfaces: calculator button, computation panel, chart popover
fn draw_overlays(frame: &mut Frame, dash: &DashboardState, hits: &mut HitMap) {
  let viewport = frame.area();

  let calculator = dash
    .selection
    .anchor()
    .filter(|_| dash.calculator_visible())
    .map(|anchor| float::calculator_rect(anchor, viewport));

  if let Some(rect) = calculator {
    frame.render_widget(Clear, rect);
    frame.render_widget(
      Paragraph::new(Span::styled(
        " Σ ",
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
      )),
      rect,
    );
    hits.push(rect, HitTarget::Calculator);
  }

  if let (Some(panel), Some(calc_rect)) = (&dash.panel, calculator) {
    let lines = computation_panel::content(&dash.selection, panel.mode);
    let rect = float::panel_rect(calc_rect, lines.len() as u16 + 2, viewport);
    frame.render_widget(Clear, rect);
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Cyan))
      .title(" Computation ");
    frame.render_widget(Paragraph::new(lines).block(block), rect);
    hits.push(rect, HitTarget::Panel);
  }

  if let Some(popover) = &dash.popover {
    let issues = dash.scoped_issues(&popover.id.scope);
    let lines = chart_popover::content(popover.id.kind, &issues, dash.today, popover.tab);
    let rect = float::popover_rect(popover.anchor, lines.len() as u16 + 2, viewport);
    frame.render_widget(Clear, rect);
    let title = format!(
      " {} · {} ",
      dash.scope_label(&popover.id.scope),
      popover.id.kind.title()
    );
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue))
      .title(renderfns::truncate(&title, float::POPOVER_WIDTH as usize - 2));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
    hits.push(rect, HitTarget::Popover);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_hitmap_last_match_wins() {
    let mut hits = HitMap::default();
    hits.push(Rect::new(0, 0, 50, 10), HitTarget::Calculator);
    hits.push(Rect::new(5, 5, 10, 2), HitTarget::Popover);

    let (_, target) = hits.hit(6, 6).unwrap();
    assert!(matches!(target, HitTarget::Popover));

    let (_, target) = hits.hit(1, 1).unwrap();
    assert!(matches!(target, HitTarget::Calculator));

    assert!(hits.hit(60, 1).is_none());
  }
}
