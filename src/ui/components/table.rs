//! The grouped issue table.
//!
//! Rows render as manually assembled span lines so that every cell has a
//! known rectangle. Each frame the table registers those rectangles in the
//! [`HitMap`]; mouse clicks resolve against it instead of any widget-level
//! callback machinery.

use crate::analytics::group::{group_stats, GroupStats};
use crate::analytics::pie::build_pie;
use crate::analytics::rollup::{calculate_rollup, TrackingStatus};
use crate::app::{ChartKind, DashboardState, FieldId, Scope};
use crate::compute::{format_currency, format_date};
use crate::model::{group_by_assignee, AssigneeGroup, CellField, Issue};
use crate::ui::renderfns::{efficiency_color, slippage_color, status_color, truncate};
use crate::ui::{HitMap, HitTarget};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Column labels and widths, in display order
const COLUMNS: &[(&str, u16)] = &[
  ("", 3),
  ("Work", 30),
  ("Status", 13),
  ("Start", 13),
  ("Target", 13),
  ("Due", 13),
  ("Budget", 10),
  ("Pts", 5),
  ("Time", 12),
  ("Slip", 8),
  ("Cmts", 5),
  ("Deps", 5),
];

/// Summary columns that open a chart popover when clicked
const CHART_COLUMNS: &[(usize, ChartKind)] = &[
  (2, ChartKind::Status),
  (3, ChartKind::StartDate),
  (4, ChartKind::TargetDate),
  (5, ChartKind::DueDate),
  (6, ChartKind::Budget),
  (7, ChartKind::StoryPoints),
  (8, ChartKind::TimeTracking),
  (9, ChartKind::Slippage),
  (10, ChartKind::Comments),
  (11, ChartKind::Dependencies),
];

/// Issue-row columns that participate in cell selection
const SELECTABLE_COLUMNS: &[(usize, CellField)] = &[
  (3, CellField::StartDate),
  (4, CellField::TargetDate),
  (5, CellField::DueDate),
  (6, CellField::Budget),
  (7, CellField::StoryPoints),
  (8, CellField::TimeTracking),
  (9, CellField::Slippage),
];

fn col_offset(idx: usize) -> u16 {
  COLUMNS[..idx].iter().map(|c| c.1).sum()
}

fn cell_rect(body: Rect, y: u16, col: usize) -> Rect {
  let x = body.x + col_offset(col);
  if x >= body.right() {
    return Rect::new(body.right(), y, 0, 1);
  }
  Rect::new(x, y, COLUMNS[col].1.min(body.right() - x), 1)
}

/// Append one column's spans, truncated and padded to the column width
/// (minus one trailing separator space).
fn push_cell(spans: &mut Vec<Span<'static>>, texts: &[(String, Style)], width: u16) {
  let mut used = 0usize;
  for (text, style) in texts {
    let avail = (width as usize).saturating_sub(used + 1);
    if avail == 0 {
      break;
    }
    let shown = truncate(text, avail);
    used += shown.chars().count();
    spans.push(Span::styled(shown, *style));
  }
  spans.push(Span::raw(" ".repeat((width as usize).saturating_sub(used))));
}

/// Colored block run showing the status mix of a group
fn status_bar_texts(stats: &GroupStats, width: usize) -> Vec<(String, Style)> {
  let slices = build_pie(stats.status_segments());
  if slices.is_empty() {
    return vec![("-".to_string(), Style::default().fg(Color::DarkGray))];
  }
  let mut texts = Vec::with_capacity(slices.len());
  let mut used = 0usize;
  for (idx, slice) in slices.iter().enumerate() {
    let remaining = width.saturating_sub(used);
    if remaining == 0 {
      break;
    }
    let cells = if idx == slices.len() - 1 {
      remaining
    } else {
      ((slice.fraction * width as f64).round() as usize)
        .max(1)
        .min(remaining)
    };
    used += cells;
    texts.push((
      "█".repeat(cells),
      Style::default().fg(slice.segment.color),
    ));
  }
  texts
}

pub fn render(frame: &mut Frame, area: Rect, dash: &mut DashboardState, hits: &mut HitMap) {
  if area.height < 2 {
    return;
  }

  // Sticky header
  let mut header_spans = Vec::new();
  for (label, width) in COLUMNS {
    push_cell(
      &mut header_spans,
      &[(label.to_string(), Style::default().fg(Color::Gray).bold())],
      *width,
    );
  }
  frame.render_widget(
    Paragraph::new(Line::from(header_spans)).style(Style::default().bg(Color::Black)),
    Rect::new(area.x, area.y, area.width, 1),
  );

  let body = Rect::new(area.x, area.y + 1, area.width, area.height - 1);
  let groups = group_by_assignee(&dash.issues);

  enum Row<'a> {
    Summary,
    Group(&'a AssigneeGroup<'a>),
    Issue(&'a Issue),
  }
  let mut rows: Vec<Row> = vec![Row::Summary];
  for group in &groups {
    rows.push(Row::Group(group));
    if dash.expanded.contains(&group.assignee.id) {
      rows.extend(group.issues.iter().map(|i| Row::Issue(i)));
    }
  }

  // Keep the focused row on screen
  let visible = body.height as usize;
  dash.focus = dash.focus.min(rows.len().saturating_sub(1));
  if dash.focus < dash.scroll {
    dash.scroll = dash.focus;
  }
  if dash.focus >= dash.scroll + visible {
    dash.scroll = dash.focus + 1 - visible;
  }
  dash.scroll = dash.scroll.min(rows.len().saturating_sub(1));

  let all: Vec<&Issue> = dash.issues.iter().collect();
  let global = group_stats(&all);
  let rollup = calculate_rollup(&all);

  for (offset, row) in rows.iter().skip(dash.scroll).take(visible).enumerate() {
    let y = body.y + offset as u16;
    let focused = dash.scroll + offset == dash.focus;
    match row {
      Row::Summary => {
        let label = vec![
          (
            "Summary".to_string(),
            Style::default().fg(Color::White).bold(),
          ),
          (
            format!("  {} items · ", global.total),
            Style::default().fg(Color::DarkGray),
          ),
          (
            rollup.tracking_status.label().to_string(),
            Style::default().fg(match rollup.tracking_status {
              TrackingStatus::OnTrack => Color::Green,
              TrackingStatus::AtRisk => Color::Yellow,
              TrackingStatus::OffTrack => Color::Red,
            }),
          ),
        ];
        let marker = if focused { "▶" } else { " " };
        render_stats_row(
          frame,
          body,
          y,
          dash,
          hits,
          marker,
          label,
          &global,
          Scope::Project,
          None,
        );
      }
      Row::Group(group) => {
        let stats = group_stats(&group.issues);
        let marker = if focused {
          "▶"
        } else if dash.expanded.contains(&group.assignee.id) {
          "▾"
        } else {
          "▸"
        };
        let label = vec![
          (
            group.assignee.name.clone(),
            Style::default().fg(Color::White).bold(),
          ),
          (
            format!(
              "  {} item{} · {}%",
              group.issues.len(),
              if group.issues.len() == 1 { "" } else { "s" },
              stats.completion_pct
            ),
            Style::default().fg(Color::DarkGray),
          ),
        ];
        render_stats_row(
          frame,
          body,
          y,
          dash,
          hits,
          marker,
          label,
          &stats,
          Scope::Assignee(group.assignee.id.clone()),
          Some(&group.assignee.id),
        );
      }
      Row::Issue(issue) => render_issue_row(frame, body, y, issue, dash, hits, focused),
    }
  }
}

#[allow(clippy::too_many_arguments)]
fn render_stats_row(
  frame: &mut Frame,
  body: Rect,
  y: u16,
  dash: &DashboardState,
  hits: &mut HitMap,
  marker: &str,
  label: Vec<(String, Style)>,
  stats: &GroupStats,
  scope: Scope,
  toggle_assignee: Option<&str>,
) {
  let open_field = dash.popover.as_ref().map(|p| &p.id);
  let highlight = Style::default().bg(Color::DarkGray);

  let mut spans = Vec::new();
  push_cell(
    &mut spans,
    &[(format!(" {}", marker), Style::default().fg(Color::Cyan))],
    COLUMNS[0].1,
  );
  push_cell(&mut spans, &label, COLUMNS[1].1);

  for (col, kind) in CHART_COLUMNS {
    let id = FieldId {
      kind: *kind,
      scope: scope.clone(),
    };
    let mut base = cell_style(*kind, stats);
    if open_field == Some(&id) {
      base = base.patch(highlight);
    }
    let texts: Vec<(String, Style)> = match kind {
      ChartKind::Status => status_bar_texts(stats, COLUMNS[*col].1 as usize - 1)
        .into_iter()
        .map(|(t, s)| (t, if open_field == Some(&id) { s.patch(highlight) } else { s }))
        .collect(),
      _ => vec![(cell_text(*kind, stats), base)],
    };
    push_cell(&mut spans, &texts, COLUMNS[*col].1);

    let rect = cell_rect(body, y, *col);
    if rect.width > 0 {
      hits.push(rect, HitTarget::Summary { id });
    }
  }

  let row_rect = Rect::new(body.x, y, body.width, 1);
  frame.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Reset)),
    row_rect,
  );

  // The marker and name area toggles group expansion
  if let Some(assignee_id) = toggle_assignee {
    let toggle_width = (COLUMNS[0].1 + COLUMNS[1].1).min(body.width);
    hits.push(
      Rect::new(body.x, y, toggle_width, 1),
      HitTarget::GroupToggle {
        assignee_id: assignee_id.to_string(),
      },
    );
  }
}

/// Display text for one aggregated summary cell
fn cell_text(kind: ChartKind, stats: &GroupStats) -> String {
  match kind {
    ChartKind::Status => String::new(), // rendered as a bar
    ChartKind::StartDate => stats
      .earliest_start
      .map(format_date)
      .unwrap_or_else(|| "-".to_string()),
    ChartKind::TargetDate => stats
      .latest_target
      .map(format_date)
      .unwrap_or_else(|| "-".to_string()),
    ChartKind::DueDate => stats
      .latest_due
      .map(format_date)
      .unwrap_or_else(|| "-".to_string()),
    ChartKind::Budget => format_currency(stats.total_budget),
    ChartKind::StoryPoints => format!("{}", stats.total_story_points as i64),
    ChartKind::TimeTracking => format!("{:.0}% used", stats.time_usage_pct()),
    ChartKind::Slippage => {
      let days = stats.avg_slippage_days;
      format!("{}{:.0}d", if days > 0.0 { "+" } else { "" }, days)
    }
    ChartKind::Comments => format!("{}", stats.total_comments),
    ChartKind::Dependencies => format!("{}", stats.total_dependencies),
  }
}

fn cell_style(kind: ChartKind, stats: &GroupStats) -> Style {
  match kind {
    ChartKind::TimeTracking => Style::default().fg(efficiency_color(stats.time_usage_pct())),
    ChartKind::Slippage => Style::default().fg(slippage_color(stats.avg_slippage_days)),
    ChartKind::Budget | ChartKind::StoryPoints => Style::default().fg(Color::White).bold(),
    _ => Style::default().fg(Color::Gray),
  }
}

fn render_issue_row(
  frame: &mut Frame,
  body: Rect,
  y: u16,
  issue: &Issue,
  dash: &DashboardState,
  hits: &mut HitMap,
  focused: bool,
) {
  let selected_style = Style::default().bg(Color::DarkGray);
  let mut spans = Vec::new();

  let marker = if focused { "▶" } else { " " };
  push_cell(
    &mut spans,
    &[(format!(" {}", marker), Style::default().fg(Color::Cyan))],
    COLUMNS[0].1,
  );
  push_cell(
    &mut spans,
    &[
      (format!("  {}", issue.key), Style::default().fg(Color::Cyan)),
      (format!(" {}", issue.summary), Style::default().fg(Color::Gray)),
    ],
    COLUMNS[1].1,
  );
  push_cell(
    &mut spans,
    &[(
      issue.status.label().to_string(),
      Style::default().fg(status_color(issue.status)),
    )],
    COLUMNS[2].1,
  );

  for (col, field) in SELECTABLE_COLUMNS {
    let (text, mut style) = issue_cell_text(issue, *field);
    if dash.selection.contains(&issue.id, *field) {
      style = style.patch(selected_style).bold();
    }
    push_cell(&mut spans, &[(text, style)], COLUMNS[*col].1);

    let rect = cell_rect(body, y, *col);
    if rect.width > 0 {
      hits.push(
        rect,
        HitTarget::Cell {
          issue_id: issue.id.clone(),
          field: *field,
        },
      );
    }
  }

  push_cell(
    &mut spans,
    &[(
      if issue.comments > 0 {
        format!("{}", issue.comments)
      } else {
        "-".to_string()
      },
      Style::default().fg(Color::Gray),
    )],
    COLUMNS[10].1,
  );
  push_cell(
    &mut spans,
    &[(
      if issue.dependencies.is_empty() {
        "-".to_string()
      } else {
        format!("{}", issue.dependencies.len())
      },
      Style::default().fg(Color::Gray),
    )],
    COLUMNS[11].1,
  );

  frame.render_widget(
    Paragraph::new(Line::from(spans)),
    Rect::new(body.x, y, body.width, 1),
  );
}

/// Display text and base style for one selectable issue cell
fn issue_cell_text(issue: &Issue, field: CellField) -> (String, Style) {
  let gray = Style::default().fg(Color::Gray);
  let dim = Style::default().fg(Color::DarkGray);
  match field {
    CellField::StartDate => match issue.actual_start_date {
      Some(date) => (format_date(date), gray),
      None => ("None".to_string(), dim),
    },
    CellField::TargetDate => (format_date(issue.target_date), gray),
    CellField::DueDate => (format_date(issue.due_date), gray),
    CellField::Budget => match issue.budget {
      Some(budget) => (format_currency(budget), gray),
      None => ("-".to_string(), dim),
    },
    CellField::StoryPoints => match issue.story_points {
      Some(points) => (format!("{}", points as i64), Style::default().fg(Color::White).bold()),
      None => ("-".to_string(), dim),
    },
    CellField::TimeTracking => match issue.time_efficiency_pct() {
      Some(pct) => (
        format!("{:.0}% ({}h)", pct, issue.time_spent.unwrap_or(0.0) as i64),
        Style::default().fg(efficiency_color(pct)),
      ),
      None => ("-".to_string(), dim),
    },
    CellField::Slippage => match issue.slippage_days() {
      Some(days) => (
        format!("{}{}d", if days > 0 { "+" } else { "" }, days),
        Style::default().fg(slippage_color(days as f64)),
      ),
      None => ("-".to_string(), dim),
    },
  }
}
