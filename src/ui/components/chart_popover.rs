//! Chart popover contents, one renderer per analytic domain.
//!
//! Every renderer consumes a pure summary from the analytics modules and
//! emits plain lines; pies become a stacked proportion bar plus a legend.
//! Empty summaries render their stock message instead of an empty chart.

use crate::analytics::deps::RiskLevel;
use crate::analytics::pie::Segment;
use crate::analytics::rollup::{calculate_rollup, TrackingStatus};
use crate::analytics::slippage::SlippageSeverity;
use crate::analytics::{budget, comments, dates, deps, pie, points, slippage, time};
use crate::app::ChartKind;
use crate::compute::{format_currency, format_date};
use crate::model::{Issue, Status};
use crate::ui::renderfns::{
  efficiency_color, legend_line, slippage_color, stacked_bar, truncate, wrap_text,
};
use chrono::NaiveDate;
use ratatui::prelude::*;

const BAR_WIDTH: u16 = 38;
const TEXT_WIDTH: usize = 38;
const LIST_LIMIT: usize = 5;

pub fn content(
  kind: ChartKind,
  issues: &[&Issue],
  today: NaiveDate,
  tab: usize,
) -> Vec<Line<'static>> {
  let mut lines = Vec::new();
  if kind.tab_count() > 1 {
    lines.push(tabs_line(kind, tab));
    lines.push(Line::default());
  }

  match kind {
    ChartKind::Status => status_chart(&mut lines, issues),
    ChartKind::StartDate => start_date_chart(&mut lines, issues, today, tab),
    ChartKind::TargetDate => target_chart(&mut lines, issues, today),
    ChartKind::DueDate => due_date_chart(&mut lines, issues, today, tab),
    ChartKind::Budget => budget_chart(&mut lines, issues, tab),
    ChartKind::StoryPoints => points_chart(&mut lines, issues, tab),
    ChartKind::TimeTracking => time_chart(&mut lines, issues, tab),
    ChartKind::Slippage => slippage_chart(&mut lines, issues, tab),
    ChartKind::Dependencies => deps_chart(&mut lines, issues, today),
    ChartKind::Comments => comments_chart(&mut lines, issues, tab),
  }
  lines
}

fn tabs_line(kind: ChartKind, tab: usize) -> Line<'static> {
  let mut spans = Vec::new();
  for (idx, label) in kind.tab_labels().iter().enumerate() {
    if idx > 0 {
      spans.push(Span::raw("  "));
    }
    let style = if idx == tab {
      Style::default().fg(Color::Blue).bold()
    } else {
      Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled(format!("[{}]", label), style));
  }
  Line::from(spans)
}

fn heading(text: &str) -> Line<'static> {
  Line::from(Span::styled(text.to_string(), Style::default().bold()))
}

fn dim(text: impl Into<String>) -> Line<'static> {
  Line::from(Span::styled(
    text.into(),
    Style::default().fg(Color::DarkGray),
  ))
}

fn colored(text: impl Into<String>, color: Color) -> Line<'static> {
  Line::from(Span::styled(text.into(), Style::default().fg(color)))
}

fn empty_state(lines: &mut Vec<Line<'static>>, message: &str, hint: &str) {
  lines.push(colored(message.to_string(), Color::Gray));
  lines.push(dim(hint.to_string()));
}

fn status_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue]) {
  let rollup = calculate_rollup(issues);
  if rollup.total_issues == 0 {
    empty_state(lines, "No items to display", "Add work items to this group");
    return;
  }

  let slices = pie::build_pie(vec![
    Segment::new("To do", rollup.todo as f64, pie::todo_color()),
    Segment::new(
      "In progress",
      rollup.in_progress as f64,
      pie::in_progress_color(),
    ),
    Segment::new("Done", rollup.done as f64, pie::done_color()),
  ]);
  lines.push(stacked_bar(&slices, BAR_WIDTH));
  lines.push(Line::default());
  for slice in &slices {
    lines.push(legend_line(
      slice.segment.color,
      &slice.segment.label,
      &format!("{}", slice.segment.value as i64),
      &format!("{}%", slice.percent()),
    ));
  }
  lines.push(Line::default());
  lines.push(dim(format!(
    "{} of {} items done ({:.0}%)",
    rollup.done,
    rollup.total_issues,
    rollup.done as f64 / rollup.total_issues as f64 * 100.0
  )));
  if rollup.total_effort > 0.0 {
    lines.push(dim(format!(
      "{}h effort · {}h remaining · {} people",
      rollup.total_effort as i64,
      rollup.total_effort_remaining as i64,
      rollup.unique_assignees.len()
    )));
    let color = match rollup.tracking_status {
      TrackingStatus::OnTrack => Color::Green,
      TrackingStatus::AtRisk => Color::Yellow,
      TrackingStatus::OffTrack => Color::Red,
    };
    lines.push(colored(rollup.tracking_status.label(), color));
  }
}

fn start_date_chart(
  lines: &mut Vec<Line<'static>>,
  issues: &[&Issue],
  today: NaiveDate,
  tab: usize,
) {
  if tab == 1 {
    timeline_section(lines, issues, |i| i.effective_start(), today, false);
    return;
  }

  let insights = dates::start_date_insights(issues, today);
  let health_color = if insights.health_score >= 80 {
    Color::Green
  } else if insights.health_score >= 50 {
    Color::Yellow
  } else {
    Color::Red
  };
  lines.push(Line::from(vec![
    Span::raw("Health score: "),
    Span::styled(
      format!("{}%", insights.health_score),
      Style::default().fg(health_color).bold(),
    ),
  ]));
  lines.push(Line::default());
  lines.push(colored(
    format!(
      "Delayed starts: {} ({} pts, {}h at risk)",
      insights.delayed_start, insights.delayed_story_points as i64, insights.delayed_effort as i64
    ),
    if insights.delayed_start > 0 {
      Color::Red
    } else {
      Color::Gray
    },
  ));
  lines.push(colored(
    format!("Not started yet: {}", insights.not_started_yet),
    Color::Gray,
  ));
  lines.push(colored(
    format!("Missing actual starts: {}", insights.missing_actual_start),
    Color::Gray,
  ));
  lines.push(Line::default());
  lines.push(heading("Workload"));
  for load in insights.by_assignee.iter().take(LIST_LIMIT) {
    let (note, style) = if load.delayed > 0 {
      (
        format!("{} delayed", load.delayed),
        Style::default().fg(Color::Red),
      )
    } else {
      (
        format!("{} queued", load.not_started),
        Style::default().fg(Color::Gray),
      )
    };
    lines.push(Line::from(vec![
      Span::styled(
        format!(
          "  {:<12} {} items · {} pts · ",
          truncate(load.assignee.short_name(), 12),
          load.total_items,
          load.story_points as i64
        ),
        Style::default().fg(Color::Gray),
      ),
      Span::styled(note, style),
    ]));
  }
}

fn due_date_chart(
  lines: &mut Vec<Line<'static>>,
  issues: &[&Issue],
  today: NaiveDate,
  tab: usize,
) {
  if tab == 1 {
    timeline_section(lines, issues, |i| i.due_date, today, true);
    return;
  }

  let overdue: Vec<&&Issue> = issues
    .iter()
    .filter(|i| i.due_date < today && i.status != Status::Done)
    .collect();
  let week_ahead = today + chrono::Days::new(7);
  let due_soon = issues
    .iter()
    .filter(|i| i.status != Status::Done && i.due_date >= today && i.due_date <= week_ahead)
    .count();

  lines.push(colored(
    format!("Overdue: {}", overdue.len()),
    if overdue.is_empty() {
      Color::Green
    } else {
      Color::Red
    },
  ));
  lines.push(colored(format!("Due within 7 days: {}", due_soon), Color::Gray));
  if !overdue.is_empty() {
    lines.push(Line::default());
    lines.push(heading("Past due"));
    for issue in overdue.iter().take(LIST_LIMIT) {
      let days = today.signed_duration_since(issue.due_date).num_days();
      lines.push(colored(
        format!("  {:<9} {}  +{}d", issue.key, format_date(issue.due_date), days),
        Color::Red,
      ));
    }
  }
}

fn timeline_section<F>(
  lines: &mut Vec<Line<'static>>,
  issues: &[&Issue],
  date_of: F,
  today: NaiveDate,
  count_overdue: bool,
) where
  F: Fn(&Issue) -> NaiveDate,
{
  let days = dates::timeline(issues, date_of, today, count_overdue);
  if days.is_empty() {
    empty_state(lines, "No dates to chart", "Add scheduled work items");
    return;
  }

  let first = days[0].date;
  let last = days[days.len() - 1].date;
  lines.push(dim(format!(
    "{} to {}, {} days",
    format_date(first),
    format_date(last),
    days.len()
  )));
  lines.push(Line::default());

  let active: Vec<&dates::TimelineDay> = days.iter().filter(|d| d.count > 0).collect();
  for day in active.iter().take(8) {
    let bar = "█".repeat(day.count.min(20));
    let date_style = if day.month_start {
      Style::default().fg(Color::White).bold()
    } else {
      Style::default().fg(Color::Gray)
    };
    let mut spans = vec![
      Span::styled(
        format!("  {:<7}", day.date.format("%b %d").to_string()),
        date_style,
      ),
      Span::styled(bar, Style::default().fg(Color::Blue)),
      Span::raw(format!(" {}", day.count)),
    ];
    if day.overdue > 0 {
      spans.push(Span::styled(
        format!("  {} overdue", day.overdue),
        Style::default().fg(Color::Red),
      ));
    }
    lines.push(Line::from(spans));
  }
  if active.len() > 8 {
    lines.push(dim(format!("  +{} more active days", active.len() - 8)));
  }
}

fn target_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue], today: NaiveDate) {
  let summary = dates::target_tracking_summary(issues, today);
  if summary.total_tracked == 0 {
    empty_state(lines, "No target dates", "Set target dates to track delivery");
    return;
  }

  let color = if summary.on_track_pct >= 80 {
    Color::Green
  } else if summary.on_track_pct >= 50 {
    Color::Yellow
  } else {
    Color::Red
  };
  lines.push(Line::from(vec![
    Span::styled(
      format!("{}/{} on track", summary.on_track, summary.total_tracked),
      Style::default().fg(color).bold(),
    ),
    Span::styled(
      format!("  ({}%)", summary.on_track_pct),
      Style::default().fg(Color::DarkGray),
    ),
  ]));
  if let Some(latest) = summary.latest_target {
    lines.push(dim(format!("Latest target: {}", format_date(latest))));
  }
  lines.push(Line::default());

  if summary.off_track_items.is_empty() {
    lines.push(colored("All items tracking to target", Color::Green));
    return;
  }
  lines.push(heading(&format!("Off track ({})", summary.off_track)));
  for item in summary.off_track_items.iter().take(LIST_LIMIT + 1) {
    let color = if item.days_overdue > 0 {
      Color::Red
    } else {
      Color::Yellow
    };
    lines.push(colored(
      format!("  {:<9} {}", item.issue_key, item.reason.message()),
      color,
    ));
  }
}

fn budget_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue], tab: usize) {
  let summary = budget::budget_summary(issues);
  if !summary.has_data() {
    empty_state(
      lines,
      "No budget allocated",
      "Add budget information to track spending",
    );
    return;
  }

  if tab == 0 {
    let slices = pie::build_pie(summary.status_segments());
    lines.push(stacked_bar(&slices, BAR_WIDTH));
    lines.push(Line::default());
    for slice in &slices {
      lines.push(legend_line(
        slice.segment.color,
        &slice.segment.label,
        &format_currency(slice.segment.value),
        &format!("{}%", slice.percent()),
      ));
    }
    lines.push(Line::default());
    lines.push(dim(format!(
      "{:.0}% of budget delivered",
      summary.completion_rate_pct
    )));
    lines.push(Line::default());
    lines.push(heading("Budget by Assignee"));
    for entry in summary.by_assignee.iter().take(4) {
      let share = if summary.total > 0.0 {
        entry.total / summary.total * 100.0
      } else {
        0.0
      };
      let mix = pie::build_pie(vec![
        Segment::new("Done", entry.completed, pie::done_color()),
        Segment::new("In progress", entry.in_progress, pie::in_progress_color()),
        Segment::new("To do", entry.todo, pie::todo_color()),
      ]);
      let mut spans = vec![
        Span::styled(
          format!("  {:<10}", truncate(entry.assignee.short_name(), 10)),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(
          format!("{:>9}", format_currency(entry.total)),
          Style::default().bold(),
        ),
        Span::styled(
          format!("  {:.0}%  ", share),
          Style::default().fg(Color::DarkGray),
        ),
      ];
      spans.extend(stacked_bar(&mix, 8).spans);
      lines.push(Line::from(spans));
    }
    return;
  }

  // Efficiency view
  lines.push(dim(format!("Based on a ${:.0}/hour rate", budget::HOURLY_RATE)));
  lines.push(Line::default());
  if summary.efficiency.is_empty() {
    empty_state(lines, "No time tracking data", "Log time against budgeted items");
    return;
  }
  let slices = pie::build_pie(summary.efficiency_segments());
  lines.push(stacked_bar(&slices, BAR_WIDTH));
  lines.push(Line::default());
  for slice in &slices {
    lines.push(legend_line(
      slice.segment.color,
      &slice.segment.label,
      &format!("{} items", slice.segment.value as i64),
      &format!("{}%", slice.percent()),
    ));
  }
  lines.push(Line::default());
  lines.push(heading("Item Details"));
  for entry in summary.efficiency.iter().take(LIST_LIMIT) {
    let over = entry.variance > 0.0;
    lines.push(Line::from(vec![
      Span::styled(
        format!("  {:<9}", entry.issue_key),
        Style::default().fg(Color::Gray),
      ),
      Span::styled(
        format!("{:>4.0}%", entry.efficiency_pct),
        Style::default().fg(efficiency_color(entry.efficiency_pct)),
      ),
      Span::styled(
        format!(
          "  {}h/{}h · {} {}",
          entry.actual_hours as i64,
          entry.budgeted_hours as i64,
          format_currency(entry.variance.abs()),
          if over { "over" } else { "under" }
        ),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
  }
}

fn points_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue], tab: usize) {
  let summary = points::story_point_summary(issues);
  if !summary.has_data() {
    empty_state(
      lines,
      "No story points assigned",
      "Add story points for velocity tracking",
    );
    return;
  }

  if tab == 0 {
    let slices = pie::build_pie(summary.status_segments());
    lines.push(stacked_bar(&slices, BAR_WIDTH));
    lines.push(Line::default());
    for slice in &slices {
      lines.push(legend_line(
        slice.segment.color,
        &slice.segment.label,
        &format!("{} pts", slice.segment.value as i64),
        &format!("{}%", slice.percent()),
      ));
    }
    lines.push(Line::default());
    lines.push(dim(format!(
      "{:.0}% of points delivered",
      summary.completion_rate_pct
    )));
    lines.push(Line::default());
    lines.push(heading("Team Velocity"));
    for person in summary.velocity.iter().take(4) {
      let mix = pie::build_pie(vec![
        Segment::new("Done", person.completed, pie::done_color()),
        Segment::new("In progress", person.in_progress, pie::in_progress_color()),
        Segment::new("To do", person.todo, pie::todo_color()),
      ]);
      let mut spans = vec![
        Span::styled(
          format!("  {:<10}", truncate(person.assignee.short_name(), 10)),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(
          format!("{:>3} pts done", person.completed as i64),
          Style::default().bold(),
        ),
        Span::styled(
          format!("  {:.0}%  ", person.utilization_pct),
          Style::default().fg(Color::DarkGray),
        ),
      ];
      spans.extend(stacked_bar(&mix, 8).spans);
      lines.push(Line::from(spans));
    }
    return;
  }

  lines.push(heading("Story Complexity"));
  for bucket in &summary.complexity {
    lines.push(Line::from(vec![
      Span::styled(format!("  {:<11}", bucket.label), Style::default().fg(Color::Gray)),
      Span::styled(
        format!("{:>3} pts", bucket.points as i64),
        Style::default().bold(),
      ),
      Span::styled(
        format!(
          "  {} stor{}",
          bucket.count,
          if bucket.count == 1 { "y" } else { "ies" }
        ),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
  }
  lines.push(Line::default());
  lines.push(dim(format!(
    "Average story size: {:.1} pts",
    summary.average_story_size
  )));
}

fn time_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue], tab: usize) {
  let summary = time::time_tracking_summary(issues);
  if !summary.has_data() {
    empty_state(lines, "No time tracking data", "Add time estimates to track usage");
    return;
  }

  if tab == 0 {
    let slices = pie::build_pie(summary.spent_segments());
    lines.push(stacked_bar(&slices, BAR_WIDTH));
    lines.push(Line::default());
    for slice in &slices {
      lines.push(legend_line(
        slice.segment.color,
        &slice.segment.label,
        &format!("{}h", slice.segment.value as i64),
        &format!("{}%", slice.percent()),
      ));
    }
    return;
  }

  lines.push(heading("Team Capacity"));
  let mut by_usage: Vec<&time::AssigneeTime> = summary.by_assignee.iter().collect();
  by_usage.sort_by(|a, b| b.capacity_usage_pct().total_cmp(&a.capacity_usage_pct()));
  for person in by_usage.iter().take(LIST_LIMIT) {
    let status = person.capacity_status();
    let color = match status {
      time::CapacityStatus::OverAllocated => Color::Red,
      time::CapacityStatus::UnderAllocated => Color::Yellow,
      time::CapacityStatus::Optimal => Color::Green,
    };
    lines.push(Line::from(vec![
      Span::styled(
        format!("  {:<12}", truncate(person.assignee.short_name(), 12)),
        Style::default().fg(Color::Gray),
      ),
      Span::styled(
        format!("{:>4.0}% load", person.capacity_usage_pct()),
        Style::default().fg(color),
      ),
      Span::styled(
        format!(
          "  {} active · {} done",
          person.active_workload(),
          person.completed_issues
        ),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
  }
  lines.push(Line::default());
  if !summary.delivery.is_empty() {
    lines.push(heading("Delivery Record"));
    for record in summary.delivery.iter().take(LIST_LIMIT) {
      lines.push(Line::from(vec![
        Span::styled(
          format!("  {:<12}", truncate(record.assignee.short_name(), 12)),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(format!("{} early", record.early), Style::default().fg(Color::Green)),
        Span::styled(
          format!(" · {} on time", record.on_time),
          Style::default().fg(Color::Blue),
        ),
        Span::styled(
          format!(" · {} late", record.late),
          Style::default().fg(if record.late > 0 { Color::Red } else { Color::DarkGray }),
        ),
        Span::styled(
          format!(" ({})", record.total),
          Style::default().fg(Color::DarkGray),
        ),
      ]));
    }
    lines.push(Line::default());
  }
  for (status, count) in summary.capacity_counts() {
    let color = match status {
      time::CapacityStatus::OverAllocated => Color::Red,
      time::CapacityStatus::UnderAllocated => Color::Yellow,
      time::CapacityStatus::Optimal => Color::Green,
    };
    lines.push(Line::from(vec![
      Span::styled("● ", Style::default().fg(color)),
      Span::raw(format!("{:<16}", status.label())),
      Span::styled(format!("{}", count), Style::default().bold()),
    ]));
  }
  lines.push(Line::default());
  lines.push(dim(format!(
    "Estimated work: {}h of {}h weekly capacity",
    (summary.total_original_estimate + summary.total_remaining) as i64,
    summary.by_assignee.len() * time::WEEKLY_CAPACITY_HOURS as usize,
  )));
  lines.push(Line::from(vec![
    Span::styled("Utilization: ", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!("{:.0}%", summary.hours_used_pct),
      Style::default().fg(efficiency_color(summary.hours_used_pct)),
    ),
  ]));
}

fn slippage_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue], tab: usize) {
  let summary = slippage::slippage_summary(issues);
  if !summary.has_data {
    empty_state(
      lines,
      "No completed items",
      "Complete items to track delivery slippage",
    );
    return;
  }

  if tab == 0 {
    lines.push(heading("Delivery Performance"));
    let slices = pie::build_pie(summary.category_segments());
    lines.push(stacked_bar(&slices, BAR_WIDTH));
    lines.push(Line::default());
    for slice in &slices {
      lines.push(legend_line(
        slice.segment.color,
        &slice.segment.label,
        &format!("{} items", slice.segment.value as i64),
        &format!("{}%", slice.percent()),
      ));
    }
    lines.push(Line::default());
    lines.push(dim(format!(
      "On-time delivery: {:.0}%",
      summary.on_time_delivery_rate_pct
    )));
    lines.push(Line::from(vec![
      Span::styled("Average slippage: ", Style::default().fg(Color::DarkGray)),
      Span::styled(
        format!("{:+.1}d", summary.avg_days),
        Style::default().fg(slippage_color(summary.avg_days)),
      ),
    ]));
    lines.push(dim(format!(
      "Late items average {:.1}d · {}d total variance",
      summary.late.avg_days, summary.total_variance_days
    )));
    if !summary.risk_factors.is_empty() {
      lines.push(Line::default());
      lines.push(heading("Risk Factors"));
      for risk in &summary.risk_factors {
        lines.push(colored(format!("  {}", risk.message()), Color::Red));
      }
    }
    return;
  }

  lines.push(heading("Team Delivery Trends"));
  for person in summary.by_assignee.iter().take(LIST_LIMIT) {
    lines.push(Line::from(vec![
      Span::styled(
        format!("  {:<12}", truncate(person.assignee.short_name(), 12)),
        Style::default().fg(Color::Gray),
      ),
      Span::styled(
        format!("{:+.1}d avg", person.avg_days),
        Style::default().fg(slippage_color(person.avg_days)),
      ),
      Span::styled(
        format!("  {} completed", person.completed),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
  }
  let largest = summary.largest_slippages();
  if !largest.is_empty() {
    lines.push(Line::default());
    lines.push(heading("Largest Slippages"));
    for entry in largest.iter().take(LIST_LIMIT) {
      let color = match entry.severity {
        SlippageSeverity::Severe => Color::Red,
        SlippageSeverity::Moderate => Color::Yellow,
        SlippageSeverity::Good => Color::Green,
      };
      lines.push(Line::from(vec![
        Span::styled(
          format!("  {:<9}", entry.issue_key),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(format!("+{}d late", entry.days), Style::default().fg(color)),
        Span::styled(
          format!("  {:.0}% over target", entry.pct_of_duration),
          Style::default().fg(Color::DarkGray),
        ),
      ]));
    }
  }
}

fn deps_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue], today: NaiveDate) {
  let summary = deps::dependency_summary(issues, today);
  if !summary.has_data() {
    empty_state(lines, "No dependencies", "All work is independent");
    return;
  }

  lines.push(heading("Dependency Types"));
  let slices = pie::build_pie(summary.kind_segments());
  lines.push(stacked_bar(&slices, BAR_WIDTH));
  lines.push(Line::default());
  for slice in &slices {
    lines.push(legend_line(
      slice.segment.color,
      &slice.segment.label,
      &format!("{}", slice.segment.value as i64),
      &format!("{}%", slice.percent()),
    ));
  }
  let (overdue, open, done) = summary.status_totals();
  lines.push(dim(format!(
    "{} overdue · {} in flight · {} done",
    overdue, open, done
  )));

  if !summary.risks.is_empty() {
    lines.push(Line::default());
    lines.push(heading("Blocked Items by Risk"));
    for risk in summary.risks.iter().take(LIST_LIMIT + 1) {
      let color = match risk.level {
        RiskLevel::Overdue => Color::Red,
        RiskLevel::Pending => Color::Yellow,
        RiskLevel::Completed => Color::Green,
      };
      lines.push(Line::from(vec![
        Span::styled("  ● ", Style::default().fg(color)),
        Span::styled(
          format!("{} -> {}", risk.issue_key, risk.target_key),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(
          format!("  {}", risk.reason.message()),
          Style::default().fg(Color::DarkGray),
        ),
      ]));
    }
  }
}

fn comments_chart(lines: &mut Vec<Line<'static>>, issues: &[&Issue], tab: usize) {
  let summary = comments::comments_summary(issues);
  if !summary.has_data() {
    empty_state(lines, "No comments yet", "Start a conversation on any work item");
    return;
  }

  lines.push(dim(format!(
    "{} comments across {} items (avg {:.1})",
    summary.total_comments, summary.active_issues, summary.avg_per_active
  )));
  lines.push(Line::default());

  let category = comments::CommentCategory::ALL[tab.min(comments::CommentCategory::ALL.len() - 1)];
  lines.push(heading(category.label()));
  for row in wrap_text(&comments::digest(&summary, category), TEXT_WIDTH) {
    lines.push(Line::from(Span::styled(row, Style::default().fg(Color::Gray))));
  }
}
