//! Per-group roll-up statistics shown directly in summary rows.

use crate::analytics::pie::{self, Segment};
use crate::model::{Issue, Status};
use chrono::NaiveDate;

/// Aggregates for one group of issues (one assignee, or the whole project)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStats {
  pub total: usize,
  pub todo: usize,
  pub in_progress: usize,
  pub done: usize,
  pub completion_pct: u32,
  pub total_comments: u32,
  pub earliest_start: Option<NaiveDate>,
  pub latest_target: Option<NaiveDate>,
  pub latest_due: Option<NaiveDate>,
  pub total_budget: f64,
  pub total_story_points: f64,
  pub total_time_spent: f64,
  pub total_original_estimate: f64,
  /// Mean slippage of completed issues, in days
  pub avg_slippage_days: f64,
  pub total_dependencies: usize,
}

impl GroupStats {
  /// Aggregate time usage against the group's total estimate
  pub fn time_usage_pct(&self) -> f64 {
    self.total_time_spent / self.total_original_estimate.max(1.0) * 100.0
  }

  /// Status wedges for the summary-row bar and the status popover. The
  /// segment values always partition the group exactly.
  pub fn status_segments(&self) -> Vec<Segment> {
    vec![
      Segment::new("To do", self.todo as f64, pie::todo_color()),
      Segment::new(
        "In progress",
        self.in_progress as f64,
        pie::in_progress_color(),
      ),
      Segment::new("Done", self.done as f64, pie::done_color()),
    ]
  }
}

pub fn group_stats(issues: &[&Issue]) -> GroupStats {
  if issues.is_empty() {
    return GroupStats::default();
  }

  let todo = issues.iter().filter(|i| i.status == Status::Todo).count();
  let in_progress = issues
    .iter()
    .filter(|i| i.status == Status::InProgress)
    .count();
  let done = issues.iter().filter(|i| i.status == Status::Done).count();

  let slippages: Vec<i64> = issues.iter().filter_map(|i| i.slippage_days()).collect();
  let avg_slippage_days = if slippages.is_empty() {
    0.0
  } else {
    slippages.iter().sum::<i64>() as f64 / slippages.len() as f64
  };

  GroupStats {
    total: issues.len(),
    todo,
    in_progress,
    done,
    completion_pct: (done as f64 / issues.len() as f64 * 100.0).round() as u32,
    total_comments: issues.iter().map(|i| i.comments).sum(),
    earliest_start: issues.iter().map(|i| i.start_date).min(),
    latest_target: issues.iter().map(|i| i.target_date).max(),
    latest_due: issues.iter().map(|i| i.due_date).max(),
    total_budget: issues.iter().filter_map(|i| i.budget).sum(),
    total_story_points: issues.iter().filter_map(|i| i.story_points).sum(),
    total_time_spent: issues.iter().filter_map(|i| i.time_spent).sum(),
    total_original_estimate: issues.iter().filter_map(|i| i.original_estimate).sum(),
    avg_slippage_days,
    total_dependencies: issues.iter().map(|i| i.dependencies.len()).sum(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analytics::pie::build_pie;
  use crate::model::testutil::{assignee, date, issue};

  #[test]
  fn test_empty_group_is_all_zero() {
    let stats = group_stats(&[]);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.earliest_start, None);
    assert_eq!(stats.completion_pct, 0);
  }

  #[test]
  fn test_group_stats_aggregates() {
    let a = assignee("a1", "Ada Lovelace");
    let mut one = issue("1", &a);
    one.status = Status::Done;
    one.budget = Some(1000.0);
    one.story_points = Some(5.0);
    one.comments = 3;
    one.start_date = date("2024-01-10");
    one.target_date = date("2024-02-20");
    one.actual_due_date = Some(date("2024-02-22"));

    let mut two = issue("2", &a);
    two.status = Status::InProgress;
    two.budget = Some(500.0);
    two.comments = 1;

    let stats = group_stats(&[&one, &two]);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.done, 1);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.completion_pct, 50);
    assert_eq!(stats.total_budget, 1500.0);
    assert_eq!(stats.total_story_points, 5.0);
    assert_eq!(stats.total_comments, 4);
    assert_eq!(stats.earliest_start, Some(date("2024-01-01")));
    assert_eq!(stats.avg_slippage_days, 2.0);
  }

  #[test]
  fn test_status_segments_partition_exactly() {
    let a = assignee("a1", "Ada Lovelace");
    let mut issues = Vec::new();
    for (i, status) in [
      Status::Todo,
      Status::Todo,
      Status::InProgress,
      Status::Done,
      Status::Done,
      Status::Done,
    ]
    .iter()
    .enumerate()
    {
      let mut it = issue(&i.to_string(), &a);
      it.status = *status;
      issues.push(it);
    }
    let refs: Vec<&Issue> = issues.iter().collect();
    let stats = group_stats(&refs);

    let total: f64 = stats.status_segments().iter().map(|s| s.value).sum();
    assert_eq!(total as usize, refs.len());

    // Zero-count wedges disappear in the pie but the partition still holds
    let slices = build_pie(stats.status_segments());
    let pie_total: f64 = slices.iter().map(|s| s.segment.value).sum();
    assert_eq!(pie_total as usize, refs.len());
  }

  #[test]
  fn test_time_usage_guards_zero_estimate() {
    let stats = GroupStats {
      total_time_spent: 30.0,
      ..GroupStats::default()
    };
    assert_eq!(stats.time_usage_pct(), 3000.0); // denominator clamped to 1
    assert!(stats.time_usage_pct().is_finite());
  }
}
