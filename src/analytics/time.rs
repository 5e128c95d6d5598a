//! Time tracking, capacity, and delivery track-record analytics.

use crate::analytics::pie::Segment;
use crate::model::{Assignee, Issue, Status};
use ratatui::style::Color;
use std::sync::Arc;

/// Standard working week assumed when sizing workloads
pub const WEEKLY_CAPACITY_HOURS: f64 = 40.0;

const ASSIGNEE_COLORS: [Color; 5] = [
  Color::Blue,
  Color::Green,
  Color::Yellow,
  Color::Red,
  Color::Magenta,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityStatus {
  /// Booked below 70% of a week
  UnderAllocated,
  Optimal,
  /// Booked above 110% of a week
  OverAllocated,
}

impl CapacityStatus {
  pub fn label(&self) -> &'static str {
    match self {
      CapacityStatus::UnderAllocated => "Under-allocated",
      CapacityStatus::Optimal => "Optimal load",
      CapacityStatus::OverAllocated => "Over-allocated",
    }
  }

  fn of(capacity_usage_pct: f64) -> Self {
    if capacity_usage_pct < 70.0 {
      CapacityStatus::UnderAllocated
    } else if capacity_usage_pct > 110.0 {
      CapacityStatus::OverAllocated
    } else {
      CapacityStatus::Optimal
    }
  }
}

/// Hours attributed to one assignee
#[derive(Debug, Clone)]
pub struct AssigneeTime {
  pub assignee: Arc<Assignee>,
  pub original_estimate: f64,
  pub time_spent: f64,
  pub remaining_estimate: f64,
  pub todo_issues: usize,
  pub in_progress_issues: usize,
  pub completed_issues: usize,
}

impl AssigneeTime {
  /// Estimated + remaining hours currently booked against this person
  pub fn workload_hours(&self) -> f64 {
    self.original_estimate + self.remaining_estimate
  }

  pub fn capacity_usage_pct(&self) -> f64 {
    self.workload_hours() / WEEKLY_CAPACITY_HOURS * 100.0
  }

  pub fn capacity_status(&self) -> CapacityStatus {
    CapacityStatus::of(self.capacity_usage_pct())
  }

  pub fn active_workload(&self) -> usize {
    self.todo_issues + self.in_progress_issues
  }
}

/// Early / on-time / late deliveries for one assignee
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
  pub assignee: Arc<Assignee>,
  pub early: usize,
  pub on_time: usize,
  pub late: usize,
  pub total: usize,
}

#[derive(Debug, Clone)]
pub struct TimeTrackingSummary {
  pub total_original_estimate: f64,
  pub total_time_spent: f64,
  pub total_remaining: f64,
  /// Spent vs estimated over the tracked subset, 0 when nothing is estimated
  pub hours_used_pct: f64,
  /// Share of issues carrying an original estimate
  pub tracking_coverage_pct: f64,
  pub by_assignee: Vec<AssigneeTime>,
  pub delivery: Vec<DeliveryRecord>,
}

impl TimeTrackingSummary {
  pub fn has_data(&self) -> bool {
    self.tracking_coverage_pct > 0.0
  }

  /// Time spent split across the team, for the distribution pie
  pub fn spent_segments(&self) -> Vec<Segment> {
    self
      .by_assignee
      .iter()
      .enumerate()
      .map(|(idx, person)| {
        Segment::new(
          person.assignee.short_name(),
          person.time_spent,
          ASSIGNEE_COLORS[idx % ASSIGNEE_COLORS.len()],
        )
      })
      .collect()
  }

  pub fn capacity_counts(&self) -> [(CapacityStatus, usize); 3] {
    let count = |status: CapacityStatus| {
      self
        .by_assignee
        .iter()
        .filter(|p| p.capacity_status() == status)
        .count()
    };
    [
      (
        CapacityStatus::OverAllocated,
        count(CapacityStatus::OverAllocated),
      ),
      (CapacityStatus::Optimal, count(CapacityStatus::Optimal)),
      (
        CapacityStatus::UnderAllocated,
        count(CapacityStatus::UnderAllocated),
      ),
    ]
  }
}

pub fn time_tracking_summary(issues: &[&Issue]) -> TimeTrackingSummary {
  let tracked: Vec<&&Issue> = issues
    .iter()
    .filter(|i| i.original_estimate.map(|e| e > 0.0).unwrap_or(false))
    .collect();

  let total_original_estimate: f64 = tracked.iter().filter_map(|i| i.original_estimate).sum();
  let total_time_spent: f64 = tracked.iter().map(|i| i.time_spent.unwrap_or(0.0)).sum();
  let total_remaining: f64 = tracked
    .iter()
    .map(|i| i.remaining_estimate.unwrap_or(0.0))
    .sum();

  let mut by_assignee: Vec<AssigneeTime> = Vec::new();
  for issue in issues {
    let idx = match by_assignee
      .iter()
      .position(|t| t.assignee.id == issue.assignee.id)
    {
      Some(idx) => idx,
      None => {
        by_assignee.push(AssigneeTime {
          assignee: issue.assignee.clone(),
          original_estimate: 0.0,
          time_spent: 0.0,
          remaining_estimate: 0.0,
          todo_issues: 0,
          in_progress_issues: 0,
          completed_issues: 0,
        });
        by_assignee.len() - 1
      }
    };
    let entry = &mut by_assignee[idx];
    entry.original_estimate += issue.original_estimate.unwrap_or(0.0);
    entry.time_spent += issue.time_spent.unwrap_or(0.0);
    entry.remaining_estimate += issue.remaining_estimate.unwrap_or(0.0);
    match issue.status {
      Status::Todo => entry.todo_issues += 1,
      Status::InProgress => entry.in_progress_issues += 1,
      Status::Done => entry.completed_issues += 1,
    }
  }

  let mut delivery: Vec<DeliveryRecord> = Vec::new();
  for issue in issues {
    let Some(days) = issue.slippage_days() else {
      continue;
    };
    let idx = match delivery
      .iter()
      .position(|d| d.assignee.id == issue.assignee.id)
    {
      Some(idx) => idx,
      None => {
        delivery.push(DeliveryRecord {
          assignee: issue.assignee.clone(),
          early: 0,
          on_time: 0,
          late: 0,
          total: 0,
        });
        delivery.len() - 1
      }
    };
    let record = &mut delivery[idx];
    record.total += 1;
    if days < 0 {
      record.early += 1;
    } else if days == 0 {
      record.on_time += 1;
    } else {
      record.late += 1;
    }
  }

  TimeTrackingSummary {
    total_original_estimate,
    total_time_spent,
    total_remaining,
    hours_used_pct: if total_original_estimate > 0.0 {
      total_time_spent / total_original_estimate * 100.0
    } else {
      0.0
    },
    tracking_coverage_pct: if issues.is_empty() {
      0.0
    } else {
      tracked.len() as f64 / issues.len() as f64 * 100.0
    },
    by_assignee,
    delivery,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::testutil::{assignee, date, issue};

  #[test]
  fn test_no_estimates_is_no_data() {
    let a = assignee("a1", "Ada Lovelace");
    let it = issue("1", &a);
    let summary = time_tracking_summary(&[&it]);
    assert!(!summary.has_data());
    assert_eq!(summary.hours_used_pct, 0.0);
  }

  #[test]
  fn test_totals_over_tracked_subset() {
    let a = assignee("a1", "Ada Lovelace");
    let mut tracked = issue("1", &a);
    tracked.original_estimate = Some(40.0);
    tracked.time_spent = Some(30.0);
    tracked.remaining_estimate = Some(15.0);
    let untracked = issue("2", &a);

    let summary = time_tracking_summary(&[&tracked, &untracked]);
    assert_eq!(summary.total_original_estimate, 40.0);
    assert_eq!(summary.hours_used_pct, 75.0);
    assert_eq!(summary.tracking_coverage_pct, 50.0);
  }

  #[test]
  fn test_capacity_bands() {
    assert_eq!(CapacityStatus::of(50.0), CapacityStatus::UnderAllocated);
    assert_eq!(CapacityStatus::of(70.0), CapacityStatus::Optimal);
    assert_eq!(CapacityStatus::of(110.0), CapacityStatus::Optimal);
    assert_eq!(CapacityStatus::of(120.0), CapacityStatus::OverAllocated);
  }

  #[test]
  fn test_capacity_usage_per_assignee() {
    let a = assignee("a1", "Ada Lovelace");
    let mut heavy = issue("1", &a);
    heavy.original_estimate = Some(40.0);
    heavy.remaining_estimate = Some(10.0);

    let summary = time_tracking_summary(&[&heavy]);
    let person = &summary.by_assignee[0];
    assert_eq!(person.workload_hours(), 50.0);
    assert_eq!(person.capacity_usage_pct(), 125.0);
    assert_eq!(person.capacity_status(), CapacityStatus::OverAllocated);
  }

  #[test]
  fn test_delivery_track_record() {
    let a = assignee("a1", "Ada Lovelace");
    let mut early = issue("1", &a);
    early.target_date = date("2024-03-10");
    early.actual_due_date = Some(date("2024-03-08"));
    let mut on_time = issue("2", &a);
    on_time.target_date = date("2024-03-10");
    on_time.actual_due_date = Some(date("2024-03-10"));
    let mut late = issue("3", &a);
    late.target_date = date("2024-03-10");
    late.actual_due_date = Some(date("2024-03-15"));
    let unfinished = issue("4", &a);

    let summary = time_tracking_summary(&[&early, &on_time, &late, &unfinished]);
    assert_eq!(summary.delivery.len(), 1);
    let record = &summary.delivery[0];
    assert_eq!(record.early, 1);
    assert_eq!(record.on_time, 1);
    assert_eq!(record.late, 1);
    assert_eq!(record.total, 3);
  }
}
