//! Effort-based roll-up for a collection of issues.

use crate::model::{Assignee, Issue, Status};
use std::sync::Arc;

/// Health classification derived from effort completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
  OnTrack,
  AtRisk,
  OffTrack,
}

impl TrackingStatus {
  pub fn label(&self) -> &'static str {
    match self {
      TrackingStatus::OnTrack => "On track",
      TrackingStatus::AtRisk => "At risk",
      TrackingStatus::OffTrack => "Off track",
    }
  }
}

#[derive(Debug, Clone)]
pub struct RollupData {
  pub total_issues: usize,
  pub todo: usize,
  pub in_progress: usize,
  pub done: usize,
  pub unique_assignees: Vec<Arc<Assignee>>,
  pub total_effort: f64,
  pub total_effort_remaining: f64,
  pub tracking_status: TrackingStatus,
}

/// Roll a group of issues up into one row of portfolio health. Completion
/// below 50% of booked effort reads off-track, below 80% at-risk.
pub fn calculate_rollup(issues: &[&Issue]) -> RollupData {
  let total_effort: f64 = issues.iter().filter_map(|i| i.effort).sum();
  let total_effort_remaining: f64 = issues.iter().filter_map(|i| i.effort_remaining).sum();

  let completion = if total_effort > 0.0 {
    (total_effort - total_effort_remaining) / total_effort
  } else {
    0.0
  };
  let tracking_status = if completion < 0.5 {
    TrackingStatus::OffTrack
  } else if completion < 0.8 {
    TrackingStatus::AtRisk
  } else {
    TrackingStatus::OnTrack
  };

  let mut unique_assignees: Vec<Arc<Assignee>> = Vec::new();
  for issue in issues {
    if !unique_assignees.iter().any(|a| a.id == issue.assignee.id) {
      unique_assignees.push(issue.assignee.clone());
    }
  }

  RollupData {
    total_issues: issues.len(),
    todo: issues.iter().filter(|i| i.status == Status::Todo).count(),
    in_progress: issues
      .iter()
      .filter(|i| i.status == Status::InProgress)
      .count(),
    done: issues.iter().filter(|i| i.status == Status::Done).count(),
    unique_assignees,
    total_effort,
    total_effort_remaining,
    tracking_status,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::testutil::{assignee, issue};

  #[test]
  fn test_rollup_tracking_bands() {
    let a = assignee("a1", "Ada Lovelace");

    let mut behind = issue("1", &a);
    behind.effort = Some(100.0);
    behind.effort_remaining = Some(80.0);
    let rollup = calculate_rollup(&[&behind]);
    assert_eq!(rollup.tracking_status, TrackingStatus::OffTrack);

    let mut risky = issue("2", &a);
    risky.effort = Some(100.0);
    risky.effort_remaining = Some(30.0);
    let rollup = calculate_rollup(&[&risky]);
    assert_eq!(rollup.tracking_status, TrackingStatus::AtRisk);

    let mut healthy = issue("3", &a);
    healthy.effort = Some(100.0);
    healthy.effort_remaining = Some(10.0);
    let rollup = calculate_rollup(&[&healthy]);
    assert_eq!(rollup.tracking_status, TrackingStatus::OnTrack);
  }

  #[test]
  fn test_rollup_zero_effort_reads_off_track() {
    let a = assignee("a1", "Ada Lovelace");
    let it = issue("1", &a);
    let rollup = calculate_rollup(&[&it]);
    assert_eq!(rollup.total_effort, 0.0);
    assert_eq!(rollup.tracking_status, TrackingStatus::OffTrack);
  }

  #[test]
  fn test_rollup_dedupes_assignees() {
    let ada = assignee("a1", "Ada Lovelace");
    let bob = assignee("a2", "Bob Martin");
    let one = issue("1", &ada);
    let two = issue("2", &ada);
    let three = issue("3", &bob);
    let rollup = calculate_rollup(&[&one, &two, &three]);
    assert_eq!(rollup.unique_assignees.len(), 2);
  }
}
