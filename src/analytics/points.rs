//! Story-point velocity and complexity analytics.

use crate::analytics::pie::{self, Segment};
use crate::model::{Assignee, Issue, Status};
use std::sync::Arc;

/// Fibonacci-ish sizing buckets
pub const COMPLEXITY_LABELS: [&str; 6] = [
  "XS (1-2)",
  "S (3-5)",
  "M (5-8)",
  "L (8-13)",
  "XL (13-21)",
  "XL (21+)",
];

fn complexity_bucket(points: f64) -> usize {
  if points <= 2.0 {
    0
  } else if points <= 5.0 {
    1
  } else if points <= 8.0 {
    2
  } else if points <= 13.0 {
    3
  } else if points <= 21.0 {
    4
  } else {
    5
  }
}

#[derive(Debug, Clone)]
pub struct AssigneeVelocity {
  pub assignee: Arc<Assignee>,
  pub total: f64,
  pub completed: f64,
  pub in_progress: f64,
  pub todo: f64,
  /// Share of this person's points already completed
  pub utilization_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityBucket {
  pub label: &'static str,
  pub count: usize,
  pub points: f64,
}

#[derive(Debug, Clone)]
pub struct StoryPointSummary {
  pub total: f64,
  pub completed: f64,
  pub in_progress: f64,
  pub todo: f64,
  pub completion_rate_pct: f64,
  pub average_story_size: f64,
  /// Sorted by completed points descending
  pub velocity: Vec<AssigneeVelocity>,
  /// Sorted by points descending; only non-empty buckets
  pub complexity: Vec<ComplexityBucket>,
}

impl StoryPointSummary {
  pub fn has_data(&self) -> bool {
    self.total > 0.0
  }

  pub fn status_segments(&self) -> Vec<Segment> {
    vec![
      Segment::new("Done", self.completed, pie::done_color()),
      Segment::new("In progress", self.in_progress, pie::in_progress_color()),
      Segment::new("To do", self.todo, pie::todo_color()),
    ]
  }
}

pub fn story_point_summary(issues: &[&Issue]) -> StoryPointSummary {
  let points_of = |i: &Issue| i.story_points.unwrap_or(0.0);

  let total: f64 = issues.iter().map(|i| points_of(i)).sum();
  let sum_status = |status: Status| {
    issues
      .iter()
      .filter(|i| i.status == status)
      .map(|i| points_of(i))
      .sum::<f64>()
  };
  let completed = sum_status(Status::Done);
  let in_progress = sum_status(Status::InProgress);
  let todo = sum_status(Status::Todo);

  let mut velocity: Vec<AssigneeVelocity> = Vec::new();
  for issue in issues {
    let points = points_of(issue);
    let idx = match velocity
      .iter()
      .position(|v| v.assignee.id == issue.assignee.id)
    {
      Some(idx) => idx,
      None => {
        velocity.push(AssigneeVelocity {
          assignee: issue.assignee.clone(),
          total: 0.0,
          completed: 0.0,
          in_progress: 0.0,
          todo: 0.0,
          utilization_pct: 0.0,
        });
        velocity.len() - 1
      }
    };
    let entry = &mut velocity[idx];
    entry.total += points;
    match issue.status {
      Status::Done => entry.completed += points,
      Status::InProgress => entry.in_progress += points,
      Status::Todo => entry.todo += points,
    }
  }
  for person in &mut velocity {
    person.utilization_pct = if person.total > 0.0 {
      person.completed / person.total * 100.0
    } else {
      0.0
    };
  }
  velocity.sort_by(|a, b| b.completed.total_cmp(&a.completed));

  let mut buckets: Vec<ComplexityBucket> = COMPLEXITY_LABELS
    .iter()
    .copied()
    .map(|label| ComplexityBucket {
      label,
      count: 0,
      points: 0.0,
    })
    .collect();
  for issue in issues {
    let points = points_of(issue);
    if points == 0.0 {
      continue;
    }
    let bucket = &mut buckets[complexity_bucket(points)];
    bucket.count += 1;
    bucket.points += points;
  }
  let mut complexity: Vec<ComplexityBucket> =
    buckets.into_iter().filter(|b| b.count > 0).collect();
  complexity.sort_by(|a, b| b.points.total_cmp(&a.points));

  let sized = issues.iter().filter(|i| i.story_points.is_some()).count();

  StoryPointSummary {
    total,
    completed,
    in_progress,
    todo,
    completion_rate_pct: if total > 0.0 {
      completed / total * 100.0
    } else {
      0.0
    },
    average_story_size: if sized > 0 { total / sized as f64 } else { 0.0 },
    velocity,
    complexity,
  }
}
