//! Schedule analytics: start-date health, target tracking, and day-bucketed
//! timelines for the date popovers.

use crate::model::{Assignee, Issue, Status};
use chrono::{Datelike, Days, NaiveDate};
use std::sync::Arc;

/// Baseline pace used to sanity-check planned durations
pub const TYPICAL_DAYS_PER_POINT: f64 = 2.0;

/// Start-date exposure for one assignee
#[derive(Debug, Clone)]
pub struct AssigneeStartLoad {
  pub assignee: Arc<Assignee>,
  pub total_items: usize,
  pub not_started: usize,
  pub delayed: usize,
  pub story_points: f64,
}

/// Executive view of how well work is actually starting
#[derive(Debug, Clone)]
pub struct StartDateInsights {
  pub missing_actual_start: usize,
  /// Planned to start later than today and still queued
  pub not_started_yet: usize,
  /// Planned start already passed with no recorded actual start
  pub delayed_start: usize,
  pub delayed_story_points: f64,
  pub delayed_effort: f64,
  pub by_assignee: Vec<AssigneeStartLoad>,
  /// 0–100, degraded by delayed and untracked starts
  pub health_score: i32,
}

fn is_delayed_start(issue: &Issue, today: NaiveDate) -> bool {
  issue.start_date < today && issue.status == Status::Todo && issue.actual_start_date.is_none()
}

pub fn start_date_insights(issues: &[&Issue], today: NaiveDate) -> StartDateInsights {
  let missing_actual_start = issues
    .iter()
    .filter(|i| i.actual_start_date.is_none())
    .count();
  let not_started_yet = issues
    .iter()
    .filter(|i| i.start_date > today && i.status == Status::Todo)
    .count();

  let delayed: Vec<&&Issue> = issues
    .iter()
    .filter(|i| is_delayed_start(i, today))
    .collect();

  let mut by_assignee: Vec<AssigneeStartLoad> = Vec::new();
  for issue in issues {
    let idx = match by_assignee
      .iter()
      .position(|l| l.assignee.id == issue.assignee.id)
    {
      Some(idx) => idx,
      None => {
        by_assignee.push(AssigneeStartLoad {
          assignee: issue.assignee.clone(),
          total_items: 0,
          not_started: 0,
          delayed: 0,
          story_points: 0.0,
        });
        by_assignee.len() - 1
      }
    };
    let entry = &mut by_assignee[idx];
    entry.total_items += 1;
    entry.story_points += issue.story_points.unwrap_or(0.0);
    if is_delayed_start(issue, today) {
      entry.delayed += 1;
    } else if issue.status == Status::Todo {
      entry.not_started += 1;
    }
  }

  let health_score = if issues.is_empty() {
    100
  } else {
    let at_risk = delayed.len() + missing_actual_start;
    ((1.0 - at_risk as f64 / issues.len() as f64) * 100.0).round() as i32
  };

  StartDateInsights {
    missing_actual_start,
    not_started_yet,
    delayed_start: delayed.len(),
    delayed_story_points: delayed.iter().filter_map(|i| i.story_points).sum(),
    delayed_effort: delayed.iter().filter_map(|i| i.effort).sum(),
    by_assignee,
    health_score: health_score.clamp(0, 100),
  }
}

/// Why an item reads off-track. Later checks override earlier ones, so an
/// item that is both compressed and overdue reports the overdue reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackReason {
  OnTarget,
  /// Planned duration shorter than 80% of the story-point pace
  CompressedTimeline,
  /// Target date passed without completion
  Overdue { days: i64 },
}

impl TrackReason {
  pub fn message(&self) -> String {
    match self {
      TrackReason::OnTarget => "On target".to_string(),
      TrackReason::CompressedTimeline => "Compressed timeline".to_string(),
      TrackReason::Overdue { days } => format!("+{}d", days),
    }
  }
}

#[derive(Debug, Clone)]
pub struct TargetTrackingItem {
  pub issue_key: String,
  pub on_track: bool,
  pub reason: TrackReason,
  pub days_overdue: i64,
  pub target_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct TargetTrackingSummary {
  pub on_track: usize,
  pub off_track: usize,
  pub total_tracked: usize,
  pub on_track_pct: u32,
  pub latest_target: Option<NaiveDate>,
  /// Off-track items sorted most-overdue first, then by target date
  pub off_track_items: Vec<TargetTrackingItem>,
}

pub fn target_tracking_summary(issues: &[&Issue], today: NaiveDate) -> TargetTrackingSummary {
  let mut items: Vec<TargetTrackingItem> = issues
    .iter()
    .map(|issue| {
      let planned = issue.planned_duration_days();
      let expected = issue.story_points.unwrap_or(1.0).max(1.0) * TYPICAL_DAYS_PER_POINT;

      let mut on_track = true;
      let mut reason = TrackReason::OnTarget;
      let mut days_overdue = 0;

      if (planned as f64) < expected * 0.8 {
        on_track = false;
        reason = TrackReason::CompressedTimeline;
      }
      if issue.target_date < today && issue.status != Status::Done {
        on_track = false;
        days_overdue = today.signed_duration_since(issue.target_date).num_days();
        reason = TrackReason::Overdue { days: days_overdue };
      }

      TargetTrackingItem {
        issue_key: issue.key.clone(),
        on_track,
        reason,
        days_overdue,
        target_date: issue.target_date,
      }
    })
    .collect();

  let on_track = items.iter().filter(|i| i.on_track).count();
  let total = items.len();

  items.retain(|i| !i.on_track);
  items.sort_by(|a, b| {
    b.days_overdue
      .cmp(&a.days_overdue)
      .then(a.target_date.cmp(&b.target_date))
  });

  TargetTrackingSummary {
    on_track,
    off_track: total - on_track,
    total_tracked: total,
    on_track_pct: if total > 0 {
      (on_track as f64 / total as f64 * 100.0).round() as u32
    } else {
      0
    },
    latest_target: issues.iter().map(|i| i.target_date).max(),
    off_track_items: items,
  }
}

/// One day on a date timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineDay {
  pub date: NaiveDate,
  pub count: usize,
  /// Items due this day that are past due and unfinished (due timelines only)
  pub overdue: usize,
  pub month_start: bool,
}

/// Bucket a date field per day between its earliest and latest occurrence.
/// `count_overdue` marks buckets before today that still carry unfinished
/// work, which the due-date popover colors differently.
pub fn timeline<F>(issues: &[&Issue], date_of: F, today: NaiveDate, count_overdue: bool) -> Vec<TimelineDay>
where
  F: Fn(&Issue) -> NaiveDate,
{
  let Some(earliest) = issues.iter().map(|i| date_of(i)).min() else {
    return Vec::new();
  };
  let latest = issues
    .iter()
    .map(|i| date_of(i))
    .max()
    .unwrap_or(earliest);

  let mut days = Vec::new();
  let mut cursor = earliest;
  loop {
    let count = issues.iter().filter(|i| date_of(i) == cursor).count();
    let overdue = if count_overdue && cursor < today {
      issues
        .iter()
        .filter(|i| date_of(i) == cursor && i.status != Status::Done)
        .count()
    } else {
      0
    };
    days.push(TimelineDay {
      date: cursor,
      count,
      overdue,
      month_start: cursor.day() == 1 || cursor == earliest,
    });
    if cursor >= latest {
      break;
    }
    match cursor.checked_add_days(Days::new(1)) {
      Some(next) => cursor = next,
      None => break,
    }
  }
  days
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::testutil::{assignee, date, issue};

  #[test]
  fn test_start_insights_classify_delayed_and_queued() {
    let today = date("2024-03-15");
    let a = assignee("a1", "Ada Lovelace");

    let mut delayed = issue("1", &a);
    delayed.start_date = date("2024-03-01");
    delayed.story_points = Some(5.0);
    delayed.effort = Some(16.0);

    let mut queued = issue("2", &a);
    queued.start_date = date("2024-04-01");

    let mut started = issue("3", &a);
    started.start_date = date("2024-03-01");
    started.actual_start_date = Some(date("2024-03-02"));
    started.status = Status::InProgress;

    let insights = start_date_insights(&[&delayed, &queued, &started], today);
    assert_eq!(insights.delayed_start, 1);
    assert_eq!(insights.not_started_yet, 1);
    assert_eq!(insights.delayed_story_points, 5.0);
    assert_eq!(insights.delayed_effort, 16.0);
    assert_eq!(insights.missing_actual_start, 2);
    assert_eq!(insights.health_score, 0); // 3 at-risk signals across 3 items
  }

  #[test]
  fn test_start_insights_empty_is_healthy() {
    let insights = start_date_insights(&[], date("2024-03-15"));
    assert_eq!(insights.health_score, 100);
    assert_eq!(insights.delayed_start, 0);
  }

  #[test]
  fn test_target_tracking_overdue_overrides_compressed() {
    let today = date("2024-03-15");
    let a = assignee("a1", "Ada Lovelace");

    // 2 days planned for 8 points: compressed, and the target has passed
    let mut it = issue("1", &a);
    it.start_date = date("2024-03-01");
    it.target_date = date("2024-03-03");
    it.story_points = Some(8.0);

    let summary = target_tracking_summary(&[&it], today);
    assert_eq!(summary.off_track, 1);
    let item = &summary.off_track_items[0];
    assert_eq!(item.reason, TrackReason::Overdue { days: 12 });
    assert_eq!(item.days_overdue, 12);
  }

  #[test]
  fn test_target_tracking_done_items_are_not_overdue() {
    let today = date("2024-03-15");
    let a = assignee("a1", "Ada Lovelace");
    let mut it = issue("1", &a);
    it.start_date = date("2024-01-01");
    it.target_date = date("2024-03-01");
    it.status = Status::Done;

    let summary = target_tracking_summary(&[&it], today);
    assert_eq!(summary.on_track, 1);
    assert_eq!(summary.on_track_pct, 100);
  }

  #[test]
  fn test_timeline_buckets_and_overdue() {
    let today = date("2024-03-10");
    let a = assignee("a1", "Ada Lovelace");

    let mut one = issue("1", &a);
    one.due_date = date("2024-03-05");
    let mut two = issue("2", &a);
    two.due_date = date("2024-03-05");
    two.status = Status::Done;
    let mut three = issue("3", &a);
    three.due_date = date("2024-03-07");

    let days = timeline(&[&one, &two, &three], |i| i.due_date, today, true);
    assert_eq!(days.len(), 3);
    assert_eq!(days[0].date, date("2024-03-05"));
    assert_eq!(days[0].count, 2);
    assert_eq!(days[0].overdue, 1); // the unfinished one
    assert_eq!(days[1].count, 0);
    assert_eq!(days[2].count, 1);
    assert!(days[0].month_start); // range start is always marked
  }

  #[test]
  fn test_timeline_empty_collection() {
    let days = timeline(&[], |i| i.due_date, date("2024-03-10"), false);
    assert!(days.is_empty());
  }
}
