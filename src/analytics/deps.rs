//! Dependency analytics.
//!
//! A dependency carries a cached snapshot of its target's status. The
//! snapshot is displayed as-is, but for aggregation an effective status is
//! derived at read time: when the live target (looked up by id in the current
//! collection) is unfinished and past due, the dependency counts as OVERDUE.
//! The snapshot itself is never mutated, and a dangling reference simply
//! falls back to the snapshot.

use crate::analytics::pie::{self, Segment};
use crate::model::{DependencyKind, Issue, Status};
use chrono::NaiveDate;

/// Cached status widened with the derived overdue state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveStatus {
  Todo,
  InProgress,
  Done,
  Overdue,
}

/// Counts for one dependency kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
  pub todo: usize,
  pub in_progress: usize,
  pub done: usize,
  pub overdue: usize,
  pub total: usize,
}

impl KindStats {
  fn bump(&mut self, status: EffectiveStatus) {
    match status {
      EffectiveStatus::Todo => self.todo += 1,
      EffectiveStatus::InProgress => self.in_progress += 1,
      EffectiveStatus::Done => self.done += 1,
      EffectiveStatus::Overdue => self.overdue += 1,
    }
    self.total += 1;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
  Overdue,
  Pending,
  Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskReason {
  Completed,
  NotStarted,
  InProgress,
  OverdueBy { days: i64 },
}

impl RiskReason {
  pub fn message(&self) -> String {
    match self {
      RiskReason::Completed => "completed".to_string(),
      RiskReason::NotStarted => "not started".to_string(),
      RiskReason::InProgress => "in progress".to_string(),
      RiskReason::OverdueBy { days } => format!("overdue +{}d", days),
    }
  }
}

/// One blocking dependency with its derived risk
#[derive(Debug, Clone)]
pub struct DependencyRisk {
  pub issue_key: String,
  pub target_key: String,
  pub level: RiskLevel,
  pub reason: RiskReason,
}

#[derive(Debug, Clone)]
pub struct DependencySummary {
  pub blocked_by: KindStats,
  pub blocks: KindStats,
  pub relates_to: KindStats,
  pub total: usize,
  /// Blocking dependencies ordered overdue → pending → completed
  pub risks: Vec<DependencyRisk>,
}

impl DependencySummary {
  pub fn has_data(&self) -> bool {
    self.total > 0
  }

  /// Dependency mix wedges for the popover pie
  pub fn kind_segments(&self) -> Vec<Segment> {
    vec![
      Segment::new(
        DependencyKind::IsBlockedBy.label(),
        self.blocked_by.total as f64,
        pie::danger_color(),
      ),
      Segment::new(
        DependencyKind::Blocks.label(),
        self.blocks.total as f64,
        pie::warn_color(),
      ),
      Segment::new(
        DependencyKind::RelatesTo.label(),
        self.relates_to.total as f64,
        pie::in_progress_color(),
      ),
    ]
  }

  /// Effective-status mix across every dependency kind
  pub fn status_totals(&self) -> (usize, usize, usize) {
    let kinds = [self.blocked_by, self.blocks, self.relates_to];
    let overdue = kinds.iter().map(|k| k.overdue).sum();
    let open = kinds.iter().map(|k| k.todo + k.in_progress).sum();
    let done = kinds.iter().map(|k| k.done).sum();
    (overdue, open, done)
  }
}

/// Derive the effective status of one dependency against the live collection
fn effective_status(
  cached: Status,
  target: Option<&&Issue>,
  today: NaiveDate,
) -> EffectiveStatus {
  if cached != Status::Done {
    if let Some(target) = target {
      if target.due_date < today {
        return EffectiveStatus::Overdue;
      }
    }
  }
  match cached {
    Status::Todo => EffectiveStatus::Todo,
    Status::InProgress => EffectiveStatus::InProgress,
    Status::Done => EffectiveStatus::Done,
  }
}

pub fn dependency_summary(issues: &[&Issue], today: NaiveDate) -> DependencySummary {
  let mut blocked_by = KindStats::default();
  let mut blocks = KindStats::default();
  let mut relates_to = KindStats::default();

  let mut overdue_risks = Vec::new();
  let mut pending_risks = Vec::new();
  let mut completed_risks = Vec::new();

  for issue in issues {
    for dep in &issue.dependencies {
      let target = issues.iter().find(|i| i.id == dep.target_issue_id);
      let status = effective_status(dep.target_status, target, today);

      match dep.kind {
        DependencyKind::IsBlockedBy => blocked_by.bump(status),
        DependencyKind::Blocks => blocks.bump(status),
        DependencyKind::RelatesTo => relates_to.bump(status),
      }

      // Risk detail only covers links that actually gate this issue
      if dep.kind != DependencyKind::IsBlockedBy {
        continue;
      }
      let (level, reason) = match dep.target_status {
        Status::Done => (RiskLevel::Completed, RiskReason::Completed),
        Status::InProgress => (RiskLevel::Pending, RiskReason::InProgress),
        Status::Todo => match target {
          Some(target) if target.due_date < today => {
            let days = today.signed_duration_since(target.due_date).num_days();
            (RiskLevel::Overdue, RiskReason::OverdueBy { days })
          }
          _ => (RiskLevel::Pending, RiskReason::NotStarted),
        },
      };
      let risk = DependencyRisk {
        issue_key: issue.key.clone(),
        target_key: dep.target_issue_key.clone(),
        level,
        reason,
      };
      match level {
        RiskLevel::Overdue => overdue_risks.push(risk),
        RiskLevel::Pending => pending_risks.push(risk),
        RiskLevel::Completed => completed_risks.push(risk),
      }
    }
  }

  let total = blocked_by.total + blocks.total + relates_to.total;
  let mut risks = overdue_risks;
  risks.extend(pending_risks);
  risks.extend(completed_risks);

  DependencySummary {
    blocked_by,
    blocks,
    relates_to,
    total,
    risks,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::testutil::{assignee, date, issue};
  use crate::model::Dependency;

  fn dep(kind: DependencyKind, target_id: &str, cached: Status) -> Dependency {
    Dependency {
      kind,
      target_issue_id: target_id.to_string(),
      target_issue_key: format!("TRK-{}", target_id),
      target_status: cached,
    }
  }

  #[test]
  fn test_no_dependencies_is_no_data() {
    let a = assignee("a1", "Ada Lovelace");
    let it = issue("1", &a);
    let summary = dependency_summary(&[&it], date("2024-03-15"));
    assert!(!summary.has_data());
    assert!(summary.risks.is_empty());
  }

  #[test]
  fn test_overdue_override_from_live_target() {
    let today = date("2024-03-15");
    let a = assignee("a1", "Ada Lovelace");

    let mut target = issue("2", &a);
    target.due_date = date("2024-03-01"); // past due, still open

    let mut blocked = issue("1", &a);
    blocked
      .dependencies
      .push(dep(DependencyKind::IsBlockedBy, "2", Status::Todo));

    let summary = dependency_summary(&[&blocked, &target], today);
    assert_eq!(summary.blocked_by.overdue, 1);
    assert_eq!(summary.blocked_by.todo, 0);

    let risk = &summary.risks[0];
    assert_eq!(risk.level, RiskLevel::Overdue);
    assert_eq!(risk.reason, RiskReason::OverdueBy { days: 14 });

    // Snapshot on the issue itself is untouched
    assert_eq!(blocked.dependencies[0].target_status, Status::Todo);
  }

  #[test]
  fn test_done_snapshot_never_overridden() {
    let today = date("2024-03-15");
    let a = assignee("a1", "Ada Lovelace");

    let mut target = issue("2", &a);
    target.due_date = date("2024-03-01");

    let mut blocked = issue("1", &a);
    blocked
      .dependencies
      .push(dep(DependencyKind::IsBlockedBy, "2", Status::Done));

    let summary = dependency_summary(&[&blocked, &target], today);
    assert_eq!(summary.blocked_by.done, 1);
    assert_eq!(summary.blocked_by.overdue, 0);
    assert_eq!(summary.risks[0].level, RiskLevel::Completed);
  }

  #[test]
  fn test_dangling_reference_falls_back_to_snapshot() {
    let today = date("2024-03-15");
    let a = assignee("a1", "Ada Lovelace");

    let mut blocked = issue("1", &a);
    blocked
      .dependencies
      .push(dep(DependencyKind::IsBlockedBy, "missing", Status::Todo));

    let summary = dependency_summary(&[&blocked], today);
    assert_eq!(summary.blocked_by.todo, 1);
    assert_eq!(summary.blocked_by.overdue, 0);
    assert_eq!(summary.risks[0].reason, RiskReason::NotStarted);
  }

  #[test]
  fn test_risks_ordered_by_level() {
    let today = date("2024-03-15");
    let a = assignee("a1", "Ada Lovelace");

    let mut overdue_target = issue("9", &a);
    overdue_target.due_date = date("2024-03-01");

    let mut it = issue("1", &a);
    it.dependencies = vec![
      dep(DependencyKind::IsBlockedBy, "x", Status::Done),
      dep(DependencyKind::IsBlockedBy, "y", Status::InProgress),
      dep(DependencyKind::IsBlockedBy, "9", Status::Todo),
      // Non-blocking links never appear in the risk list
      dep(DependencyKind::RelatesTo, "z", Status::Todo),
    ];

    let summary = dependency_summary(&[&it, &overdue_target], today);
    assert_eq!(summary.risks.len(), 3);
    assert_eq!(summary.risks[0].level, RiskLevel::Overdue);
    assert_eq!(summary.risks[1].level, RiskLevel::Pending);
    assert_eq!(summary.risks[2].level, RiskLevel::Completed);
    assert_eq!(summary.total, 4);
  }
}
