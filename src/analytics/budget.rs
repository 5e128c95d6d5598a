//! Budget distribution and spend-efficiency analytics.

use crate::analytics::pie::{self, Segment};
use crate::model::{Assignee, Issue, Status};
use std::sync::Arc;

/// Hours one budgeted dollar is assumed to buy time against
pub const HOURLY_RATE: f64 = 50.0;

/// How an item's spend compares to its budgeted hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyBand {
  /// ≤100% of budgeted hours
  Under,
  /// 100–120%
  Near,
  /// >120%
  Over,
}

impl EfficiencyBand {
  pub fn label(&self) -> &'static str {
    match self {
      EfficiencyBand::Under => "Under budget",
      EfficiencyBand::Near => "Near budget",
      EfficiencyBand::Over => "Over budget",
    }
  }

  fn of(efficiency_pct: f64) -> Self {
    if efficiency_pct > 120.0 {
      EfficiencyBand::Over
    } else if efficiency_pct > 100.0 {
      EfficiencyBand::Near
    } else {
      EfficiencyBand::Under
    }
  }
}

/// Budget totals attributed to one assignee
#[derive(Debug, Clone)]
pub struct AssigneeBudget {
  pub assignee: Arc<Assignee>,
  pub total: f64,
  pub completed: f64,
  pub in_progress: f64,
  pub todo: f64,
}

/// Spend efficiency for one item that carries both a budget and time spent
#[derive(Debug, Clone)]
pub struct EfficiencyEntry {
  pub issue_key: String,
  pub efficiency_pct: f64,
  pub budgeted_hours: f64,
  pub actual_hours: f64,
  /// Dollar variance; positive = over budget
  pub variance: f64,
  pub band: EfficiencyBand,
}

#[derive(Debug, Clone)]
pub struct BudgetSummary {
  pub total: f64,
  pub completed: f64,
  pub in_progress: f64,
  pub todo: f64,
  /// Share of total budget on completed work, 0 when nothing is budgeted
  pub completion_rate_pct: f64,
  /// Sorted by total descending
  pub by_assignee: Vec<AssigneeBudget>,
  /// Only issues with both budget and time spent; sorted worst-first
  pub efficiency: Vec<EfficiencyEntry>,
}

impl BudgetSummary {
  pub fn has_data(&self) -> bool {
    self.total > 0.0
  }

  /// Budget split by status, for the distribution pie
  pub fn status_segments(&self) -> Vec<Segment> {
    vec![
      Segment::new("Done", self.completed, pie::done_color()),
      Segment::new("In progress", self.in_progress, pie::in_progress_color()),
      Segment::new("To do", self.todo, pie::todo_color()),
    ]
  }

  /// Item counts per efficiency band, for the efficiency pie
  pub fn efficiency_segments(&self) -> Vec<Segment> {
    let count =
      |band: EfficiencyBand| self.efficiency.iter().filter(|e| e.band == band).count() as f64;
    vec![
      Segment::new("Under budget", count(EfficiencyBand::Under), pie::done_color()),
      Segment::new("Near budget", count(EfficiencyBand::Near), pie::warn_color()),
      Segment::new("Over budget", count(EfficiencyBand::Over), pie::danger_color()),
    ]
  }
}

pub fn budget_summary(issues: &[&Issue]) -> BudgetSummary {
  let budget_of = |i: &Issue| i.budget.unwrap_or(0.0);

  let total: f64 = issues.iter().map(|i| budget_of(i)).sum();
  let sum_status = |status: Status| {
    issues
      .iter()
      .filter(|i| i.status == status)
      .map(|i| budget_of(i))
      .sum::<f64>()
  };
  let completed = sum_status(Status::Done);
  let in_progress = sum_status(Status::InProgress);
  let todo = sum_status(Status::Todo);

  let mut by_assignee: Vec<AssigneeBudget> = Vec::new();
  for issue in issues {
    let amount = budget_of(issue);
    let idx = match by_assignee
      .iter()
      .position(|b| b.assignee.id == issue.assignee.id)
    {
      Some(idx) => idx,
      None => {
        by_assignee.push(AssigneeBudget {
          assignee: issue.assignee.clone(),
          total: 0.0,
          completed: 0.0,
          in_progress: 0.0,
          todo: 0.0,
        });
        by_assignee.len() - 1
      }
    };
    let entry = &mut by_assignee[idx];
    entry.total += amount;
    match issue.status {
      Status::Done => entry.completed += amount,
      Status::InProgress => entry.in_progress += amount,
      Status::Todo => entry.todo += amount,
    }
  }
  by_assignee.sort_by(|a, b| b.total.total_cmp(&a.total));

  // Efficiency only over the tracked subset: budget and time spent both set
  let mut efficiency: Vec<EfficiencyEntry> = issues
    .iter()
    .filter_map(|issue| {
      let budget = issue.budget.filter(|b| *b > 0.0)?;
      let spent = issue.time_spent.filter(|t| *t > 0.0)?;
      let budgeted_hours = budget / HOURLY_RATE;
      let efficiency_pct = if budgeted_hours > 0.0 {
        spent / budgeted_hours * 100.0
      } else {
        0.0
      };
      Some(EfficiencyEntry {
        issue_key: issue.key.clone(),
        efficiency_pct,
        budgeted_hours,
        actual_hours: spent,
        variance: (spent - budgeted_hours) * HOURLY_RATE,
        band: EfficiencyBand::of(efficiency_pct),
      })
    })
    .collect();
  efficiency.sort_by(|a, b| b.efficiency_pct.total_cmp(&a.efficiency_pct));

  BudgetSummary {
    total,
    completed,
    in_progress,
    todo,
    completion_rate_pct: if total > 0.0 {
      completed / total * 100.0
    } else {
      0.0
    },
    by_assignee,
    efficiency,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::testutil::{assignee, issue};

  #[test]
  fn test_budget_distribution_and_completion_rate() {
    let a = assignee("a1", "Ada Lovelace");
    let mut done = issue("1", &a);
    done.status = Status::Done;
    done.budget = Some(1000.0);
    let mut todo = issue("2", &a);
    todo.status = Status::Todo;
    todo.budget = Some(500.0);

    let summary = budget_summary(&[&done, &todo]);
    assert!(summary.has_data());
    assert_eq!(summary.completed, 1000.0);
    assert_eq!(summary.todo, 500.0);
    assert!((summary.completion_rate_pct - 66.6666).abs() < 0.001);
    assert_eq!(format!("{:.2}", summary.completion_rate_pct), "66.67");
  }

  #[test]
  fn test_no_budget_is_no_data() {
    let a = assignee("a1", "Ada Lovelace");
    let it = issue("1", &a);
    let summary = budget_summary(&[&it]);
    assert!(!summary.has_data());
    assert_eq!(summary.completion_rate_pct, 0.0);
  }

  #[test]
  fn test_efficiency_bands_at_fixed_rate() {
    let a = assignee("a1", "Ada Lovelace");

    // $1000 budget = 20h budgeted at $50/h
    let mut under = issue("1", &a);
    under.budget = Some(1000.0);
    under.time_spent = Some(18.0);
    let mut near = issue("2", &a);
    near.budget = Some(1000.0);
    near.time_spent = Some(22.0);
    let mut over = issue("3", &a);
    over.budget = Some(1000.0);
    over.time_spent = Some(30.0);
    // No time tracked: excluded from the tracked subset
    let mut untracked = issue("4", &a);
    untracked.budget = Some(1000.0);

    let summary = budget_summary(&[&under, &near, &over, &untracked]);
    assert_eq!(summary.efficiency.len(), 3);
    let band_of = |key: &str| {
      summary
        .efficiency
        .iter()
        .find(|e| e.issue_key == format!("TRK-{}", key))
        .unwrap()
        .band
    };
    assert_eq!(band_of("1"), EfficiencyBand::Under);
    assert_eq!(band_of("2"), EfficiencyBand::Near);
    assert_eq!(band_of("3"), EfficiencyBand::Over);

    // Over-budget item: 10 extra hours at $50
    let worst = &summary.efficiency[0];
    assert_eq!(worst.issue_key, "TRK-3");
    assert_eq!(worst.variance, 500.0);
  }

  #[test]
  fn test_by_assignee_sorted_descending() {
    let ada = assignee("a1", "Ada Lovelace");
    let bob = assignee("a2", "Bob Martin");
    let mut small = issue("1", &ada);
    small.budget = Some(200.0);
    let mut big = issue("2", &bob);
    big.budget = Some(900.0);

    let summary = budget_summary(&[&small, &big]);
    assert_eq!(summary.by_assignee[0].assignee.id, "a2");
    assert_eq!(summary.by_assignee[0].total, 900.0);
  }
}
