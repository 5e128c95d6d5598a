//! Delivery slippage analytics over completed issues.

use crate::analytics::pie::{self, Segment};
use crate::model::{Assignee, Issue};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlippageCategory {
  Early,
  OnTime,
  Late,
}

/// Severity escalates strictly above each boundary: 0 days is still good,
/// 3 days is still moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlippageSeverity {
  Good,
  Moderate,
  Severe,
}

impl SlippageSeverity {
  fn of(days: i64) -> Self {
    if days <= 0 {
      SlippageSeverity::Good
    } else if days <= 3 {
      SlippageSeverity::Moderate
    } else {
      SlippageSeverity::Severe
    }
  }
}

/// Slippage for one completed issue
#[derive(Debug, Clone)]
pub struct SlippageEntry {
  pub issue_key: String,
  pub days: i64,
  /// Slippage relative to the planned start→target duration; 0 when the
  /// planned duration is zero rather than a division blow-up
  pub pct_of_duration: f64,
  pub category: SlippageCategory,
  pub severity: SlippageSeverity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryStats {
  pub count: usize,
  /// Mean of absolute day deltas in the category
  pub avg_days: f64,
}

#[derive(Debug, Clone)]
pub struct AssigneeSlippage {
  pub assignee: Arc<Assignee>,
  pub completed: usize,
  pub total_days: i64,
  pub avg_days: f64,
}

/// Schedule risks worth calling out
#[derive(Debug, Clone, PartialEq)]
pub enum RiskFactor {
  /// More than 30% of completed items delivered late
  LateDeliveries { pct: u32 },
  /// Items slipping past a week
  SevereSlippage { count: usize },
}

impl RiskFactor {
  pub fn message(&self) -> String {
    match self {
      RiskFactor::LateDeliveries { pct } => {
        format!("{}% of items delivered late", pct)
      }
      RiskFactor::SevereSlippage { count } => {
        format!("{} items with >7 days slippage", count)
      }
    }
  }
}

#[derive(Debug, Clone)]
pub struct SlippageSummary {
  pub has_data: bool,
  pub avg_days: f64,
  pub total_variance_days: i64,
  pub entries: Vec<SlippageEntry>,
  pub early: CategoryStats,
  pub on_time: CategoryStats,
  pub late: CategoryStats,
  /// Sorted best (most early) first
  pub by_assignee: Vec<AssigneeSlippage>,
  pub risk_factors: Vec<RiskFactor>,
  pub on_time_delivery_rate_pct: f64,
}

impl SlippageSummary {
  /// Delivery performance wedges for the popover pie
  pub fn category_segments(&self) -> Vec<Segment> {
    vec![
      Segment::new("Early", self.early.count as f64, pie::done_color()),
      Segment::new("On time", self.on_time.count as f64, pie::in_progress_color()),
      Segment::new("Late", self.late.count as f64, pie::danger_color()),
    ]
  }

  /// Late entries sorted worst-first
  pub fn largest_slippages(&self) -> Vec<&SlippageEntry> {
    let mut late: Vec<&SlippageEntry> = self.entries.iter().filter(|e| e.days > 0).collect();
    late.sort_by(|a, b| b.days.cmp(&a.days));
    late
  }
}

fn empty_summary() -> SlippageSummary {
  SlippageSummary {
    has_data: false,
    avg_days: 0.0,
    total_variance_days: 0,
    entries: Vec::new(),
    early: CategoryStats::default(),
    on_time: CategoryStats::default(),
    late: CategoryStats::default(),
    by_assignee: Vec::new(),
    risk_factors: Vec::new(),
    on_time_delivery_rate_pct: 0.0,
  }
}

pub fn slippage_summary(issues: &[&Issue]) -> SlippageSummary {
  let completed: Vec<&&Issue> = issues
    .iter()
    .filter(|i| i.actual_due_date.is_some())
    .collect();
  if completed.is_empty() {
    return empty_summary();
  }

  let entries: Vec<SlippageEntry> = completed
    .iter()
    .filter_map(|issue| {
      let days = issue.slippage_days()?;
      let duration = issue.planned_duration_days();
      let pct_of_duration = if duration > 0 {
        days as f64 / duration as f64 * 100.0
      } else {
        0.0
      };
      let category = if days < 0 {
        SlippageCategory::Early
      } else if days == 0 {
        SlippageCategory::OnTime
      } else {
        SlippageCategory::Late
      };
      Some(SlippageEntry {
        issue_key: issue.key.clone(),
        days,
        pct_of_duration,
        category,
        severity: SlippageSeverity::of(days),
      })
    })
    .collect();

  let category_stats = |category: SlippageCategory| {
    let days: Vec<i64> = entries
      .iter()
      .filter(|e| e.category == category)
      .map(|e| e.days.abs())
      .collect();
    CategoryStats {
      count: days.len(),
      avg_days: if days.is_empty() {
        0.0
      } else {
        days.iter().sum::<i64>() as f64 / days.len() as f64
      },
    }
  };
  let early = category_stats(SlippageCategory::Early);
  let on_time = category_stats(SlippageCategory::OnTime);
  let late = category_stats(SlippageCategory::Late);

  let mut by_assignee: Vec<AssigneeSlippage> = Vec::new();
  for issue in &completed {
    let Some(days) = issue.slippage_days() else {
      continue;
    };
    let idx = match by_assignee
      .iter()
      .position(|s| s.assignee.id == issue.assignee.id)
    {
      Some(idx) => idx,
      None => {
        by_assignee.push(AssigneeSlippage {
          assignee: issue.assignee.clone(),
          completed: 0,
          total_days: 0,
          avg_days: 0.0,
        });
        by_assignee.len() - 1
      }
    };
    let entry = &mut by_assignee[idx];
    entry.completed += 1;
    entry.total_days += days;
  }
  for person in &mut by_assignee {
    person.avg_days = person.total_days as f64 / person.completed.max(1) as f64;
  }
  by_assignee.sort_by(|a, b| a.avg_days.total_cmp(&b.avg_days));

  let total_days: i64 = entries.iter().map(|e| e.days).sum();
  let avg_days = total_days as f64 / completed.len() as f64;

  let mut risk_factors = Vec::new();
  if late.count * 10 > completed.len() * 3 {
    risk_factors.push(RiskFactor::LateDeliveries {
      pct: (late.count as f64 / completed.len() as f64 * 100.0).round() as u32,
    });
  }
  let severe = entries.iter().filter(|e| e.days > 7).count();
  if severe > 0 {
    risk_factors.push(RiskFactor::SevereSlippage { count: severe });
  }

  SlippageSummary {
    has_data: true,
    avg_days,
    total_variance_days: total_days.abs(),
    early,
    on_time,
    late,
    by_assignee,
    risk_factors,
    on_time_delivery_rate_pct: (early.count + on_time.count) as f64 / completed.len() as f64
      * 100.0,
    entries,
  }
}
