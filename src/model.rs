use chrono::NaiveDate;
use std::sync::Arc;

/// Workflow status of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
  Todo,
  InProgress,
  Done,
}

impl Status {
  pub fn label(&self) -> &'static str {
    match self {
      Status::Todo => "To do",
      Status::InProgress => "In progress",
      Status::Done => "Done",
    }
  }
}

/// A person from the shared roster. Issues hold `Arc<Assignee>` so that
/// everyone assigned to the same person shares one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignee {
  pub id: String,
  pub name: String,
  pub avatar: String,
  pub email: String,
}

impl Assignee {
  /// First name, used in compact legend rows
  pub fn short_name(&self) -> &str {
    self.name.split_whitespace().next().unwrap_or(&self.name)
  }
}

/// Link relationship between two issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
  Blocks,
  IsBlockedBy,
  RelatesTo,
}

impl DependencyKind {
  pub fn label(&self) -> &'static str {
    match self {
      DependencyKind::Blocks => "Blocks",
      DependencyKind::IsBlockedBy => "Blocked by",
      DependencyKind::RelatesTo => "Relates to",
    }
  }
}

/// A weak reference to another issue. `target_status` is a snapshot taken
/// when the link was recorded and may lag behind the live target issue; it is
/// never reconciled in place (see analytics::deps for the read-time override).
#[derive(Debug, Clone)]
pub struct Dependency {
  pub kind: DependencyKind,
  pub target_issue_id: String,
  pub target_issue_key: String,
  pub target_status: Status,
}

/// A trackable unit of work
#[derive(Debug, Clone)]
pub struct Issue {
  pub id: String,
  pub key: String,
  pub summary: String,
  pub status: Status,
  pub assignee: Arc<Assignee>,

  pub start_date: NaiveDate,
  pub target_date: NaiveDate,
  pub due_date: NaiveDate,
  pub actual_start_date: Option<NaiveDate>,
  pub actual_due_date: Option<NaiveDate>,

  pub comments: u32,
  pub dependencies: Vec<Dependency>,

  pub budget: Option<f64>,
  pub story_points: Option<f64>,
  pub original_estimate: Option<f64>,
  pub remaining_estimate: Option<f64>,
  pub time_spent: Option<f64>,
  pub effort: Option<f64>,
  pub effort_remaining: Option<f64>,
}

impl Issue {
  /// Actual start when recorded, planned start otherwise
  pub fn effective_start(&self) -> NaiveDate {
    self.actual_start_date.unwrap_or(self.start_date)
  }

  /// Days between target and actual completion. Negative = delivered early,
  /// zero = on time, positive = late. None until the item has completed.
  pub fn slippage_days(&self) -> Option<i64> {
    let actual = self.actual_due_date?;
    Some(actual.signed_duration_since(self.target_date).num_days())
  }

  /// Planned duration from start to target, in days
  pub fn planned_duration_days(&self) -> i64 {
    self
      .target_date
      .signed_duration_since(self.start_date)
      .num_days()
  }

  /// Time spent as a percentage of the original estimate. None when no
  /// estimate exists to compare against.
  pub fn time_efficiency_pct(&self) -> Option<f64> {
    let estimate = self.original_estimate.filter(|e| *e > 0.0)?;
    Some(self.time_spent.unwrap_or(0.0) / estimate * 100.0)
  }
}

/// The kind of value a table cell carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
  Date,
  Number,
  Currency,
  Text,
}

/// Selectable per-issue columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
  StartDate,
  TargetDate,
  DueDate,
  Budget,
  StoryPoints,
  TimeTracking,
  Slippage,
}

impl CellField {
  pub fn label(&self) -> &'static str {
    match self {
      CellField::StartDate => "Start Date",
      CellField::TargetDate => "Target Date",
      CellField::DueDate => "Due Date",
      CellField::Budget => "Budget",
      CellField::StoryPoints => "Story Points",
      CellField::TimeTracking => "Time Tracking",
      CellField::Slippage => "Slippage",
    }
  }
}

/// Raw typed value held by a selected cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
  /// ISO date string (kept as text so ad-hoc range computation can stay
  /// lenient about what it parses)
  Date(String),
  Number(f64),
  Currency(f64),
  Text(String),
}

impl CellValue {
  pub fn data_type(&self) -> DataType {
    match self {
      CellValue::Date(_) => DataType::Date,
      CellValue::Number(_) => DataType::Number,
      CellValue::Currency(_) => DataType::Currency,
      CellValue::Text(_) => DataType::Text,
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      CellValue::Number(n) | CellValue::Currency(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_date_str(&self) -> Option<&str> {
    match self {
      CellValue::Date(s) => Some(s),
      _ => None,
    }
  }
}

/// One selected (issue, field) unit in the table
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCell {
  pub issue_id: String,
  pub field: CellField,
  pub value: CellValue,
  pub display: String,
}

impl SelectedCell {
  pub fn data_type(&self) -> DataType {
    self.value.data_type()
  }
}

/// Issues of one assignee, in collection order
#[derive(Debug)]
pub struct AssigneeGroup<'a> {
  pub assignee: Arc<Assignee>,
  pub issues: Vec<&'a Issue>,
}

/// Group issues by assignee, preserving first-seen order. This order is also
/// the table's visual order, which shift-range selection depends on.
pub fn group_by_assignee(issues: &[Issue]) -> Vec<AssigneeGroup<'_>> {
  let mut groups: Vec<AssigneeGroup> = Vec::new();
  for issue in issues {
    match groups
      .iter_mut()
      .find(|g| g.assignee.id == issue.assignee.id)
    {
      Some(group) => group.issues.push(issue),
      None => groups.push(AssigneeGroup {
        assignee: issue.assignee.clone(),
        issues: vec![issue],
      }),
    }
  }
  groups
}


#[cfg(test)]
mod tests {
  use super::testutil::*;
  use super::*;

  #[test]
  fn test_slippage_days_requires_completion() {
    let a = assignee("a1", "Ada Lovelace");
    let mut it = issue("1", &a);
    assert_eq!(it.slippage_days(), None);

    it.target_date = date("2024-03-01");
    it.actual_due_date = Some(date("2024-03-04"));
    assert_eq!(it.slippage_days(), Some(3));

    it.actual_due_date = Some(date("2024-02-28"));
    assert_eq!(it.slippage_days(), Some(-2));
  }

  #[test]
  fn test_time_efficiency_guards_missing_estimate() {
    let a = assignee("a1", "Ada Lovelace");
    let mut it = issue("1", &a);
    assert_eq!(it.time_efficiency_pct(), None);

    it.original_estimate = Some(0.0);
    assert_eq!(it.time_efficiency_pct(), None);

    it.original_estimate = Some(40.0);
    it.time_spent = Some(50.0);
    assert_eq!(it.time_efficiency_pct(), Some(125.0));
  }

  #[test]
  fn test_group_by_assignee_preserves_order() {
    let ada = assignee("a1", "Ada Lovelace");
    let bob = assignee("a2", "Bob Martin");
    let issues = vec![
      issue("1", &ada),
      issue("2", &bob),
      issue("3", &ada),
    ];
    let groups = group_by_assignee(&issues);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].assignee.id, "a1");
    assert_eq!(groups[0].issues.len(), 2);
    assert_eq!(groups[1].assignee.id, "a2");
  }

  #[test]
  fn test_effective_start_prefers_actual() {
    let a = assignee("a1", "Ada Lovelace");
    let mut it = issue("1", &a);
    assert_eq!(it.effective_start(), date("2024-01-01"));
    it.actual_start_date = Some(date("2024-01-05"));
    assert_eq!(it.effective_start(), date("2024-01-05"));
  }
}
