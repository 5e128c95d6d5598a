//! Cell selection state machine.
//!
//! Every pointer interaction with the table reduces to one of the
//! [`SelectionEvent`] variants, and [`SelectionState::apply`] is the single
//! transition function. Keeping this a plain reducer means the whole click /
//! ctrl-click / shift-range behavior is unit-testable without a terminal.

use crate::compute::{format_currency, format_date};
use crate::model::{AssigneeGroup, CellField, CellValue, Issue, SelectedCell};
use ratatui::layout::Rect;

/// Current selection: the selected cells, the cell a shift-range would anchor
/// from, and the screen rect of the most recent plain click (where the
/// calculator affordance attaches).
#[derive(Debug, Default)]
pub struct SelectionState {
  cells: Vec<SelectedCell>,
  last: Option<SelectedCell>,
  anchor: Option<Rect>,
}

/// Pointer interactions the table forwards to the reducer
#[derive(Debug)]
pub enum SelectionEvent<'a> {
  /// Plain click: selection becomes exactly this cell
  Click { cell: SelectedCell, rect: Rect },
  /// Ctrl/Cmd-click: toggle membership, type-homogeneous additions only
  CtrlClick { cell: SelectedCell },
  /// Shift-click: inclusive range within one field. `field_order` is the
  /// full list of that field's cells across every row in table order.
  ShiftClick {
    cell: SelectedCell,
    rect: Rect,
    field_order: &'a [SelectedCell],
  },
  /// Click anywhere that is not a cell, the calculator, or the panel
  ClickOutside,
}

impl SelectionState {
  pub fn cells(&self) -> &[SelectedCell] {
    &self.cells
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn anchor(&self) -> Option<Rect> {
    self.anchor
  }

  pub fn contains(&self, issue_id: &str, field: CellField) -> bool {
    self
      .cells
      .iter()
      .any(|c| c.issue_id == issue_id && c.field == field)
  }

  pub fn clear(&mut self) {
    self.cells.clear();
    self.last = None;
    self.anchor = None;
  }

  /// Apply one transition. Rejected interactions (heterogeneous ctrl-add,
  /// shift-range with a missing endpoint) leave the state untouched.
  pub fn apply(&mut self, event: SelectionEvent) {
    match event {
      SelectionEvent::Click { cell, rect } => self.plain_click(cell, rect),
      SelectionEvent::CtrlClick { cell } => self.ctrl_click(cell),
      SelectionEvent::ShiftClick {
        cell,
        rect,
        field_order,
      } => self.shift_click(cell, rect, field_order),
      SelectionEvent::ClickOutside => self.clear(),
    }
  }

  fn plain_click(&mut self, cell: SelectedCell, rect: Rect) {
    self.cells = vec![cell.clone()];
    self.last = Some(cell);
    self.anchor = Some(rect);
  }

  fn ctrl_click(&mut self, cell: SelectedCell) {
    let existing = self
      .cells
      .iter()
      .position(|c| c.issue_id == cell.issue_id && c.field == cell.field);

    if let Some(idx) = existing {
      self.cells.remove(idx);
      if self.cells.is_empty() {
        self.last = None;
        self.anchor = None;
      }
      return;
    }

    // Additions must match the data type of everything already selected
    let homogeneous = self.cells.iter().all(|c| c.data_type() == cell.data_type());
    if self.cells.is_empty() || homogeneous {
      self.cells.push(cell.clone());
      self.last = Some(cell);
    }
  }

  fn shift_click(&mut self, cell: SelectedCell, rect: Rect, field_order: &[SelectedCell]) {
    // Range selection only extends from a previous selection in the same
    // field; otherwise this is just a click.
    let last = match &self.last {
      Some(last) if last.field == cell.field => last.clone(),
      _ => return self.plain_click(cell, rect),
    };

    let last_idx = field_order.iter().position(|c| c.issue_id == last.issue_id);
    let cell_idx = field_order.iter().position(|c| c.issue_id == cell.issue_id);
    let (Some(last_idx), Some(cell_idx)) = (last_idx, cell_idx) else {
      // Either endpoint missing from the recomputed cell list (the table may
      // have been regrouped between clicks): fail safe, change nothing.
      return;
    };

    let start = last_idx.min(cell_idx);
    let end = last_idx.max(cell_idx);

    // Replace same-field selections with the range, keep other fields
    self.cells.retain(|c| c.field != cell.field);
    self.cells.extend(field_order[start..=end].iter().cloned());
    self.last = Some(cell);
  }
}

/// Extract the selectable value for one (issue, field) cell, mirroring how
/// the table displays it.
pub fn cell_value(issue: &Issue, field: CellField) -> SelectedCell {
  let (value, display) = match field {
    CellField::StartDate => {
      let date = issue.effective_start();
      (CellValue::Date(date.to_string()), format_date(date))
    }
    CellField::TargetDate => (
      CellValue::Date(issue.target_date.to_string()),
      format_date(issue.target_date),
    ),
    CellField::DueDate => (
      CellValue::Date(issue.due_date.to_string()),
      format_date(issue.due_date),
    ),
    CellField::Budget => {
      let budget = issue.budget.unwrap_or(0.0);
      (CellValue::Currency(budget), format_currency(budget))
    }
    CellField::StoryPoints => {
      let points = issue.story_points.unwrap_or(0.0);
      (CellValue::Number(points), format_number_short(points))
    }
    CellField::TimeTracking => {
      let spent = issue.time_spent.unwrap_or(0.0);
      (CellValue::Number(spent), format!("{}h", spent as i64))
    }
    CellField::Slippage => match issue.slippage_days() {
      Some(days) => (
        CellValue::Number(days as f64),
        format!("{}{}d", if days > 0 { "+" } else { "" }, days),
      ),
      None => (CellValue::Number(0.0), "-".to_string()),
    },
  };

  SelectedCell {
    issue_id: issue.id.clone(),
    field,
    value,
    display,
  }
}

fn format_number_short(n: f64) -> String {
  if n.fract() == 0.0 {
    format!("{}", n as i64)
  } else {
    format!("{:.1}", n)
  }
}

/// All cells for one field across every group in table order. This is the
/// ordering shift-range selection indexes into.
pub fn cells_for_field(groups: &[AssigneeGroup<'_>], field: CellField) -> Vec<SelectedCell> {
  groups
    .iter()
    .flat_map(|g| g.issues.iter().map(move |i| cell_value(i, field)))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::testutil::{assignee, date, issue};
  use crate::model::DataType;

  fn rect() -> Rect {
    Rect::new(10, 5, 12, 1)
  }

  fn budget_cell(id: &str, amount: f64) -> SelectedCell {
    SelectedCell {
      issue_id: id.to_string(),
      field: CellField::Budget,
      value: CellValue::Currency(amount),
      display: format_currency(amount),
    }
  }

  fn date_cell(id: &str, iso: &str) -> SelectedCell {
    SelectedCell {
      issue_id: id.to_string(),
      field: CellField::DueDate,
      value: CellValue::Date(iso.to_string()),
      display: iso.to_string(),
    }
  }

  #[test]
  fn test_plain_click_replaces_selection() {
    let mut state = SelectionState::default();
    state.apply(SelectionEvent::Click {
      cell: budget_cell("1", 100.0),
      rect: rect(),
    });
    state.apply(SelectionEvent::Click {
      cell: budget_cell("2", 200.0),
      rect: rect(),
    });
    assert_eq!(state.len(), 1);
    assert!(state.contains("2", CellField::Budget));
    assert!(state.anchor().is_some());
  }

  #[test]
  fn test_ctrl_click_builds_homogeneous_selection() {
    let mut state = SelectionState::default();
    state.apply(SelectionEvent::CtrlClick {
      cell: budget_cell("1", 100.0),
    });
    state.apply(SelectionEvent::CtrlClick {
      cell: budget_cell("2", 200.0),
    });
    assert_eq!(state.len(), 2);

    // A date cell cannot join a currency selection: no-op, length unchanged
    state.apply(SelectionEvent::CtrlClick {
      cell: date_cell("3", "2024-05-01"),
    });
    assert_eq!(state.len(), 2);
    assert!(!state.contains("3", CellField::DueDate));
    assert!(state
      .cells()
      .iter()
      .all(|c| c.data_type() == DataType::Currency));
  }

  #[test]
  fn test_ctrl_click_toggles_off_and_clears_anchor_when_empty() {
    let mut state = SelectionState::default();
    state.apply(SelectionEvent::Click {
      cell: budget_cell("1", 100.0),
      rect: rect(),
    });
    assert!(state.anchor().is_some());

    state.apply(SelectionEvent::CtrlClick {
      cell: budget_cell("1", 100.0),
    });
    assert!(state.is_empty());
    assert!(state.anchor().is_none());
  }

  #[test]
  fn test_shift_click_selects_inclusive_range() {
    let order: Vec<SelectedCell> = (1..=10)
      .map(|i| date_cell(&i.to_string(), "2024-01-01"))
      .collect();

    let mut state = SelectionState::default();
    state.apply(SelectionEvent::Click {
      cell: order[1].clone(),
      rect: rect(),
    });
    // A pre-existing selection on another field must survive the range
    state.apply(SelectionEvent::CtrlClick {
      cell: budget_cell("7", 700.0),
    });

    state.apply(SelectionEvent::ShiftClick {
      cell: order[4].clone(),
      rect: rect(),
      field_order: &order,
    });

    let due: Vec<&SelectedCell> = state
      .cells()
      .iter()
      .filter(|c| c.field == CellField::DueDate)
      .collect();
    assert_eq!(due.len(), 4);
    for id in ["2", "3", "4", "5"] {
      assert!(state.contains(id, CellField::DueDate));
    }
    assert!(state.contains("7", CellField::Budget));
  }

  #[test]
  fn test_shift_click_missing_endpoint_is_noop() {
    let order: Vec<SelectedCell> = (1..=3)
      .map(|i| date_cell(&i.to_string(), "2024-01-01"))
      .collect();

    let mut state = SelectionState::default();
    state.apply(SelectionEvent::Click {
      cell: date_cell("99", "2024-01-01"), // not in order list
      rect: rect(),
    });
    state.apply(SelectionEvent::ShiftClick {
      cell: order[2].clone(),
      rect: rect(),
      field_order: &order,
    });
    // Endpoint lookup failed: selection unchanged
    assert_eq!(state.len(), 1);
    assert!(state.contains("99", CellField::DueDate));
  }

  #[test]
  fn test_shift_click_other_field_degrades_to_plain_click() {
    let order = vec![budget_cell("1", 1.0), budget_cell("2", 2.0)];
    let mut state = SelectionState::default();
    state.apply(SelectionEvent::Click {
      cell: date_cell("1", "2024-01-01"),
      rect: rect(),
    });
    state.apply(SelectionEvent::ShiftClick {
      cell: budget_cell("2", 2.0),
      rect: rect(),
      field_order: &order,
    });
    assert_eq!(state.len(), 1);
    assert!(state.contains("2", CellField::Budget));
  }

  #[test]
  fn test_click_outside_clears_everything() {
    let mut state = SelectionState::default();
    state.apply(SelectionEvent::Click {
      cell: budget_cell("1", 100.0),
      rect: rect(),
    });
    state.apply(SelectionEvent::ClickOutside);
    assert!(state.is_empty());
    assert!(state.anchor().is_none());
  }

  #[test]
  fn test_cell_value_slippage_display() {
    let a = assignee("a1", "Ada Lovelace");
    let mut it = issue("1", &a);
    it.target_date = date("2024-03-01");
    it.actual_due_date = Some(date("2024-03-04"));

    let cell = cell_value(&it, CellField::Slippage);
    assert_eq!(cell.value, CellValue::Number(3.0));
    assert_eq!(cell.display, "+3d");

    it.actual_due_date = None;
    let cell = cell_value(&it, CellField::Slippage);
    assert_eq!(cell.display, "-");
  }

  #[test]
  fn test_cells_for_field_follows_group_order() {
    let ada = assignee("a1", "Ada Lovelace");
    let bob = assignee("a2", "Bob Martin");
    let issues = vec![issue("1", &ada), issue("2", &bob), issue("3", &ada)];
    let groups = crate::model::group_by_assignee(&issues);
    let cells = cells_for_field(&groups, CellField::DueDate);
    let ids: Vec<&str> = cells.iter().map(|c| c.issue_id.as_str()).collect();
    // Ada's issues first (1, 3), then Bob's (2)
    assert_eq!(ids, vec!["1", "3", "2"]);
  }
}
