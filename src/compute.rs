//! Stateless reductions over selected-cell values.
//!
//! Everything here is total: malformed input degrades to a "no data" result
//! or is filtered out, it never errors. The computation panel calls these on
//! every redraw, so they also stay allocation-light.

use crate::model::{CellField, DataType, SelectedCell};
use chrono::NaiveDate;

/// Result of reducing a set of date strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
  pub earliest: Option<NaiveDate>,
  pub latest: Option<NaiveDate>,
  pub difference_in_days: Option<i64>,
  /// How many inputs parsed successfully
  pub total: usize,
}

impl DateRange {
  fn empty() -> Self {
    DateRange {
      earliest: None,
      latest: None,
      difference_in_days: None,
      total: 0,
    }
  }
}

/// Numeric reduction modes offered by the computation panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericMode {
  Sum,
  Average,
  Range,
  Count,
  CountUnique,
}

impl NumericMode {
  pub const ALL: [NumericMode; 5] = [
    NumericMode::Sum,
    NumericMode::Average,
    NumericMode::Range,
    NumericMode::Count,
    NumericMode::CountUnique,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      NumericMode::Sum => "Sum",
      NumericMode::Average => "Avg",
      NumericMode::Range => "Range",
      NumericMode::Count => "Count",
      NumericMode::CountUnique => "Unique",
    }
  }

  pub fn result_label(&self) -> &'static str {
    match self {
      NumericMode::Sum => "Total",
      NumericMode::Average => "Average",
      NumericMode::Range => "Range",
      NumericMode::Count => "Count",
      NumericMode::CountUnique => "Unique values",
    }
  }

  pub fn next(&self) -> NumericMode {
    let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }
}

/// Parse a date out of fixture/cell text. Accepts plain ISO dates and full
/// RFC 3339 timestamps; anything else is None.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
  if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Some(d);
  }
  chrono::DateTime::parse_from_rfc3339(s)
    .ok()
    .map(|dt| dt.date_naive())
}

/// Reduce date strings to an earliest/latest span. Unparsable entries are
/// dropped; zero valid dates yields the explicit no-data result rather than
/// some default date.
pub fn compute_date_range<S: AsRef<str>>(dates: &[S]) -> DateRange {
  let mut valid: Vec<NaiveDate> = dates.iter().filter_map(|s| parse_date(s.as_ref())).collect();
  if valid.is_empty() {
    return DateRange::empty();
  }
  valid.sort_unstable();

  let earliest = valid[0];
  let latest = valid[valid.len() - 1];
  DateRange {
    earliest: Some(earliest),
    latest: Some(latest),
    difference_in_days: Some(latest.signed_duration_since(earliest).num_days()),
    total: valid.len(),
  }
}

/// Reduce numbers with the given mode. Non-finite values are filtered first;
/// empty (or all-invalid) input is 0 for every mode so nothing downstream
/// ever displays NaN.
pub fn compute_numerical(numbers: &[f64], mode: NumericMode) -> f64 {
  let valid: Vec<f64> = numbers.iter().copied().filter(|n| n.is_finite()).collect();
  if valid.is_empty() {
    return 0.0;
  }

  match mode {
    NumericMode::Sum => valid.iter().sum(),
    NumericMode::Average => valid.iter().sum::<f64>() / valid.len() as f64,
    NumericMode::Range => {
      let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
      let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
      max - min
    }
    NumericMode::Count => valid.len() as f64,
    NumericMode::CountUnique => {
      let mut sorted = valid;
      sorted.sort_by(f64::total_cmp);
      sorted.dedup();
      sorted.len() as f64
    }
  }
}

/// Format a computed value for display. Never touches the stored value.
pub fn format_number(value: f64, data_type: DataType) -> String {
  match data_type {
    DataType::Currency => format_currency(value),
    DataType::Number if value.fract() != 0.0 => format!("{:.2}", value),
    _ => format!("{}", value.round() as i64),
  }
}

/// Whole-dollar currency with thousands separators, e.g. `$12,500`
pub fn format_currency(amount: f64) -> String {
  let negative = amount < 0.0;
  let whole = amount.abs().round() as u64;
  let digits = whole.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  if negative {
    format!("-${}", grouped)
  } else {
    format!("${}", grouped)
  }
}

/// Short display date, e.g. `Mar 4, 2024`
pub fn format_date(date: NaiveDate) -> String {
  date.format("%b %-d, %Y").to_string()
}

/// Cells sharing one (field, data type) pair, rendered as one block
#[derive(Debug)]
pub struct CellGroup<'a> {
  pub field: CellField,
  pub data_type: DataType,
  pub cells: Vec<&'a SelectedCell>,
}

/// Partition a selection by (field, data type) preserving first-seen order.
/// Identical pairs intentionally collide: the panel shows one summary block
/// per distinct pair.
pub fn group_selected_cells(cells: &[SelectedCell]) -> Vec<CellGroup<'_>> {
  let mut groups: Vec<CellGroup> = Vec::new();
  for cell in cells {
    let dt = cell.data_type();
    match groups
      .iter_mut()
      .find(|g| g.field == cell.field && g.data_type == dt)
    {
      Some(group) => group.cells.push(cell),
      None => groups.push(CellGroup {
        field: cell.field,
        data_type: dt,
        cells: vec![cell],
      }),
    }
  }
  groups
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::CellValue;

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[test]
  fn test_date_range_empty() {
    let range = compute_date_range::<&str>(&[]);
    assert_eq!(range.earliest, None);
    assert_eq!(range.latest, None);
    assert_eq!(range.difference_in_days, None);
    assert_eq!(range.total, 0);
  }

  #[test]
  fn test_date_range_drops_invalid() {
    let range = compute_date_range(&["2024-01-05", "2024-01-01", "bad-date"]);
    assert_eq!(range.earliest, Some(d("2024-01-01")));
    assert_eq!(range.latest, Some(d("2024-01-05")));
    assert_eq!(range.difference_in_days, Some(4));
    assert_eq!(range.total, 2);
  }

  #[test]
  fn test_date_range_single_date() {
    let range = compute_date_range(&["2024-06-10"]);
    assert_eq!(range.earliest, Some(d("2024-06-10")));
    assert_eq!(range.latest, Some(d("2024-06-10")));
    assert_eq!(range.difference_in_days, Some(0));
    assert_eq!(range.total, 1);
  }

  #[test]
  fn test_date_range_all_invalid_is_no_data() {
    let range = compute_date_range(&["nope", ""]);
    assert_eq!(range.earliest, None);
    assert_eq!(range.difference_in_days, None);
  }

  #[test]
  fn test_parse_date_accepts_rfc3339() {
    assert_eq!(parse_date("2024-03-04T12:30:00Z"), Some(d("2024-03-04")));
    assert_eq!(parse_date("03/04/2024"), None);
  }

  #[test]
  fn test_numerical_average_filters_invalid() {
    let avg = compute_numerical(&[10.0, 20.0, f64::NAN, 30.0], NumericMode::Average);
    assert_eq!(avg, 20.0);
  }

  #[test]
  fn test_numerical_empty_is_zero_for_every_mode() {
    for mode in NumericMode::ALL {
      assert_eq!(compute_numerical(&[], mode), 0.0);
      assert_eq!(compute_numerical(&[f64::INFINITY], mode), 0.0);
    }
  }

  #[test]
  fn test_numerical_modes() {
    let xs = [4.0, 1.0, 4.0, 7.0];
    assert_eq!(compute_numerical(&xs, NumericMode::Sum), 16.0);
    assert_eq!(compute_numerical(&xs, NumericMode::Average), 4.0);
    assert_eq!(compute_numerical(&xs, NumericMode::Range), 6.0);
    assert_eq!(compute_numerical(&xs, NumericMode::Count), 4.0);
    assert_eq!(compute_numerical(&xs, NumericMode::CountUnique), 3.0);
  }

  #[test]
  fn test_format_number() {
    assert_eq!(format_number(1500.0, DataType::Currency), "$1,500");
    assert_eq!(format_number(2.5, DataType::Number), "2.50");
    assert_eq!(format_number(3.0, DataType::Number), "3");
    assert_eq!(format_number(42.0, DataType::Text), "42");
  }

  #[test]
  fn test_format_currency_grouping() {
    assert_eq!(format_currency(0.0), "$0");
    assert_eq!(format_currency(999.0), "$999");
    assert_eq!(format_currency(1234567.0), "$1,234,567");
    assert_eq!(format_currency(-2500.0), "-$2,500");
  }

  #[test]
  fn test_group_selected_cells_by_field_and_type() {
    let cells = vec![
      SelectedCell {
        issue_id: "1".into(),
        field: CellField::Budget,
        value: CellValue::Currency(100.0),
        display: "$100".into(),
      },
      SelectedCell {
        issue_id: "2".into(),
        field: CellField::StoryPoints,
        value: CellValue::Number(5.0),
        display: "5".into(),
      },
      SelectedCell {
        issue_id: "3".into(),
        field: CellField::Budget,
        value: CellValue::Currency(200.0),
        display: "$200".into(),
      },
    ];
    let groups = group_selected_cells(&cells);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].field, CellField::Budget);
    assert_eq!(groups[0].cells.len(), 2);
    assert_eq!(groups[1].field, CellField::StoryPoints);
  }

  #[test]
  fn test_mode_cycle_wraps() {
    let mut mode = NumericMode::Sum;
    for _ in 0..NumericMode::ALL.len() {
      mode = mode.next();
    }
    assert_eq!(mode, NumericMode::Sum);
  }
}
