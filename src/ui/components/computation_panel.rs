//! Floating computation panel over the current cell selection.
//!
//! One block renders per (field, data type) group: date groups get an
//! earliest/latest span, numeric groups get the active reduction mode.

use crate::compute::{self, format_date, NumericMode};
use crate::model::{CellField, DataType, SelectedCell};
use crate::selection::SelectionState;
use ratatui::prelude::*;

pub fn content(selection: &SelectionState, mode: NumericMode) -> Vec<Line<'static>> {
  let cells = selection.cells();
  let mut lines = vec![
    Line::from(vec![
      Span::styled("Σ ", Style::default().fg(Color::Cyan).bold()),
      Span::styled(
        format!(
          "{} cell{} selected",
          cells.len(),
          if cells.len() == 1 { "" } else { "s" }
        ),
        Style::default().bold(),
      ),
    ]),
    Line::default(),
  ];

  let date_cells: Vec<&SelectedCell> = cells
    .iter()
    .filter(|c| c.data_type() == DataType::Date)
    .collect();
  if !date_cells.is_empty() {
    date_section(&mut lines, &date_cells);
  }

  for group in compute::group_selected_cells(cells) {
    if group.data_type == DataType::Date {
      continue;
    }
    numeric_section(&mut lines, group.field, group.data_type, &group.cells, mode);
  }

  lines.push(Line::from(Span::styled(
    "m:mode  x:clear all  Esc:close",
    Style::default().fg(Color::DarkGray),
  )));
  lines
}

fn date_section(lines: &mut Vec<Line<'static>>, date_cells: &[&SelectedCell]) {
  let mut fields: Vec<CellField> = Vec::new();
  for cell in date_cells {
    if !fields.contains(&cell.field) {
      fields.push(cell.field);
    }
  }
  let multi_field = fields.len() > 1;

  let title = if multi_field {
    "Date Range".to_string()
  } else {
    fields[0].label().to_string()
  };
  lines.push(Line::from(Span::styled(title, Style::default().bold())));
  let scope = if multi_field {
    format!("{} cells across {} fields", date_cells.len(), fields.len())
  } else {
    format!(
      "{} cell{}",
      date_cells.len(),
      if date_cells.len() == 1 { "" } else { "s" }
    )
  };
  lines.push(Line::from(Span::styled(
    scope,
    Style::default().fg(Color::DarkGray),
  )));

  let strings: Vec<&str> = date_cells
    .iter()
    .filter_map(|c| c.value.as_date_str())
    .collect();
  let range = compute::compute_date_range(&strings);

  let (Some(earliest), Some(latest), Some(days)) =
    (range.earliest, range.latest, range.difference_in_days)
  else {
    lines.push(Line::from(Span::styled(
      "No valid dates selected",
      Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::default());
    return;
  };

  // Which field an endpoint came from, for combined multi-field ranges
  let field_of = |date: chrono::NaiveDate| {
    date_cells
      .iter()
      .find(|c| {
        c.value
          .as_date_str()
          .and_then(compute::parse_date)
          .is_some_and(|d| d == date)
      })
      .map(|c| c.field)
  };

  let endpoint = |word: &str, date: chrono::NaiveDate| {
    let mut spans = vec![
      Span::styled(format!("{:<5}", word), Style::default().fg(Color::DarkGray)),
      Span::styled(format_date(date), Style::default().bold()),
    ];
    if multi_field {
      if let Some(field) = field_of(date) {
        spans.push(Span::styled(
          format!("  {}", field.label()),
          Style::default().fg(Color::DarkGray),
        ));
      }
    }
    Line::from(spans)
  };
  lines.push(endpoint("from", earliest));
  lines.push(endpoint("to", latest));

  let span_text = if days == 0 {
    "Same date".to_string()
  } else {
    format!("{} day{}", days, if days == 1 { "" } else { "s" })
  };
  lines.push(Line::from(Span::styled(
    span_text,
    Style::default().fg(Color::Blue).bold(),
  )));
  lines.push(Line::from(Span::styled(
    format!("Items: {}", range.total),
    Style::default().fg(Color::DarkGray),
  )));
  lines.push(Line::default());
}

fn numeric_section(
  lines: &mut Vec<Line<'static>>,
  field: CellField,
  data_type: DataType,
  cells: &[&SelectedCell],
  mode: NumericMode,
) {
  lines.push(Line::from(Span::styled(
    field.label().to_string(),
    Style::default().bold(),
  )));
  lines.push(Line::from(Span::styled(
    format!("{} cell{}", cells.len(), if cells.len() == 1 { "" } else { "s" }),
    Style::default().fg(Color::DarkGray),
  )));

  let mut tabs = Vec::new();
  for (idx, m) in NumericMode::ALL.iter().enumerate() {
    if idx > 0 {
      tabs.push(Span::raw(" "));
    }
    let style = if *m == mode {
      Style::default().fg(Color::Blue).bold()
    } else {
      Style::default().fg(Color::DarkGray)
    };
    tabs.push(Span::styled(m.label(), style));
  }
  lines.push(Line::from(tabs));

  let numbers: Vec<f64> = cells.iter().filter_map(|c| c.value.as_number()).collect();
  let result = compute::compute_numerical(&numbers, mode);
  // Counts are counts no matter what the cells hold
  let formatted = match mode {
    NumericMode::Count | NumericMode::CountUnique => format!("{}", result as i64),
    _ => compute::format_number(result, data_type),
  };
  lines.push(Line::from(vec![
    Span::styled(
      format!("{}: ", mode.result_label()),
      Style::default().fg(Color::DarkGray),
    ),
    Span::styled(formatted, Style::default().fg(Color::Blue).bold()),
  ]));
  lines.push(Line::from(Span::styled(
    format!("Items: {}", numbers.len()),
    Style::default().fg(Color::DarkGray),
  )));
  lines.push(Line::default());
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::CellValue;
  use crate::selection::SelectionEvent;
  use ratatui::layout::Rect;

  fn cell(id: &str, field: CellField, value: CellValue) -> SelectedCell {
    SelectedCell {
      issue_id: id.to_string(),
      field,
      value,
      display: String::new(),
    }
  }

  fn text_of(lines: &[Line]) -> String {
    lines
      .iter()
      .map(|l| {
        l.spans
          .iter()
          .map(|s| s.content.as_ref())
          .collect::<String>()
      })
      .collect::<Vec<_>>()
      .join("\n")
  }

  #[test]
  fn test_numeric_block_shows_sum() {
    let mut selection = SelectionState::default();
    selection.apply(SelectionEvent::Click {
      cell: cell("1", CellField::Budget, CellValue::Currency(1000.0)),
      rect: Rect::new(0, 0, 5, 1),
    });
    selection.apply(SelectionEvent::CtrlClick {
      cell: cell("2", CellField::Budget, CellValue::Currency(500.0)),
    });

    let text = text_of(&content(&selection, NumericMode::Sum));
    assert!(text.contains("2 cells selected"));
    assert!(text.contains("Total: $1,500"));
    assert!(text.contains("Items: 2"));
  }

  #[test]
  fn test_date_block_shows_span() {
    let mut selection = SelectionState::default();
    selection.apply(SelectionEvent::Click {
      cell: cell("1", CellField::DueDate, CellValue::Date("2024-01-01".into())),
      rect: Rect::new(0, 0, 5, 1),
    });
    selection.apply(SelectionEvent::CtrlClick {
      cell: cell("2", CellField::DueDate, CellValue::Date("2024-01-05".into())),
    });

    let text = text_of(&content(&selection, NumericMode::Sum));
    assert!(text.contains("Due Date"));
    assert!(text.contains("4 days"));
  }

  #[test]
  fn test_mixed_date_fields_render_combined_range() {
    let mut selection = SelectionState::default();
    selection.apply(SelectionEvent::Click {
      cell: cell("1", CellField::StartDate, CellValue::Date("2024-01-01".into())),
      rect: Rect::new(0, 0, 5, 1),
    });
    selection.apply(SelectionEvent::CtrlClick {
      cell: cell("1", CellField::DueDate, CellValue::Date("2024-02-01".into())),
    });

    let text = text_of(&content(&selection, NumericMode::Sum));
    assert!(text.contains("Date Range"));
    assert!(text.contains("across 2 fields"));
  }

  #[test]
  fn test_same_date_label() {
    let mut selection = SelectionState::default();
    selection.apply(SelectionEvent::Click {
      cell: cell("1", CellField::DueDate, CellValue::Date("2024-01-01".into())),
      rect: Rect::new(0, 0, 5, 1),
    });
    selection.apply(SelectionEvent::CtrlClick {
      cell: cell("2", CellField::DueDate, CellValue::Date("2024-01-01".into())),
    });
    let text = text_of(&content(&selection, NumericMode::Sum));
    assert!(text.contains("Same date"));
  }
}
