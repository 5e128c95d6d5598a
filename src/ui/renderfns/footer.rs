use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer with selection state and contextual hints
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  selected: usize,
  panel_open: bool,
  popover_open: bool,
) {
  let mut spans = vec![Span::raw(" ")];

  if selected > 0 {
    spans.push(Span::styled(
      format!(
        "{} cell{} selected",
        selected,
        if selected == 1 { "" } else { "s" }
      ),
      Style::default().fg(Color::Cyan).bold(),
    ));
    spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
  }

  let hint = if popover_open {
    "h/l:view  Esc:close  j/k:nav  q:quit"
  } else if panel_open {
    "m:mode  x:clear  Esc:close  q:quit"
  } else if selected >= 2 {
    "c:compute  x:clear  j/k:nav  Enter:expand  q:quit"
  } else {
    "j/k:nav  Enter:expand group  click cells to select  q:quit"
  };
  spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
