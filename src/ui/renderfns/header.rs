use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, portfolio title, and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, gated: bool) {
  let mut spans = vec![
    Span::styled(" trackboard ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", title),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ];

  if !gated {
    spans.extend([
      Span::raw("  "),
      Span::styled("<click>", Style::default().fg(Color::Cyan)),
      Span::styled(" select cells", Style::default().fg(Color::DarkGray)),
      Span::raw("   "),
      Span::styled("<ctrl+click>", Style::default().fg(Color::Cyan)),
      Span::styled(" toggle", Style::default().fg(Color::DarkGray)),
      Span::raw("   "),
      Span::styled("<shift+click>", Style::default().fg(Color::Cyan)),
      Span::styled(" range", Style::default().fg(Color::DarkGray)),
      Span::raw("   "),
      Span::styled("<q>", Style::default().fg(Color::Cyan)),
      Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ]);
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
