use super::input::{InputResult, TextInput};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by the access gate that the app needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
  /// User submitted a password attempt
  Submitted(String),
  /// Nothing for the app to do
  None,
}

/// Password gate shown before the dashboard on first launch
#[derive(Debug, Default)]
pub struct Gate {
  input: TextInput,
  error: Option<String>,
  show_password: bool,
}

impl Gate {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a failed attempt; the entry is cleared so the user retypes
  pub fn set_error(&mut self, message: impl Into<String>) {
    self.error = Some(message.into());
    self.input.clear();
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> GateEvent {
    if key.code == KeyCode::Tab {
      self.show_password = !self.show_password;
      return GateEvent::None;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        if value.trim().is_empty() {
          GateEvent::None
        } else {
          GateEvent::Submitted(value)
        }
      }
      InputResult::Cancelled => {
        self.input.clear();
        self.error = None;
        GateEvent::None
      }
      InputResult::Consumed => {
        self.error = None;
        GateEvent::None
      }
      InputResult::NotHandled => GateEvent::None,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let width = 46.min(area.width);
    let height = 8.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let box_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, box_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue))
      .title(" Access Required ")
      .title_alignment(Alignment::Center);
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let shown = if self.show_password {
      self.input.value().to_string()
    } else {
      self.input.masked('•')
    };

    let mut lines = vec![
      Line::from(Span::styled(
        "Enter password to continue",
        Style::default().fg(Color::DarkGray),
      )),
      Line::default(),
      Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Blue)),
        Span::raw(shown),
        Span::styled("_", Style::default().fg(Color::Blue)),
      ]),
      Line::default(),
    ];
    match &self.error {
      Some(error) => lines.push(Line::from(Span::styled(
        error.clone(),
        Style::default().fg(Color::Red),
      ))),
      None => lines.push(Line::from(Span::styled(
        "Enter:submit  Tab:show/hide",
        Style::default().fg(Color::DarkGray),
      ))),
    }

    frame.render_widget(Paragraph::new(lines), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_submit_passes_value_through() {
    let mut gate = Gate::new();
    for c in "hunter2".chars() {
      assert_eq!(gate.handle_key(key(KeyCode::Char(c))), GateEvent::None);
    }
    assert_eq!(
      gate.handle_key(key(KeyCode::Enter)),
      GateEvent::Submitted("hunter2".to_string())
    );
  }

  #[test]
  fn test_blank_submit_is_ignored() {
    let mut gate = Gate::new();
    assert_eq!(gate.handle_key(key(KeyCode::Enter)), GateEvent::None);
  }

  #[test]
  fn test_error_clears_entry() {
    let mut gate = Gate::new();
    gate.handle_key(key(KeyCode::Char('x')));
    gate.set_error("Incorrect password. Please try again.");
    assert!(gate.input.is_empty());
    assert!(gate.error.is_some());

    // Typing again clears the error
    gate.handle_key(key(KeyCode::Char('y')));
    assert!(gate.error.is_none());
  }
}
