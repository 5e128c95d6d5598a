use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Reusable single-line text input
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// The value with every character replaced, for secret entry
  pub fn masked(&self, mask: char) -> String {
    std::iter::repeat(mask).take(self.buffer.chars().count()).collect()
  }

  /// Clear the input
  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          self.buffer.remove(self.cursor);
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Consumed
      }
      KeyCode::Right => {
        if self.cursor < self.buffer.len() {
          self.cursor += 1;
        }
        InputResult::Consumed
      }
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        // Clear line before cursor
        self.buffer = self.buffer[self.cursor..].to_string();
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.buffer.insert(self.cursor, c);
        self.cursor += 1;
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }
}
