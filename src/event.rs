use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Mouse interaction (cell selection is pointer-driven)
  Mouse(MouseEvent),
  /// Periodic tick for UI refresh
  Tick,
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(evt) = event::read() {
            let forwarded = match evt {
              CrosstermEvent::Key(key) => Some(Event::Key(key)),
              CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
              _ => None,
            };
            if let Some(evt) = forwarded {
              if tx.send(evt).is_err() {
                break;
              }
            }
          }
        } else {
          // Tick
          if tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
