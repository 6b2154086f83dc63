use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Poll at most once per `tick_rate`, usually one display frame
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        Ok(Some(AppEvent::Click(mouse.column, mouse.row)))
                    }
                    MouseEventKind::Moved => Ok(Some(AppEvent::Hover(mouse.column, mouse.row))),
                    MouseEventKind::ScrollDown => Ok(Some(AppEvent::Wheel(1))),
                    MouseEventKind::ScrollUp => Ok(Some(AppEvent::Wheel(-1))),
                    _ => Ok(None),
                },
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Left mouse button pressed at (column, row)
    Click(u16, u16),
    /// Pointer moved to (column, row)
    Hover(u16, u16),
    /// Mouse wheel notches; positive scrolls down
    Wheel(i8),
    /// Terminal was resized
    Resize(u16, u16),
    /// No input within one frame
    Tick,
}
