//! Event Handling
//!
//! Maps keyboard, mouse, and timer events to storefront actions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit
    ForceQuit,
    /// Enter key
    Submit,
    /// Escape - dismiss the panel or go back
    Escape,
    /// Move the highlight up
    Up,
    /// Move the highlight down
    Down,
    /// Clear the search box (Ctrl+U)
    Clear,
    /// Cycle the listing order on the product view
    CycleSort,
    ToggleHelp,
    /// Mouse button pressed at a cell
    PointerDown { x: u16, y: u16 },
    /// Regular input character
    Input(KeyEvent),
    /// Timer tick for redraws
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Next queued action, without waiting
    pub fn try_next(&mut self) -> Option<AppAction> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }
}

/// Map a crossterm event to an app action
pub fn map_event(event: Event) -> Option<AppAction> {
    match event {
        Event::Key(key) => map_key_event(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(AppAction::PointerDown {
                x: mouse.column,
                y: mouse.row,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Map a key event to an app action
pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(AppAction::Clear),

        (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
            KeyCode::Esc => Some(AppAction::Escape),
            KeyCode::Enter => Some(AppAction::Submit),
            KeyCode::F(1) => Some(AppAction::ToggleHelp),
            KeyCode::Up => Some(AppAction::Up),
            KeyCode::Down => Some(AppAction::Down),
            KeyCode::Tab => Some(AppAction::CycleSort),
            _ => Some(AppAction::Input(key)),
        },

        _ => Some(AppAction::Input(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{MouseEvent, KeyEventKind, KeyEventState};

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(
            map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(AppAction::ForceQuit)
        );
        assert_eq!(
            map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('q'))),
            Some(AppAction::Quit)
        );
        assert_eq!(
            map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('u'))),
            Some(AppAction::Clear)
        );
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::Esc)),
            Some(AppAction::Escape)
        );
        assert_eq!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::Enter)),
            Some(AppAction::Submit)
        );
        let typed = key(KeyModifiers::SHIFT, KeyCode::Char('D'));
        assert_eq!(map_key_event(typed), Some(AppAction::Input(typed)));
    }

    #[test]
    fn test_left_click_is_pointer_down() {
        let event = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(map_event(event), Some(AppAction::PointerDown { x: 12, y: 7 }));

        let moved = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(map_event(moved), None);
    }
}
