/// Input state tracker.
///
/// Drains every pending terminal event once per frame and sorts it into
/// left-button clicks, fresh key presses, and a resize flag.
/// Requires mouse capture to be enabled (the renderer does this in `init`).

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

pub struct InputState {
    /// Raw (column, row) of each left-button press this frame, in order.
    pub clicks: Vec<(u16, u16)>,

    /// Key presses and repeats collected this frame.
    pub keys: Vec<KeyEvent>,

    /// Terminal was resized since the previous drain.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            clicks: Vec::with_capacity(4),
            keys: Vec::with_capacity(8),
            resized: false,
        }
    }

    /// Read all available events without blocking.
    pub fn drain_events(&mut self) -> io::Result<()> {
        self.clicks.clear();
        self.keys.clear();
        self.resized = false;

        while poll(Duration::ZERO)? {
            match event::read()? {
                Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                    self.clicks.push((m.column, m.row));
                }
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    self.keys.push(key);
                }
                Event::Resize(_, _) => self.resized = true,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.keys.iter().any(|k| k.code == code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.keys.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
